//! # パスワード
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`PlainPassword`] | 平文パスワード | 会員登録・ログイン・変更時の入力値 |
//! | [`PasswordHash`] | パスワードハッシュ | 保存用のハッシュ値（Argon2id） |
//! | [`PasswordVerifyResult`] | 検証結果 | 照合の成否 |

use crate::DomainError;

/// 平文パスワード
///
/// Debug 出力ではパスワードの値をマスクする。
#[derive(Clone)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
   }
}

impl PlainPassword {
   pub const MIN_LENGTH: usize = 8;
   pub const MAX_LENGTH: usize = 64;

   /// ログイン時の入力値（長さを検証しない）
   pub fn new(value: impl Into<String>) -> Self {
      Self(value.into())
   }

   /// 新しく設定するパスワード
   ///
   /// 長さが範囲外なら `field` を詳細に含めた `INVALID_INPUT` を返す。
   pub fn new_checked(field: &str, value: impl Into<String>) -> Result<Self, DomainError> {
      let value = value.into();
      let length = value.chars().count();

      if length < Self::MIN_LENGTH {
         return Err(DomainError::invalid(
            field,
            format!("{} 文字以上である必要があります", Self::MIN_LENGTH),
         ));
      }
      if length > Self::MAX_LENGTH {
         return Err(DomainError::invalid(
            field,
            format!("{} 文字以内である必要があります", Self::MAX_LENGTH),
         ));
      }

      Ok(Self(value))
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// パスワードハッシュ（PHC 文字列形式）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
   pub fn new(hash: impl Into<String>) -> Self {
      Self(hash.into())
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// パスワード照合結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerifyResult {
   Match,
   Mismatch,
}

impl PasswordVerifyResult {
   pub fn is_match(&self) -> bool {
      matches!(self, Self::Match)
   }
}

impl From<bool> for PasswordVerifyResult {
   fn from(matched: bool) -> Self {
      if matched { Self::Match } else { Self::Mismatch }
   }
}
