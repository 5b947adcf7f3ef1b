//! # ユーザー
//!
//! ユーザーエンティティと、レスポンス境界に出す [`Identity`] を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`User`] | ユーザー | パスワードハッシュを含む保存用レコード |
//! | [`Identity`] | 認証主体 | パスワードを含まない公開用の表現 |
//! | [`Email`] | メールアドレス | 一意 |
//! | [`Nickname`] | ニックネーム | 一意 |
//!
//! ## 設計方針
//!
//! - **機密情報の分離**: [`Identity`] にはパスワード関連のフィールドが存在しない。
//!   レスポンスに載せるのは常に [`User::to_identity`] の結果
//! - **不変性**: 更新は `with_*` メソッドで新しいインスタンスを返す

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, ownership::Owned, password::PasswordHash};

define_uuid_id! {
    /// ユーザー ID
    pub struct UserId;
}

define_validated_string! {
    /// ニックネーム
    pub struct Nickname {
        field: "nickname",
        max_length: 30,
    }
}

/// メールアドレス（値オブジェクト）
///
/// 比較は小文字化した値で行う（`A@X.com` と `a@x.com` は同じアドレス）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub const MAX_LENGTH: usize = 255;

    /// メールアドレスを作成する
    ///
    /// - 空文字列ではない
    /// - `local@domain` の形式
    /// - 最大 255 文字
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_lowercase();

        if value.is_empty() {
            return Err(DomainError::invalid("email", "必須です"));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::invalid("email", "形式が不正です"));
        };

        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(DomainError::invalid("email", "形式が不正です"));
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(DomainError::invalid(
                "email",
                format!("{} 文字以内である必要があります", Self::MAX_LENGTH),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ユーザーの更新内容
///
/// ストアは書き込みロック内で最新のレコードに適用する。
#[derive(Debug, Clone)]
pub enum UserEdit {
    /// プロフィール（`None` の項目は現在の値を維持する）
    Profile {
        nickname:          Option<Nickname>,
        /// `Some(None)` で画像を外す
        profile_image_url: Option<Option<String>>,
    },
    /// ハッシュ化済みの新しいパスワード
    Password(PasswordHash),
}

/// ユーザーエンティティ
///
/// # 不変条件
///
/// - `email` と `nickname` はストア内で一意
/// - `id` は生成後に変わらない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id:                UserId,
    email:             Email,
    nickname:          Nickname,
    profile_image_url: Option<String>,
    password_hash:     PasswordHash,
    created_at:        DateTime<Utc>,
    updated_at:        DateTime<Utc>,
}

impl User {
    pub fn new(
        id: UserId,
        email: Email,
        nickname: Nickname,
        profile_image_url: Option<String>,
        password_hash: PasswordHash,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            nickname,
            profile_image_url,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    pub fn profile_image_url(&self) -> Option<&str> {
        self.profile_image_url.as_deref()
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// プロフィールを更新した新しいインスタンスを返す
    ///
    /// `None` の項目は現在の値を維持する。
    /// `profile_image_url` に `Some(None)` を渡すと画像を外す。
    pub fn with_profile(
        self,
        nickname: Option<Nickname>,
        profile_image_url: Option<Option<String>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            nickname: nickname.unwrap_or(self.nickname),
            profile_image_url: profile_image_url.unwrap_or(self.profile_image_url),
            updated_at: now,
            ..self
        }
    }

    /// パスワードハッシュを差し替えた新しいインスタンスを返す
    pub fn with_password(self, password_hash: PasswordHash, now: DateTime<Utc>) -> Self {
        Self {
            password_hash,
            updated_at: now,
            ..self
        }
    }

    /// 更新内容を適用した新しいインスタンスを返す
    pub fn edited(self, edit: UserEdit, now: DateTime<Utc>) -> Self {
        match edit {
            UserEdit::Profile {
                nickname,
                profile_image_url,
            } => self.with_profile(nickname, profile_image_url, now),
            UserEdit::Password(password_hash) => self.with_password(password_hash, now),
        }
    }

    /// レスポンス境界に出す表現
    pub fn to_identity(&self) -> Identity {
        Identity {
            id:                self.id.clone(),
            email:             self.email.clone(),
            nickname:          self.nickname.clone(),
            profile_image_url: self.profile_image_url.clone(),
            created_at:        self.created_at,
            updated_at:        self.updated_at,
        }
    }
}

impl Owned for User {
    const RESOURCE: &'static str = "user";

    fn owner_id(&self) -> &UserId {
        &self.id
    }

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}

/// 認証主体（パスワードを含まない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id:                UserId,
    pub email:             Email,
    pub nickname:          Nickname,
    pub profile_image_url: Option<String>,
    pub created_at:        DateTime<Utc>,
    pub updated_at:        DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use board_shared::ErrorCode;

    fn user() -> User {
        User::new(
            UserId::new(),
            Email::new("user@example.com").unwrap(),
            Nickname::new("taro").unwrap(),
            None,
            PasswordHash::new("$argon2id$v=19$dummy"),
            Utc::now(),
        )
    }

    #[rstest]
    #[case("")]
    #[case("no-at-mark")]
    #[case("@example.com")]
    #[case("user@")]
    #[case("a@b@c")]
    fn test_不正なメールアドレスは拒否される(#[case] raw: &str) {
        let error = Email::new(raw).unwrap_err();
        assert_eq!(error.code(), ErrorCode::InvalidInput);
    }

    #[test]
    fn test_メールアドレスは小文字に正規化される() {
        assert_eq!(Email::new(" A@X.com ").unwrap().as_str(), "a@x.com");
    }

    #[test]
    fn test_ニックネームの長さ制限() {
        assert!(Nickname::new("a".repeat(30)).is_ok());
        let error = Nickname::new("a".repeat(31)).unwrap_err();
        assert_eq!(
            error.details(),
            &board_shared::ErrorDetails::field_reason("nickname", "30 文字以内である必要があります")
        );
    }

    #[test]
    fn test_identityにパスワードが含まれない() {
        let json = serde_json::to_value(user().to_identity()).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();

        assert_eq!(
            keys,
            vec!["createdAt", "email", "id", "nickname", "profileImageUrl", "updatedAt"]
        );
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn test_with_profileは指定した項目だけ更新する() {
        let original = user();
        let now = original.created_at() + chrono::Duration::seconds(1);

        let updated = original.clone().with_profile(
            None,
            Some(Some("https://img.example.com/a.png".to_string())),
            now,
        );

        assert_eq!(updated.nickname(), original.nickname());
        assert_eq!(updated.profile_image_url(), Some("https://img.example.com/a.png"));
        assert_eq!(updated.updated_at(), now);
        assert_eq!(updated.id(), original.id());
    }

    #[test]
    fn test_パスワードの更新はプロフィールを変えない() {
        let original = user();
        let now = original.created_at() + chrono::Duration::seconds(1);

        let updated = original
            .clone()
            .edited(UserEdit::Password(PasswordHash::new("new-hash")), now);

        assert_eq!(updated.password_hash(), &PasswordHash::new("new-hash"));
        assert_eq!(updated.nickname(), original.nickname());
        assert_eq!(updated.profile_image_url(), original.profile_image_url());
        assert_eq!(updated.updated_at(), now);
    }
}
