//! 会員登録・ログインユースケース

use std::sync::Arc;

use board_domain::{
   DomainError,
   clock::Clock,
   password::PlainPassword,
   user::{Email, Nickname, User, UserId},
};
use board_infra::{PasswordHasher, repository::UserRepository};
use board_shared::ErrorCode;

use super::helpers::{hash_password, verify_password};
use crate::error::ApiError;

/// 会員登録の入力
pub struct SignupInput {
   pub email:             Email,
   pub password:          PlainPassword,
   pub nickname:          Nickname,
   pub profile_image_url: Option<String>,
}

/// 会員登録・ログインユースケース
pub struct AuthUseCaseImpl {
   user_repository: Arc<dyn UserRepository>,
   password_hasher: Arc<dyn PasswordHasher>,
   clock:           Arc<dyn Clock>,
}

impl AuthUseCaseImpl {
   pub fn new(
      user_repository: Arc<dyn UserRepository>,
      password_hasher: Arc<dyn PasswordHasher>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         user_repository,
         password_hasher,
         clock,
      }
   }

   /// 会員登録
   ///
   /// 1. メールアドレスの重複を確認（`EMAIL_ALREADY_EXISTS`）
   /// 2. ニックネームの重複を確認（`NICKNAME_ALREADY_EXISTS`）
   /// 3. パスワードをハッシュ化して保存
   ///
   /// 事前チェックをすり抜けた同時登録は、保存時の一意制約違反として同じエラーになる。
   pub async fn signup(&self, input: SignupInput) -> Result<User, ApiError> {
      if self
         .user_repository
         .find_by_email(&input.email)
         .await?
         .is_some()
      {
         return Err(DomainError::duplicate(
            ErrorCode::EmailAlreadyExists,
            "email",
            input.email.as_str(),
         )
         .into());
      }

      if self
         .user_repository
         .nickname_exists(&input.nickname, None)
         .await?
      {
         return Err(DomainError::duplicate(
            ErrorCode::NicknameAlreadyExists,
            "nickname",
            input.nickname.as_str(),
         )
         .into());
      }

      let password_hash = hash_password(&self.password_hasher, input.password).await?;
      let user = User::new(
         UserId::new(),
         input.email,
         input.nickname,
         input.profile_image_url,
         password_hash,
         self.clock.now(),
      );

      self.user_repository.insert(&user).await?;
      tracing::info!(user_id = %user.id(), "ユーザーを登録");

      Ok(user)
   }

   /// ログイン
   ///
   /// メールアドレスが未登録の場合とパスワード不一致の場合は、
   /// どちらも同じ `INVALID_CREDENTIALS` を返す。
   /// 未登録の場合もハッシュ計算を行い、応答時間からの登録有無の推測を防ぐ。
   pub async fn login(&self, email: &str, password: PlainPassword) -> Result<User, ApiError> {
      let Ok(email) = Email::new(email) else {
         return Err(DomainError::invalid_credentials().into());
      };

      let Some(user) = self.user_repository.find_by_email(&email).await? else {
         let _ = hash_password(&self.password_hasher, password).await;
         tracing::info!("ログイン失敗: 未登録のメールアドレス");
         return Err(DomainError::invalid_credentials().into());
      };

      let result =
         verify_password(&self.password_hasher, password, user.password_hash().clone()).await?;
      if !result.is_match() {
         tracing::info!(user_id = %user.id(), "ログイン失敗: パスワード不一致");
         return Err(DomainError::invalid_credentials().into());
      }

      tracing::info!(user_id = %user.id(), "ログイン成功");
      Ok(user)
   }
}
