//! ユーザー管理ユースケース
//!
//! 取得は誰でも行えるが、更新・パスワード変更・退会は本人に限る。

use std::sync::Arc;

use board_domain::{
   DomainError,
   clock::Clock,
   ownership::authorize_owner,
   password::PlainPassword,
   user::{Identity, Nickname, User, UserEdit, UserId},
};
use board_infra::{PasswordHasher, SessionManager, repository::UserRepository};
use board_shared::ErrorCode;

use super::helpers::{FindResultExt, hash_password, verify_password};
use crate::error::ApiError;

/// プロフィール更新の入力
#[derive(Debug, Default)]
pub struct UpdateProfileInput {
   pub nickname:          Option<Nickname>,
   /// `Some(None)` で画像を外す
   pub profile_image_url: Option<Option<String>>,
}

/// パスワード変更の入力
#[derive(Debug)]
pub struct ChangePasswordInput {
   pub current_password: PlainPassword,
   pub new_password:     PlainPassword,
}

/// ユーザー管理ユースケース
pub struct UserUseCaseImpl {
   user_repository: Arc<dyn UserRepository>,
   session_manager: Arc<dyn SessionManager>,
   password_hasher: Arc<dyn PasswordHasher>,
   clock:           Arc<dyn Clock>,
}

impl UserUseCaseImpl {
   pub fn new(
      user_repository: Arc<dyn UserRepository>,
      session_manager: Arc<dyn SessionManager>,
      password_hasher: Arc<dyn PasswordHasher>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         user_repository,
         session_manager,
         password_hasher,
         clock,
      }
   }

   pub async fn get_user(&self, user_id: &UserId) -> Result<User, ApiError> {
      self.user_repository
         .find_by_id(user_id)
         .await
         .or_not_found(ErrorCode::UserNotFound, "user", user_id)
   }

   /// 本人のユーザーを取得する（存在確認 → 所有者チェック）
   async fn load_own(&self, caller: &Identity, user_id: &UserId) -> Result<User, ApiError> {
      let user = self.get_user(user_id).await?;
      authorize_owner(&user, &caller.id)?;
      Ok(user)
   }

   /// プロフィールを更新する
   ///
   /// 他のユーザーが使用中のニックネームは `NICKNAME_ALREADY_EXISTS`。
   pub async fn update_profile(
      &self,
      caller: &Identity,
      user_id: &UserId,
      input: UpdateProfileInput,
   ) -> Result<User, ApiError> {
      self.load_own(caller, user_id).await?;

      // 重複チェックはストアの書き込みロック内で行われ、Conflict は 409 に変換される
      let edit = UserEdit::Profile {
         nickname:          input.nickname,
         profile_image_url: input.profile_image_url,
      };
      self.user_repository
         .edit(user_id, edit, self.clock.now())
         .await
         .or_not_found(ErrorCode::UserNotFound, "user", user_id)
   }

   /// パスワードを変更する
   ///
   /// 現在のパスワードが一致しなければ `INVALID_CREDENTIALS`。
   pub async fn change_password(
      &self,
      caller: &Identity,
      user_id: &UserId,
      input: ChangePasswordInput,
   ) -> Result<(), ApiError> {
      let user = self.load_own(caller, user_id).await?;

      let result = verify_password(
         &self.password_hasher,
         input.current_password,
         user.password_hash().clone(),
      )
      .await?;
      if !result.is_match() {
         return Err(DomainError::invalid_credentials().into());
      }

      let password_hash = hash_password(&self.password_hasher, input.new_password).await?;
      self.user_repository
         .edit(user_id, UserEdit::Password(password_hash), self.clock.now())
         .await
         .or_not_found(ErrorCode::UserNotFound, "user", user_id)?;

      tracing::info!(user_id = %user_id, "パスワードを変更");
      Ok(())
   }

   /// 退会する
   ///
   /// ユーザーのセッションはすべて削除する。投稿・コメントは残す。
   pub async fn delete_user(&self, caller: &Identity, user_id: &UserId) -> Result<(), ApiError> {
      self.load_own(caller, user_id).await?;

      self.user_repository.delete(user_id).await?;
      self.session_manager.delete_all_for_user(user_id).await?;

      tracing::info!(user_id = %user_id, "ユーザーが退会");
      Ok(())
   }
}
