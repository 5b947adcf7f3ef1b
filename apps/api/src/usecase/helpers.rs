//! ユースケース層の共通ヘルパー
//!
//! リポジトリ呼び出し結果の変換や作成者の一括解決など、
//! 複数のユースケースで繰り返されるパターンを共通化する。

use std::{collections::HashMap, fmt::Display, sync::Arc};

use board_domain::{
   DomainError,
   password::{PasswordHash, PasswordVerifyResult, PlainPassword},
   user::{User, UserId},
};
use board_infra::{InfraError, PasswordHasher, repository::UserRepository};
use board_shared::ErrorCode;

use crate::error::ApiError;

/// リポジトリの `Result<Option<T>, InfraError>` を `Result<T, ApiError>` に変換する
///
/// ```ignore
/// let post = self.post_repository.find_by_id(&post_id).await
///     .or_not_found(ErrorCode::PostNotFound, "post", &post_id)?;
/// ```
pub(crate) trait FindResultExt<T> {
   /// `None` の場合は `code` の NotFound、`InfraError` の場合は内部エラーを返す
   fn or_not_found(self, code: ErrorCode, resource: &str, id: &dyn Display)
   -> Result<T, ApiError>;
}

impl<T> FindResultExt<T> for Result<Option<T>, InfraError> {
   fn or_not_found(
      self,
      code: ErrorCode,
      resource: &str,
      id: &dyn Display,
   ) -> Result<T, ApiError> {
      self?
         .ok_or_else(|| DomainError::not_found(code, resource, id.to_string()).into())
   }
}

/// 作成者を一括で解決する
///
/// 削除済みのユーザーは結果に含まれない。
pub(crate) async fn load_authors<'a>(
   user_repository: &dyn UserRepository,
   author_ids: impl IntoIterator<Item = &'a UserId>,
) -> Result<HashMap<UserId, User>, ApiError> {
   let mut ids: Vec<UserId> = author_ids.into_iter().cloned().collect();
   ids.sort();
   ids.dedup();

   let users = user_repository.find_by_ids(&ids).await?;
   Ok(users
      .into_iter()
      .map(|user| (user.id().clone(), user))
      .collect())
}

/// パスワードをハッシュ化する（ブロッキングスレッドで実行）
pub(crate) async fn hash_password(
   hasher: &Arc<dyn PasswordHasher>,
   password: PlainPassword,
) -> Result<PasswordHash, ApiError> {
   let hasher = Arc::clone(hasher);
   let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
      .await
      .map_err(|e| ApiError::Internal(format!("ハッシュ化タスクの実行に失敗: {e}")))??;
   Ok(hash)
}

/// パスワードを照合する（ブロッキングスレッドで実行）
pub(crate) async fn verify_password(
   hasher: &Arc<dyn PasswordHasher>,
   password: PlainPassword,
   hash: PasswordHash,
) -> Result<PasswordVerifyResult, ApiError> {
   let hasher = Arc::clone(hasher);
   let result = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
      .await
      .map_err(|e| ApiError::Internal(format!("照合タスクの実行に失敗: {e}")))??;
   Ok(result)
}
