//! # リクエスト抽出
//!
//! ハンドラの引数で使う抽出器。形式の不備はすべて [`ApiError::Validation`] になる。
//!
//! - [`ValidatedJson`]: JSON ボディを読み、`validator` で検証する
//! - [`ValidatedQuery`]: クエリ文字列を読み、`validator` で検証する
//! - [`CurrentUser`]: ログイン済みの呼び出し元（未ログインは 401）
//! - [`parse_path_id`]: パスパラメータの ID を型付き ID に変換する

use axum::{
   Json,
   extract::{FromRequest, FromRequestParts, Query, Request},
   http::request::Parts,
};
use board_domain::{identity::IdentityContext, user::Identity};
use board_shared::ValidationTag;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// 検証済み JSON ボディ
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
   T: DeserializeOwned + Validate,
   S: Send + Sync,
{
   type Rejection = ApiError;

   async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
      let Json(value) = Json::<T>::from_request(req, state).await?;
      value.validate()?;
      Ok(Self(value))
   }
}

/// 検証済みクエリ
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
   T: DeserializeOwned + Validate,
   S: Send + Sync,
{
   type Rejection = ApiError;

   async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
      let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
      value.validate()?;
      Ok(Self(value))
   }
}

/// ログイン済みの呼び出し元
///
/// セッション解決ミドルウェアが設定した [`IdentityContext`] から取り出す。
/// 認証要否の判定は [`IdentityContext::require_authenticated`] に一本化している。
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
   S: Send + Sync,
{
   type Rejection = ApiError;

   async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
      let context = parts
         .extensions
         .get::<IdentityContext>()
         .cloned()
         .unwrap_or_default();
      let identity = context.require_authenticated()?;
      Ok(Self(identity.clone()))
   }
}

/// パスパラメータの ID を変換する
///
/// 解釈できなければ `{"<field>": ["INVALID_FORMAT"]}`。
pub fn parse_path_id<T>(
   field: &str,
   raw: &str,
   parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, ApiError> {
   parse(raw).ok_or_else(|| ApiError::field(field, ValidationTag::InvalidFormat))
}

/// 検証済みの必須項目を取り出す
///
/// `#[validate(required)]` を通過した後に使う。
pub fn required<T>(field: &str, value: Option<T>) -> Result<T, ApiError> {
   value.ok_or_else(|| ApiError::field(field, ValidationTag::Required))
}

#[cfg(test)]
mod tests {
   use board_domain::post::PostId;
   use board_shared::FieldErrors;
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_不正なパスidはinvalid_formatになる() {
      let error = parse_path_id("postId", "not-a-uuid", PostId::parse).unwrap_err();

      match error {
         ApiError::Validation(fields) => {
            assert_eq!(fields, FieldErrors::single("postId", ValidationTag::InvalidFormat));
         }
         other => panic!("unexpected: {other:?}"),
      }
   }

   #[test]
   fn test_正しいパスidは変換できる() {
      let id = PostId::new();

      let parsed = parse_path_id("postId", &id.to_string(), PostId::parse).unwrap();

      assert_eq!(parsed, id);
   }

   #[tokio::test]
   async fn test_identity_contextが無いリクエストは401() {
      let (mut parts, _) = axum::http::Request::new(()).into_parts();

      let error = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap_err();

      match error {
         ApiError::Domain(e) => assert_eq!(e.status(), 401),
         other => panic!("unexpected: {other:?}"),
      }
   }
}
