//! # API エラー変換
//!
//! ドメイン・入力検証・インフラの各エラーを `{code, message, details}` 形式の
//! HTTP レスポンスへ変換する唯一の場所。
//!
//! ## 設計方針
//!
//! - **ステータスは分類表から**: [`DomainError`] が持つステータスとコードをそのまま使う
//! - **入力検証はフィールド単位**: `{"<field>": ["REQUIRED" | "TOO_LONG" | ...]}` の形に集約
//! - **内部エラーは隠す**: 500 のレスポンスには詳細を含めず、ログにだけ残す
//! - **ログレベル**: ドメインエラーは info、入力検証は warn、内部エラーは error
//!
//! ## エラーの階層
//!
//! ```text
//! DomainError ──────────────┐
//! validator::ValidationErrors ─┼─▶ ApiError ──▶ Response
//! InfraError ───────────────┘
//! ```

use std::any::Any;

use axum::{
   Json,
   extract::rejection::{JsonRejection, QueryRejection},
   http::{StatusCode, Uri},
   response::{IntoResponse, Response},
};
use board_domain::DomainError;
use board_infra::InfraError;
use board_shared::{ErrorCode, ErrorResponse, FieldErrors, ValidationTag};
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

/// API 層のエラー
#[derive(Debug, Error)]
pub enum ApiError {
   /// ビジネスルール違反（分類表のステータスで返す）
   #[error(transparent)]
   Domain(#[from] DomainError),

   /// リクエストの形式・入力値の不備（422）
   #[error("入力値が不正です: {0:?}")]
   Validation(FieldErrors),

   /// ストア・セッションストアの障害（500）
   #[error("インフラエラー: {0}")]
   Infra(InfraError),

   /// 上記に分類できない内部エラー（500）
   #[error("内部エラー: {0}")]
   Internal(String),
}

impl ApiError {
   /// 単一フィールドの入力エラー
   pub fn field(field: &str, tag: ValidationTag) -> Self {
      Self::Validation(FieldErrors::single(field, tag))
   }
}

// ===== 変換 =====

impl From<InfraError> for ApiError {
   /// 一意制約違反はユーザーの重複エラーに読み替える
   ///
   /// 事前チェックをすり抜けた同時登録がここに来る。
   fn from(error: InfraError) -> Self {
      match error.as_conflict() {
         Some(("user", "email", value)) => Self::Domain(DomainError::duplicate(
            ErrorCode::EmailAlreadyExists,
            "email",
            value,
         )),
         Some(("user", "nickname", value)) => Self::Domain(DomainError::duplicate(
            ErrorCode::NicknameAlreadyExists,
            "nickname",
            value,
         )),
         _ => Self::Infra(error),
      }
   }
}

impl From<ValidationErrors> for ApiError {
   fn from(errors: ValidationErrors) -> Self {
      Self::Validation(field_errors_from(&errors))
   }
}

impl From<JsonRejection> for ApiError {
   fn from(rejection: JsonRejection) -> Self {
      tracing::debug!(reason = %rejection.body_text(), "JSON ボディを解釈できません");
      Self::field("body", ValidationTag::InvalidFormat)
   }
}

impl From<QueryRejection> for ApiError {
   fn from(rejection: QueryRejection) -> Self {
      tracing::debug!(reason = %rejection.body_text(), "クエリを解釈できません");
      Self::field("query", ValidationTag::InvalidFormat)
   }
}

/// validator の検証結果をフィールド単位のタグに変換する
///
/// フィールド名は JSON 側の camelCase にそろえる。
pub fn field_errors_from(errors: &ValidationErrors) -> FieldErrors {
   let mut fields = FieldErrors::new();
   for (field, list) in errors.field_errors() {
      let name = to_camel_case(&field);
      for error in list {
         fields.push(name.clone(), tag_for(error));
      }
   }
   fields
}

fn tag_for(error: &ValidationError) -> ValidationTag {
   match error.code.as_ref() {
      "required" => ValidationTag::Required,
      "length" => length_tag(error),
      _ => ValidationTag::InvalidFormat,
   }
}

/// 実際の長さと min / max を比べて TOO_SHORT / TOO_LONG を決める
fn length_tag(error: &ValidationError) -> ValidationTag {
   let bound = |key: &str| error.params.get(key).and_then(serde_json::Value::as_u64);
   let length = error
      .params
      .get("value")
      .and_then(serde_json::Value::as_str)
      .map(|value| value.chars().count() as u64);

   match (length, bound("min"), bound("max")) {
      (Some(length), Some(min), _) if length < min => ValidationTag::TooShort,
      (Some(length), _, Some(max)) if length > max => ValidationTag::TooLong,
      (None, Some(_), _) => ValidationTag::TooShort,
      (None, None, Some(_)) => ValidationTag::TooLong,
      _ => ValidationTag::InvalidFormat,
   }
}

fn to_camel_case(snake: &str) -> String {
   let mut result = String::with_capacity(snake.len());
   let mut upper_next = false;
   for c in snake.chars() {
      if c == '_' {
         upper_next = true;
      } else if upper_next {
         result.extend(c.to_uppercase());
         upper_next = false;
      } else {
         result.push(c);
      }
   }
   result
}

// ===== レスポンス変換 =====

impl IntoResponse for ApiError {
   fn into_response(self) -> Response {
      match self {
         ApiError::Domain(error) => {
            tracing::info!(
               error.code = %error.code(),
               error.status = error.status(),
               "{error}"
            );
            let status =
               StatusCode::from_u16(error.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = ErrorResponse::error(
               error.code(),
               error.details().clone(),
               Some(error.message()),
            );
            (status, Json(body)).into_response()
         }
         ApiError::Validation(fields) => {
            tracing::warn!(fields = ?fields, "入力値の検証に失敗");
            (
               StatusCode::UNPROCESSABLE_ENTITY,
               Json(ErrorResponse::validation_error(fields)),
            )
               .into_response()
         }
         ApiError::Infra(error) => {
            tracing::error!(
               error.category = "infrastructure",
               error.kind = error.kind_name(),
               span_trace = %error.span_trace(),
               "インフラエラー: {error}"
            );
            internal_error_response()
         }
         ApiError::Internal(message) => {
            tracing::error!(
               error.category = "internal",
               error.kind = "unexpected",
               "内部エラー: {message}"
            );
            internal_error_response()
         }
      }
   }
}

fn internal_error_response() -> Response {
   (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(ErrorResponse::internal_error()),
   )
      .into_response()
}

/// ルートが存在しない場合の応答
pub async fn fallback_not_found(uri: Uri) -> ApiError {
   tracing::debug!(path = %uri.path(), "ルートが見つかりません");
   ApiError::Domain(DomainError::new(ErrorCode::NotFound))
}

/// ハンドラ内の panic を 500 に変換する（`CatchPanicLayer` 用）
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
   let detail = payload
      .downcast_ref::<String>()
      .map(String::as_str)
      .or_else(|| payload.downcast_ref::<&str>().copied())
      .unwrap_or("不明な panic");

   tracing::error!(
      error.category = "internal",
      error.kind = "panic",
      "ハンドラで panic が発生: {detail}"
   );
   internal_error_response()
}

#[cfg(test)]
mod tests {
   use axum::body::to_bytes;
   use pretty_assertions::assert_eq;
   use rstest::rstest;
   use serde_json::{Value, json};
   use validator::Validate;

   use super::*;

   async fn into_json(error: ApiError) -> (StatusCode, Value) {
      let response = error.into_response();
      let status = response.status();
      let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
      (status, serde_json::from_slice(&bytes).unwrap())
   }

   #[derive(Debug, Validate)]
   struct SignupLike {
      #[validate(required, email)]
      email:             Option<String>,
      #[validate(required, length(min = 8, max = 64))]
      password:          Option<String>,
      #[validate(length(max = 5))]
      profile_image_url: Option<String>,
   }

   #[tokio::test]
   async fn test_ドメインエラーは分類表のステータスで返す() {
      let (status, body) = into_json(ApiError::Domain(DomainError::not_found(
         ErrorCode::PostNotFound,
         "post",
         "p-1",
      )))
      .await;

      assert_eq!(status, StatusCode::NOT_FOUND);
      assert_eq!(
         body,
         json!({
            "code": "POST_NOT_FOUND",
            "message": "投稿が見つかりません",
            "details": { "resource": "post", "id": "p-1" }
         })
      );
   }

   #[tokio::test]
   async fn test_validatorの結果をフィールド単位のタグにする() {
      let input = SignupLike {
         email:             None,
         password:          Some("short".to_string()),
         profile_image_url: Some("https://x".to_string()),
      };

      let error = ApiError::from(input.validate().unwrap_err());
      let (status, body) = into_json(error).await;

      assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
      assert_eq!(body["code"], "INVALID_INPUT");
      assert_eq!(
         body["details"],
         json!({
            "email": ["REQUIRED"],
            "password": ["TOO_SHORT"],
            "profileImageUrl": ["TOO_LONG"]
         })
      );
   }

   #[rstest]
   #[case("not-an-email", "INVALID_FORMAT")]
   fn test_メール形式の不備はinvalid_format(#[case] email: &str, #[case] expected: &str) {
      let input = SignupLike {
         email:             Some(email.to_string()),
         password:          Some("password123".to_string()),
         profile_image_url: None,
      };

      let fields = field_errors_from(&input.validate().unwrap_err());

      assert_eq!(
         serde_json::to_value(&fields).unwrap(),
         json!({ "email": [expected] })
      );
   }

   #[tokio::test]
   async fn test_メールアドレスの一意制約違反は409に読み替える() {
      let (status, body) = into_json(InfraError::conflict("user", "email", "a@x.com").into()).await;

      assert_eq!(status, StatusCode::CONFLICT);
      assert_eq!(body["code"], "EMAIL_ALREADY_EXISTS");
      assert_eq!(body["details"], json!({ "field": "email", "value": "a@x.com" }));
   }

   #[tokio::test]
   async fn test_インフラエラーは詳細を隠して500にする() {
      let (status, body) = into_json(InfraError::unexpected("接続が切れた").into()).await;

      assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
      assert_eq!(
         body,
         json!({
            "code": "INTERNAL_SERVER_ERROR",
            "message": "サーバー内部でエラーが発生しました",
            "details": {}
         })
      );
   }

   #[tokio::test]
   async fn test_panicは500のエンベロープになる() {
      let response = handle_panic(Box::new("boom"));

      assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
      let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
      let body: Value = serde_json::from_slice(&bytes).unwrap();
      assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
   }

   #[rstest]
   #[case("profile_image_url", "profileImageUrl")]
   #[case("new_password", "newPassword")]
   #[case("email", "email")]
   fn test_フィールド名はcamel_caseにそろえる(#[case] snake: &str, #[case] expected: &str) {
      assert_eq!(to_camel_case(snake), expected);
   }
}
