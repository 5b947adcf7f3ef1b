//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックはユースケースに委譲
//! - 成功時のステータスは [`SuccessCode::status`] から決める
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `auth`: 会員登録・ログイン・ログアウト・ログイン中のユーザー
//! - `user`: ユーザーの参照・更新・退会
//! - `post`: 投稿・いいね
//! - `comment`: コメント

pub mod auth;
pub mod comment;
pub mod health;
pub mod post;
pub mod user;

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use board_domain::user::{User, UserId};
use board_shared::{ApiResponse, SuccessCode};
use serde::{Deserialize, Deserializer, Serialize};

pub use auth::{AuthState, login, logout, me, signup};
pub use comment::{CommentState, create_comment, delete_comment, list_comments, update_comment};
pub use health::health_check;
pub use post::{PostState, create_post, delete_post, get_post, list_posts, toggle_like, update_post};
pub use user::{UserState, change_password, delete_user, get_user, update_user};

/// 成功レスポンスを組み立てる
pub(crate) fn respond<T: Serialize>(code: SuccessCode, data: T) -> Response {
   let status = StatusCode::from_u16(code.status()).unwrap_or(StatusCode::OK);
   (status, Json(ApiResponse::success(code, data))).into_response()
}

/// 作成者の表示情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
   pub user_id:           UserId,
   pub nickname:          String,
   pub profile_image_url: Option<String>,
}

impl From<&User> for AuthorDto {
   fn from(user: &User) -> Self {
      Self {
         user_id:           user.id().clone(),
         nickname:          user.nickname().to_string(),
         profile_image_url: user.profile_image_url().map(str::to_string),
      }
   }
}

/// 空文字列の URL は未指定として扱う
pub(crate) fn normalize_url(url: Option<String>) -> Option<String> {
   url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

/// 「キーなし」と「`null`」を区別して読む
///
/// `#[serde(default, deserialize_with = "double_option")]` と組み合わせると、
/// キーなしは `None`、`null` は `Some(None)` になる。
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
   T: Deserialize<'de>,
   D: Deserializer<'de>,
{
   Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use serde::Deserialize;

   use super::*;

   #[derive(Debug, Deserialize)]
   struct Patch {
      #[serde(default, deserialize_with = "double_option")]
      image_url: Option<Option<String>>,
   }

   #[test]
   fn test_double_optionはキーなしとnullを区別する() {
      let absent: Patch = serde_json::from_str("{}").unwrap();
      let null: Patch = serde_json::from_str(r#"{"image_url":null}"#).unwrap();
      let value: Patch = serde_json::from_str(r#"{"image_url":"a.png"}"#).unwrap();

      assert_eq!(absent.image_url, None);
      assert_eq!(null.image_url, Some(None));
      assert_eq!(value.image_url, Some(Some("a.png".to_string())));
   }

   #[test]
   fn test_空のurlは未指定になる() {
      assert_eq!(normalize_url(Some("  ".to_string())), None);
      assert_eq!(normalize_url(Some(" a.png ".to_string())), Some("a.png".to_string()));
      assert_eq!(normalize_url(None), None);
   }

   #[tokio::test]
   async fn test_作成系は201で返す() {
      let response = respond(SuccessCode::PostCreated, serde_json::json!({ "postId": "p-1" }));

      assert_eq!(response.status(), StatusCode::CREATED);
   }
}
