//! # ヘルスチェックハンドラ
//!
//! 稼働確認用のエンドポイント。認証不要で、常に `HEALTH_CHECK_OK` を返す。

use axum::response::Response;
use board_shared::{HealthResponse, SuccessCode};

use super::respond;

/// GET /health
pub async fn health_check() -> Response {
   respond(
      SuccessCode::HealthCheckOk,
      HealthResponse::healthy(env!("CARGO_PKG_VERSION")),
   )
}
