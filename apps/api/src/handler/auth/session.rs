//! ログイン中のユーザー参照ハンドラ

use axum::response::Response;
use board_shared::SuccessCode;

use crate::{error::ApiError, extractor::CurrentUser, handler::respond};

/// GET /auth/me
///
/// セッション解決ミドルウェアが確認済みの呼び出し元をそのまま返す。
#[tracing::instrument(skip_all)]
pub async fn me(CurrentUser(identity): CurrentUser) -> Result<Response, ApiError> {
   Ok(respond(SuccessCode::GetUserSuccess, identity))
}
