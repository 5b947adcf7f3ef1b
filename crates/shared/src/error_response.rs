//! # エラーレスポンスエンベロープ
//!
//! エラー時の統一レスポンス形式 `{ "code", "message", "details" }` を提供する。

use serde::{Deserialize, Serialize};

use crate::{ErrorCode, ErrorDetails, FieldErrors};

/// エラーレスポンス
///
/// `message` を省略した場合はエラー種別の既定メッセージを使う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code:    String,
    pub message: String,
    pub details: ErrorDetails,
}

impl ErrorResponse {
    pub fn error(code: ErrorCode, details: ErrorDetails, message: Option<&str>) -> Self {
        Self {
            code: code.name().to_string(),
            message: message.unwrap_or(code.default_message()).to_string(),
            details,
        }
    }

    /// フィールド単位の検証エラー（`INVALID_INPUT`）
    pub fn validation_error(errors: FieldErrors) -> Self {
        Self::error(ErrorCode::InvalidInput, errors.into(), None)
    }

    /// 内部エラー（詳細を含めない）
    pub fn internal_error() -> Self {
        Self::error(ErrorCode::InternalServerError, ErrorDetails::default(), None)
    }
}
