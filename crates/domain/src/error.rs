//! # ドメインエラー
//!
//! ビジネスルール違反を表す唯一のエラー形状。
//!
//! ## 設計方針
//!
//! - **種別はテーブル参照**: ステータス・カテゴリ・既定メッセージは
//!   [`ErrorCode`] の定義から引き、インスタンスごとに計算しない
//! - **構造化された詳細**: `{field, value}` / `{field, reason}` / `{resource, id}` / `{}`
//! - **上書きは明示的に**: メッセージ・ステータスは `with_*` を呼んだときだけ既定値から変わる
//! - **診断用の文字列形式**: `Display` は種別名とステータスを必ず含む
//!
//! ## 使用例
//!
//! ```rust
//! use board_domain::DomainError;
//! use board_shared::ErrorCode;
//!
//! let error = DomainError::not_found(ErrorCode::PostNotFound, "post", "p-1");
//! assert_eq!(error.status(), 404);
//! assert_eq!(
//!     error.to_string(),
//!     "[POST_NOT_FOUND] 404: 投稿が見つかりません (Category: POST)"
//! );
//! ```

use board_shared::{ErrorCategory, ErrorCode, ErrorDetails};
use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層のエラー変換でこのまま `{code, message, details}` に描画される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {status}: {message} (Category: {})", category_of(.code))]
pub struct DomainError {
    code:    ErrorCode,
    status:  u16,
    message: String,
    details: ErrorDetails,
}

fn category_of(code: &ErrorCode) -> ErrorCategory {
    code.category()
}

impl DomainError {
    /// 種別の既定値でエラーを作る
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            status: code.status(),
            message: code.default_message().to_string(),
            details: ErrorDetails::default(),
        }
    }

    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = details;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// ステータスコードを上書きする
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    // --- 頻出パターンのコンストラクタ ---

    /// 未認証（401）
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::Unauthorized)
    }

    /// メールアドレスまたはパスワードの不一致（401）
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// 所有者ではない（403）
    pub fn forbidden(resource: &str, id: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden).with_details(ErrorDetails::resource(resource, id))
    }

    /// リソースが存在しない
    pub fn not_found(code: ErrorCode, resource: &str, id: impl Into<String>) -> Self {
        Self::new(code).with_details(ErrorDetails::resource(resource, id))
    }

    /// 一意制約違反（値を詳細に含める）
    pub fn duplicate(code: ErrorCode, field: &str, value: impl Into<String>) -> Self {
        Self::new(code).with_details(ErrorDetails::field(field, value))
    }

    /// ドメイン側で検出した入力不備（422）
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput).with_details(ErrorDetails::field_reason(field, reason))
    }

    // --- アクセサ ---

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &ErrorDetails {
        &self.details
    }
}

impl From<ErrorCode> for DomainError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}
