//! # Board 共有ユーティリティ
//!
//! 掲示板バックエンド全体で使用される共通の型とユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, api）から依存される
//! - エラー分類表・成功コード表・レスポンスエンベロープなど、ワイヤ契約に関わる型を集約する
//! - ビジネスロジックは含めない

pub mod api_response;
pub mod error_code;
pub mod error_details;
pub mod error_response;
pub mod health;
pub mod observability;
pub mod paginated_response;
pub mod success_code;

pub use api_response::ApiResponse;
pub use error_code::{ErrorCategory, ErrorCode, ErrorDefinition};
pub use error_details::{ErrorDetails, FieldErrors, ValidationTag};
pub use error_response::ErrorResponse;
pub use health::HealthResponse;
pub use paginated_response::{PageMeta, PaginatedResponse};
pub use success_code::SuccessCode;
