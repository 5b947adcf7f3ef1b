//! # Board インフラ層
//!
//! ストア・セッション・パスワードハッシュなど、外部資源とのやり取りを担当する。
//!
//! ## 設計方針
//!
//! - **トレイト境界**: ユースケース層はトレイト（`Arc<dyn ...>`）経由でのみ利用する
//! - **集約単位の書き込み直列化**: インメモリストアはテーブルごとの書き込みロック内で
//!   一意性チェックと更新をまとめて行う
//! - **エラーの分類**: すべて [`InfraError`] に変換し、発生時の `SpanTrace` を保持する
//!
//! ## モジュール構成
//!
//! - [`repository`] - ユーザー・投稿・コメントのストア
//! - [`session`] - セッション管理（インメモリ / Redis）
//! - [`password`] - Argon2id によるパスワードハッシュ

pub mod error;
pub mod password;
pub mod repository;
pub mod session;

pub use error::{InfraError, InfraErrorKind};
pub use password::{Argon2PasswordHasher, PasswordHasher};
pub use session::{InMemorySessionManager, RedisSessionManager, SessionData, SessionManager};
