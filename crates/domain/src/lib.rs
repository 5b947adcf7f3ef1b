//! # Board ドメイン層
//!
//! 掲示板のドメインモデル（ユーザー・投稿・コメント）と、
//! すべてのリソースに共通するリクエスト制御のルールを定義する。
//!
//! ## 設計方針
//!
//! - **単一のエラー形状**: ドメインルール違反はすべて [`DomainError`] で表す
//! - **所有者の不変性**: 投稿・コメントの所有者フィールドは生成時に一度だけ設定される
//! - **所有者チェックの一元化**: 認可は [`ownership`] のガードだけが行う
//! - **明示的な認証コンテキスト**: リクエストの呼び出し元は [`identity::IdentityContext`] で表す
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain → shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメインエラー
//! - [`user`] / [`post`] / [`comment`] - エンティティと値オブジェクト
//! - [`ownership`] - 所有者チェック（AuthorizationGuard）
//! - [`identity`] - リクエストの認証コンテキスト
//! - [`password`] - パスワード関連の値オブジェクト
//! - [`clock`] - 時刻プロバイダ

#[macro_use]
mod macros;

pub mod clock;
pub mod comment;
pub mod error;
pub mod identity;
pub mod ownership;
pub mod password;
pub mod post;
pub mod user;

pub use error::DomainError;
