//! # 掲示板 API ライブラリ
//!
//! 会員・投稿・コメント・いいねを扱う HTTP API のコアモジュール。
//!
//! ## モジュール構成
//!
//! - `app_builder`: 依存の注入とルーター構築
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラーのレスポンス変換
//! - `extractor`: 入力検証付きの抽出器と呼び出し元の取得
//! - `handler`: HTTP ハンドラ
//! - `middleware`: セッション解決ミドルウェア
//! - `usecase`: ビジネスロジック

pub mod app_builder;
pub mod config;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod middleware;
pub mod usecase;

pub use app_builder::{AppDependencies, build_app};
pub use config::{ApiConfig, ConfigError, SessionBackend};
pub use error::ApiError;
