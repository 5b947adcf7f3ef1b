//! # ストア
//!
//! ユーザー・投稿・コメントの保存先。ユースケース層はトレイトにのみ依存する。
//!
//! ## 設計方針
//!
//! - **トレイト + インメモリ実装**: プロセスが所有するストアをハンドラへ注入する
//! - **書き込みの直列化**: テーブルごとに `tokio::sync::RwLock` を持ち、
//!   一意性の確認と書き込みは同じ書き込みロック内で行う
//! - **並び順**: 一覧は作成日時の新しい順（同時刻は ID の降順）

pub mod comment_repository;
pub mod post_repository;
pub mod user_repository;

pub use comment_repository::{CommentRepository, InMemoryCommentRepository};
pub use post_repository::{InMemoryPostRepository, PostRepository};
pub use user_repository::{InMemoryUserRepository, UserRepository};
