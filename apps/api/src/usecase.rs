//! # ユースケース層
//!
//! 掲示板のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリ・セッション・ハッシュ・時刻を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは入力の変換とレスポンスの組み立てだけを行い、
//!   存在確認・所有者チェック・一意性チェックはユースケースに集約する
//! - **チェックの順序**: 対象の存在確認 → 所有者チェック → 変更
//!
//! ## モジュール構成
//!
//! - `auth`: 会員登録・ログイン
//! - `user`: プロフィール・パスワード変更・退会
//! - `post`: 投稿・いいね
//! - `comment`: コメント

pub(crate) mod helpers;

pub mod auth;
pub mod comment;
pub mod post;
pub mod user;

pub use auth::{AuthUseCaseImpl, SignupInput};
pub use comment::{CommentUseCaseImpl, CommentView};
pub use post::{CreatePostInput, PostUseCaseImpl, PostView};
pub use user::{ChangePasswordInput, UpdateProfileInput, UserUseCaseImpl};
