//! # 認証コンテキスト
//!
//! リクエストごとの呼び出し元を表す。セッション解決ミドルウェアが
//! リクエストの最初に一度だけ設定し、ハンドラは [`IdentityContext::require_authenticated`]
//! を通してのみ呼び出し元を取り出す。

use crate::{DomainError, user::Identity};

/// 呼び出し元
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentityContext {
    /// 未ログイン、またはセッションが無効
    #[default]
    Anonymous,
    /// ログイン済み
    Authenticated(Identity),
}

impl IdentityContext {
    /// ログイン済みの呼び出し元を返す
    ///
    /// 匿名の場合は `UNAUTHORIZED`（401）。
    pub fn require_authenticated(&self) -> Result<&Identity, DomainError> {
        match self {
            Self::Authenticated(identity) => Ok(identity),
            Self::Anonymous => Err(DomainError::unauthorized()),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
