//! # ミドルウェア
//!
//! API サーバー用のミドルウェアを提供する。

pub mod session;

pub use session::{
   CookieSettings,
   Resolution,
   SESSION_COOKIE_NAME,
   SessionResolverState,
   build_clear_cookie,
   build_session_cookie,
   resolve_identity,
   resolve_session,
};
