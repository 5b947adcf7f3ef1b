//! # 認証ハンドラ
//!
//! 会員登録とセッションの確立・破棄を行うエンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `POST /auth/signup` - 会員登録（セッションは作らない）
//! - `POST /auth/login` - ログイン
//! - `POST /auth/logout` - ログアウト（未ログインでも成功）
//! - `GET /auth/me` - ログイン中のユーザー

mod login;
mod session;

use std::sync::Arc;

use board_domain::clock::Clock;
use board_infra::SessionManager;
pub use login::*;
use serde::Deserialize;
pub use session::*;
use validator::Validate;

use crate::{middleware::CookieSettings, usecase::AuthUseCaseImpl};

/// 認証ハンドラの共有状態
pub struct AuthState {
   pub usecase:         AuthUseCaseImpl,
   pub session_manager: Arc<dyn SessionManager>,
   pub clock:           Arc<dyn Clock>,
   pub cookie:          CookieSettings,
}

// --- リクエスト型 ---

/// 会員登録リクエスト
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
   #[validate(required, email, length(max = 255))]
   pub email:             Option<String>,
   #[validate(required, length(min = 8, max = 64))]
   pub password:          Option<String>,
   #[validate(required, length(min = 1, max = 30))]
   pub nickname:          Option<String>,
   #[validate(length(max = 2048))]
   pub profile_image_url: Option<String>,
}

/// ログインリクエスト
///
/// パスワードの長さはここでは検証しない（不一致と区別できなくなるため）。
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
   #[validate(required, email)]
   pub email:    Option<String>,
   #[validate(required)]
   pub password: Option<String>,
}

#[cfg(test)]
pub(super) mod test_utils {
   use std::{sync::Arc, time::Duration};

   use axum::{
      Router,
      middleware::from_fn_with_state,
      routing::{get, post},
   };
   use board_domain::clock::SystemClock;
   use board_infra::{
      Argon2PasswordHasher,
      InMemorySessionManager,
      repository::InMemoryUserRepository,
   };

   use super::{AuthState, login, logout, me, signup};
   use crate::{
      middleware::{CookieSettings, SessionResolverState, resolve_session},
      usecase::AuthUseCaseImpl,
   };

   pub const COOKIE: CookieSettings = CookieSettings {
      secure:          false,
      max_age_seconds: 3600,
   };

   /// 認証ルートだけを持つテスト用ルーター
   pub fn auth_router() -> (Router, Arc<InMemorySessionManager>) {
      let users = Arc::new(InMemoryUserRepository::new());
      let sessions = Arc::new(InMemorySessionManager::new(Duration::from_secs(3600)));
      let clock = Arc::new(SystemClock);

      let state = Arc::new(AuthState {
         usecase:         AuthUseCaseImpl::new(
            users.clone(),
            Arc::new(Argon2PasswordHasher::lightweight()),
            clock.clone(),
         ),
         session_manager: sessions.clone(),
         clock,
         cookie:          COOKIE,
      });
      let resolver = SessionResolverState {
         session_manager: sessions.clone(),
         user_repository: users,
         cookie:          COOKIE,
      };

      let router = Router::new()
         .route("/auth/signup", post(signup))
         .route("/auth/login", post(login))
         .route("/auth/logout", post(logout))
         .route("/auth/me", get(me))
         .with_state(state)
         .layer(from_fn_with_state(resolver, resolve_session));

      (router, sessions)
   }
}
