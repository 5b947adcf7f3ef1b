//! # セッション解決ミドルウェア
//!
//! すべてのリクエストの最初に Cookie の `session_id` から呼び出し元を解決し、
//! [`IdentityContext`] をリクエスト拡張に設定する。
//!
//! ## 解決規則
//!
//! | 状況 | 呼び出し元 | 後始末 |
//! |------|-----------|--------|
//! | Cookie なし | 匿名 | なし |
//! | セッションが存在しない・期限切れ | 匿名 | Cookie を消去 |
//! | セッションはあるがユーザーが削除済み | 匿名 | セッション削除 + Cookie 消去 |
//! | ストア障害 | 匿名 | なし（警告ログ） |
//! | 正常 | ログイン済み | なし |
//!
//! このミドルウェア自体はリクエストを拒否しない。認証が必要かどうかは
//! ハンドラ側の [`CurrentUser`](crate::extractor::CurrentUser) が判定する。
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! Router::new()
//!     .route("/posts", get(list_posts))
//!     .layer(from_fn_with_state(resolver_state, resolve_session))
//! ```

use std::sync::Arc;

use axum::{
   body::Body,
   extract::State,
   http::{HeaderValue, Request, header::SET_COOKIE},
   middleware::Next,
   response::Response,
};
use axum_extra::extract::{
   CookieJar,
   cookie::{Cookie, SameSite},
};
use board_domain::identity::IdentityContext;
use board_infra::{SessionManager, repository::UserRepository};

/// Cookie 名
pub const SESSION_COOKIE_NAME: &str = "session_id";

/// セッション Cookie の属性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
   /// `Secure` 属性を付けるか
   pub secure:          bool,
   /// `Max-Age`（秒）
   pub max_age_seconds: i64,
}

/// セッション Cookie を構築する
pub fn build_session_cookie(settings: &CookieSettings, session_id: &str) -> Cookie<'static> {
   let mut builder = Cookie::build((SESSION_COOKIE_NAME, session_id.to_string()))
      .path("/")
      .max_age(time::Duration::seconds(settings.max_age_seconds))
      .http_only(true)
      .same_site(SameSite::Lax);

   if settings.secure {
      builder = builder.secure(true);
   }

   builder.build()
}

/// Cookie をクリアするための Cookie を構築する
pub fn build_clear_cookie(settings: &CookieSettings) -> Cookie<'static> {
   let mut builder = Cookie::build((SESSION_COOKIE_NAME, ""))
      .path("/")
      .max_age(time::Duration::seconds(0))
      .http_only(true)
      .same_site(SameSite::Lax);

   if settings.secure {
      builder = builder.secure(true);
   }

   builder.build()
}

/// セッション解決ミドルウェアの状態
#[derive(Clone)]
pub struct SessionResolverState {
   pub session_manager: Arc<dyn SessionManager>,
   pub user_repository: Arc<dyn UserRepository>,
   pub cookie:          CookieSettings,
}

/// 解決結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
   pub context:      IdentityContext,
   /// ブラウザに残った Cookie を消去すべきか
   pub clear_cookie: bool,
}

impl Resolution {
   fn anonymous(clear_cookie: bool) -> Self {
      Self {
         context: IdentityContext::Anonymous,
         clear_cookie,
      }
   }
}

/// セッション ID から呼び出し元を解決する
///
/// 失敗は返さない。解決できない場合はすべて匿名になる。
/// 参照先のユーザーが削除済みのセッションはこの場で削除するため、
/// 同じ Cookie で繰り返し呼んでも結果は変わらない。
pub async fn resolve_identity(
   session_manager: &dyn SessionManager,
   user_repository: &dyn UserRepository,
   session_id: Option<&str>,
) -> Resolution {
   let Some(session_id) = session_id.filter(|id| !id.is_empty()) else {
      return Resolution::anonymous(false);
   };

   let session = match session_manager.get(session_id).await {
      Ok(Some(session)) => session,
      Ok(None) => return Resolution::anonymous(true),
      Err(e) => {
         tracing::warn!(
            error.category = "infrastructure",
            error.kind = e.kind_name(),
            "セッションの取得に失敗: {e}"
         );
         return Resolution::anonymous(false);
      }
   };

   match user_repository.find_by_id(session.user_id()).await {
      Ok(Some(user)) => Resolution {
         context:      IdentityContext::Authenticated(user.to_identity()),
         clear_cookie: false,
      },
      Ok(None) => {
         if let Err(e) = session_manager.delete(session_id).await {
            tracing::warn!(
               error.category = "infrastructure",
               error.kind = e.kind_name(),
               "無効なセッションの削除に失敗: {e}"
            );
         }
         tracing::info!(user_id = %session.user_id(), "削除済みユーザーのセッションを破棄");
         Resolution::anonymous(true)
      }
      Err(e) => {
         tracing::warn!(
            error.category = "infrastructure",
            error.kind = e.kind_name(),
            "セッションのユーザー取得に失敗: {e}"
         );
         Resolution::anonymous(false)
      }
   }
}

/// セッション解決ミドルウェア
///
/// ハンドラがセッション Cookie を設定しなかった場合に限り、
/// 無効になった Cookie の消去ヘッダーを追加する。
pub async fn resolve_session(
   State(state): State<SessionResolverState>,
   jar: CookieJar,
   mut request: Request<Body>,
   next: Next,
) -> Response {
   let session_id = jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string());
   let resolution = resolve_identity(
      state.session_manager.as_ref(),
      state.user_repository.as_ref(),
      session_id.as_deref(),
   )
   .await;

   request.extensions_mut().insert(resolution.context);
   let mut response = next.run(request).await;

   if resolution.clear_cookie && !sets_session_cookie(&response) {
      let cookie = build_clear_cookie(&state.cookie).to_string();
      if let Ok(value) = HeaderValue::from_str(&cookie) {
         response.headers_mut().append(SET_COOKIE, value);
      }
   }

   response
}

fn sets_session_cookie(response: &Response) -> bool {
   let prefix = format!("{SESSION_COOKIE_NAME}=");
   response
      .headers()
      .get_all(SET_COOKIE)
      .iter()
      .any(|value| value.to_str().is_ok_and(|v| v.starts_with(&prefix)))
}
