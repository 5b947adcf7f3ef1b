//! # アプリケーション構築
//!
//! 依存（リポジトリ・セッション・ハッシュ・時刻）から State を組み立て、
//! ルーターを構築する。`main.rs` はインフラ初期化とサーバー起動に集中し、
//! 統合テストはインメモリ実装を渡して同じルーターを得る。

use std::sync::Arc;

use axum::{
   Router,
   middleware::from_fn_with_state,
   routing::{get, patch, post},
};
use board_domain::clock::Clock;
use board_infra::{
   PasswordHasher,
   SessionManager,
   repository::{CommentRepository, PostRepository, UserRepository},
};
use board_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
   catch_panic::CatchPanicLayer,
   request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
   trace::TraceLayer,
};

use crate::{
   error::{fallback_not_found, handle_panic},
   handler::{
      AuthState,
      CommentState,
      PostState,
      UserState,
      change_password,
      create_comment,
      create_post,
      delete_comment,
      delete_post,
      delete_user,
      get_post,
      get_user,
      health_check,
      list_comments,
      list_posts,
      login,
      logout,
      me,
      signup,
      toggle_like,
      update_comment,
      update_post,
      update_user,
   },
   middleware::{CookieSettings, SessionResolverState, resolve_session},
   usecase::{AuthUseCaseImpl, CommentUseCaseImpl, PostUseCaseImpl, UserUseCaseImpl},
};

/// ルーター構築に必要な依存
#[derive(Clone)]
pub struct AppDependencies {
   pub user_repository:    Arc<dyn UserRepository>,
   pub post_repository:    Arc<dyn PostRepository>,
   pub comment_repository: Arc<dyn CommentRepository>,
   pub session_manager:    Arc<dyn SessionManager>,
   pub password_hasher:    Arc<dyn PasswordHasher>,
   pub clock:              Arc<dyn Clock>,
   pub cookie:             CookieSettings,
}

/// State の組み立てとルーター定義を行う
pub fn build_app(deps: AppDependencies) -> Router {
   let auth_state = Arc::new(AuthState {
      usecase:         AuthUseCaseImpl::new(
         deps.user_repository.clone(),
         deps.password_hasher.clone(),
         deps.clock.clone(),
      ),
      session_manager: deps.session_manager.clone(),
      clock:           deps.clock.clone(),
      cookie:          deps.cookie,
   });

   let user_state = Arc::new(UserState {
      usecase: UserUseCaseImpl::new(
         deps.user_repository.clone(),
         deps.session_manager.clone(),
         deps.password_hasher,
         deps.clock.clone(),
      ),
      cookie:  deps.cookie,
   });

   let post_state = Arc::new(PostState {
      usecase: PostUseCaseImpl::new(
         deps.post_repository.clone(),
         deps.comment_repository.clone(),
         deps.user_repository.clone(),
         deps.clock.clone(),
      ),
   });

   let comment_state = Arc::new(CommentState {
      usecase: CommentUseCaseImpl::new(
         deps.post_repository,
         deps.comment_repository,
         deps.user_repository.clone(),
         deps.clock,
      ),
   });

   let resolver = SessionResolverState {
      session_manager: deps.session_manager,
      user_repository: deps.user_repository,
      cookie:          deps.cookie,
   };

   let auth_routes = Router::new()
      .route("/auth/signup", post(signup))
      .route("/auth/login", post(login))
      .route("/auth/logout", post(logout))
      .route("/auth/me", get(me))
      .with_state(auth_state);

   let user_routes = Router::new()
      .route(
         "/users/{user_id}",
         get(get_user).patch(update_user).delete(delete_user),
      )
      .route("/users/{user_id}/password", patch(change_password))
      .with_state(user_state);

   let post_routes = Router::new()
      .route("/posts", get(list_posts).post(create_post))
      .route(
         "/posts/{post_id}",
         get(get_post).patch(update_post).delete(delete_post),
      )
      .route("/posts/{post_id}/likes", post(toggle_like))
      .with_state(post_state);

   let comment_routes = Router::new()
      .route(
         "/posts/{post_id}/comments",
         get(list_comments).post(create_comment),
      )
      .route(
         "/posts/{post_id}/comments/{comment_id}",
         patch(update_comment).delete(delete_comment),
      )
      .with_state(comment_state);

   // レイヤーは下に書いたものが外側
   // 1. SetRequestIdLayer（最外）: UUID v7 を生成（クライアント提供値があればそれを使う）
   // 2. TraceLayer: request_id を含むスパンを張る
   // 3. PropagateRequestIdLayer: レスポンスに X-Request-Id を返す
   // 4. CatchPanicLayer: panic を 500 の共通形式に変換
   // 5. resolve_session: Cookie から呼び出し元を解決
   Router::new()
      .route("/health", get(health_check))
      .merge(auth_routes)
      .merge(user_routes)
      .merge(post_routes)
      .merge(comment_routes)
      .fallback(fallback_not_found)
      .layer(from_fn_with_state(resolver, resolve_session))
      .layer(CatchPanicLayer::custom(handle_panic))
      .layer(PropagateRequestIdLayer::x_request_id())
      .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
      .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
