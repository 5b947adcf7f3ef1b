//! # 掲示板 API サーバー
//!
//! 会員登録・ログイン、投稿、コメント、いいねを提供する HTTP API。
//!
//! ## 環境変数
//!
//! `.env` ファイルがあれば読み込む。変数の一覧は [`board_api::config`] を参照。
//! ログ出力は `LOG_FORMAT`（`json` / `pretty`）と `RUST_LOG` で制御する。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（インメモリのセッションストア）
//! cargo run -p board-api
//!
//! # Redis をセッションストアに使う
//! SESSION_BACKEND=redis REDIS_URL=redis://localhost:6379 cargo run -p board-api
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use board_api::{ApiConfig, AppDependencies, SessionBackend, build_app, middleware::CookieSettings};
use board_domain::clock::SystemClock;
use board_infra::{
   Argon2PasswordHasher,
   InMemorySessionManager,
   RedisSessionManager,
   SessionManager,
   repository::{InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository},
};
use board_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// API サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. セッションストアの接続
/// 5. ルーターの構築と HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   dotenvy::dotenv().ok();

   init_tracing(TracingConfig::from_env("board-api"));
   let _tracing_guard = tracing::info_span!("app", service = "board-api").entered();

   let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;

   tracing::info!("API サーバーを起動します: {}:{}", config.host, config.port);

   let session_manager: Arc<dyn SessionManager> = match &config.session_backend {
      SessionBackend::Memory => {
         tracing::info!("セッションストア: インメモリ");
         Arc::new(InMemorySessionManager::new(config.session_ttl))
      }
      SessionBackend::Redis { url } => {
         tracing::info!("セッションストア: Redis");
         Arc::new(
            RedisSessionManager::new(url, config.session_ttl)
               .await
               .context("Redis への接続に失敗しました")?,
         )
      }
   };

   let cookie = CookieSettings {
      secure:          config.cookie_secure,
      max_age_seconds: i64::try_from(config.session_ttl.as_secs()).unwrap_or(i64::MAX),
   };

   let app = build_app(AppDependencies {
      user_repository: Arc::new(InMemoryUserRepository::new()),
      post_repository: Arc::new(InMemoryPostRepository::new()),
      comment_repository: Arc::new(InMemoryCommentRepository::new()),
      session_manager,
      password_hasher: Arc::new(Argon2PasswordHasher::new()),
      clock: Arc::new(SystemClock),
      cookie,
   });

   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .context("バインドアドレスが不正です")?;
   let listener = TcpListener::bind(addr)
      .await
      .with_context(|| format!("{addr} へのバインドに失敗しました"))?;
   tracing::info!("API サーバーが起動しました: {}", addr);

   axum::serve(listener, app)
      .with_graceful_shutdown(shutdown_signal())
      .await
      .context("サーバーの実行中にエラーが発生しました")?;

   tracing::info!("API サーバーを停止しました");
   Ok(())
}

/// Ctrl+C を待つ
async fn shutdown_signal() {
   if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!("シグナルの待機に失敗しました: {e}");
   }
}
