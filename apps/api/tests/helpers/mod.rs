//! 統合テスト用のアプリケーションハーネス
//!
//! インメモリのリポジトリ・セッションストアと軽量なパスワードハッシュで
//! 本番と同じルーターを組み立て、`oneshot` でリクエストを送る。

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use axum::{
   Router,
   body::{Body, to_bytes},
   http::{HeaderMap, Method, Request, StatusCode, header},
};
use board_api::{AppDependencies, build_app, middleware::CookieSettings};
use board_domain::clock::SystemClock;
use board_infra::{
   Argon2PasswordHasher,
   InMemorySessionManager,
   repository::{InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository},
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";

/// テスト対象のアプリケーション
pub struct TestApp {
   pub router:   Router,
   pub sessions: Arc<InMemorySessionManager>,
   pub users:    Arc<InMemoryUserRepository>,
}

/// レスポンスの検証用スナップショット
pub struct TestResponse {
   pub status:  StatusCode,
   pub headers: HeaderMap,
   pub body:    Value,
}

impl TestResponse {
   /// `Set-Cookie` のうちセッション Cookie のものを返す
   pub fn session_set_cookies(&self) -> Vec<String> {
      self
         .headers
         .get_all(header::SET_COOKIE)
         .iter()
         .filter_map(|v| v.to_str().ok())
         .filter(|v| v.starts_with("session_id="))
         .map(str::to_string)
         .collect()
   }

   /// ログインで発行された `session_id=...` の組
   pub fn session_cookie(&self) -> String {
      self
         .session_set_cookies()
         .first()
         .and_then(|v| v.split(';').next())
         .map(str::to_string)
         .expect("session cookie が設定されていること")
   }
}

impl TestApp {
   pub fn new() -> Self {
      let users = Arc::new(InMemoryUserRepository::new());
      let sessions = Arc::new(InMemorySessionManager::new(Duration::from_secs(3600)));

      let router = build_app(AppDependencies {
         user_repository:    users.clone(),
         post_repository:    Arc::new(InMemoryPostRepository::new()),
         comment_repository: Arc::new(InMemoryCommentRepository::new()),
         session_manager:    sessions.clone(),
         password_hasher:    Arc::new(Argon2PasswordHasher::lightweight()),
         clock:              Arc::new(SystemClock),
         cookie:             CookieSettings {
            secure:          false,
            max_age_seconds: 3600,
         },
      });

      Self {
         router,
         sessions,
         users,
      }
   }

   pub async fn send(&self, request: Request<Body>) -> TestResponse {
      let response = self.router.clone().oneshot(request).await.unwrap();
      let status = response.status();
      let headers = response.headers().clone();
      let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
      let body = if bytes.is_empty() {
         Value::Null
      } else {
         serde_json::from_slice(&bytes).unwrap()
      };

      TestResponse {
         status,
         headers,
         body,
      }
   }

   pub async fn call(
      &self,
      method: Method,
      uri: &str,
      body: Option<Value>,
      cookie: Option<&str>,
   ) -> TestResponse {
      let mut builder = Request::builder().method(method).uri(uri);
      if let Some(cookie) = cookie {
         builder = builder.header(header::COOKIE, cookie);
      }
      let request = match body {
         Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
         None => builder.body(Body::empty()),
      };
      self.send(request.unwrap()).await
   }

   pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
      self.call(Method::GET, uri, None, cookie).await
   }

   pub async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
      self.call(Method::POST, uri, Some(body), cookie).await
   }

   pub async fn patch(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
      self.call(Method::PATCH, uri, Some(body), cookie).await
   }

   pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
      self.call(Method::DELETE, uri, None, cookie).await
   }

   /// 会員登録してログインし、`(ユーザー ID, Cookie)` を返す
   pub async fn signup_and_login(&self, email: &str, nickname: &str) -> (String, String) {
      let signup = self
         .post(
            "/auth/signup",
            json!({ "email": email, "password": PASSWORD, "nickname": nickname }),
            None,
         )
         .await;
      assert_eq!(signup.status, StatusCode::CREATED, "{}", signup.body);

      let login = self
         .post(
            "/auth/login",
            json!({ "email": email, "password": PASSWORD }),
            None,
         )
         .await;
      assert_eq!(login.status, StatusCode::OK, "{}", login.body);

      let user_id = login.body["data"]["id"].as_str().unwrap().to_string();
      (user_id, login.session_cookie())
   }

   /// 投稿を作成して投稿 ID を返す
   pub async fn create_post(&self, cookie: &str, title: &str) -> String {
      let response = self
         .post(
            "/posts",
            json!({ "title": title, "content": format!("{title} の本文") }),
            Some(cookie),
         )
         .await;
      assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
      response.body["data"]["postId"].as_str().unwrap().to_string()
   }
}
