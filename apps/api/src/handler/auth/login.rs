//! 会員登録・ログイン・ログアウトハンドラ

use std::sync::Arc;

use axum::{
   extract::State,
   response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use board_domain::{
   password::PlainPassword,
   user::{Email, Nickname},
};
use board_infra::SessionData;
use board_shared::SuccessCode;

use super::{AuthState, LoginRequest, SignupRequest};
use crate::{
   error::ApiError,
   extractor::{ValidatedJson, required},
   handler::{normalize_url, respond},
   middleware::{SESSION_COOKIE_NAME, build_clear_cookie, build_session_cookie},
   usecase::SignupInput,
};

/// POST /auth/signup
///
/// 会員登録する。ログイン状態にはしない。
///
/// ## リクエストボディ
///
/// ```json
/// {
///   "email": "user@example.com",
///   "password": "password123",
///   "nickname": "taro",
///   "profileImageUrl": null
/// }
/// ```
#[tracing::instrument(skip_all)]
pub async fn signup(
   State(state): State<Arc<AuthState>>,
   ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<Response, ApiError> {
   let input = SignupInput {
      email:             Email::new(required("email", req.email)?)?,
      password:          PlainPassword::new_checked("password", required("password", req.password)?)?,
      nickname:          Nickname::new(required("nickname", req.nickname)?)?,
      profile_image_url: normalize_url(req.profile_image_url),
   };

   let user = state.usecase.signup(input).await?;

   Ok(respond(SuccessCode::SignupSuccess, user.to_identity()))
}

/// POST /auth/login
///
/// メールアドレスとパスワードでログインし、セッションを確立する。
///
/// ## 処理フロー
///
/// 1. ユーザーを検索してパスワードを照合
/// 2. 既存のセッションがあれば破棄（セッション固定化対策）
/// 3. セッションを作成し Cookie を設定
#[tracing::instrument(skip_all)]
pub async fn login(
   State(state): State<Arc<AuthState>>,
   jar: CookieJar,
   ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Response, ApiError> {
   let email = required("email", req.email)?;
   let password = PlainPassword::new(required("password", req.password)?);

   let user = state.usecase.login(&email, password).await?;
   let identity = user.to_identity();

   if let Some(previous) = jar.get(SESSION_COOKIE_NAME) {
      state.session_manager.delete(previous.value()).await?;
   }

   let session_id = state
      .session_manager
      .create(&SessionData::new(&identity, state.clock.now()))
      .await?;

   let jar = jar.add(build_session_cookie(&state.cookie, &session_id));
   Ok((jar, respond(SuccessCode::LoginSuccess, identity)).into_response())
}

/// POST /auth/logout
///
/// セッションを破棄して Cookie を消去する。未ログインでも成功する。
#[tracing::instrument(skip_all)]
pub async fn logout(
   State(state): State<Arc<AuthState>>,
   jar: CookieJar,
) -> Result<Response, ApiError> {
   if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
      state.session_manager.delete(cookie.value()).await?;
   }

   let jar = jar.add(build_clear_cookie(&state.cookie));
   Ok((jar, respond(SuccessCode::LogoutSuccess, ())).into_response())
}

#[cfg(test)]
mod tests {
   use axum::{
      body::Body,
      http::{Method, Request, StatusCode, header},
   };
   use board_infra::SessionManager as _;
   use pretty_assertions::assert_eq;
   use serde_json::{Value, json};
   use tower::ServiceExt;

   use super::super::test_utils::auth_router;

   fn json_request(uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
      let mut builder = Request::builder()
         .method(Method::POST)
         .uri(uri)
         .header(header::CONTENT_TYPE, "application/json");
      if let Some(cookie) = cookie {
         builder = builder.header(header::COOKIE, cookie);
      }
      builder.body(Body::from(body.to_string())).unwrap()
   }

   fn signup_body() -> Value {
      json!({ "email": "a@x.com", "password": "password123", "nickname": "alice" })
   }

   async fn body_json(response: axum::response::Response) -> Value {
      let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
         .await
         .unwrap();
      serde_json::from_slice(&bytes).unwrap()
   }

   fn session_cookie(response: &axum::response::Response) -> String {
      response
         .headers()
         .get_all(header::SET_COOKIE)
         .iter()
         .filter_map(|v| v.to_str().ok())
         .find(|v| v.starts_with("session_id="))
         .and_then(|v| v.split(';').next())
         .unwrap()
         .to_string()
   }

   #[tokio::test]
   async fn test_会員登録は201でidentityを返しcookieを設定しない() {
      let (router, _) = auth_router();

      let response = router
         .oneshot(json_request("/auth/signup", signup_body(), None))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::CREATED);
      assert!(response.headers().get(header::SET_COOKIE).is_none());
      let body = body_json(response).await;
      assert_eq!(body["code"], "SIGNUP_SUCCESS");
      assert_eq!(body["data"]["email"], "a@x.com");
      assert_eq!(body["data"]["nickname"], "alice");
      assert!(body["data"].get("password").is_none());
   }

   #[tokio::test]
   async fn test_ログインでセッションcookieが設定される() {
      let (router, sessions) = auth_router();
      router
         .clone()
         .oneshot(json_request("/auth/signup", signup_body(), None))
         .await
         .unwrap();

      let response = router
         .oneshot(json_request(
            "/auth/login",
            json!({ "email": "a@x.com", "password": "password123" }),
            None,
         ))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::OK);
      let cookie = session_cookie(&response);
      let raw = response
         .headers()
         .get(header::SET_COOKIE)
         .unwrap()
         .to_str()
         .unwrap()
         .to_string();
      assert!(raw.contains("HttpOnly"));
      assert!(raw.contains("SameSite=Lax"));
      assert!(raw.contains("Path=/"));

      let session_id = cookie.trim_start_matches("session_id=");
      assert!(sessions.get(session_id).await.unwrap().is_some());
      assert_eq!(body_json(response).await["code"], "LOGIN_SUCCESS");
   }

   #[tokio::test]
   async fn test_パスワード不一致は401() {
      let (router, _) = auth_router();
      router
         .clone()
         .oneshot(json_request("/auth/signup", signup_body(), None))
         .await
         .unwrap();

      let response = router
         .oneshot(json_request(
            "/auth/login",
            json!({ "email": "a@x.com", "password": "wrong-password" }),
            None,
         ))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
      assert_eq!(body_json(response).await["code"], "INVALID_CREDENTIALS");
   }

   #[tokio::test]
   async fn test_ログアウトはセッションを破棄しcookieを消す() {
      let (router, sessions) = auth_router();
      router
         .clone()
         .oneshot(json_request("/auth/signup", signup_body(), None))
         .await
         .unwrap();
      let login = router
         .clone()
         .oneshot(json_request(
            "/auth/login",
            json!({ "email": "a@x.com", "password": "password123" }),
            None,
         ))
         .await
         .unwrap();
      let cookie = session_cookie(&login);

      let response = router
         .oneshot(json_request("/auth/logout", json!({}), Some(&cookie)))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::OK);
      let cleared: Vec<_> = response
         .headers()
         .get_all(header::SET_COOKIE)
         .iter()
         .filter_map(|v| v.to_str().ok())
         .filter(|v| v.starts_with("session_id="))
         .collect();
      assert_eq!(cleared.len(), 1);
      assert!(cleared[0].contains("Max-Age=0"));
      let session_id = cookie.trim_start_matches("session_id=");
      assert!(sessions.get(session_id).await.unwrap().is_none());
   }

   #[tokio::test]
   async fn test_未ログインでもログアウトは成功する() {
      let (router, _) = auth_router();

      let response = router
         .oneshot(
            Request::builder()
               .method(Method::POST)
               .uri("/auth/logout")
               .body(Body::empty())
               .unwrap(),
         )
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::OK);
      assert_eq!(
         body_json(response).await,
         json!({ "code": "LOGOUT_SUCCESS", "message": "ログアウトしました", "data": {} })
      );
   }
}
