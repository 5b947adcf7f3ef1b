//! # ユーザーハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /users/{user_id}` - ユーザー取得（認証不要）
//! - `PATCH /users/{user_id}` - プロフィール更新（本人のみ）
//! - `PATCH /users/{user_id}/password` - パスワード変更（本人のみ）
//! - `DELETE /users/{user_id}` - 退会（本人のみ。全セッションを破棄）

use std::sync::Arc;

use axum::{
   extract::{Path, State},
   response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use board_domain::{
   password::PlainPassword,
   user::{Nickname, UserId},
};
use board_shared::SuccessCode;
use serde::Deserialize;
use validator::Validate;

use super::{double_option, normalize_url, respond};
use crate::{
   error::ApiError,
   extractor::{CurrentUser, ValidatedJson, parse_path_id, required},
   middleware::{CookieSettings, build_clear_cookie},
   usecase::{ChangePasswordInput, UpdateProfileInput, UserUseCaseImpl},
};

/// ユーザー API の共有状態
pub struct UserState {
   pub usecase: UserUseCaseImpl,
   pub cookie:  CookieSettings,
}

// --- リクエスト型 ---

/// プロフィール更新リクエスト
///
/// `profileImageUrl: null` で画像を外す。キーを省略した項目は変更しない。
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
   #[validate(length(min = 1, max = 30))]
   pub nickname:          Option<String>,
   #[serde(default, deserialize_with = "double_option")]
   pub profile_image_url: Option<Option<String>>,
}

/// パスワード変更リクエスト
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
   #[validate(required)]
   pub current_password: Option<String>,
   #[validate(required, length(min = 8, max = 64))]
   pub new_password:     Option<String>,
}

fn user_id_from(raw: &str) -> Result<UserId, ApiError> {
   parse_path_id("userId", raw, UserId::parse)
}

// --- ハンドラ ---

/// GET /users/{user_id}
#[tracing::instrument(skip_all)]
pub async fn get_user(
   State(state): State<Arc<UserState>>,
   Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
   let user_id = user_id_from(&user_id)?;
   let user = state.usecase.get_user(&user_id).await?;
   Ok(respond(SuccessCode::GetUserSuccess, user.to_identity()))
}

/// PATCH /users/{user_id}
#[tracing::instrument(skip_all)]
pub async fn update_user(
   State(state): State<Arc<UserState>>,
   CurrentUser(caller): CurrentUser,
   Path(user_id): Path<String>,
   ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Response, ApiError> {
   let user_id = user_id_from(&user_id)?;
   let input = UpdateProfileInput {
      nickname:          req.nickname.map(Nickname::new).transpose()?,
      profile_image_url: req.profile_image_url.map(normalize_url),
   };

   let user = state.usecase.update_profile(&caller, &user_id, input).await?;
   Ok(respond(SuccessCode::UserUpdated, user.to_identity()))
}

/// PATCH /users/{user_id}/password
#[tracing::instrument(skip_all)]
pub async fn change_password(
   State(state): State<Arc<UserState>>,
   CurrentUser(caller): CurrentUser,
   Path(user_id): Path<String>,
   ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Response, ApiError> {
   let user_id = user_id_from(&user_id)?;
   let input = ChangePasswordInput {
      current_password: PlainPassword::new(required("currentPassword", req.current_password)?),
      new_password:     PlainPassword::new_checked(
         "newPassword",
         required("newPassword", req.new_password)?,
      )?,
   };

   state.usecase.change_password(&caller, &user_id, input).await?;
   Ok(respond(SuccessCode::PasswordChanged, ()))
}

/// DELETE /users/{user_id}
///
/// 退会後は Cookie も消去する。
#[tracing::instrument(skip_all)]
pub async fn delete_user(
   State(state): State<Arc<UserState>>,
   CurrentUser(caller): CurrentUser,
   jar: CookieJar,
   Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
   let user_id = user_id_from(&user_id)?;
   state.usecase.delete_user(&caller, &user_id).await?;

   let jar = jar.add(build_clear_cookie(&state.cookie));
   Ok((jar, respond(SuccessCode::UserDeleted, ())).into_response())
}
