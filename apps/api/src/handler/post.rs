//! # 投稿ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /posts?offset=&limit=` - 一覧（新しい順、認証不要）
//! - `GET /posts/{post_id}` - 詳細（認証不要）
//! - `POST /posts` - 作成
//! - `PATCH /posts/{post_id}` - 部分更新（作成者のみ）
//! - `DELETE /posts/{post_id}` - 削除（作成者のみ。配下のコメントも削除）
//! - `POST /posts/{post_id}/likes` - いいねの切り替え

use std::sync::Arc;

use axum::{
   extract::{Path, State},
   response::Response,
};
use board_domain::{
   post::{PostContent, PostEdit, PostId, PostTitle},
   user::UserId,
};
use board_shared::{PaginatedResponse, SuccessCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{AuthorDto, double_option, normalize_url, respond};
use crate::{
   error::ApiError,
   extractor::{CurrentUser, ValidatedJson, ValidatedQuery, parse_path_id, required},
   usecase::{CreatePostInput, PostUseCaseImpl, PostView},
};

/// 一覧の既定件数
const DEFAULT_LIMIT: i64 = 10;

/// 投稿 API の共有状態
pub struct PostState {
   pub usecase: PostUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 一覧のクエリパラメータ
#[derive(Debug, Deserialize, Validate)]
pub struct ListPostsQuery {
   #[validate(range(min = 0))]
   pub offset: Option<i64>,
   #[validate(range(min = 1, max = 100))]
   pub limit:  Option<i64>,
}

/// 投稿作成リクエスト
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
   #[validate(required, length(min = 1, max = 100))]
   pub title:     Option<String>,
   #[validate(required, length(min = 1, max = 10000))]
   pub content:   Option<String>,
   #[validate(length(max = 2048))]
   pub image_url: Option<String>,
}

/// 投稿更新リクエスト（部分更新）
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
   #[validate(length(min = 1, max = 100))]
   pub title:     Option<String>,
   #[validate(length(min = 1, max = 10000))]
   pub content:   Option<String>,
   #[serde(default, deserialize_with = "double_option")]
   pub image_url: Option<Option<String>>,
}

/// 投稿 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
   pub post_id:       PostId,
   pub title:         String,
   pub content:       String,
   pub image_url:     Option<String>,
   pub author_id:     UserId,
   pub author:        Option<AuthorDto>,
   pub like_count:    usize,
   pub comment_count: usize,
   pub created_at:    DateTime<Utc>,
   pub updated_at:    DateTime<Utc>,
}

impl From<PostView> for PostDto {
   fn from(view: PostView) -> Self {
      let post = view.post;
      Self {
         post_id:       post.id().clone(),
         title:         post.title().to_string(),
         content:       post.content().to_string(),
         image_url:     post.image_url().map(str::to_string),
         author_id:     post.author_id().clone(),
         author:        view.author.as_ref().map(AuthorDto::from),
         like_count:    post.like_count(),
         comment_count: view.comment_count,
         created_at:    post.created_at(),
         updated_at:    post.updated_at(),
      }
   }
}

/// 削除結果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePostDto {
   pub post_id: PostId,
}

fn post_id_from(raw: &str) -> Result<PostId, ApiError> {
   parse_path_id("postId", raw, PostId::parse)
}

// --- ハンドラ ---

/// GET /posts
#[tracing::instrument(skip_all)]
pub async fn list_posts(
   State(state): State<Arc<PostState>>,
   ValidatedQuery(query): ValidatedQuery<ListPostsQuery>,
) -> Result<Response, ApiError> {
   let offset = usize::try_from(query.offset.unwrap_or(0)).unwrap_or(0);
   let limit = usize::try_from(query.limit.unwrap_or(DEFAULT_LIMIT)).unwrap_or(1);

   let (views, pagination) = state.usecase.list_posts(offset, limit).await?;
   let items = views.into_iter().map(PostDto::from).collect();

   Ok(respond(
      SuccessCode::GetPostsSuccess,
      PaginatedResponse::new(items, pagination),
   ))
}

/// GET /posts/{post_id}
#[tracing::instrument(skip_all)]
pub async fn get_post(
   State(state): State<Arc<PostState>>,
   Path(post_id): Path<String>,
) -> Result<Response, ApiError> {
   let post_id = post_id_from(&post_id)?;
   let view = state.usecase.get_post(&post_id).await?;
   Ok(respond(SuccessCode::GetPostSuccess, PostDto::from(view)))
}

/// POST /posts
#[tracing::instrument(skip_all)]
pub async fn create_post(
   State(state): State<Arc<PostState>>,
   CurrentUser(caller): CurrentUser,
   ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> Result<Response, ApiError> {
   let input = CreatePostInput {
      title:     PostTitle::new(required("title", req.title)?)?,
      content:   PostContent::new(required("content", req.content)?)?,
      image_url: normalize_url(req.image_url),
   };

   let view = state.usecase.create_post(&caller, input).await?;
   Ok(respond(SuccessCode::PostCreated, PostDto::from(view)))
}

/// PATCH /posts/{post_id}
#[tracing::instrument(skip_all)]
pub async fn update_post(
   State(state): State<Arc<PostState>>,
   CurrentUser(caller): CurrentUser,
   Path(post_id): Path<String>,
   ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> Result<Response, ApiError> {
   let post_id = post_id_from(&post_id)?;
   let edit = PostEdit {
      title:     req.title.map(PostTitle::new).transpose()?,
      content:   req.content.map(PostContent::new).transpose()?,
      image_url: req.image_url.map(normalize_url),
   };

   let view = state.usecase.update_post(&caller, &post_id, edit).await?;
   Ok(respond(SuccessCode::PostUpdated, PostDto::from(view)))
}

/// DELETE /posts/{post_id}
#[tracing::instrument(skip_all)]
pub async fn delete_post(
   State(state): State<Arc<PostState>>,
   CurrentUser(caller): CurrentUser,
   Path(post_id): Path<String>,
) -> Result<Response, ApiError> {
   let post_id = post_id_from(&post_id)?;
   state.usecase.delete_post(&caller, &post_id).await?;
   Ok(respond(SuccessCode::PostDeleted, DeletePostDto { post_id }))
}

/// POST /posts/{post_id}/likes
#[tracing::instrument(skip_all)]
pub async fn toggle_like(
   State(state): State<Arc<PostState>>,
   CurrentUser(caller): CurrentUser,
   Path(post_id): Path<String>,
) -> Result<Response, ApiError> {
   let post_id = post_id_from(&post_id)?;
   let status = state.usecase.toggle_like(&caller, &post_id).await?;
   Ok(respond(SuccessCode::PostLikeToggled, status))
}
