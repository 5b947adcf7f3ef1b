//! # コメントハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /posts/{post_id}/comments` - 一覧（新しい順、認証不要）
//! - `POST /posts/{post_id}/comments` - 作成
//! - `PATCH /posts/{post_id}/comments/{comment_id}` - 更新（作成者のみ）
//! - `DELETE /posts/{post_id}/comments/{comment_id}` - 削除（作成者のみ）

use std::sync::Arc;

use axum::{
   extract::{Path, State},
   response::Response,
};
use board_domain::{
   comment::{CommentContent, CommentId},
   post::PostId,
   user::UserId,
};
use board_shared::SuccessCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{AuthorDto, respond};
use crate::{
   error::ApiError,
   extractor::{CurrentUser, ValidatedJson, parse_path_id, required},
   usecase::{CommentUseCaseImpl, CommentView},
};

/// コメント API の共有状態
pub struct CommentState {
   pub usecase: CommentUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// コメント作成・更新リクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
   #[validate(required, length(min = 1, max = 1000))]
   pub content: Option<String>,
}

/// コメント DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
   pub comment_id: CommentId,
   pub post_id:    PostId,
   pub author_id:  UserId,
   pub author:     Option<AuthorDto>,
   pub content:    String,
   pub created_at: DateTime<Utc>,
   pub updated_at: DateTime<Utc>,
}

impl From<CommentView> for CommentDto {
   fn from(view: CommentView) -> Self {
      let comment = view.comment;
      Self {
         comment_id: comment.id().clone(),
         post_id:    comment.post_id().clone(),
         author_id:  comment.author_id().clone(),
         author:     view.author.as_ref().map(AuthorDto::from),
         content:    comment.content().to_string(),
         created_at: comment.created_at(),
         updated_at: comment.updated_at(),
      }
   }
}

/// 削除結果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCommentDto {
   pub comment_id: CommentId,
}

/// パスの投稿 ID とコメント ID を変換する
fn ids_from(post_id: &str, comment_id: &str) -> Result<(PostId, CommentId), ApiError> {
   Ok((
      parse_path_id("postId", post_id, PostId::parse)?,
      parse_path_id("commentId", comment_id, CommentId::parse)?,
   ))
}

// --- ハンドラ ---

/// GET /posts/{post_id}/comments
#[tracing::instrument(skip_all)]
pub async fn list_comments(
   State(state): State<Arc<CommentState>>,
   Path(post_id): Path<String>,
) -> Result<Response, ApiError> {
   let post_id = parse_path_id("postId", &post_id, PostId::parse)?;
   let views = state.usecase.list_comments(&post_id).await?;
   let items: Vec<CommentDto> = views.into_iter().map(CommentDto::from).collect();
   Ok(respond(SuccessCode::GetCommentsSuccess, items))
}

/// POST /posts/{post_id}/comments
#[tracing::instrument(skip_all)]
pub async fn create_comment(
   State(state): State<Arc<CommentState>>,
   CurrentUser(caller): CurrentUser,
   Path(post_id): Path<String>,
   ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> Result<Response, ApiError> {
   let post_id = parse_path_id("postId", &post_id, PostId::parse)?;
   let content = CommentContent::new(required("content", req.content)?)?;

   let view = state.usecase.create_comment(&caller, &post_id, content).await?;
   Ok(respond(SuccessCode::CommentCreated, CommentDto::from(view)))
}

/// PATCH /posts/{post_id}/comments/{comment_id}
#[tracing::instrument(skip_all)]
pub async fn update_comment(
   State(state): State<Arc<CommentState>>,
   CurrentUser(caller): CurrentUser,
   Path((post_id, comment_id)): Path<(String, String)>,
   ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> Result<Response, ApiError> {
   let (post_id, comment_id) = ids_from(&post_id, &comment_id)?;
   let content = CommentContent::new(required("content", req.content)?)?;

   let view = state
      .usecase
      .update_comment(&caller, &post_id, &comment_id, content)
      .await?;
   Ok(respond(SuccessCode::CommentUpdated, CommentDto::from(view)))
}

/// DELETE /posts/{post_id}/comments/{comment_id}
#[tracing::instrument(skip_all)]
pub async fn delete_comment(
   State(state): State<Arc<CommentState>>,
   CurrentUser(caller): CurrentUser,
   Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
   let (post_id, comment_id) = ids_from(&post_id, &comment_id)?;
   state
      .usecase
      .delete_comment(&caller, &post_id, &comment_id)
      .await?;
   Ok(respond(SuccessCode::CommentDeleted, DeleteCommentDto { comment_id }))
}
