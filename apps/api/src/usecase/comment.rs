//! コメントユースケース
//!
//! コメントは常に投稿の配下として扱う。更新・削除の確認順序は
//! 投稿の存在 → コメントの存在 → 投稿とコメントの対応 → 所有者。
//! 別の投稿に属するコメントは、存在しないコメントと同じ `COMMENT_NOT_FOUND` になる。

use std::sync::Arc;

use board_domain::{
   DomainError,
   clock::Clock,
   comment::{Comment, CommentContent, CommentId},
   ownership::authorize_owner,
   post::PostId,
   user::{Identity, User},
};
use board_infra::repository::{CommentRepository, PostRepository, UserRepository};
use board_shared::ErrorCode;

use super::helpers::{FindResultExt, load_authors};
use crate::error::ApiError;

/// 表示用のコメント
#[derive(Debug, Clone)]
pub struct CommentView {
   pub comment: Comment,
   pub author:  Option<User>,
}

/// コメントユースケース
pub struct CommentUseCaseImpl {
   post_repository:    Arc<dyn PostRepository>,
   comment_repository: Arc<dyn CommentRepository>,
   user_repository:    Arc<dyn UserRepository>,
   clock:              Arc<dyn Clock>,
}

impl CommentUseCaseImpl {
   pub fn new(
      post_repository: Arc<dyn PostRepository>,
      comment_repository: Arc<dyn CommentRepository>,
      user_repository: Arc<dyn UserRepository>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         post_repository,
         comment_repository,
         user_repository,
         clock,
      }
   }

   /// 投稿のコメントを新しい順に取得する
   pub async fn list_comments(&self, post_id: &PostId) -> Result<Vec<CommentView>, ApiError> {
      self.ensure_post_exists(post_id).await?;

      let comments = self.comment_repository.find_by_post(post_id).await?;
      let authors = load_authors(
         self.user_repository.as_ref(),
         comments.iter().map(Comment::author_id),
      )
      .await?;

      Ok(comments
         .into_iter()
         .map(|comment| CommentView {
            author: authors.get(comment.author_id()).cloned(),
            comment,
         })
         .collect())
   }

   /// コメントを追加する
   ///
   /// 投稿の削除と並行した場合でも、削除済みの投稿の配下にコメントを残さない。
   pub async fn create_comment(
      &self,
      caller: &Identity,
      post_id: &PostId,
      content: CommentContent,
   ) -> Result<CommentView, ApiError> {
      self.ensure_post_exists(post_id).await?;

      let comment = Comment::new(
         CommentId::new(),
         post_id.clone(),
         caller.id.clone(),
         content,
         self.clock.now(),
      );
      self.comment_repository.insert(&comment).await?;

      // 確認から追加までの間に投稿が削除されていれば取り消す
      if let Err(e) = self.ensure_post_exists(post_id).await {
         self.comment_repository.delete(comment.id()).await?;
         return Err(e);
      }
      tracing::info!(comment_id = %comment.id(), post_id = %post_id, "コメントを作成");

      self.to_view(comment).await
   }

   /// コメントを更新する（作成者のみ）
   pub async fn update_comment(
      &self,
      caller: &Identity,
      post_id: &PostId,
      comment_id: &CommentId,
      content: CommentContent,
   ) -> Result<CommentView, ApiError> {
      let comment = self.load_own(caller, post_id, comment_id).await?;

      let updated = comment.edited(content, self.clock.now());
      if !self.comment_repository.update(&updated).await? {
         return Err(comment_not_found(comment_id).into());
      }

      self.to_view(updated).await
   }

   /// コメントを削除する（作成者のみ）
   pub async fn delete_comment(
      &self,
      caller: &Identity,
      post_id: &PostId,
      comment_id: &CommentId,
   ) -> Result<(), ApiError> {
      self.load_own(caller, post_id, comment_id).await?;

      self.comment_repository.delete(comment_id).await?;
      tracing::info!(comment_id = %comment_id, post_id = %post_id, "コメントを削除");
      Ok(())
   }

   async fn ensure_post_exists(&self, post_id: &PostId) -> Result<(), ApiError> {
      self.post_repository
         .find_by_id(post_id)
         .await
         .or_not_found(ErrorCode::PostNotFound, "post", post_id)
         .map(|_| ())
   }

   async fn load_own(
      &self,
      caller: &Identity,
      post_id: &PostId,
      comment_id: &CommentId,
   ) -> Result<Comment, ApiError> {
      self.ensure_post_exists(post_id).await?;

      let comment = self
         .comment_repository
         .find_by_id(comment_id)
         .await?
         .filter(|comment| comment.belongs_to(post_id))
         .ok_or_else(|| comment_not_found(comment_id))?;

      authorize_owner(&comment, &caller.id)?;
      Ok(comment)
   }

   async fn to_view(&self, comment: Comment) -> Result<CommentView, ApiError> {
      let author = self.user_repository.find_by_id(comment.author_id()).await?;
      Ok(CommentView { comment, author })
   }
}

fn comment_not_found(comment_id: &CommentId) -> DomainError {
   DomainError::not_found(ErrorCode::CommentNotFound, "comment", comment_id.to_string())
}
