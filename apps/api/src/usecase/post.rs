//! 投稿ユースケース
//!
//! 一覧・詳細は誰でも参照できる。作成といいねはログインが必要で、
//! 更新・削除は作成者に限る。

use std::sync::Arc;

use board_domain::{
   clock::Clock,
   ownership::authorize_owner,
   post::{LikeStatus, Post, PostContent, PostEdit, PostId, PostTitle},
   user::{Identity, User},
};
use board_infra::repository::{CommentRepository, PostRepository, UserRepository};
use board_shared::{ErrorCode, PageMeta};

use super::helpers::{FindResultExt, load_authors};
use crate::error::ApiError;

/// 投稿作成の入力
#[derive(Debug)]
pub struct CreatePostInput {
   pub title:     PostTitle,
   pub content:   PostContent,
   pub image_url: Option<String>,
}

/// 表示用の投稿
///
/// 作成者は参照時点で解決する。退会済みの場合は `None`。
#[derive(Debug, Clone)]
pub struct PostView {
   pub post:          Post,
   pub author:        Option<User>,
   pub comment_count: usize,
}

/// 投稿ユースケース
pub struct PostUseCaseImpl {
   post_repository:    Arc<dyn PostRepository>,
   comment_repository: Arc<dyn CommentRepository>,
   user_repository:    Arc<dyn UserRepository>,
   clock:              Arc<dyn Clock>,
}

impl PostUseCaseImpl {
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

   /// 新しい順に一覧を取得する
   pub async fn list_posts(
      &self,
      offset: usize,
      limit: usize,
   ) -> Result<(Vec<PostView>, PageMeta), ApiError> {
      let (posts, total) = self.post_repository.find_page(offset, limit).await?;

      let post_ids: Vec<PostId> = posts.iter().map(|post| post.id().clone()).collect();
      let counts = self.comment_repository.count_by_posts(&post_ids).await?;
      let authors =
         load_authors(self.user_repository.as_ref(), posts.iter().map(Post::author_id)).await?;

      let views = posts
         .into_iter()
         .map(|post| PostView {
            author: authors.get(post.author_id()).cloned(),
            comment_count: counts.get(post.id()).copied().unwrap_or(0),
            post,
         })
         .collect();

      Ok((views, PageMeta::new(total, offset, limit)))
   }

   pub async fn get_post(&self, post_id: &PostId) -> Result<PostView, ApiError> {
      let post = self.find_post(post_id).await?;
      self.to_view(post).await
   }

   pub async fn create_post(
      &self,
      caller: &Identity,
      input: CreatePostInput,
   ) -> Result<PostView, ApiError> {
      let post = Post::new(
         PostId::new(),
         caller.id.clone(),
         input.title,
         input.content,
         input.image_url,
         self.clock.now(),
      );
      self.post_repository.insert(&post).await?;
      tracing::info!(post_id = %post.id(), author_id = %caller.id, "投稿を作成");

      self.to_view(post).await
   }

   /// 投稿を部分更新する（作成者のみ）
   pub async fn update_post(
      &self,
      caller: &Identity,
      post_id: &PostId,
      edit: PostEdit,
   ) -> Result<PostView, ApiError> {
      let post = self.find_post(post_id).await?;
      authorize_owner(&post, &caller.id)?;

      let updated = self
         .post_repository
         .edit(post_id, edit, self.clock.now())
         .await
         .or_not_found(ErrorCode::PostNotFound, "post", post_id)?;

      self.to_view(updated).await
   }

   /// 投稿を削除する（作成者のみ）
   ///
   /// 配下のコメントも削除する。投稿を先に消すことで、
   /// 並行して追加されたコメントは追加側の再確認で取り消される。
   pub async fn delete_post(&self, caller: &Identity, post_id: &PostId) -> Result<(), ApiError> {
      let post = self.find_post(post_id).await?;
      authorize_owner(&post, &caller.id)?;

      self.post_repository.delete(post_id).await?;
      let removed_comments = self.comment_repository.delete_by_post(post_id).await?;

      tracing::info!(post_id = %post_id, removed_comments, "投稿を削除");
      Ok(())
   }

   /// いいねを切り替える
   pub async fn toggle_like(
      &self,
      caller: &Identity,
      post_id: &PostId,
   ) -> Result<LikeStatus, ApiError> {
      self.post_repository
         .toggle_like(post_id, &caller.id)
         .await
         .or_not_found(ErrorCode::PostNotFound, "post", post_id)
   }

   async fn find_post(&self, post_id: &PostId) -> Result<Post, ApiError> {
      self.post_repository
         .find_by_id(post_id)
         .await
         .or_not_found(ErrorCode::PostNotFound, "post", post_id)
   }

   async fn to_view(&self, post: Post) -> Result<PostView, ApiError> {
      let author = self.user_repository.find_by_id(post.author_id()).await?;
      let comment_count = self
         .comment_repository
         .count_by_posts(std::slice::from_ref(post.id()))
         .await?
         .get(post.id())
         .copied()
         .unwrap_or(0);

      Ok(PostView {
         post,
         author,
         comment_count,
      })
   }
}
