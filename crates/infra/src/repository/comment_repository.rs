//! # CommentRepository
//!
//! コメントの保存先。

use std::{cmp::Reverse, collections::HashMap};

use async_trait::async_trait;
use board_domain::{
   comment::{Comment, CommentId},
   post::PostId,
};
use tokio::sync::RwLock;

use crate::error::InfraError;

/// コメントリポジトリトレイト
#[async_trait]
pub trait CommentRepository: Send + Sync {
   async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, InfraError>;

   /// 投稿配下のコメントを新しい順に返す
   async fn find_by_post(&self, post_id: &PostId) -> Result<Vec<Comment>, InfraError>;

   /// 投稿ごとのコメント数（コメントの無い投稿は含まれない）
   async fn count_by_posts(&self, post_ids: &[PostId])
   -> Result<HashMap<PostId, usize>, InfraError>;

   async fn insert(&self, comment: &Comment) -> Result<(), InfraError>;

   /// コメントを置き換える（存在しなければ `Ok(false)`）
   async fn update(&self, comment: &Comment) -> Result<bool, InfraError>;

   /// コメントを削除する（存在しなければ `Ok(false)`）
   async fn delete(&self, id: &CommentId) -> Result<bool, InfraError>;

   /// 投稿配下のコメントをすべて削除し、削除件数を返す
   async fn delete_by_post(&self, post_id: &PostId) -> Result<usize, InfraError>;
}

/// インメモリ実装の CommentRepository
#[derive(Debug, Default)]
pub struct InMemoryCommentRepository {
   comments: RwLock<HashMap<CommentId, Comment>>,
}

impl InMemoryCommentRepository {
   pub fn new() -> Self {
      Self::default()
   }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
   async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, InfraError> {
      Ok(self.comments.read().await.get(id).cloned())
   }

   async fn find_by_post(&self, post_id: &PostId) -> Result<Vec<Comment>, InfraError> {
      let comments = self.comments.read().await;

      let mut found: Vec<Comment> = comments
         .values()
         .filter(|comment| comment.belongs_to(post_id))
         .cloned()
         .collect();
      found.sort_by_key(|comment| Reverse((comment.created_at(), comment.id().clone())));

      Ok(found)
   }

   async fn count_by_posts(
      &self,
      post_ids: &[PostId],
   ) -> Result<HashMap<PostId, usize>, InfraError> {
      let comments = self.comments.read().await;

      let mut counts = HashMap::new();
      for comment in comments.values() {
         if post_ids.contains(comment.post_id()) {
            *counts.entry(comment.post_id().clone()).or_insert(0) += 1;
         }
      }

      Ok(counts)
   }

   async fn insert(&self, comment: &Comment) -> Result<(), InfraError> {
      let mut comments = self.comments.write().await;
      if comments.contains_key(comment.id()) {
         return Err(InfraError::conflict("comment", "id", comment.id().to_string()));
      }
      comments.insert(comment.id().clone(), comment.clone());
      Ok(())
   }

   async fn update(&self, comment: &Comment) -> Result<bool, InfraError> {
      let mut comments = self.comments.write().await;
      match comments.get_mut(comment.id()) {
         Some(stored) => {
            *stored = comment.clone();
            Ok(true)
         }
         None => Ok(false),
      }
   }

   async fn delete(&self, id: &CommentId) -> Result<bool, InfraError> {
      Ok(self.comments.write().await.remove(id).is_some())
   }

   async fn delete_by_post(&self, post_id: &PostId) -> Result<usize, InfraError> {
      let mut comments = self.comments.write().await;
      let before = comments.len();
      comments.retain(|_, comment| !comment.belongs_to(post_id));
      Ok(before - comments.len())
   }
}

#[cfg(test)]
mod tests {
   use board_domain::{comment::CommentContent, user::UserId};
   use chrono::{DateTime, Duration, Utc};
   use pretty_assertions::assert_eq;

   use super::*;

   fn comment(post_id: &PostId, content: &str, created_at: DateTime<Utc>) -> Comment {
      Comment::new(
         CommentId::new(),
         post_id.clone(),
         UserId::new(),
         CommentContent::new(content).unwrap(),
         created_at,
      )
   }

   #[tokio::test]
   async fn test_find_by_postは投稿配下のみを新しい順に返す() {
      let repo = InMemoryCommentRepository::new();
      let post_id = PostId::new();
      let other_post = PostId::new();
      let base = Utc::now();
      repo.insert(&comment(&post_id, "古い", base)).await.unwrap();
      repo.insert(&comment(&post_id, "新しい", base + Duration::seconds(1)))
         .await
         .unwrap();
      repo.insert(&comment(&other_post, "別の投稿", base)).await.unwrap();

      let found = repo.find_by_post(&post_id).await.unwrap();
      let contents: Vec<_> = found.iter().map(|c| c.content().as_str()).collect();

      assert_eq!(contents, vec!["新しい", "古い"]);
   }

   #[tokio::test]
   async fn test_delete_by_postは投稿配下のコメントだけを消す() {
      let repo = InMemoryCommentRepository::new();
      let post_id = PostId::new();
      let other_post = PostId::new();
      let now = Utc::now();
      repo.insert(&comment(&post_id, "a", now)).await.unwrap();
      repo.insert(&comment(&post_id, "b", now)).await.unwrap();
      repo.insert(&comment(&other_post, "c", now)).await.unwrap();

      let deleted = repo.delete_by_post(&post_id).await.unwrap();

      assert_eq!(deleted, 2);
      assert!(repo.find_by_post(&post_id).await.unwrap().is_empty());
      let counts = repo
         .count_by_posts(&[post_id.clone(), other_post.clone()])
         .await
         .unwrap();
      assert_eq!(counts.get(&other_post), Some(&1));
      assert_eq!(counts.get(&post_id), None);
   }
}
