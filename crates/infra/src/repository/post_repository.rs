//! # PostRepository
//!
//! 投稿の保存先。部分更新といいねの切り替えは書き込みロック内で
//! 読み出しから書き戻しまでを行う。

use std::{cmp::Reverse, collections::HashMap};

use async_trait::async_trait;
use board_domain::{
   post::{LikeStatus, Post, PostEdit, PostId},
   user::UserId,
};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::InfraError;

/// 投稿リポジトリトレイト
#[async_trait]
pub trait PostRepository: Send + Sync {
   async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, InfraError>;

   /// 新しい順に `offset` 件飛ばして最大 `limit` 件返す
   ///
   /// 戻り値の 2 番目は全件数。
   async fn find_page(&self, offset: usize, limit: usize) -> Result<(Vec<Post>, usize), InfraError>;

   async fn insert(&self, post: &Post) -> Result<(), InfraError>;

   /// 部分更新する（存在しなければ `Ok(None)`）
   async fn edit(
      &self,
      id: &PostId,
      edit: PostEdit,
      now: DateTime<Utc>,
   ) -> Result<Option<Post>, InfraError>;

   /// いいねを切り替える（存在しなければ `Ok(None)`）
   async fn toggle_like(
      &self,
      id: &PostId,
      user_id: &UserId,
   ) -> Result<Option<LikeStatus>, InfraError>;

   /// 投稿を削除する（存在しなければ `Ok(false)`）
   async fn delete(&self, id: &PostId) -> Result<bool, InfraError>;
}

/// インメモリ実装の PostRepository
#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
   posts: RwLock<HashMap<PostId, Post>>,
}

impl InMemoryPostRepository {
   pub fn new() -> Self {
      Self::default()
   }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
   async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, InfraError> {
      Ok(self.posts.read().await.get(id).cloned())
   }

   async fn find_page(&self, offset: usize, limit: usize) -> Result<(Vec<Post>, usize), InfraError> {
      let posts = self.posts.read().await;

      let mut sorted: Vec<&Post> = posts.values().collect();
      sorted.sort_by_key(|post| Reverse((post.created_at(), post.id().clone())));

      let page = sorted
         .into_iter()
         .skip(offset)
         .take(limit)
         .cloned()
         .collect();

      Ok((page, posts.len()))
   }

   async fn insert(&self, post: &Post) -> Result<(), InfraError> {
      let mut posts = self.posts.write().await;
      if posts.contains_key(post.id()) {
         return Err(InfraError::conflict("post", "id", post.id().to_string()));
      }
      posts.insert(post.id().clone(), post.clone());
      Ok(())
   }

   async fn edit(
      &self,
      id: &PostId,
      edit: PostEdit,
      now: DateTime<Utc>,
   ) -> Result<Option<Post>, InfraError> {
      let mut posts = self.posts.write().await;
      let Some(current) = posts.remove(id) else {
         return Ok(None);
      };

      let edited = current.edited(edit, now);
      posts.insert(id.clone(), edited.clone());
      Ok(Some(edited))
   }

   async fn toggle_like(
      &self,
      id: &PostId,
      user_id: &UserId,
   ) -> Result<Option<LikeStatus>, InfraError> {
      let mut posts = self.posts.write().await;
      Ok(posts.get_mut(id).map(|post| post.toggle_like(user_id)))
   }

   async fn delete(&self, id: &PostId) -> Result<bool, InfraError> {
      Ok(self.posts.write().await.remove(id).is_some())
   }
}

#[cfg(test)]
mod tests {
   use std::sync::Arc;

   use board_domain::post::{PostContent, PostTitle};
   use chrono::Duration;
   use pretty_assertions::assert_eq;

   use super::*;

   fn post_at(created_at: DateTime<Utc>, title: &str) -> Post {
      Post::new(
         PostId::new(),
         UserId::new(),
         PostTitle::new(title).unwrap(),
         PostContent::new("本文").unwrap(),
         None,
         created_at,
      )
   }

   #[tokio::test]
   async fn test_find_pageは新しい順にページを返す() {
      let repo = InMemoryPostRepository::new();
      let base = Utc::now();
      for i in 0..5 {
         repo.insert(&post_at(base + Duration::seconds(i), &format!("post{i}")))
            .await
            .unwrap();
      }

      let (page, total) = repo.find_page(1, 2).await.unwrap();
      let titles: Vec<_> = page.iter().map(|p| p.title().as_str()).collect();

      assert_eq!(total, 5);
      assert_eq!(titles, vec!["post3", "post2"]);
   }

   #[tokio::test]
   async fn test_editは存在しない投稿でnoneを返す() {
      let repo = InMemoryPostRepository::new();

      let result = repo
         .edit(&PostId::new(), PostEdit::default(), Utc::now())
         .await
         .unwrap();

      assert!(result.is_none());
   }

   #[tokio::test]
   async fn test_同時のいいね切り替えが失われない() {
      let repo = Arc::new(InMemoryPostRepository::new());
      let post = post_at(Utc::now(), "人気の投稿");
      repo.insert(&post).await.unwrap();

      let handles: Vec<_> = (0..10)
         .map(|_| {
            let repo = Arc::clone(&repo);
            let id = post.id().clone();
            tokio::spawn(async move { repo.toggle_like(&id, &UserId::new()).await })
         })
         .collect();
      for handle in handles {
         handle.await.unwrap().unwrap();
      }

      let stored = repo.find_by_id(post.id()).await.unwrap().unwrap();
      assert_eq!(stored.like_count(), 10);
   }

   #[tokio::test]
   async fn test_editはいいねを保持する() {
      let repo = InMemoryPostRepository::new();
      let post = post_at(Utc::now(), "タイトル");
      repo.insert(&post).await.unwrap();
      repo.toggle_like(post.id(), &UserId::new()).await.unwrap();

      let edited = repo
         .edit(
            post.id(),
            PostEdit {
               title: Some(PostTitle::new("変更後").unwrap()),
               ..Default::default()
            },
            Utc::now(),
         )
         .await
         .unwrap()
         .unwrap();

      assert_eq!(edited.like_count(), 1);
      assert_eq!(edited.author_id(), post.author_id());
   }
}
