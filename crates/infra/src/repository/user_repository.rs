//! # UserRepository
//!
//! ユーザーの保存先。メールアドレスとニックネームの一意性を
//! 書き込みロック内で保証する。

use std::collections::HashMap;

use async_trait::async_trait;
use board_domain::user::{Email, Nickname, User, UserEdit, UserId};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::InfraError;

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
   async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError>;

   async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError>;

   /// 複数の ID でユーザーを一括検索する
   ///
   /// 存在しない ID は無視する。
   async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, InfraError>;

   /// ニックネームが使用済みか
   ///
   /// `except` に指定したユーザー自身の使用は数えない。
   async fn nickname_exists(
      &self,
      nickname: &Nickname,
      except: Option<&UserId>,
   ) -> Result<bool, InfraError>;

   /// ユーザーを追加する
   ///
   /// メールアドレスまたはニックネームが重複していれば `Conflict`。
   async fn insert(&self, user: &User) -> Result<(), InfraError>;

   /// 最新のレコードに更新内容を適用して保存する
   ///
   /// 他のユーザーとニックネームが重複していれば `Conflict`。
   /// 対象が存在しなければ `Ok(None)`。
   async fn edit(
      &self,
      id: &UserId,
      edit: UserEdit,
      now: DateTime<Utc>,
   ) -> Result<Option<User>, InfraError>;

   /// ユーザーを削除する（存在しなければ `Ok(false)`）
   async fn delete(&self, id: &UserId) -> Result<bool, InfraError>;
}

/// インメモリ実装の UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
   users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
   pub fn new() -> Self {
      Self::default()
   }
}

fn nickname_taken(users: &HashMap<UserId, User>, nickname: &Nickname, except: Option<&UserId>) -> bool {
   users
      .values()
      .any(|user| user.nickname() == nickname && Some(user.id()) != except)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
   async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
      Ok(self.users.read().await.get(id).cloned())
   }

   async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError> {
      let users = self.users.read().await;
      Ok(users.values().find(|user| user.email() == email).cloned())
   }

   async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, InfraError> {
      let users = self.users.read().await;
      Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
   }

   async fn nickname_exists(
      &self,
      nickname: &Nickname,
      except: Option<&UserId>,
   ) -> Result<bool, InfraError> {
      Ok(nickname_taken(&*self.users.read().await, nickname, except))
   }

   async fn insert(&self, user: &User) -> Result<(), InfraError> {
      let mut users = self.users.write().await;

      if users.values().any(|existing| existing.email() == user.email()) {
         return Err(InfraError::conflict("user", "email", user.email().as_str()));
      }
      if nickname_taken(&users, user.nickname(), None) {
         return Err(InfraError::conflict("user", "nickname", user.nickname().as_str()));
      }

      users.insert(user.id().clone(), user.clone());
      Ok(())
   }

   async fn edit(
      &self,
      id: &UserId,
      edit: UserEdit,
      now: DateTime<Utc>,
   ) -> Result<Option<User>, InfraError> {
      let mut users = self.users.write().await;
      let Some(current) = users.get(id) else {
         return Ok(None);
      };

      let edited = current.clone().edited(edit, now);
      if nickname_taken(&users, edited.nickname(), Some(id)) {
         return Err(InfraError::conflict("user", "nickname", edited.nickname().as_str()));
      }

      users.insert(id.clone(), edited.clone());
      Ok(Some(edited))
   }

   async fn delete(&self, id: &UserId) -> Result<bool, InfraError> {
      Ok(self.users.write().await.remove(id).is_some())
   }
}

#[cfg(test)]
mod tests {
   use std::sync::Arc;

   use board_domain::password::PasswordHash;
   use pretty_assertions::assert_eq;

   use super::*;

   fn user(email: &str, nickname: &str) -> User {
      User::new(
         UserId::new(),
         Email::new(email).unwrap(),
         Nickname::new(nickname).unwrap(),
         None,
         PasswordHash::new("hash"),
         Utc::now(),
      )
   }

   #[tokio::test]
   async fn test_insertしたユーザーをidとメールアドレスで取得できる() {
      let repo = InMemoryUserRepository::new();
      let alice = user("alice@example.com", "alice");

      repo.insert(&alice).await.unwrap();

      assert_eq!(repo.find_by_id(alice.id()).await.unwrap(), Some(alice.clone()));
      assert_eq!(
         repo.find_by_email(alice.email()).await.unwrap(),
         Some(alice.clone())
      );
      assert!(repo.nickname_exists(alice.nickname(), None).await.unwrap());
      assert!(!repo.nickname_exists(alice.nickname(), Some(alice.id())).await.unwrap());
   }

   #[tokio::test]
   async fn test_重複したメールアドレスはconflictになる() {
      let repo = InMemoryUserRepository::new();
      repo.insert(&user("a@x.com", "first")).await.unwrap();

      let err = repo.insert(&user("a@x.com", "second")).await.unwrap_err();

      assert_eq!(err.as_conflict(), Some(("user", "email", "a@x.com")));
   }

   #[tokio::test]
   async fn test_重複したニックネームはconflictになる() {
      let repo = InMemoryUserRepository::new();
      repo.insert(&user("a@x.com", "taro")).await.unwrap();
      let other = user("b@x.com", "hanako");
      repo.insert(&other).await.unwrap();

      let rename = UserEdit::Profile {
         nickname:          Some(Nickname::new("taro").unwrap()),
         profile_image_url: None,
      };
      let err = repo.edit(other.id(), rename, Utc::now()).await.unwrap_err();

      assert_eq!(err.as_conflict(), Some(("user", "nickname", "taro")));
   }

   #[tokio::test]
   async fn test_同時登録でも同じメールアドレスは一件だけ保存される() {
      let repo = Arc::new(InMemoryUserRepository::new());

      let handles: Vec<_> = (0..8)
         .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.insert(&user("same@x.com", &format!("nick{i}"))).await })
         })
         .collect();

      let mut succeeded = 0;
      for handle in handles {
         if handle.await.unwrap().is_ok() {
            succeeded += 1;
         }
      }

      assert_eq!(succeeded, 1);
   }

   #[tokio::test]
   async fn test_deleteは存在有無を返す() {
      let repo = InMemoryUserRepository::new();
      let alice = user("alice@example.com", "alice");
      repo.insert(&alice).await.unwrap();

      assert!(repo.delete(alice.id()).await.unwrap());
      assert!(!repo.delete(alice.id()).await.unwrap());
      assert!(repo.find_by_ids(&[alice.id().clone()]).await.unwrap().is_empty());
   }

   #[tokio::test]
   async fn test_editは最新のレコードに適用され同時の更新を失わない() {
      let repo = Arc::new(InMemoryUserRepository::new());
      let alice = user("alice@example.com", "alice");
      repo.insert(&alice).await.unwrap();

      let rename = {
         let repo = Arc::clone(&repo);
         let id = alice.id().clone();
         tokio::spawn(async move {
            let edit = UserEdit::Profile {
               nickname:          Some(Nickname::new("alice2").unwrap()),
               profile_image_url: None,
            };
            repo.edit(&id, edit, Utc::now()).await
         })
      };
      let rehash = {
         let repo = Arc::clone(&repo);
         let id = alice.id().clone();
         tokio::spawn(async move {
            repo.edit(&id, UserEdit::Password(PasswordHash::new("new-hash")), Utc::now())
               .await
         })
      };
      rename.await.unwrap().unwrap();
      rehash.await.unwrap().unwrap();

      let stored = repo.find_by_id(alice.id()).await.unwrap().unwrap();
      assert_eq!(stored.nickname().as_str(), "alice2");
      assert_eq!(stored.password_hash(), &PasswordHash::new("new-hash"));
   }

   #[tokio::test]
   async fn test_editは存在しないユーザーでnoneを返す() {
      let repo = InMemoryUserRepository::new();

      let result = repo
         .edit(&UserId::new(), UserEdit::Password(PasswordHash::new("h")), Utc::now())
         .await
         .unwrap();

      assert!(result.is_none());
   }
}
