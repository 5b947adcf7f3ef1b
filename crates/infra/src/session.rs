//! # セッション管理
//!
//! Cookie の `session_id` をキーにしたセッションストア。
//!
//! | 実装 | 用途 |
//! |------|------|
//! | [`InMemorySessionManager`] | 既定。単一プロセス向け |
//! | [`RedisSessionManager`] | 複数プロセスでセッションを共有する場合 |
//!
//! ## Redis キー設計
//!
//! | キー | 値 | TTL |
//! |-----|-----|-----|
//! | `session:{session_id}` | SessionData (JSON) | 設定値（既定 86400 秒） |
//! | `user_sessions:{user_id}` | セッション ID の SET | 同上（作成のたびに延長） |
//!
//! ## 退会時の削除
//!
//! `delete_all_for_user` でユーザーのセッションをすべて削除する。

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use board_domain::user::{Identity, UserId};
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::InfraError;

/// セッションデータ
///
/// ログイン成功時に作成される。ユーザー ID に加えて表示用の項目を複製して持つ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
   user_id: UserId,
   email: String,
   nickname: String,
   profile_image_url: Option<String>,
   created_at: DateTime<Utc>,
   last_accessed_at: DateTime<Utc>,
}

impl SessionData {
   pub fn new(identity: &Identity, now: DateTime<Utc>) -> Self {
      Self {
         user_id: identity.id.clone(),
         email: identity.email.to_string(),
         nickname: identity.nickname.to_string(),
         profile_image_url: identity.profile_image_url.clone(),
         created_at: now,
         last_accessed_at: now,
      }
   }

   pub fn user_id(&self) -> &UserId {
      &self.user_id
   }

   pub fn email(&self) -> &str {
      &self.email
   }

   pub fn nickname(&self) -> &str {
      &self.nickname
   }

   pub fn profile_image_url(&self) -> Option<&str> {
      self.profile_image_url.as_deref()
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   pub fn last_accessed_at(&self) -> DateTime<Utc> {
      self.last_accessed_at
   }
}

/// セッション管理トレイト
#[async_trait]
pub trait SessionManager: Send + Sync {
   /// セッションを作成し、セッション ID（UUID v4）を返す
   async fn create(&self, data: &SessionData) -> Result<String, InfraError>;

   /// セッションを取得する（期限切れ・未登録は `None`）
   async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError>;

   /// セッションを削除する
   ///
   /// 存在しないセッションを削除しても成功とする。
   async fn delete(&self, session_id: &str) -> Result<(), InfraError>;

   /// ユーザーの全セッションを削除する（退会時）
   async fn delete_all_for_user(&self, user_id: &UserId) -> Result<(), InfraError>;
}

// ===== インメモリ実装 =====

#[derive(Debug, Clone)]
struct StoredSession {
   data: SessionData,
   expires_at: DateTime<Utc>,
}

/// インメモリのセッションマネージャ
#[derive(Debug)]
pub struct InMemorySessionManager {
   ttl: chrono::Duration,
   sessions: RwLock<HashMap<String, StoredSession>>,
}

impl InMemorySessionManager {
   pub fn new(ttl: Duration) -> Self {
      Self {
         ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
         sessions: RwLock::new(HashMap::new()),
      }
   }
}

#[async_trait]
impl SessionManager for InMemorySessionManager {
   /// 新しいセッションを保存する
   ///
   /// 保存のついでに期限切れのセッションを掃除する。
   async fn create(&self, data: &SessionData) -> Result<String, InfraError> {
      let session_id = Uuid::new_v4().to_string();
      let now = Utc::now();
      let expires_at = now
         .checked_add_signed(self.ttl)
         .unwrap_or(DateTime::<Utc>::MAX_UTC);

      let mut sessions = self.sessions.write().await;
      sessions.retain(|_, stored| stored.expires_at > now);
      sessions.insert(
         session_id.clone(),
         StoredSession {
            data: data.clone(),
            expires_at,
         },
      );

      Ok(session_id)
   }

   async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError> {
      let now = Utc::now();
      let mut sessions = self.sessions.write().await;

      match sessions.get_mut(session_id) {
         Some(stored) if stored.expires_at > now => {
            stored.data.last_accessed_at = now;
            Ok(Some(stored.data.clone()))
         }
         Some(_) => {
            sessions.remove(session_id);
            Ok(None)
         }
         None => Ok(None),
      }
   }

   async fn delete(&self, session_id: &str) -> Result<(), InfraError> {
      self.sessions.write().await.remove(session_id);
      Ok(())
   }

   async fn delete_all_for_user(&self, user_id: &UserId) -> Result<(), InfraError> {
      self.sessions
         .write()
         .await
         .retain(|_, stored| stored.data.user_id() != user_id);
      Ok(())
   }
}

// ===== Redis 実装 =====

/// Redis を使用したセッションマネージャ
pub struct RedisSessionManager {
   conn: ConnectionManager,
   ttl_seconds: u64,
}

impl RedisSessionManager {
   /// - `redis_url`: Redis 接続 URL（例: `redis://localhost:6379`）
   pub async fn new(redis_url: &str, ttl: Duration) -> Result<Self, InfraError> {
      let client = redis::Client::open(redis_url)?;
      let conn = ConnectionManager::new(client).await?;
      Ok(Self {
         conn,
         ttl_seconds: ttl.as_secs().max(1),
      })
   }

   fn session_key(session_id: &str) -> String {
      format!("session:{session_id}")
   }

   fn user_sessions_key(user_id: &UserId) -> String {
      format!("user_sessions:{}", user_id.as_uuid())
   }
}

#[async_trait]
impl SessionManager for RedisSessionManager {
   async fn create(&self, data: &SessionData) -> Result<String, InfraError> {
      // UUID v4 でセッション ID を生成（暗号論的に安全なランダム値）
      let session_id = Uuid::new_v4().to_string();
      let json = serde_json::to_string(data)?;
      let index_key = Self::user_sessions_key(data.user_id());

      let mut conn = self.conn.clone();
      let _: () = redis::pipe()
         .atomic()
         .set_ex(Self::session_key(&session_id), json, self.ttl_seconds)
         .sadd(&index_key, &session_id)
         .expire(&index_key, self.ttl_seconds as i64)
         .query_async(&mut conn)
         .await?;

      Ok(session_id)
   }

   async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError> {
      let mut conn = self.conn.clone();
      let result: Option<String> = conn.get(Self::session_key(session_id)).await?;

      match result {
         Some(json) => Ok(Some(serde_json::from_str(&json)?)),
         None => Ok(None),
      }
   }

   async fn delete(&self, session_id: &str) -> Result<(), InfraError> {
      let mut conn = self.conn.clone();
      let _: () = conn.del(Self::session_key(session_id)).await?;
      Ok(())
   }

   async fn delete_all_for_user(&self, user_id: &UserId) -> Result<(), InfraError> {
      let index_key = Self::user_sessions_key(user_id);
      let mut conn = self.conn.clone();

      let session_ids: Vec<String> = conn.smembers(&index_key).await?;
      let mut keys: Vec<String> = session_ids.iter().map(|id| Self::session_key(id)).collect();
      keys.push(index_key);

      let _: () = conn.del(&keys).await?;
      tracing::debug!(user_id = %user_id, count = session_ids.len(), "ユーザーのセッションを削除");
      Ok(())
   }
}
