//! # API サーバー設定
//!
//! 環境変数から API サーバーの設定を読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `API_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `API_PORT` | No | `8000` | ポート番号 |
//! | `SESSION_BACKEND` | No | `memory` | セッションストア（`memory` / `redis`） |
//! | `REDIS_URL` | `redis` のとき | - | Redis 接続 URL |
//! | `SESSION_TTL_SECONDS` | No | `86400` | セッション有効期限（秒） |
//! | `COOKIE_SECURE` | No | `false` | Cookie に `Secure` 属性を付けるか |
//!
//! 値の解釈は [`ApiConfig::from_lookup`] に集約し、テストでは環境変数を触らずに検証する。

use std::{env, time::Duration};

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_SESSION_TTL_SECONDS: u64 = 86_400;

/// 設定読み込みエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
   #[error("{0} が設定されていません")]
   Missing(&'static str),

   #[error("{name} の値が不正です: {value:?}")]
   Invalid { name: &'static str, value: String },
}

/// セッションストアの種類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
   /// プロセス内（既定）
   Memory,
   /// Redis
   Redis { url: String },
}

/// API サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
   /// バインドアドレス
   pub host:            String,
   /// ポート番号
   pub port:            u16,
   /// セッションストア
   pub session_backend: SessionBackend,
   /// セッション有効期限
   pub session_ttl:     Duration,
   /// Cookie の `Secure` 属性
   pub cookie_secure:   bool,
}

impl ApiConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|key| env::var(key).ok())
   }

   /// 任意のキー検索関数から設定を読み込む
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let host = lookup("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

      let port = match lookup("API_PORT") {
         Some(raw) => parse_port(&raw)?,
         None => DEFAULT_PORT,
      };

      let session_backend = match lookup("SESSION_BACKEND").as_deref() {
         None | Some("memory") => SessionBackend::Memory,
         Some("redis") => SessionBackend::Redis {
            url: lookup("REDIS_URL").ok_or(ConfigError::Missing("REDIS_URL"))?,
         },
         Some(other) => {
            return Err(ConfigError::Invalid {
               name:  "SESSION_BACKEND",
               value: other.to_string(),
            });
         }
      };

      let session_ttl = match lookup("SESSION_TTL_SECONDS") {
         Some(raw) => parse_ttl(&raw)?,
         None => Duration::from_secs(DEFAULT_SESSION_TTL_SECONDS),
      };

      let cookie_secure = match lookup("COOKIE_SECURE") {
         Some(raw) => parse_bool("COOKIE_SECURE", &raw)?,
         None => false,
      };

      Ok(Self {
         host,
         port,
         session_backend,
         session_ttl,
         cookie_secure,
      })
   }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
   raw.trim().parse().map_err(|_| ConfigError::Invalid {
      name:  "API_PORT",
      value: raw.to_string(),
   })
}

fn parse_ttl(raw: &str) -> Result<Duration, ConfigError> {
   match raw.trim().parse::<u64>() {
      Ok(seconds) if seconds > 0 => Ok(Duration::from_secs(seconds)),
      _ => Err(ConfigError::Invalid {
         name:  "SESSION_TTL_SECONDS",
         value: raw.to_string(),
      }),
   }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
   match raw.trim().to_ascii_lowercase().as_str() {
      "true" | "1" => Ok(true),
      "false" | "0" | "" => Ok(false),
      _ => Err(ConfigError::Invalid {
         name,
         value: raw.to_string(),
      }),
   }
}
