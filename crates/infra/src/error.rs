//! # インフラ層エラー定義
//!
//! ストアやセッションストアとのやり取りで発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **エラーの変換**: `redis::RedisError`, `serde_json::Error` をラップ
//! - **ドメインエラーとの分離**: インフラ固有のエラーを明示し、API 層で分類する
//! - **SpanTrace 自動捕捉**: `From` 実装や convenience constructor で
//!   エラー生成時の呼び出し経路を記録する
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターン:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) か
/// [`as_conflict()`](InfraError::as_conflict) を使う。
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// Redis への接続失敗、コマンド実行エラーなど
    #[error("Redis エラー: {0}")]
    Redis(#[source] redis::RedisError),

    /// JSON の変換失敗
    #[error("シリアライズエラー: {0}")]
    Serialization(#[source] serde_json::Error),

    /// 一意制約違反
    ///
    /// 書き込みロック内の再チェックで検出した重複。
    #[error("一意制約違反: {entity}.{field}={value}")]
    Conflict {
        /// エンティティ名（例: "user"）
        entity: String,
        /// 重複したフィールド（例: "email"）
        field:  String,
        /// 重複した値
        value:  String,
    },

    /// 上記に分類できない予期しないエラー
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

// ===== InfraError のメソッド =====

impl InfraError {
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// Conflict の場合、(entity, field, value) を返す
    pub fn as_conflict(&self) -> Option<(&str, &str, &str)> {
        match &self.kind {
            InfraErrorKind::Conflict {
                entity,
                field,
                value,
            } => Some((entity, field, value)),
            _ => None,
        }
    }

    /// ログ用の種別名
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            InfraErrorKind::Redis(_) => "redis",
            InfraErrorKind::Serialization(_) => "serialization",
            InfraErrorKind::Conflict { .. } => "conflict",
            InfraErrorKind::Unexpected(_) => "unexpected",
        }
    }

    // ===== Convenience constructors =====

    /// 一意制約違反エラーを生成する
    pub fn conflict(
        entity: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            kind:       InfraErrorKind::Conflict {
                entity: entity.into(),
                field:  field.into(),
                value:  value.into(),
            },
            span_trace: SpanTrace::capture(),
        }
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<redis::RedisError> for InfraError {
    fn from(source: redis::RedisError) -> Self {
        Self {
            kind:       InfraErrorKind::Redis(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(source: serde_json::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Serialization(source),
            span_trace: SpanTrace::capture(),
        }
    }
}
