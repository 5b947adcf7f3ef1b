//! # エラー詳細
//!
//! エラーレスポンスの `details` に載せる構造化情報。
//!
//! | 形状 | 用途 |
//! |------|------|
//! | `{}` | 詳細なし |
//! | `{ "field", "value" }` | 重複したメールアドレスなど、値そのものが原因のとき |
//! | `{ "field", "reason" }` | ドメイン側で検出した入力不備 |
//! | `{ "resource", "id" }` | 対象リソースの特定 |
//! | `{ "<field>": ["TAG", ...] }` | リクエスト形状の検証エラー（フィールド単位） |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 検証エラーのタグ（固定語彙）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationTag {
    Required,
    TooLong,
    TooShort,
    InvalidFormat,
}

/// フィールド名ごとにまとめた検証エラー
///
/// 同じフィールドに同じタグが重複して積まれることはない。
/// フィールドの並びは名前順で安定する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<ValidationTag>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// タグを追加する（既に同じタグがあれば何もしない）
    pub fn push(&mut self, field: impl Into<String>, tag: ValidationTag) {
        let tags = self.0.entry(field.into()).or_default();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    /// 単一フィールド・単一タグのエラーを作る
    pub fn single(field: impl Into<String>, tag: ValidationTag) -> Self {
        let mut errors = Self::new();
        errors.push(field, tag);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[ValidationTag]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// エラー詳細
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "ReceivedDetails")]
pub enum ErrorDetails {
    /// 原因となった値
    Field { field: String, value: String },
    /// 入力不備の理由
    FieldReason { field: String, reason: String },
    /// 対象リソース
    Resource { resource: String, id: String },
    /// 検証エラー一覧
    Fields(FieldErrors),
    /// 詳細なし（`{}`）
    Empty {},
}

/// 受信した `details` の形状
///
/// `{}` はまず空の `Fields` として読まれるため、[`ErrorDetails::Empty`] に戻す。
#[derive(Deserialize)]
#[serde(untagged)]
enum ReceivedDetails {
    Field { field: String, value: String },
    FieldReason { field: String, reason: String },
    Resource { resource: String, id: String },
    Fields(FieldErrors),
}

impl From<ReceivedDetails> for ErrorDetails {
    fn from(received: ReceivedDetails) -> Self {
        match received {
            ReceivedDetails::Field { field, value } => Self::Field { field, value },
            ReceivedDetails::FieldReason { field, reason } => Self::FieldReason { field, reason },
            ReceivedDetails::Resource { resource, id } => Self::Resource { resource, id },
            ReceivedDetails::Fields(errors) if errors.is_empty() => Self::Empty {},
            ReceivedDetails::Fields(errors) => Self::Fields(errors),
        }
    }
}

impl ErrorDetails {
    pub fn field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn field_reason(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FieldReason {
            field:  field.into(),
            reason: reason.into(),
        }
    }

    pub fn resource(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Resource {
            resource: resource.into(),
            id:       id.into(),
        }
    }
}

impl Default for ErrorDetails {
    fn default() -> Self {
        Self::Empty {}
    }
}

impl From<FieldErrors> for ErrorDetails {
    fn from(errors: FieldErrors) -> Self {
        Self::Fields(errors)
    }
}
