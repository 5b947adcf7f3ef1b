//! # ページネーション付きレスポンス
//!
//! オフセット方式の一覧レスポンス。`data` 内に `items` と `pagination` を持つ。

use serde::{Deserialize, Serialize};

/// ページ情報
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total:    usize,
    pub offset:   usize,
    pub limit:    usize,
    pub has_next: bool,
}

impl PageMeta {
    pub fn new(total: usize, offset: usize, limit: usize) -> Self {
        Self {
            total,
            offset,
            limit,
            has_next: offset.saturating_add(limit) < total,
        }
    }
}

/// ページネーション付き一覧
///
/// ## JSON 形式
///
/// ```json
/// {
///   "items": [...],
///   "pagination": { "total": 42, "offset": 0, "limit": 10, "hasNext": true }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items:      Vec<T>,
    pub pagination: PageMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, pagination: PageMeta) -> Self {
        Self { items, pagination }
    }
}
