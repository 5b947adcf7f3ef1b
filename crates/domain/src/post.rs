//! # 投稿
//!
//! 投稿エンティティ。作成者（`author_id`）は生成時に一度だけ設定され、
//! 以後変更する手段を持たない。

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{ownership::Owned, user::UserId};

define_uuid_id! {
    /// 投稿 ID
    pub struct PostId;
}

define_validated_string! {
    /// 投稿タイトル
    pub struct PostTitle {
        field: "title",
        max_length: 100,
    }
}

define_validated_string! {
    /// 投稿本文
    pub struct PostContent {
        field: "content",
        max_length: 10_000,
    }
}

/// 投稿の部分更新
#[derive(Debug, Clone, Default)]
pub struct PostEdit {
    pub title:     Option<PostTitle>,
    pub content:   Option<PostContent>,
    /// `Some(None)` で画像を外す
    pub image_url: Option<Option<String>>,
}

/// いいねの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub liked:      bool,
    pub like_count: usize,
}

/// 投稿エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id:         PostId,
    author_id:  UserId,
    title:      PostTitle,
    content:    PostContent,
    image_url:  Option<String>,
    liked_by:   HashSet<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        id: PostId,
        author_id: UserId,
        title: PostTitle,
        content: PostContent,
        image_url: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author_id,
            title,
            content,
            image_url,
            liked_by: HashSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &PostId {
        &self.id
    }

    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    pub fn title(&self) -> &PostTitle {
        &self.title
    }

    pub fn content(&self) -> &PostContent {
        &self.content
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn like_count(&self) -> usize {
        self.liked_by.len()
    }

    pub fn is_liked_by(&self, user_id: &UserId) -> bool {
        self.liked_by.contains(user_id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 部分更新した新しいインスタンスを返す（作成者は引き継ぐ）
    pub fn edited(self, edit: PostEdit, now: DateTime<Utc>) -> Self {
        Self {
            title: edit.title.unwrap_or(self.title),
            content: edit.content.unwrap_or(self.content),
            image_url: edit.image_url.unwrap_or(self.image_url),
            updated_at: now,
            ..self
        }
    }

    /// いいねを切り替える
    pub fn toggle_like(&mut self, user_id: &UserId) -> LikeStatus {
        let liked = if self.liked_by.remove(user_id) {
            false
        } else {
            self.liked_by.insert(user_id.clone());
            true
        };

        LikeStatus {
            liked,
            like_count: self.like_count(),
        }
    }
}

impl Owned for Post {
    const RESOURCE: &'static str = "post";

    fn owner_id(&self) -> &UserId {
        &self.author_id
    }

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}
