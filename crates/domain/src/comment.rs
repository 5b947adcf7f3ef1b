//! # コメント
//!
//! 投稿にぶら下がるコメント。親投稿（`post_id`）と作成者（`author_id`）は生成時に固定される。

use chrono::{DateTime, Utc};

use crate::{ownership::Owned, post::PostId, user::UserId};

define_uuid_id! {
    /// コメント ID
    pub struct CommentId;
}

define_validated_string! {
    /// コメント本文
    pub struct CommentContent {
        field: "content",
        max_length: 1_000,
    }
}

/// コメントエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id:         CommentId,
    post_id:    PostId,
    author_id:  UserId,
    content:    CommentContent,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        id: CommentId,
        post_id: PostId,
        author_id: UserId,
        content: CommentContent,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post_id,
            author_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &CommentId {
        &self.id
    }

    pub fn post_id(&self) -> &PostId {
        &self.post_id
    }

    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    pub fn content(&self) -> &CommentContent {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 指定した投稿の配下にあるか
    pub fn belongs_to(&self, post_id: &PostId) -> bool {
        &self.post_id == post_id
    }

    pub fn edited(self, content: CommentContent, now: DateTime<Utc>) -> Self {
        Self {
            content,
            updated_at: now,
            ..self
        }
    }
}

impl Owned for Comment {
    const RESOURCE: &'static str = "comment";

    fn owner_id(&self) -> &UserId {
        &self.author_id
    }

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}
