//! # 成功レスポンスエンベロープ
//!
//! 成功時の統一レスポンス形式 `{ "code", "message", "data" }` を提供する。
//!
//! `data` が空（`null` にシリアライズされる値）の場合は `{}` を出力する。
//! クライアントは常に `data` のフィールドを安全に参照できる。

use serde::{Deserialize, Serialize, Serializer, ser::Error as _};

use crate::SuccessCode;

/// 成功レスポンス
///
/// ## 使用例
///
/// ```
/// use board_shared::{ApiResponse, SuccessCode};
///
/// let response = ApiResponse::success(SuccessCode::PostCreated, "hello");
/// assert_eq!(response.code, "POST_CREATED");
/// assert_eq!(response.data, "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code:    String,
    pub message: String,
    #[serde(
        serialize_with = "serialize_data",
        bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>")
    )]
    pub data:    T,
}

impl<T> ApiResponse<T> {
    /// 成功コードの既定メッセージで包む
    pub fn success(code: SuccessCode, data: T) -> Self {
        Self {
            code: code.name().to_string(),
            message: code.default_message().to_string(),
            data,
        }
    }
}

impl ApiResponse<()> {
    /// データなしの成功レスポンス（`data` は `{}`）
    pub fn empty(code: SuccessCode) -> Self {
        Self::success(code, ())
    }
}

fn serialize_data<T, S>(data: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    let value = serde_json::to_value(data).map_err(S::Error::custom)?;
    if value.is_null() {
        serde_json::Map::new().serialize(serializer)
    } else {
        value.serialize(serializer)
    }
}
