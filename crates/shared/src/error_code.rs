//! # エラー分類表
//!
//! API が返し得るすべてのエラー種別を列挙し、各種別をカテゴリ・HTTP ステータス・
//! 既定メッセージに対応付ける。
//!
//! ## 設計方針
//!
//! - **固定テーブル**: 種別ごとの定義はプロセス起動時から不変で、リクエストごとに組み立てない。
//!   [`ErrorCode::definition`] はテーブル参照のみを行う
//! - **安定したキー**: ワイヤ上の `code` は `SCREAMING_SNAKE_CASE` の種別名。
//!   クライアントは `message` ではなくこの値で分岐する
//! - **ステータスは種別から導出**: HTTP ステータスはレスポンスの形状から推測しない

use serde::{Deserialize, Serialize};

/// エラーカテゴリ（閉じた集合）
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Common,
    Auth,
    User,
    Post,
    Comment,
    Validation,
    System,
}

/// エラー種別
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // --- COMMON ---
    BadRequest,
    NotFound,
    // --- AUTH ---
    Unauthorized,
    InvalidCredentials,
    Forbidden,
    // --- USER ---
    UserNotFound,
    EmailAlreadyExists,
    NicknameAlreadyExists,
    // --- POST ---
    PostNotFound,
    // --- COMMENT ---
    CommentNotFound,
    // --- VALIDATION ---
    InvalidInput,
    // --- SYSTEM ---
    InternalServerError,
}

/// エラー種別の定義（カテゴリ・ステータス・既定メッセージ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDefinition {
    pub category:        ErrorCategory,
    pub status:          u16,
    pub default_message: &'static str,
}

const fn def(category: ErrorCategory, status: u16, default_message: &'static str) -> ErrorDefinition {
    ErrorDefinition {
        category,
        status,
        default_message,
    }
}

const BAD_REQUEST: ErrorDefinition = def(ErrorCategory::Common, 400, "リクエストが不正です");
const NOT_FOUND: ErrorDefinition = def(
    ErrorCategory::Common,
    404,
    "要求されたリソースが見つかりません",
);
const UNAUTHORIZED: ErrorDefinition = def(ErrorCategory::Auth, 401, "ログインが必要です");
const INVALID_CREDENTIALS: ErrorDefinition = def(
    ErrorCategory::Auth,
    401,
    "メールアドレスまたはパスワードが正しくありません",
);
const FORBIDDEN: ErrorDefinition = def(ErrorCategory::Auth, 403, "この操作を行う権限がありません");
const USER_NOT_FOUND: ErrorDefinition = def(ErrorCategory::User, 404, "ユーザーが見つかりません");
const EMAIL_ALREADY_EXISTS: ErrorDefinition = def(
    ErrorCategory::User,
    409,
    "このメールアドレスは既に使用されています",
);
const NICKNAME_ALREADY_EXISTS: ErrorDefinition = def(
    ErrorCategory::User,
    409,
    "このニックネームは既に使用されています",
);
const POST_NOT_FOUND: ErrorDefinition = def(ErrorCategory::Post, 404, "投稿が見つかりません");
const COMMENT_NOT_FOUND: ErrorDefinition =
    def(ErrorCategory::Comment, 404, "コメントが見つかりません");
const INVALID_INPUT: ErrorDefinition = def(ErrorCategory::Validation, 422, "入力値が不正です");
const INTERNAL_SERVER_ERROR: ErrorDefinition = def(
    ErrorCategory::System,
    500,
    "サーバー内部でエラーが発生しました",
);

impl ErrorCode {
    /// 種別の定義をテーブルから引く
    pub const fn definition(self) -> &'static ErrorDefinition {
        match self {
            Self::BadRequest => &BAD_REQUEST,
            Self::NotFound => &NOT_FOUND,
            Self::Unauthorized => &UNAUTHORIZED,
            Self::InvalidCredentials => &INVALID_CREDENTIALS,
            Self::Forbidden => &FORBIDDEN,
            Self::UserNotFound => &USER_NOT_FOUND,
            Self::EmailAlreadyExists => &EMAIL_ALREADY_EXISTS,
            Self::NicknameAlreadyExists => &NICKNAME_ALREADY_EXISTS,
            Self::PostNotFound => &POST_NOT_FOUND,
            Self::CommentNotFound => &COMMENT_NOT_FOUND,
            Self::InvalidInput => &INVALID_INPUT,
            Self::InternalServerError => &INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn category(self) -> ErrorCategory {
        self.definition().category
    }

    pub const fn status(self) -> u16 {
        self.definition().status
    }

    pub const fn default_message(self) -> &'static str {
        self.definition().default_message
    }

    /// ワイヤ上の種別名（例: `"POST_NOT_FOUND"`）
    pub fn name(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    #[rstest]
    #[case(ErrorCode::BadRequest, ErrorCategory::Common, 400)]
    #[case(ErrorCode::NotFound, ErrorCategory::Common, 404)]
    #[case(ErrorCode::Unauthorized, ErrorCategory::Auth, 401)]
    #[case(ErrorCode::InvalidCredentials, ErrorCategory::Auth, 401)]
    #[case(ErrorCode::Forbidden, ErrorCategory::Auth, 403)]
    #[case(ErrorCode::UserNotFound, ErrorCategory::User, 404)]
    #[case(ErrorCode::EmailAlreadyExists, ErrorCategory::User, 409)]
    #[case(ErrorCode::NicknameAlreadyExists, ErrorCategory::User, 409)]
    #[case(ErrorCode::PostNotFound, ErrorCategory::Post, 404)]
    #[case(ErrorCode::CommentNotFound, ErrorCategory::Comment, 404)]
    #[case(ErrorCode::InvalidInput, ErrorCategory::Validation, 422)]
    #[case(ErrorCode::InternalServerError, ErrorCategory::System, 500)]
    fn test_種別ごとにカテゴリとステータスが決まる(
        #[case] code: ErrorCode,
        #[case] category: ErrorCategory,
        #[case] status: u16,
    ) {
        assert_eq!(code.category(), category);
        assert_eq!(code.status(), status);
    }

    #[test]
    fn test_種別名はscreaming_snake_caseになる() {
        assert_eq!(ErrorCode::EmailAlreadyExists.name(), "EMAIL_ALREADY_EXISTS");
        assert_eq!(ErrorCode::NotFound.to_string(), "NOT_FOUND");
        assert_eq!(ErrorCategory::Validation.to_string(), "VALIDATION");
    }

    #[test]
    fn test_serializeの結果が種別名と一致する() {
        for code in ErrorCode::iter() {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, serde_json::json!(code.name()));
        }
    }

    #[test]
    fn test_すべての種別が空でない既定メッセージを持つ() {
        for code in ErrorCode::iter() {
            assert!(!code.default_message().is_empty(), "{code} のメッセージが空");
            assert!((400..600).contains(&code.status()), "{code} のステータスが範囲外");
        }
    }
}
