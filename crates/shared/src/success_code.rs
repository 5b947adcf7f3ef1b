//! # 成功コード表
//!
//! 成功レスポンスの `code` と既定メッセージ、HTTP ステータスの対応表。

use serde::{Deserialize, Serialize};

/// 成功コード
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
pub enum SuccessCode {
    HealthCheckOk,
    // 認証
    SignupSuccess,
    LoginSuccess,
    LogoutSuccess,
    // ユーザー
    GetUserSuccess,
    UserUpdated,
    PasswordChanged,
    UserDeleted,
    // 投稿
    GetPostsSuccess,
    GetPostSuccess,
    PostCreated,
    PostUpdated,
    PostDeleted,
    PostLikeToggled,
    // コメント
    GetCommentsSuccess,
    CommentCreated,
    CommentUpdated,
    CommentDeleted,
}

impl SuccessCode {
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::HealthCheckOk => "サーバーは正常に稼働しています",
            Self::SignupSuccess => "会員登録が完了しました",
            Self::LoginSuccess => "ログインしました",
            Self::LogoutSuccess => "ログアウトしました",
            Self::GetUserSuccess => "ユーザー情報を取得しました",
            Self::UserUpdated => "ユーザー情報を更新しました",
            Self::PasswordChanged => "パスワードを変更しました",
            Self::UserDeleted => "退会が完了しました",
            Self::GetPostsSuccess => "投稿一覧を取得しました",
            Self::GetPostSuccess => "投稿を取得しました",
            Self::PostCreated => "投稿を作成しました",
            Self::PostUpdated => "投稿を更新しました",
            Self::PostDeleted => "投稿を削除しました",
            Self::PostLikeToggled => "いいねを更新しました",
            Self::GetCommentsSuccess => "コメント一覧を取得しました",
            Self::CommentCreated => "コメントを作成しました",
            Self::CommentUpdated => "コメントを更新しました",
            Self::CommentDeleted => "コメントを削除しました",
        }
    }

    /// 対応する HTTP ステータス（作成系は 201、それ以外は 200）
    pub const fn status(self) -> u16 {
        match self {
            Self::SignupSuccess | Self::PostCreated | Self::PostLikeToggled | Self::CommentCreated => {
                201
            }
            _ => 200,
        }
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}
