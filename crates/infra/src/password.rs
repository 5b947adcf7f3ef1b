//! # パスワードハッシュ
//!
//! Argon2id によるパスワードのハッシュ化と照合を提供する。

use argon2::{
    Argon2,
    Params,
    PasswordHasher as _,
    PasswordVerifier as _,
    password_hash::{PasswordHash as Argon2PasswordHash, SaltString},
};
use board_domain::password::{PasswordHash, PasswordVerifyResult, PlainPassword};
use uuid::Uuid;

use crate::InfraError;

/// パスワードのハッシュ化と照合を担当するトレイト
pub trait PasswordHasher: Send + Sync {
    /// パスワードをハッシュ化する（ソルトは毎回生成する）
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError>;

    /// パスワードを照合する
    ///
    /// # Errors
    ///
    /// - 不正なハッシュ形式の場合
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError>;
}

/// Argon2id による実装
///
/// 既定は OWASP 推奨パラメータ（Memory 64 MB / Iterations 1 / Parallelism 1）。
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::with_params(Params::new(65536, 1, 1, None).unwrap_or(Params::DEFAULT))
    }

    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }

    /// テスト用の軽量パラメータ
    #[cfg(any(test, feature = "test-utils"))]
    pub fn lightweight() -> Self {
        Self::with_params(Params::new(1024, 1, 1, None).unwrap_or(Params::DEFAULT))
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
            .map_err(|e| InfraError::unexpected(format!("ソルト生成に失敗: {e}")))?;

        let hash = self
            .argon2
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|e| InfraError::unexpected(format!("ハッシュ化に失敗: {e}")))?;

        Ok(PasswordHash::new(hash.to_string()))
    }

    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError> {
        let parsed = Argon2PasswordHash::new(hash.as_str())
            .map_err(|e| InfraError::unexpected(format!("不正なハッシュ形式: {e}")))?;

        let matched = self
            .argon2
            .verify_password(password.as_str().as_bytes(), &parsed)
            .is_ok();

        Ok(PasswordVerifyResult::from(matched))
    }
}
