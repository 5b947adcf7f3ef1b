//! # 所有者チェック
//!
//! リソースの所有者と呼び出し元が同一かどうかを判定する認可ガード。
//! 投稿・コメント・ユーザー自身の更新など、所有者に限定される操作はすべてここを通る。
//!
//! ## 設計方針
//!
//! - **正規化してから比較**: 型付き ID と文字列表現が混在しても、
//!   比較前に [`CanonicalId`] へそろえる。UUID として解釈できる値は
//!   小文字ハイフン区切りの形に、それ以外は前後の空白を除いた文字列になる
//! - **所有者は保存済みのフィールドからのみ**: [`Owned::owner_id`] 以外から所有者を導出しない
//! - **存在確認の後に呼ぶ**: 呼び出し側は対象リソースを取得してからガードを適用する

use uuid::Uuid;

use crate::{DomainError, user::UserId};

/// 比較用に正規化した識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct CanonicalId(String);

impl CanonicalId {
    pub fn from_uuid(uuid: &Uuid) -> Self {
        Self(uuid.hyphenated().to_string())
    }

    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match Uuid::parse_str(trimmed) {
            Ok(uuid) => Self::from_uuid(&uuid),
            Err(_) => Self(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 正規化した識別子に変換できる値
pub trait ToCanonicalId {
    fn to_canonical_id(&self) -> CanonicalId;
}

impl ToCanonicalId for CanonicalId {
    fn to_canonical_id(&self) -> CanonicalId {
        self.clone()
    }
}

impl ToCanonicalId for Uuid {
    fn to_canonical_id(&self) -> CanonicalId {
        CanonicalId::from_uuid(self)
    }
}

impl ToCanonicalId for str {
    fn to_canonical_id(&self) -> CanonicalId {
        CanonicalId::parse(self)
    }
}

impl ToCanonicalId for String {
    fn to_canonical_id(&self) -> CanonicalId {
        CanonicalId::parse(self)
    }
}

impl<T: ToCanonicalId + ?Sized> ToCanonicalId for &T {
    fn to_canonical_id(&self) -> CanonicalId {
        (**self).to_canonical_id()
    }
}

/// 所有者を持つリソース
pub trait Owned {
    /// エラー詳細に載せるリソース名
    const RESOURCE: &'static str;

    fn owner_id(&self) -> &UserId;

    fn resource_id(&self) -> String;
}

/// 識別子が同一かどうか
pub fn is_same_identity(
    owner: &(impl ToCanonicalId + ?Sized),
    caller: &(impl ToCanonicalId + ?Sized),
) -> bool {
    owner.to_canonical_id() == caller.to_canonical_id()
}

/// 所有者と呼び出し元が一致しなければ `FORBIDDEN` を返す
pub fn ensure_owner(
    owner: &(impl ToCanonicalId + ?Sized),
    caller: &(impl ToCanonicalId + ?Sized),
) -> Result<(), DomainError> {
    if is_same_identity(owner, caller) {
        Ok(())
    } else {
        Err(DomainError::new(board_shared::ErrorCode::Forbidden))
    }
}

/// リソースの所有者チェック
///
/// 拒否時はリソース名と ID を詳細に含める。
pub fn authorize_owner<R: Owned>(resource: &R, caller: &UserId) -> Result<(), DomainError> {
    ensure_owner(resource.owner_id(), caller)
        .map_err(|_| DomainError::forbidden(R::RESOURCE, resource.resource_id()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use board_shared::ErrorCode;

    const RAW: &str = "0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b";

    #[rstest]
    #[case("0190A1B2-C3D4-7E5F-8A9B-0C1D2E3F4A5B")]
    #[case("  0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b ")]
    #[case("0190a1b2c3d47e5f8a9b0c1d2e3f4a5b")]
    #[case("{0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b}")]
    fn test_uuidの表記ゆれは同じ識別子に正規化される(#[case] raw: &str) {
        assert_eq!(CanonicalId::parse(raw).as_str(), RAW);
    }

    #[test]
    fn test_uuidでない値は空白除去のみ行う() {
        assert_eq!(CanonicalId::parse(" user-1 ").as_str(), "user-1");
        assert_ne!(CanonicalId::parse("User-1"), CanonicalId::parse("user-1"));
    }

    #[test]
    fn test_型付きidとその文字列表現は同一とみなす() {
        let id = UserId::parse(RAW).unwrap();

        assert!(is_same_identity(&id, &id.to_string()));
        assert!(is_same_identity(&id.to_string(), &id));
        assert!(is_same_identity(&id, id.as_uuid()));
        assert!(is_same_identity(&id, &RAW.to_uppercase()));
    }

    #[test]
    fn test_ensure_ownerは不一致でforbiddenを返す() {
        let owner = UserId::new();
        let caller = UserId::new();

        let error = ensure_owner(&owner, &caller).unwrap_err();

        assert_eq!(error.code(), ErrorCode::Forbidden);
        assert_eq!(error.status(), 403);
        assert!(ensure_owner(&owner, &owner).is_ok());
        assert!(ensure_owner(owner.to_string().as_str(), &owner).is_ok());
    }
}
