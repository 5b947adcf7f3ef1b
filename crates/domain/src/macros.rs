/// UUID v7 ベースの ID 型を定義する宣言型マクロ
///
/// 以下を一括生成する:
/// - Newtype 構造体（`Uuid` をラップ、JSON では文字列）
/// - `new()`: UUID v7 を生成
/// - `from_uuid()` / `as_uuid()`
/// - `parse()`: 文字列から復元（不正な形式は `None`）
/// - `Default` impl（`new()` に委譲）
macro_rules! define_uuid_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        #[serde(transparent)]
        $vis struct $Name(uuid::Uuid);

        impl $Name {
            /// 新しい ID を生成する（UUID v7）
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }

            /// 文字列表現から ID を復元する
            pub fn parse(raw: &str) -> Option<Self> {
                uuid::Uuid::parse_str(raw.trim()).ok().map(Self)
            }
        }

        impl Default for $Name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::ownership::ToCanonicalId for $Name {
            fn to_canonical_id(&self) -> $crate::ownership::CanonicalId {
                $crate::ownership::CanonicalId::from_uuid(&self.0)
            }
        }
    };
}

/// バリデーション付き String Newtype を定義する宣言型マクロ
///
/// `new()` は trim した上で、空・最小長・最大長を検証する。
/// 失敗時は `INVALID_INPUT` の [`DomainError`](crate::DomainError) を
/// `{ field, reason }` の詳細付きで返す。
///
/// - `field`: エラー詳細に載せるフィールド名（ワイヤ上の名前）
/// - `max_length`: 最大文字数（`chars().count()` でカウント）
macro_rules! define_validated_string {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            field: $field:expr,
            max_length: $max_length:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl $Name {
            pub const FIELD: &'static str = $field;
            pub const MAX_LENGTH: usize = $max_length;

            pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
                let value = value.into().trim().to_string();

                if value.is_empty() {
                    return Err($crate::DomainError::invalid(Self::FIELD, "必須です"));
                }

                if value.chars().count() > Self::MAX_LENGTH {
                    return Err($crate::DomainError::invalid(
                        Self::FIELD,
                        format!("{} 文字以内である必要があります", Self::MAX_LENGTH),
                    ));
                }

                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }
    };
}
