//! # Type Tags
//!
//! `TypeTag` is the closed set of value kinds a [`TypedValue`] can hold.
//! Declared SQL types are resolved to a tag through a fixed keyword table;
//! every tag maps back to one canonical declared spelling.
//!
//! ## Keyword Table
//!
//! | Keywords | Tag |
//! |----------|-----|
//! | NONE | None |
//! | TINYINT, INT1 | Int8 |
//! | SMALLINT, INT2 | Int16 |
//! | MEDIUMINT, INT4 | Int32 |
//! | INTEGER, INT, BIGINT, INT8 | Int64 |
//! | UINT64, UNSIGNED | UInt64 |
//! | FLOAT | Float |
//! | REAL, DOUBLE, NUMERIC, DECIMAL | Double |
//! | BOOL, BOOLEAN | Bool |
//! | TEXT, VARCHAR, CHAR, ... | Text |
//! | BLOB | Blob |
//!
//! Lookup is case-sensitive and only the first whitespace-separated token of
//! the declared type is considered, minus any `(length)` suffix. Anything not
//! in the table resolves to `Blob`.
//!
//! [`TypedValue`]: super::TypedValue

use phf::phf_map;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    None = 0,
    Int8 = 1,
    Int16 = 2,
    Int32 = 3,
    Int64 = 4,
    UInt64 = 5,
    Float = 6,
    Double = 7,
    Bool = 8,
    Text = 9,
    Blob = 10,
}

static TYPE_KEYWORDS: phf::Map<&'static str, TypeTag> = phf_map! {
    "NONE" => TypeTag::None,
    "TINYINT" => TypeTag::Int8,
    "INT1" => TypeTag::Int8,
    "SMALLINT" => TypeTag::Int16,
    "INT2" => TypeTag::Int16,
    "MEDIUMINT" => TypeTag::Int32,
    "INT4" => TypeTag::Int32,
    "INTEGER" => TypeTag::Int64,
    "INT" => TypeTag::Int64,
    "BIGINT" => TypeTag::Int64,
    "INT8" => TypeTag::Int64,
    "UINT64" => TypeTag::UInt64,
    "UNSIGNED" => TypeTag::UInt64,
    "FLOAT" => TypeTag::Float,
    "REAL" => TypeTag::Double,
    "DOUBLE" => TypeTag::Double,
    "NUMERIC" => TypeTag::Double,
    "DECIMAL" => TypeTag::Double,
    "BOOL" => TypeTag::Bool,
    "BOOLEAN" => TypeTag::Bool,
    "TEXT" => TypeTag::Text,
    "VARCHAR" => TypeTag::Text,
    "CHAR" => TypeTag::Text,
    "CHARACTER" => TypeTag::Text,
    "NCHAR" => TypeTag::Text,
    "NVARCHAR" => TypeTag::Text,
    "CLOB" => TypeTag::Text,
    "BLOB" => TypeTag::Blob,
};

impl TypeTag {
    pub const ALL: [TypeTag; 11] = [
        TypeTag::None,
        TypeTag::Int8,
        TypeTag::Int16,
        TypeTag::Int32,
        TypeTag::Int64,
        TypeTag::UInt64,
        TypeTag::Float,
        TypeTag::Double,
        TypeTag::Bool,
        TypeTag::Text,
        TypeTag::Blob,
    ];

    /// Returns the encoded byte width, or None for Text and Blob.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            TypeTag::None => Some(0),
            TypeTag::Int8 | TypeTag::Bool => Some(1),
            TypeTag::Int16 => Some(2),
            TypeTag::Int32 | TypeTag::Float => Some(4),
            TypeTag::Int64 | TypeTag::UInt64 | TypeTag::Double => Some(8),
            TypeTag::Text | TypeTag::Blob => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        self.fixed_size().is_none()
    }

    /// Canonical declared-type spelling used when a value is built from a tag.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            TypeTag::None => "NONE",
            TypeTag::Int8 => "TINYINT",
            TypeTag::Int16 => "SMALLINT",
            TypeTag::Int32 => "MEDIUMINT",
            TypeTag::Int64 => "BIGINT",
            TypeTag::UInt64 => "UINT64",
            TypeTag::Float => "FLOAT",
            TypeTag::Double => "DOUBLE",
            TypeTag::Bool => "BOOL",
            TypeTag::Text => "TEXT",
            TypeTag::Blob => "BLOB",
        }
    }

    /// Exact, case-sensitive keyword lookup.
    pub fn from_keyword(keyword: &str) -> Option<TypeTag> {
        TYPE_KEYWORDS.get(keyword).copied()
    }

    /// Resolves a full declared type such as `VARCHAR(255) COLLATE NOCASE`.
    pub fn from_declared(declared: &str) -> TypeTag {
        let first = declared.split_whitespace().next().unwrap_or("");
        let base = match first.find('(') {
            Some(pos) => &first[..pos],
            None => first,
        };
        Self::from_keyword(base).unwrap_or(TypeTag::Blob)
    }
}
