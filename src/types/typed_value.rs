//! # Typed Values
//!
//! `TypedValue` is the single representation for any SQL column value:
//! a [`TypeTag`], the declared-type text it came from, its [`KeyFlags`], and
//! the raw bytes.
//!
//! ## Byte Layout
//!
//! | Tag | Bytes |
//! |-----|-------|
//! | None | empty |
//! | Int8 / Int16 / Int32 / Int64 | two's complement, little-endian, 1/2/4/8 bytes |
//! | UInt64 | little-endian, 8 bytes |
//! | Float / Double | IEEE 754, little-endian, 4/8 bytes |
//! | Bool | one byte, `0` or `1` |
//! | Text | UTF-8 |
//! | Blob | raw payload |
//!
//! Fixed-width tags always hold exactly `fixed_size()` bytes. A freshly
//! constructed value without data holds zeroes.
//!
//! UInt64 literals are written as the signed `i64` with the same bits, so
//! values above `i64::MAX` are stored by SQLite as negative integers rather
//! than lossy REALs. SQL comparisons on such columns see the signed order.
//!
//! ## Access
//!
//! Native Rust types map to exactly one tag through [`SqlEncode`] and
//! [`SqlDecode`]:
//!
//! ```ignore
//! let mut v = TypedValue::from_declared_type("INTEGER", KeyFlags::NORMAL);
//! assert!(v.change(42i64));          // same tag: written
//! assert!(!v.change("text"));        // other tag: refused, unchanged
//! v.set("text");                     // set switches the tag
//! assert_eq!(v.get::<String>()?, "text");
//! ```
//!
//! ## Primary Keys
//!
//! A value built with `PRIMARY_KEY` is always `Int64` declared as `INTEGER`,
//! whatever type was requested, because SQLite integer primary keys are row
//! ids.

use super::{KeyFlags, TypeTag};
use crate::error::FetchError;
use crate::parsing::{parse_blob_literal, parse_bool, render_blob_literal};
use eyre::{eyre, Result};
use smallvec::SmallVec;
use std::fmt;

const PRIMARY_KEY_TYPE: &str = "INTEGER";

type ValueBytes = SmallVec<[u8; 8]>;

mod sealed {
    pub trait Sealed {}
}

/// Native values that can be written into a `TypedValue`.
pub trait SqlEncode: sealed::Sealed {
    fn tag(&self) -> TypeTag;
    fn encode_into(&self, out: &mut SmallVec<[u8; 8]>);
}

/// Native values that can be read back out of a `TypedValue`.
pub trait SqlDecode: Sized + sealed::Sealed {
    const TAG: TypeTag;
    fn decode(bytes: &[u8]) -> Option<Self>;
}

macro_rules! le_native {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl SqlEncode for $ty {
                fn tag(&self) -> TypeTag {
                    TypeTag::$tag
                }

                fn encode_into(&self, out: &mut SmallVec<[u8; 8]>) {
                    out.clear();
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }

            impl SqlDecode for $ty {
                const TAG: TypeTag = TypeTag::$tag;

                fn decode(bytes: &[u8]) -> Option<Self> {
                    Some(<$ty>::from_le_bytes(bytes.try_into().ok()?))
                }
            }
        )*
    };
}

le_native! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
}

impl sealed::Sealed for bool {}

impl SqlEncode for bool {
    fn tag(&self) -> TypeTag {
        TypeTag::Bool
    }

    fn encode_into(&self, out: &mut SmallVec<[u8; 8]>) {
        out.clear();
        out.push(*self as u8);
    }
}

impl SqlDecode for bool {
    const TAG: TypeTag = TypeTag::Bool;

    fn decode(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [b] => Some(*b != 0),
            _ => None,
        }
    }
}

impl sealed::Sealed for String {}
impl sealed::Sealed for &str {}

impl SqlEncode for String {
    fn tag(&self) -> TypeTag {
        TypeTag::Text
    }

    fn encode_into(&self, out: &mut SmallVec<[u8; 8]>) {
        self.as_str().encode_into(out);
    }
}

impl SqlEncode for &str {
    fn tag(&self) -> TypeTag {
        TypeTag::Text
    }

    fn encode_into(&self, out: &mut SmallVec<[u8; 8]>) {
        out.clear();
        out.extend_from_slice(self.as_bytes());
    }
}

impl SqlDecode for String {
    const TAG: TypeTag = TypeTag::Text;

    fn decode(bytes: &[u8]) -> Option<Self> {
        String::from_utf8(bytes.to_vec()).ok()
    }
}

impl sealed::Sealed for Vec<u8> {}
impl sealed::Sealed for &[u8] {}

impl SqlEncode for Vec<u8> {
    fn tag(&self) -> TypeTag {
        TypeTag::Blob
    }

    fn encode_into(&self, out: &mut SmallVec<[u8; 8]>) {
        self.as_slice().encode_into(out);
    }
}

impl SqlEncode for &[u8] {
    fn tag(&self) -> TypeTag {
        TypeTag::Blob
    }

    fn encode_into(&self, out: &mut SmallVec<[u8; 8]>) {
        out.clear();
        out.extend_from_slice(self);
    }
}

impl SqlDecode for Vec<u8> {
    const TAG: TypeTag = TypeTag::Blob;

    fn decode(bytes: &[u8]) -> Option<Self> {
        Some(bytes.to_vec())
    }
}

/// How the type of a value is specified: by declared SQL text or by tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSpec<'a> {
    Declared(&'a str),
    Tag(TypeTag),
}

impl<'a> From<&'a str> for TypeSpec<'a> {
    fn from(s: &'a str) -> Self {
        TypeSpec::Declared(s)
    }
}

impl<'a> From<&'a String> for TypeSpec<'a> {
    fn from(s: &'a String) -> Self {
        TypeSpec::Declared(s.as_str())
    }
}

impl From<TypeTag> for TypeSpec<'_> {
    fn from(tag: TypeTag) -> Self {
        TypeSpec::Tag(tag)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    tag: TypeTag,
    declared: String,
    flags: KeyFlags,
    bytes: ValueBytes,
}

impl TypedValue {
    fn zeroed(tag: TypeTag, declared: String, flags: KeyFlags) -> Self {
        let mut bytes = ValueBytes::new();
        bytes.resize(tag.fixed_size().unwrap_or(0), 0);
        Self {
            tag,
            declared,
            flags,
            bytes,
        }
    }

    fn primary_key(flags: KeyFlags) -> Self {
        Self::zeroed(TypeTag::Int64, PRIMARY_KEY_TYPE.to_string(), flags)
    }

    /// Resolves `declared` through the keyword table, keeping the caller's
    /// spelling. Unknown types become `Blob`.
    pub fn from_declared_type(declared: &str, flags: KeyFlags) -> Self {
        if flags.is_primary_key() {
            return Self::primary_key(flags);
        }
        Self::zeroed(TypeTag::from_declared(declared), declared.to_string(), flags)
    }

    pub fn from_tag(tag: TypeTag, flags: KeyFlags) -> Self {
        if flags.is_primary_key() {
            return Self::primary_key(flags);
        }
        Self::zeroed(tag, tag.canonical_name().to_string(), flags)
    }

    pub fn from_spec<'a>(spec: impl Into<TypeSpec<'a>>, flags: KeyFlags) -> Self {
        match spec.into() {
            TypeSpec::Declared(declared) => Self::from_declared_type(declared, flags),
            TypeSpec::Tag(tag) => Self::from_tag(tag, flags),
        }
    }

    /// Builds a value whose bytes are parsed from `text` according to the
    /// resolved tag. Fails with a `ParseError` when `text` does not fit.
    pub fn from_default_text<'a>(
        spec: impl Into<TypeSpec<'a>>,
        flags: KeyFlags,
        text: &str,
    ) -> Result<Self> {
        let mut value = Self::from_spec(spec, flags);
        value.parse_into(text)?;
        Ok(value)
    }

    /// A value shaped like `template` (tag, declared text, flags) whose bytes
    /// are parsed from `text`.
    pub fn parse_like(template: &TypedValue, text: &str) -> Result<Self> {
        let mut value = template.clone();
        value.parse_into(text)?;
        Ok(value)
    }

    /// A NULL in a column shaped like `template`.
    pub fn null_like(template: &TypedValue) -> Self {
        Self {
            tag: TypeTag::None,
            declared: template.declared.clone(),
            flags: template.flags,
            bytes: ValueBytes::new(),
        }
    }

    /// Shorthand for `from_tag(v.tag(), NORMAL)` followed by `set(v)`.
    pub fn of<T: SqlEncode>(v: T) -> Self {
        Self::from_tag(v.tag(), KeyFlags::NORMAL).with_value(v)
    }

    pub fn with_value<T: SqlEncode>(mut self, v: T) -> Self {
        self.set(v);
        self
    }

    fn parse_into(&mut self, text: &str) -> Result<()> {
        let tag = self.tag;
        let fail = |reason: &dyn fmt::Display| FetchError::parse(tag, text, reason);
        let t = text.trim();

        match tag {
            TypeTag::None => {}
            TypeTag::Int8 => self.set(t.parse::<i8>().map_err(|e| fail(&e))?),
            TypeTag::Int16 => self.set(t.parse::<i16>().map_err(|e| fail(&e))?),
            TypeTag::Int32 => self.set(t.parse::<i32>().map_err(|e| fail(&e))?),
            TypeTag::Int64 => self.set(t.parse::<i64>().map_err(|e| fail(&e))?),
            TypeTag::UInt64 => self.set(parse_uint64(t).map_err(|e| fail(&e))?),
            TypeTag::Float => self.set(t.parse::<f32>().map_err(|e| fail(&e))?),
            TypeTag::Double => self.set(t.parse::<f64>().map_err(|e| fail(&e))?),
            TypeTag::Bool => self.set(parse_bool(t).map_err(|e| fail(&e))?),
            TypeTag::Text => self.set(text),
            TypeTag::Blob => {
                let bytes = parse_blob_literal(text).map_err(|e| fail(&format!("{:#}", e)))?;
                self.set(bytes);
            }
        }
        Ok(())
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn flags(&self) -> KeyFlags {
        self.flags
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_null(&self) -> bool {
        self.tag == TypeTag::None
    }

    pub fn is_primary_key(&self) -> bool {
        self.flags.is_primary_key()
    }

    /// Canonical spelling of the current tag, independent of how it was declared.
    pub fn canonical_type_text(&self) -> &'static str {
        self.tag.canonical_name()
    }

    /// The declared type, optionally followed by its constraints.
    pub fn declared_type_text(&self, include_constraints: bool) -> String {
        let mut out = self.declared.clone();
        if !include_constraints {
            return out;
        }
        if self.flags.contains(KeyFlags::PRIMARY_KEY) {
            out.push_str(" PRIMARY KEY");
        }
        if self.flags.contains(KeyFlags::UNIQUE) {
            out.push_str(" UNIQUE");
        }
        if self.flags.contains(KeyFlags::AUTO_INCREMENT) {
            out.push_str(" AUTO INCREMENT");
        }
        if self.flags.contains(KeyFlags::NOT_NULL) {
            out.push_str(" NOT NULL");
        }
        if self.flags.contains(KeyFlags::HAS_DEFAULT) {
            out.push_str(" DEFAULT ");
            out.push_str(&self.render_literal());
        }
        out
    }

    pub fn get<T: SqlDecode>(&self) -> Result<T> {
        if self.tag != T::TAG {
            return Err(FetchError::TypeMismatch {
                actual: self.tag,
                requested: T::TAG,
            }
            .into());
        }
        T::decode(&self.bytes)
            .ok_or_else(|| eyre!("corrupt {:?} payload of {} bytes", self.tag, self.bytes.len()))
    }

    /// Stores `v`, switching the tag to the one `v` implies.
    pub fn set<T: SqlEncode>(&mut self, v: T) {
        v.encode_into(&mut self.bytes);
        self.tag = v.tag();
    }

    /// Stores `v` only if the tag already matches. Returns whether it did.
    pub fn change<T: SqlEncode>(&mut self, v: T) -> bool {
        if self.tag != v.tag() {
            return false;
        }
        self.set(v);
        true
    }

    pub fn set_null(&mut self) {
        self.bytes.clear();
        self.tag = TypeTag::None;
    }

    /// Renders the value as a SQL literal. Text is quoted but not escaped.
    pub fn render_literal(&self) -> String {
        match self.tag {
            TypeTag::None => String::new(),
            TypeTag::Int8 => self.render_native::<i8>(),
            TypeTag::Int16 => self.render_native::<i16>(),
            TypeTag::Int32 => self.render_native::<i32>(),
            TypeTag::Int64 => self.render_native::<i64>(),
            TypeTag::UInt64 => {
                let v = u64::decode(&self.bytes).unwrap_or_default();
                (v as i64).to_string()
            }
            TypeTag::Float => self.render_native::<f32>(),
            TypeTag::Double => self.render_native::<f64>(),
            TypeTag::Bool => {
                if self.bytes.first().copied().unwrap_or(0) != 0 {
                    "1".to_string()
                } else {
                    "0".to_string()
                }
            }
            TypeTag::Text => format!("'{}'", String::from_utf8_lossy(&self.bytes)),
            TypeTag::Blob => render_blob_literal(&self.bytes),
        }
    }

    fn render_native<T: SqlDecode + fmt::Display + Default>(&self) -> String {
        T::decode(&self.bytes).unwrap_or_default().to_string()
    }
}

/// SQLite integers are signed 64-bit, so UInt64 literals carry the `i64`
/// bit pattern. Plain unsigned text (catalog defaults, hand-written SQL) is
/// accepted as well.
fn parse_uint64(text: &str) -> std::result::Result<u64, std::num::ParseIntError> {
    match text.parse::<u64>() {
        Ok(v) => Ok(v),
        Err(unsigned) => text.parse::<i64>().map(|v| v as u64).map_err(|_| unsigned),
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_literal())
    }
}
