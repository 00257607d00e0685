//! # Type System for sqlfetch
//!
//! ## Module Structure
//!
//! - `type_tag`: Closed `TypeTag` enum and the declared-type keyword table
//! - `key_flags`: `KeyFlags` constraint bitmask
//! - `typed_value`: `TypedValue`, the byte-exact tagged value
//! - `column`: `Column` rows and the `ColumnList`/`TableInfo`/`Table` shapes
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `TypeTag` | Value kind, drives byte width and literal format |
//! | `KeyFlags` | PRIMARY KEY / UNIQUE / AUTO INCREMENT / NOT NULL / DEFAULT |
//! | `TypedValue` | Tag + declared type text + flags + bytes |
//! | `Column` | Ordered name -> value row |
//!
//! ## Usage
//!
//! ```ignore
//! use sqlfetch::types::{Column, KeyFlags, TypeTag, TypedValue};
//!
//! let row = Column::new()
//!     .with("id", TypedValue::from_tag(TypeTag::Int64, KeyFlags::PRIMARY_KEY).with_value(7i64))
//!     .with("name", TypedValue::of("a"));
//! ```

mod column;
mod key_flags;
mod type_tag;
mod typed_value;

pub use column::{Column, ColumnList, Table, TableInfo};
pub use key_flags::KeyFlags;
pub use type_tag::TypeTag;
pub use typed_value::{SqlDecode, SqlEncode, TypeSpec, TypedValue};
