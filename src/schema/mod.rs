//! # Schema Snapshot
//!
//! This module holds the cached view of the database's tables that the
//! generator and the SELECT rewriter consult instead of asking the engine on
//! every call.
//!
//! ## Shape
//!
//! ```text
//! SchemaCache
//! ├── tables: TableInfo (BTreeMap, table-name order)
//! │   ├── "files" -> Column [id INTEGER PK, data BLOB, label TEXT]
//! │   └── "users" -> Column [id INTEGER PK, name VARCHAR(40) DEFAULT 'x']
//! ├── dirty: bool
//! └── refreshes: u64
//! ```
//!
//! Each cached value is a zeroed (or default-carrying) `TypedValue` that
//! records how the column was declared; it is a template, not row data.
//!
//! ## Staleness
//!
//! The snapshot is allowed to lag behind the engine. New tables are
//! declared optimistically by CREATE generation, and the `Fetcher` refreshes
//! once on the execute call after anything marked the cache dirty. Only
//! CREATE generation does that: DROP and ALTER, whether run through the
//! `Fetcher` or another connection, leave the snapshot stale until a
//! refresh.

mod cache;

pub use cache::{introspect, SchemaCache};
