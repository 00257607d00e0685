//! # sqlfetch - Typed Values over SQLite
//!
//! sqlfetch sits on top of a SQL engine (SQLite through `rusqlite`) and
//! gives it a typed face:
//!
//! - **Typed values**: one tagged `TypedValue` for every column kind, with
//!   byte-exact storage and the declared type text it came from
//! - **Schema-driven generation**: CREATE / INSERT / UPDATE text from typed
//!   rows, validated against a cached schema snapshot
//! - **Blob-safe reads**: SELECTs are rewritten so binary columns travel as
//!   `X'..'` literals and decode back to the exact bytes
//!
//! ## Quick Start
//!
//! ```ignore
//! use sqlfetch::{Column, Fetcher, KeyFlags, TypeTag, TypedValue};
//!
//! let mut fetcher = Fetcher::open("./app.db")?;
//! fetcher.exec("CREATE TABLE files(id INTEGER PRIMARY KEY, data BLOB, label TEXT)")?;
//!
//! let row = Column::new()
//!     .with("id", TypedValue::from_tag(TypeTag::Int64, KeyFlags::PRIMARY_KEY).with_value(1i64))
//!     .with("data", TypedValue::of(vec![0u8, 255, 26]))
//!     .with("label", TypedValue::of("first"));
//! fetcher.insert("files", &row)?;
//!
//! let rows = fetcher.fetch("SELECT * FROM files")?;
//! let data: Vec<u8> = rows[0].get("data").unwrap().get()?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │    Fetcher (exec / fetch / ddl)     │
//! ├──────────────────┬──────────────────┤
//! │  SQL generator   │  SELECT rewriter │
//! ├──────────────────┴──────────────────┤
//! │     Schema cache (dirty flag)       │
//! ├─────────────────────────────────────┤
//! │   TypedValue / literal codec        │
//! ├─────────────────────────────────────┤
//! │   Engine trait (SqliteEngine)       │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`types`]: `TypeTag`, `KeyFlags`, `TypedValue`, `Column`
//! - [`parsing`]: hex blob and boolean literal codec
//! - [`engine`]: the `Engine` trait and its `rusqlite` implementation
//! - [`schema`]: the cached table snapshot
//! - [`sql`]: tokenizer, statement generator, SELECT rewriter
//! - [`database`]: `Fetcher` and `FetcherBuilder`
//! - [`error`]: `FetchError` and `ErrorKind`
//!
//! ## Errors
//!
//! Every fallible call returns `eyre::Result`. Recognised failures carry a
//! [`FetchError`] at the root of the report; use [`FetchError::kind_of`] to
//! branch on its [`ErrorKind`].

pub mod database;
pub mod engine;
pub mod error;
pub mod parsing;
pub mod schema;
pub mod sql;
pub mod types;

pub use database::{ExecResult, Fetcher, FetcherBuilder};
pub use engine::{ColumnInfo, Engine, ResultRow, SqliteEngine};
pub use error::{ErrorKind, FetchError};
pub use schema::SchemaCache;
pub use types::{
    Column, ColumnList, KeyFlags, SqlDecode, SqlEncode, Table, TableInfo, TypeSpec, TypeTag,
    TypedValue,
};
