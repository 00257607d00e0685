//! # Fetcher
//!
//! The `Fetcher` is the main entry point: it owns one [`Engine`](crate::engine::Engine) and
//! the [`SchemaCache`](crate::schema::SchemaCache) describing it, and ties generation, execution and typed
//! fetching together.
//!
//! ## Execution Pipeline
//!
//! ```text
//! exec(sql)
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────────────┐
//! │ 1. SPLIT: top-level `;`, blank statements dropped   │
//! └─────────────────────────────────────────────────────┘
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────────────┐
//! │ 2. RUN: engine.execute per statement, stop on error │
//! └─────────────────────────────────────────────────────┘
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────────────┐
//! │ 3. RESYNC: dirty (set by gen_create)? clear, refresh │
//! └─────────────────────────────────────────────────────┘
//!     │
//!     ▼
//! ExecResult { sql, rows }
//! ```
//!
//! `fetch` puts the SELECT rewrite in front of this pipeline and decodes
//! the rows afterwards.
//!
//! ## Ownership
//!
//! Every call that can touch the engine or the cache takes `&mut self`, so
//! a `Fetcher` is used from one place at a time. Sharing one between
//! threads needs external synchronization.
//!
//! ## Usage Example
//!
//! ```ignore
//! use sqlfetch::{Column, Fetcher, KeyFlags, TableInfo, TypeTag, TypedValue};
//!
//! let mut fetcher = Fetcher::open("./app.db")?;
//!
//! let mut tables = TableInfo::new();
//! tables.insert(
//!     "files".to_string(),
//!     Column::new()
//!         .with("id", TypedValue::from_tag(TypeTag::Int64, KeyFlags::PRIMARY_KEY))
//!         .with("data", TypedValue::from_declared_type("BLOB", KeyFlags::NORMAL)),
//! );
//! fetcher.create(&tables)?;
//!
//! for row in fetcher.fetch("SELECT * FROM files")? {
//!     let bytes: Vec<u8> = row.get("data").unwrap().get()?;
//! }
//! ```

mod batch;
mod builder;
mod ddl;
mod fetcher;
mod query;

pub use builder::FetcherBuilder;
pub use fetcher::{ExecResult, Fetcher};
