//! # SQL Text Processing
//!
//! Everything that produces or inspects SQL text. None of it executes
//! anything; execution belongs to the `Fetcher`.
//!
//! ## Module Structure
//!
//! - `tokenizer`: quote-aware splitting into tokens and statements
//! - `generator`: CREATE / INSERT / UPDATE text from typed rows
//! - `rewriter`: blob-safe SELECT rewriting and text-row decoding
//!
//! ## Data Flow
//!
//! ```text
//! Column / TableInfo ──► generator ──► SQL text ──► Engine
//!
//! SELECT text ──► tokenizer ──► rewriter (SchemaCache) ──► Engine
//!                                                           │
//!                      ColumnList ◄── decode_rows ◄── text rows
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use sqlfetch::sql::{gen_update, rewrite_select};
//!
//! let sql = gen_update(&cache, "users", &row)?;
//! let select = rewrite_select("SELECT * FROM files", &cache)?;
//! ```

pub mod generator;
pub mod rewriter;
pub mod tokenizer;

pub use generator::{
    gen_create, gen_create_row, gen_create_rows, gen_create_table, gen_insert, gen_insert_rows,
    gen_update,
};
pub use rewriter::{decode_rows, rewrite_select, RewrittenSelect};
pub use tokenizer::{split_statements, tokenize, unquote_identifier, Token, Tokens};
