//! # SQL Literal Parsing
//!
//! Shared literal encode/decode used by `TypedValue` for default values and
//! by the fetch path for text query results.
//!
//! ```ignore
//! use sqlfetch::parsing::{parse_blob_literal, render_blob_literal};
//!
//! let bytes = parse_blob_literal("X'48454C4C4F'")?;  // "HELLO"
//! assert_eq!(render_blob_literal(&bytes), "X'48454c4c4f'");
//! ```

mod literal;

pub use literal::{
    encode_hex, parse_blob_literal, parse_bool, parse_hex_blob, render_blob_literal,
    unquote_text_literal,
};
