//! # Error Taxonomy
//!
//! Every fallible operation in sqlfetch returns `eyre::Result`. When the
//! failure belongs to one of the well-defined categories below, the root of
//! the `Report` is a [`FetchError`], so callers can branch on it:
//!
//! ```ignore
//! use sqlfetch::{ErrorKind, FetchError};
//!
//! match fetcher.fetch("SELECT x FROM missing") {
//!     Err(e) if FetchError::kind_of(&e) == Some(ErrorKind::UnknownTable) => { /* ... */ }
//!     other => { /* ... */ }
//! }
//! ```
//!
//! | Kind | Raised by |
//! |------|-----------|
//! | `TypeMismatch` | `TypedValue::get` against the wrong tag |
//! | `ParseError` | default/literal text that does not fit the tag |
//! | `MalformedQuery` | SELECT or FROM missing in `fetch` |
//! | `UnknownTable` | schema cache miss on a table name |
//! | `UnknownColumn` | schema cache miss on a column name |
//! | `SchemaError` | generation against an impossible shape |
//! | `EngineError` | the execution engine rejected a statement |
//! | `Open` | the storage could not be opened |

use crate::types::TypeTag;
use thiserror::Error;

/// Category of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TypeMismatch,
    ParseError,
    MalformedQuery,
    UnknownTable,
    UnknownColumn,
    SchemaError,
    EngineError,
    Open,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("type mismatch: value is {actual:?}, requested {requested:?}")]
    TypeMismatch { actual: TypeTag, requested: TypeTag },

    #[error("cannot parse '{text}' as {tag:?}: {reason}")]
    Parse {
        tag: TypeTag,
        text: String,
        reason: String,
    },

    #[error("malformed query: {0}")]
    MalformedQuery(String),

    #[error("no such table: {0}")]
    UnknownTable(String),

    #[error("no such column: {column} in table {table}")]
    UnknownColumn { table: String, column: String },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("engine error: {0}")]
    Engine(String),

    #[error("statement {index} of batch failed ({statement}): {message}")]
    Batch {
        index: usize,
        statement: String,
        message: String,
    },

    #[error("cannot open database: {0}")]
    Open(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            FetchError::Parse { .. } => ErrorKind::ParseError,
            FetchError::MalformedQuery(_) => ErrorKind::MalformedQuery,
            FetchError::UnknownTable(_) => ErrorKind::UnknownTable,
            FetchError::UnknownColumn { .. } => ErrorKind::UnknownColumn,
            FetchError::Schema(_) => ErrorKind::SchemaError,
            FetchError::Engine(_) | FetchError::Batch { .. } => ErrorKind::EngineError,
            FetchError::Open(_) => ErrorKind::Open,
        }
    }

    /// Finds the first `FetchError` in the report's cause chain.
    pub fn find(report: &eyre::Report) -> Option<&FetchError> {
        report
            .chain()
            .find_map(|cause| cause.downcast_ref::<FetchError>())
    }

    /// Returns the kind of the first `FetchError` in the report's chain.
    pub fn kind_of(report: &eyre::Report) -> Option<ErrorKind> {
        Self::find(report).map(FetchError::kind)
    }

    pub(crate) fn parse(tag: TypeTag, text: &str, reason: impl ToString) -> Self {
        FetchError::Parse {
            tag,
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn unknown_column(table: &str, column: &str) -> Self {
        FetchError::UnknownColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}
