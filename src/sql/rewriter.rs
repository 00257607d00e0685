//! # Blob-Safe SELECT Rewriting
//!
//! Engines hand results back as text, and arbitrary bytes (embedded NULs,
//! invalid UTF-8) do not survive that. Before a SELECT is executed, every
//! `Blob` column it reads is wrapped in SQLite's `quote()`, which renders
//! the value as an `X'..'` literal that decodes back losslessly.
//!
//! ## Rewrite Procedure
//!
//! ```text
//! SELECT * FROM files WHERE id > 3
//!   │
//!   ├─ tokenize, find first SELECT and first FROM after it (ASCII case-insensitive)
//!   ├─ token after FROM is the table, resolved in the schema cache
//!   ├─ `*` expands to every column in declared order
//!   └─ Blob columns become quote(<name>)
//!   ▼
//! SELECT id, quote(data), label FROM files WHERE id > 3
//! ```
//!
//! When nothing needs wrapping the query is executed exactly as given.
//!
//! ## Limitations
//!
//! The table is always the single token after FROM: joins, subqueries and
//! aliases in the select list are not understood. Select-list entries must be
//! plain column names of that table (optionally quoted or qualified).
//!
//! ## Decoding
//!
//! [`decode_rows`] maps each text cell back to a `TypedValue`, using the
//! cached column's tag and flags. `quote(<col>)` result names are unwrapped
//! first, and NULL cells (including a quoted `NULL`) become `None` values.

use crate::engine::ResultRow;
use crate::error::FetchError;
use crate::schema::SchemaCache;
use crate::sql::tokenizer::{tokenize, unquote_identifier, Token};
use crate::types::{Column, ColumnList, TypeTag, TypedValue};
use eyre::Result;
use std::borrow::Cow;
use tracing::debug;

const QUOTE_OPEN: &str = "quote(";

/// A SELECT ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct RewrittenSelect<'q> {
    /// Resolved table name, as stored in the schema cache.
    pub table: String,
    pub sql: Cow<'q, str>,
    pub rewritten: bool,
}

/// Looks an identifier up in `column`, accepting quoted and table-qualified
/// spellings.
fn resolve_column<'c>(column: &'c Column, ident: &str) -> Option<(&'c str, &'c TypedValue)> {
    let bare = unquote_identifier(ident);
    let name = match bare.rsplit_once('.') {
        Some((_, col)) if !column.contains(&bare) => unquote_identifier(col),
        _ => bare,
    };
    column.iter().find(|(n, _)| *n == name)
}

fn find_keyword(tokens: &[Token<'_>], keyword: &str) -> Option<usize> {
    tokens.iter().position(|t| t.is_keyword(keyword))
}

pub fn rewrite_select<'q>(query: &'q str, cache: &SchemaCache) -> Result<RewrittenSelect<'q>> {
    let tokens = tokenize(query);

    let select = find_keyword(&tokens, "SELECT")
        .ok_or_else(|| FetchError::MalformedQuery("query has no SELECT".to_string()))?;
    let from = find_keyword(&tokens[select + 1..], "FROM")
        .map(|pos| pos + select + 1)
        .ok_or_else(|| FetchError::MalformedQuery("query has no FROM after SELECT".to_string()))?;
    let table_token = tokens
        .get(from + 1)
        .ok_or_else(|| FetchError::MalformedQuery("FROM is not followed by a table".to_string()))?;

    let table_name = unquote_identifier(table_token.text);
    let table = cache.table(&table_name)?;

    let wrap = |name: &str, value: &TypedValue| -> (String, bool) {
        if value.tag() == TypeTag::Blob {
            (format!("{}{})", QUOTE_OPEN, name), true)
        } else {
            (name.to_string(), false)
        }
    };

    let selected = &tokens[select + 1..from];
    let mut columns = Vec::with_capacity(selected.len().max(table.len()));
    let mut rewritten = false;

    if selected.first().is_some_and(|t| t.text == "*") {
        for (name, value) in table.iter() {
            let (text, wrapped) = wrap(name, value);
            rewritten |= wrapped;
            columns.push(text);
        }
    } else {
        for token in selected {
            let (_, value) = resolve_column(table, token.text)
                .ok_or_else(|| FetchError::unknown_column(&table_name, token.text))?;
            let (text, wrapped) = wrap(token.text, value);
            rewritten |= wrapped;
            columns.push(text);
        }
    }

    let sql = if rewritten {
        let head = &query[..tokens[select].end];
        let tail = &query[tokens[from].start..];
        Cow::Owned(format!("{} {} {}", head, columns.join(", "), tail))
    } else {
        Cow::Borrowed(query)
    };

    if rewritten {
        debug!(table = %table_name, sql = %sql, "rewrote select for blob transport");
    }

    Ok(RewrittenSelect {
        table: table_name,
        sql,
        rewritten,
    })
}

/// Strips a `quote(...)` wrapper from a result column name.
fn unwrap_quote(name: &str) -> (&str, bool) {
    match name
        .get(..QUOTE_OPEN.len())
        .filter(|p| p.eq_ignore_ascii_case(QUOTE_OPEN))
        .and_then(|_| name[QUOTE_OPEN.len()..].strip_suffix(')'))
    {
        Some(inner) => (inner.trim(), true),
        None => (name, false),
    }
}

fn decode_cell(
    table_name: &str,
    table: &Column,
    name: &str,
    text: Option<&str>,
) -> Result<(String, TypedValue)> {
    let (ident, quoted) = unwrap_quote(name);
    let (col_name, template) = resolve_column(table, ident)
        .ok_or_else(|| FetchError::unknown_column(table_name, ident))?;

    let value = match text {
        None => TypedValue::null_like(template),
        Some("NULL") if quoted => TypedValue::null_like(template),
        Some(text) => TypedValue::parse_like(template, text)?,
    };
    Ok((col_name.to_string(), value))
}

/// Converts engine rows into typed rows shaped by `table`.
pub fn decode_rows(table_name: &str, table: &Column, rows: &[ResultRow]) -> Result<ColumnList> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|(name, text)| decode_cell(table_name, table, name, text))
                .collect::<Result<Column>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::KeyFlags;

    fn cache() -> SchemaCache {
        let mut cache = SchemaCache::new();
        cache.declare(
            "files",
            Column::new()
                .with("id", TypedValue::from_declared_type("INTEGER", KeyFlags::PRIMARY_KEY))
                .with("data", TypedValue::from_declared_type("BLOB", KeyFlags::NORMAL))
                .with("label", TypedValue::from_declared_type("VARCHAR(20)", KeyFlags::NORMAL)),
        );
        cache
    }

    fn kind(err: &eyre::Report) -> Option<ErrorKind> {
        FetchError::kind_of(err)
    }

    #[test]
    fn star_expands_and_wraps_blob_columns() {
        let cache = cache();
        let out = rewrite_select("SELECT * FROM files WHERE id > 3;", &cache).unwrap();
        assert!(out.rewritten);
        assert_eq!(out.table, "files");
        assert_eq!(out.sql, "SELECT id, quote(data), label FROM files WHERE id > 3;");
    }

    #[test]
    fn listed_columns_are_wrapped_individually() {
        let cache = cache();
        let out = rewrite_select("select label, data from files", &cache).unwrap();
        assert_eq!(out.sql, "select label, quote(data) from files");
    }

    #[test]
    fn queries_without_blobs_run_verbatim() {
        let cache = cache();
        let query = "SELECT   id,label\nFROM files ORDER BY id";
        let out = rewrite_select(query, &cache).unwrap();
        assert!(!out.rewritten);
        assert!(matches!(out.sql, Cow::Borrowed(q) if q == query));
    }

    #[test]
    fn qualified_and_quoted_columns_resolve() {
        let cache = cache();
        let out = rewrite_select("SELECT files.data, \"label\" FROM files", &cache).unwrap();
        assert_eq!(out.sql, "SELECT quote(files.data), \"label\" FROM files");
    }

    #[test]
    fn missing_keywords_are_malformed() {
        let cache = cache();
        for q in ["UPDATE files SET id = 1", "SELECT id", "SELECT id FROM"] {
            let err = rewrite_select(q, &cache).unwrap_err();
            assert_eq!(kind(&err), Some(ErrorKind::MalformedQuery), "{}", q);
        }
    }

    #[test]
    fn from_before_select_does_not_count() {
        let cache = cache();
        let err = rewrite_select("FROM files SELECT id", &cache).unwrap_err();
        assert_eq!(kind(&err), Some(ErrorKind::MalformedQuery));
    }

    #[test]
    fn unknown_table_and_column_are_reported() {
        let cache = cache();
        let err = rewrite_select("SELECT x FROM missing_table", &cache).unwrap_err();
        assert_eq!(kind(&err), Some(ErrorKind::UnknownTable));

        let err = rewrite_select("SELECT nope FROM files", &cache).unwrap_err();
        assert_eq!(kind(&err), Some(ErrorKind::UnknownColumn));
    }

    #[test]
    fn rows_decode_with_cached_types() {
        let cache = cache();
        let table = cache.table("files").unwrap();
        let rows = vec![
            ResultRow::new()
                .with("id", Some("1"))
                .with("quote(data)", Some("X'00FF1A'"))
                .with("label", Some("first")),
            ResultRow::new()
                .with("id", Some("2"))
                .with("quote(data)", Some("NULL"))
                .with("label", None),
        ];

        let out = decode_rows("files", table, &rows).unwrap();
        assert_eq!(out.len(), 2);

        let first = &out[0];
        assert_eq!(first.get("id").unwrap().get::<i64>().unwrap(), 1);
        assert_eq!(
            first.get("data").unwrap().get::<Vec<u8>>().unwrap(),
            vec![0x00, 0xFF, 0x1A]
        );
        let label = first.get("label").unwrap();
        assert_eq!(label.get::<String>().unwrap(), "first");
        assert_eq!(label.declared_type_text(false), "VARCHAR(20)");

        let second = &out[1];
        assert!(second.get("data").unwrap().is_null());
        assert!(second.get("label").unwrap().is_null());
    }

    #[test]
    fn unresolvable_result_columns_fail() {
        let cache = cache();
        let table = cache.table("files").unwrap();
        let rows = vec![ResultRow::new().with("count(*)", Some("3"))];
        let err = decode_rows("files", table, &rows).unwrap_err();
        assert_eq!(kind(&err), Some(ErrorKind::UnknownColumn));
    }

    #[test]
    fn bad_cell_text_is_a_parse_error() {
        let cache = cache();
        let table = cache.table("files").unwrap();
        let rows = vec![ResultRow::new().with("id", Some("not a number"))];
        let err = decode_rows("files", table, &rows).unwrap_err();
        assert_eq!(kind(&err), Some(ErrorKind::ParseError));
    }
}
