//! # Execution Engine Boundary
//!
//! sqlfetch never evaluates SQL itself. Everything it generates or rewrites
//! is handed to an [`Engine`], which runs exactly one statement per call and
//! returns every result cell as text (or NULL).
//!
//! ## Contract
//!
//! | Method | Returns |
//! |--------|---------|
//! | `execute(sql)` | rows of `(result column name, text or NULL)` |
//! | `introspect_tables()` | user table names |
//! | `introspect_columns(table)` | `ColumnInfo` per column, declaration order |
//!
//! Failures are reported as `FetchError::Engine` carrying the engine's
//! message. The two introspection methods have default implementations that
//! query the SQLite catalog through `execute`, so an engine only has to
//! provide `execute`.
//!
//! ## Implementations
//!
//! - [`SqliteEngine`]: `rusqlite` connection, the default for `Fetcher`

mod sqlite;

pub use sqlite::SqliteEngine;

use crate::error::FetchError;
use eyre::Result;

/// One result row: cells in result-column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultRow {
    cells: Vec<(String, Option<String>)>,
}

impl ResultRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: Option<String>) {
        self.cells.push((name.into(), value));
    }

    pub fn with(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.push(name, value.map(str::to_string));
        self
    }

    /// `None` if no such column, `Some(None)` if the cell is NULL.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.cells
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Catalog description of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
    pub primary_key: bool,
    pub not_null: bool,
    pub default: Option<String>,
}

pub trait Engine {
    /// Runs a single statement.
    fn execute(&mut self, sql: &str) -> Result<Vec<ResultRow>>;

    fn introspect_tables(&mut self) -> Result<Vec<String>> {
        let rows = self.execute(
            "SELECT name FROM sqlite_master WHERE type = 'table' \
             AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' ORDER BY name",
        )?;
        rows.iter()
            .map(|row| -> Result<String> { Ok(required(row, "name")?.to_string()) })
            .collect()
    }

    fn introspect_columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        let sql = format!("PRAGMA table_info(\"{}\")", table.replace('"', "\"\""));
        let rows = self.execute(&sql)?;
        rows.iter()
            .map(|row| -> Result<ColumnInfo> {
                Ok(ColumnInfo {
                    name: required(row, "name")?.to_string(),
                    declared_type: row.get("type").flatten().unwrap_or("").to_string(),
                    primary_key: row.get("pk").flatten() == Some("1"),
                    not_null: row.get("notnull").flatten() == Some("1"),
                    default: row
                        .get("dflt_value")
                        .flatten()
                        .filter(|d| !d.is_empty())
                        .map(str::to_string),
                })
            })
            .collect()
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn execute(&mut self, sql: &str) -> Result<Vec<ResultRow>> {
        (**self).execute(sql)
    }

    fn introspect_tables(&mut self) -> Result<Vec<String>> {
        (**self).introspect_tables()
    }

    fn introspect_columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        (**self).introspect_columns(table)
    }
}

fn required<'r>(row: &'r ResultRow, name: &str) -> Result<&'r str> {
    row.get(name).flatten().ok_or_else(|| {
        FetchError::Engine(format!("catalog row is missing column '{}'", name)).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Canned {
        seen: Vec<String>,
        replies: VecDeque<Vec<ResultRow>>,
    }

    impl Engine for Canned {
        fn execute(&mut self, sql: &str) -> Result<Vec<ResultRow>> {
            self.seen.push(sql.to_string());
            Ok(self.replies.pop_front().unwrap_or_default())
        }
    }

    #[test]
    fn default_column_introspection_reads_pragma_rows() {
        let mut engine = Canned {
            seen: Vec::new(),
            replies: VecDeque::from([vec![
                ResultRow::new()
                    .with("cid", Some("0"))
                    .with("name", Some("id"))
                    .with("type", Some("INTEGER"))
                    .with("notnull", Some("0"))
                    .with("dflt_value", None)
                    .with("pk", Some("1")),
                ResultRow::new()
                    .with("cid", Some("1"))
                    .with("name", Some("label"))
                    .with("type", Some("TEXT"))
                    .with("notnull", Some("1"))
                    .with("dflt_value", Some("'x'"))
                    .with("pk", Some("0")),
            ]]),
        };

        let cols = engine.introspect_columns("items").unwrap();
        assert_eq!(engine.seen, ["PRAGMA table_info(\"items\")"]);
        assert_eq!(cols.len(), 2);
        assert!(cols[0].primary_key);
        assert_eq!(cols[0].default, None);
        assert!(cols[1].not_null);
        assert_eq!(cols[1].default.as_deref(), Some("'x'"));
    }

    #[test]
    fn catalog_rows_without_name_are_engine_errors() {
        let mut engine = Canned {
            seen: Vec::new(),
            replies: VecDeque::from([vec![ResultRow::new().with("tbl", Some("x"))]]),
        };
        let err = engine.introspect_tables().unwrap_err();
        assert_eq!(
            FetchError::kind_of(&err),
            Some(crate::error::ErrorKind::EngineError)
        );
    }

    #[test]
    fn result_row_distinguishes_missing_from_null() {
        let row = ResultRow::new().with("a", None).with("b", Some("2"));
        assert_eq!(row.get("a"), Some(None));
        assert_eq!(row.get("b"), Some(Some("2")));
        assert_eq!(row.get("c"), None);
    }
}
