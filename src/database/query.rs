//! # Typed SELECT
//!
//! `fetch` is the read path: rewrite the SELECT against the cached schema,
//! run it through `exec` (so the dirty-schema resync applies), then decode
//! the text rows into `TypedValue`s shaped by the cached columns.
//!
//! Malformed queries and unknown tables or columns are rejected before the
//! engine is called at all. Rows are decoded against the column shapes as
//! they were cached when the query was rewritten.

use super::Fetcher;
use crate::engine::Engine;
use crate::sql::{decode_rows, rewrite_select};
use crate::types::ColumnList;
use eyre::Result;
use tracing::debug;

impl<E: Engine> Fetcher<E> {
    pub fn fetch(&mut self, query: &str) -> Result<ColumnList> {
        let select = rewrite_select(query, &self.cache)?;
        let shape = self.cache.table(&select.table)?.clone();

        let result = self.exec(&select.sql)?;
        let rows = decode_rows(&select.table, &shape, &result.rows)?;
        debug!(table = %select.table, rows = rows.len(), "fetched");
        Ok(rows)
    }
}
