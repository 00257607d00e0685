//! # SQLite Engine
//!
//! `rusqlite`-backed [`Engine`]. Result cells are turned into text the same
//! way `sqlite3_exec` hands them to its callback:
//!
//! | Storage class | Text |
//! |---------------|------|
//! | NULL | `None` |
//! | INTEGER | decimal |
//! | REAL | decimal |
//! | TEXT | as stored (lossy if not UTF-8) |
//! | BLOB | raw bytes read as UTF-8, lossy |
//!
//! The BLOB row is why `Fetcher::fetch` wraps binary columns in `quote()`:
//! arbitrary bytes do not survive this conversion.

use super::{Engine, ResultRow};
use crate::error::FetchError;
use eyre::Result;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub struct SqliteEngine {
    conn: Connection,
}

fn engine_error(err: rusqlite::Error) -> eyre::Report {
    FetchError::Engine(err.to_string()).into()
}

fn open_error(err: rusqlite::Error) -> eyre::Report {
    FetchError::Open(err.to_string()).into()
}

impl SqliteEngine {
    pub fn open<P: AsRef<Path>>(path: P, flags: OpenFlags, vfs: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let conn = match vfs {
            Some(vfs) => Connection::open_with_flags_and_vfs(path, flags, vfs),
            None => Connection::open_with_flags(path, flags),
        }
        .map_err(open_error)?;
        debug!(path = %path.display(), ?vfs, "opened sqlite database");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(open_error)?;
        Ok(Self { conn })
    }

    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
        self.conn.busy_timeout(timeout).map_err(engine_error)
    }

    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| engine_error(err))
    }
}

fn cell_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

impl Engine for SqliteEngine {
    fn execute(&mut self, sql: &str) -> Result<Vec<ResultRow>> {
        let mut stmt = self.conn.prepare(sql).map_err(engine_error)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query([]).map_err(engine_error)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(engine_error)? {
            let mut result = ResultRow::new();
            for (idx, name) in names.iter().enumerate() {
                let value = row.get_ref(idx).map_err(engine_error)?;
                result.push(name.as_str(), cell_text(value));
            }
            out.push(result);
        }
        Ok(out)
    }
}
