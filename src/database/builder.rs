//! # Fetcher Builder
//!
//! `FetcherBuilder` configures how the SQLite connection behind a `Fetcher`
//! is opened. Settings are chained and applied by `open()`.
//!
//! ## Configuration Options
//!
//! | Option          | Default                       | Description                              |
//! |-----------------|-------------------------------|------------------------------------------|
//! | path / in_memory| required                      | Database file, or a private in-memory db |
//! | flags           | read-write, create, URI       | Raw `rusqlite::OpenFlags`                |
//! | read_only       | off                           | Shorthand for read-only flags            |
//! | vfs             | SQLite default                | Named VFS to open through                |
//! | busy_timeout    | 5 s                           | How long to wait on a locked database    |
//! | refresh_on_open | on                            | Introspect the schema before returning   |
//!
//! ## Usage Examples
//!
//! ```ignore
//! let fetcher = Fetcher::builder()
//!     .path("./app.db")
//!     .busy_timeout(Duration::from_secs(1))
//!     .open()?;
//!
//! let scratch = Fetcher::builder().in_memory().open()?;
//! ```
//!
//! Failing to open the connection is an `Open` error and no `Fetcher` is
//! produced. A failing initial introspection is reported the same way.

use super::Fetcher;
use crate::engine::SqliteEngine;
use crate::error::FetchError;
use crate::schema::SchemaCache;
use eyre::Result;
use rusqlite::OpenFlags;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Clone)]
enum Target {
    File(PathBuf),
    Memory,
}

#[derive(Debug, Clone)]
pub struct FetcherBuilder {
    target: Option<Target>,
    flags: OpenFlags,
    vfs: Option<String>,
    busy_timeout: Duration,
    refresh_on_open: bool,
}

impl Default for FetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FetcherBuilder {
    pub fn new() -> Self {
        Self {
            target: None,
            flags: OpenFlags::default(),
            vfs: None,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            refresh_on_open: true,
        }
    }

    pub fn path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.target = Some(Target::File(path.as_ref().to_path_buf()));
        self
    }

    pub fn in_memory(mut self) -> Self {
        self.target = Some(Target::Memory);
        self
    }

    pub fn flags(mut self, flags: OpenFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Opens without write access. The file must already exist.
    pub fn read_only(mut self) -> Self {
        self.flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        self
    }

    pub fn vfs(mut self, name: impl Into<String>) -> Self {
        self.vfs = Some(name.into());
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// When off, the `Fetcher` starts with an empty schema snapshot until
    /// `refresh_schema` or a schema-changing `exec` fills it.
    pub fn refresh_on_open(mut self, refresh: bool) -> Self {
        self.refresh_on_open = refresh;
        self
    }

    pub fn open(self) -> Result<Fetcher<SqliteEngine>> {
        let path = match &self.target {
            Some(Target::File(path)) => path.clone(),
            Some(Target::Memory) => PathBuf::from(MEMORY_PATH),
            None => {
                return Err(FetchError::Open("no database path configured".to_string()).into())
            }
        };

        let engine = SqliteEngine::open(&path, self.flags, self.vfs.as_deref())?;
        engine.set_busy_timeout(self.busy_timeout)?;

        let mut fetcher = Fetcher::from_parts(engine, SchemaCache::new());
        if self.refresh_on_open {
            fetcher.refresh_schema().map_err(|err| {
                FetchError::Open(format!(
                    "schema introspection of {} failed: {:#}",
                    path.display(),
                    err
                ))
            })?;
        }
        Ok(fetcher)
    }

    pub fn get_path(&self) -> Option<&Path> {
        match &self.target {
            Some(Target::File(path)) => Some(path),
            _ => None,
        }
    }

    pub fn get_busy_timeout(&self) -> Duration {
        self.busy_timeout
    }
}
