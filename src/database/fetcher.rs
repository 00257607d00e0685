use super::builder::FetcherBuilder;
use crate::engine::{Engine, ResultRow, SqliteEngine};
use crate::error::FetchError;
use crate::schema::SchemaCache;
use crate::sql::split_statements;
use eyre::{Result, WrapErr};
use std::path::Path;
use tracing::{debug, warn};

/// Outcome of one `exec` call: the text that was run and every row it
/// produced, across all of its statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExecResult {
    pub sql: String,
    pub rows: Vec<ResultRow>,
}

/// Owns one engine plus the schema snapshot describing it.
pub struct Fetcher<E: Engine = SqliteEngine> {
    pub(super) engine: E,
    pub(super) cache: SchemaCache,
}

impl Fetcher<SqliteEngine> {
    pub fn builder() -> FetcherBuilder {
        FetcherBuilder::new()
    }

    /// Opens (creating if needed) the database at `path` with default settings.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        FetcherBuilder::new().path(path).open()
    }

    pub fn open_in_memory() -> Result<Self> {
        FetcherBuilder::new().in_memory().open()
    }

    pub fn close(self) -> Result<()> {
        self.engine.close()
    }
}

impl<E: Engine> Fetcher<E> {
    /// Wraps `engine` and loads the schema snapshot from it.
    pub fn with_engine(engine: E) -> Result<Self> {
        let mut fetcher = Self::from_parts(engine, SchemaCache::new());
        fetcher
            .refresh_schema()
            .wrap_err("initial schema introspection failed")?;
        Ok(fetcher)
    }

    /// Wraps `engine` with an existing snapshot; nothing is introspected.
    pub fn from_parts(engine: E, cache: SchemaCache) -> Self {
        Self { engine, cache }
    }

    pub fn into_parts(self) -> (E, SchemaCache) {
        (self.engine, self.cache)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn schema(&self) -> &SchemaCache {
        &self.cache
    }

    /// Direct access for the free generator functions. `gen_create` marks
    /// the cache dirty; a bare `SchemaCache::declare` does not.
    pub fn schema_mut(&mut self) -> &mut SchemaCache {
        &mut self.cache
    }

    pub fn refresh_schema(&mut self) -> Result<()> {
        self.cache.refresh(&mut self.engine)
    }

    /// Runs every statement in `sql` in order, collecting their rows.
    ///
    /// Only CREATE generation marks the schema dirty; hand-written DDL does
    /// not, so a DROP or ALTER run here leaves the snapshot stale until the
    /// next generated CREATE or `refresh_schema`. Before returning, a dirty
    /// schema is refreshed exactly once. A refresh failure is reported as an
    /// `EngineError` unless a statement already failed, in which case the
    /// statement's error wins.
    pub fn exec(&mut self, sql: &str) -> Result<ExecResult> {
        let outcome = self.run_statements(sql);

        let resync = if self.cache.take_dirty() {
            self.refresh_schema()
        } else {
            Ok(())
        };

        match (outcome, resync) {
            (Ok(rows), Ok(())) => Ok(ExecResult {
                sql: sql.to_string(),
                rows,
            }),
            (Ok(_), Err(refresh)) => Err(FetchError::Engine(format!(
                "statement succeeded but schema refresh failed: {:#}",
                refresh
            ))
            .into()),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(refresh)) => {
                warn!(error = %format!("{:#}", refresh), "schema refresh failed after statement error");
                Err(err)
            }
        }
    }

    fn run_statements(&mut self, sql: &str) -> Result<Vec<ResultRow>> {
        let mut rows = Vec::new();
        for statement in split_statements(sql) {
            debug!(sql = statement, "executing");
            let produced = self
                .engine
                .execute(statement)
                .wrap_err_with(|| format!("failed to execute: {}", statement))?;
            rows.extend(produced);
        }
        Ok(rows)
    }
}
