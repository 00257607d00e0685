//! # Generate-and-Execute Helpers
//!
//! Thin `Fetcher` wrappers that generate a statement from typed rows and run
//! it right away.
//!
//! | Method | Generator |
//! |--------|-----------|
//! | `create` | `gen_create` |
//! | `create_table` | `gen_create_table` |
//! | `create_rows` | `gen_create_rows` |
//! | `create_row` | `gen_create_row` |
//! | `insert` | `gen_insert` |
//! | `insert_rows` | `gen_insert_rows` |
//! | `update` | `gen_update` |
//!
//! The CREATE variants declare their tables in the schema cache before the
//! engine sees them, then the execute path resyncs the cache once.

use super::{ExecResult, Fetcher};
use crate::engine::Engine;
use crate::sql::{
    gen_create, gen_create_row, gen_create_rows, gen_create_table, gen_insert, gen_insert_rows,
    gen_update,
};
use crate::types::{Column, Table, TableInfo};
use eyre::Result;

impl<E: Engine> Fetcher<E> {
    pub fn create(&mut self, tables: &TableInfo) -> Result<ExecResult> {
        let sql = gen_create(&mut self.cache, tables)?;
        self.exec(&sql)
    }

    pub fn create_table(&mut self, tables: &Table) -> Result<ExecResult> {
        let sql = gen_create_table(&mut self.cache, tables)?;
        self.exec(&sql)
    }

    pub fn create_rows(&mut self, name: &str, rows: &[Column]) -> Result<ExecResult> {
        let sql = gen_create_rows(&mut self.cache, name, rows)?;
        self.exec(&sql)
    }

    pub fn create_row(&mut self, name: &str, row: &Column) -> Result<ExecResult> {
        let sql = gen_create_row(&mut self.cache, name, row)?;
        self.exec(&sql)
    }

    pub fn insert(&mut self, name: &str, row: &Column) -> Result<ExecResult> {
        let sql = gen_insert(&self.cache, name, row)?;
        self.exec(&sql)
    }

    pub fn insert_rows(&mut self, name: &str, rows: &[Column]) -> Result<ExecResult> {
        let sql = gen_insert_rows(&self.cache, name, rows)?;
        self.exec(&sql)
    }

    pub fn update(&mut self, name: &str, row: &Column) -> Result<ExecResult> {
        let sql = gen_update(&self.cache, name, row)?;
        self.exec(&sql)
    }
}
