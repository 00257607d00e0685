//! # Schema Cache
//!
//! Snapshot of the live database's tables as `TableInfo`: one `Column` of
//! representative values per table, each carrying the column's declared
//! type, constraint flags and (if any) parsed default.
//!
//! ## Freshness
//!
//! ```text
//! open ──► refresh ──► [clean]
//!                        │ declare (generator) / DDL exec
//!                        ▼
//!                     [dirty] ──► next exec ──► take_dirty + refresh ──► [clean]
//! ```
//!
//! The cache is never invalidated on DROP; a dropped table stays visible
//! until something marks the cache dirty and a refresh runs.
//!
//! ## Refresh
//!
//! A refresh builds a complete new `TableInfo` and only swaps it in when
//! every table introspected cleanly, so a failed refresh leaves the
//! previous snapshot intact.

use crate::engine::{ColumnInfo, Engine};
use crate::error::FetchError;
use crate::parsing::unquote_text_literal;
use crate::types::{Column, KeyFlags, TableInfo, TypedValue};
use eyre::{Result, WrapErr};
use tracing::{debug, warn};

#[derive(Debug, Default, Clone)]
pub struct SchemaCache {
    tables: TableInfo,
    dirty: bool,
    refreshes: u64,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: TableInfo) -> Self {
        Self {
            tables,
            ..Self::default()
        }
    }

    /// Replaces the snapshot with the engine's current catalog.
    pub fn refresh<E: Engine + ?Sized>(&mut self, engine: &mut E) -> Result<()> {
        let tables = introspect(engine)?;
        debug!(tables = tables.len(), "schema cache refreshed");
        self.tables = tables;
        self.refreshes += 1;
        Ok(())
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the dirty flag and clears it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Records `name` optimistically, before the engine has seen it.
    /// Existing entries are left alone. Returns whether it was inserted.
    pub fn declare(&mut self, name: impl Into<String>, column: Column) -> bool {
        let name = name.into();
        if self.tables.contains_key(&name) {
            return false;
        }
        debug!(table = %name, columns = column.len(), "declared table in schema cache");
        self.tables.insert(name, column);
        true
    }

    pub fn table(&self, name: &str) -> Result<&Column> {
        self.tables
            .get(name)
            .ok_or_else(|| FetchError::UnknownTable(name.to_string()).into())
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn tables(&self) -> &TableInfo {
        &self.tables
    }

    /// Number of successful refreshes since construction.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }
}

/// Reads every user table from the engine's catalog.
pub fn introspect<E: Engine + ?Sized>(engine: &mut E) -> Result<TableInfo> {
    let mut tables = TableInfo::new();
    for name in engine
        .introspect_tables()
        .wrap_err("failed to list tables")?
    {
        let infos = engine
            .introspect_columns(&name)
            .wrap_err_with(|| format!("failed to introspect table '{}'", name))?;
        let column = infos
            .iter()
            .map(|info| (info.name.clone(), column_value(&name, info)))
            .collect();
        tables.insert(name, column);
    }
    Ok(tables)
}

fn column_value(table: &str, info: &ColumnInfo) -> TypedValue {
    let mut flags = KeyFlags::NORMAL;
    if info.primary_key {
        flags |= KeyFlags::PRIMARY_KEY;
    }
    if info.not_null {
        flags |= KeyFlags::NOT_NULL;
    }

    let default = match info.default.as_deref() {
        Some(text) if !text.eq_ignore_ascii_case("NULL") => text,
        _ => return TypedValue::from_declared_type(&info.declared_type, flags),
    };

    let text = unquote_text_literal(default);
    match TypedValue::from_default_text(
        info.declared_type.as_str(),
        flags | KeyFlags::HAS_DEFAULT,
        &text,
    ) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                table,
                column = %info.name,
                default,
                error = %err,
                "dropping unparsable column default"
            );
            TypedValue::from_declared_type(&info.declared_type, flags)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ResultRow;
    use crate::error::ErrorKind;
    use crate::types::TypeTag;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Catalog {
        tables: Vec<&'static str>,
        columns: HashMap<&'static str, Vec<ColumnInfo>>,
        fail_columns: bool,
    }

    impl Engine for Catalog {
        fn execute(&mut self, _sql: &str) -> Result<Vec<ResultRow>> {
            Ok(Vec::new())
        }

        fn introspect_tables(&mut self) -> Result<Vec<String>> {
            Ok(self.tables.iter().map(|t| t.to_string()).collect())
        }

        fn introspect_columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
            if self.fail_columns {
                return Err(FetchError::Engine("disk I/O error".to_string()).into());
            }
            Ok(self.columns.get(table).cloned().unwrap_or_default())
        }
    }

    fn info(name: &str, ty: &str, pk: bool, default: Option<&str>) -> ColumnInfo {
        ColumnInfo {
            name: name.to_string(),
            declared_type: ty.to_string(),
            primary_key: pk,
            not_null: false,
            default: default.map(str::to_string),
        }
    }

    fn catalog() -> Catalog {
        let mut columns = HashMap::new();
        columns.insert(
            "users",
            vec![
                info("id", "INTEGER", true, None),
                info("name", "VARCHAR(40)", false, Some("'o''brien'")),
                info("age", "SMALLINT", false, Some("18")),
                info("avatar", "BLOB", false, Some("X'00ff'")),
                info("score", "INTEGER", false, Some("CURRENT_TIMESTAMP")),
            ],
        );
        columns.insert("logs", vec![info("line", "TEXT", false, Some("NULL"))]);
        Catalog {
            tables: vec!["logs", "users"],
            columns,
            fail_columns: false,
        }
    }

    #[test]
    fn refresh_builds_typed_columns_in_declared_order() {
        let mut engine = catalog();
        let mut cache = SchemaCache::new();
        cache.refresh(&mut engine).unwrap();

        assert_eq!(cache.refresh_count(), 1);
        let users = cache.table("users").unwrap();
        assert_eq!(
            users.names().collect::<Vec<_>>(),
            ["id", "name", "age", "avatar", "score"]
        );

        let id = users.get("id").unwrap();
        assert_eq!(id.tag(), TypeTag::Int64);
        assert!(id.is_primary_key());

        let name = users.get("name").unwrap();
        assert_eq!(name.tag(), TypeTag::Text);
        assert!(name.flags().has_default());
        assert_eq!(name.get::<String>().unwrap(), "o'brien");
        assert_eq!(name.declared_type_text(false), "VARCHAR(40)");

        assert_eq!(users.get("age").unwrap().get::<i16>().unwrap(), 18);
        assert_eq!(
            users.get("avatar").unwrap().get::<Vec<u8>>().unwrap(),
            vec![0x00, 0xFF]
        );
    }

    #[test]
    fn unparsable_and_null_defaults_are_dropped() {
        let mut engine = catalog();
        let mut cache = SchemaCache::new();
        cache.refresh(&mut engine).unwrap();

        let score = cache.table("users").unwrap().get("score").unwrap();
        assert_eq!(score.tag(), TypeTag::Int64);
        assert!(!score.flags().has_default());

        let line = cache.table("logs").unwrap().get("line").unwrap();
        assert!(!line.flags().has_default());
    }

    #[test]
    fn failed_refresh_keeps_previous_snapshot() {
        let mut engine = catalog();
        let mut cache = SchemaCache::new();
        cache.refresh(&mut engine).unwrap();

        engine.fail_columns = true;
        let err = cache.refresh(&mut engine).unwrap_err();
        assert_eq!(FetchError::kind_of(&err), Some(ErrorKind::EngineError));
        assert!(cache.contains("users"));
        assert_eq!(cache.refresh_count(), 1);
    }

    #[test]
    fn declare_only_inserts_absent_tables() {
        let mut cache = SchemaCache::new();
        let shape = Column::new().with("a", TypedValue::of(1i32));

        assert!(cache.declare("t", shape.clone()));
        assert!(!cache.declare("t", Column::new()));
        assert_eq!(cache.table("t").unwrap(), &shape);
    }

    #[test]
    fn dirty_flag_is_taken_once() {
        let mut cache = SchemaCache::new();
        assert!(!cache.take_dirty());
        cache.mark_dirty();
        cache.mark_dirty();
        assert!(cache.is_dirty());
        assert!(cache.take_dirty());
        assert!(!cache.take_dirty());
    }

    #[test]
    fn missing_table_is_unknown_table() {
        let cache = SchemaCache::new();
        let err = cache.table("ghost").unwrap_err();
        assert_eq!(FetchError::kind_of(&err), Some(ErrorKind::UnknownTable));
        assert!(cache.get("ghost").is_none());
    }
}
