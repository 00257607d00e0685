//! # Statement Generation
//!
//! Turns typed rows into SQL text. Nothing here talks to the engine; the
//! only side effect is on the schema cache, where CREATE generation
//! declares the new table and marks the cache dirty so the next execute
//! resyncs it.
//!
//! ## Output Shapes
//!
//! | Function | Text |
//! |----------|------|
//! | `gen_create` | `CREATE TABLE t(a INTEGER PRIMARY KEY, b TEXT); ` per table |
//! | `gen_insert` | `INSERT INTO t(a, b) VALUES(1, 'x'); ` |
//! | `gen_update` | `UPDATE t SET b = 'x' WHERE a = 1` |
//! | `gen_create_rows` | one CREATE for the first row's shape, then one INSERT per row |
//!
//! Columns are emitted in the row's declaration order. Literals come from
//! `TypedValue::render_literal`, except that a `None` value is written as
//! `NULL`. Text is not escaped. Infinite and NaN floats have no SQL
//! literal and are refused with a `SchemaError`.
//!
//! ## Validation
//!
//! INSERT and UPDATE require the table to be in the schema cache and every
//! named column to exist there; anything else is a `SchemaError`. So is an
//! empty row.

use crate::error::FetchError;
use crate::schema::SchemaCache;
use crate::types::{Column, Table, TableInfo, TypeTag, TypedValue};
use eyre::Result;
use tracing::{debug, warn};

fn schema_error(message: String) -> eyre::Report {
    FetchError::Schema(message).into()
}

fn is_finite(value: &TypedValue) -> bool {
    match value.tag() {
        TypeTag::Float => value.get::<f32>().map_or(true, f32::is_finite),
        TypeTag::Double => value.get::<f64>().map_or(true, f64::is_finite),
        _ => true,
    }
}

fn sql_literal(column: &str, value: &TypedValue) -> Result<String> {
    if value.is_null() {
        return Ok("NULL".to_string());
    }
    if !is_finite(value) {
        return Err(schema_error(format!(
            "column '{}' holds {}, which has no SQL literal",
            column,
            value.render_literal()
        )));
    }
    Ok(value.render_literal())
}

fn create_statement(name: &str, column: &Column) -> Result<String> {
    if column.is_empty() {
        return Err(schema_error(format!("table '{}' has no columns", name)));
    }
    let mut defs = Vec::with_capacity(column.len());
    for (col, value) in column.iter() {
        if value.flags().has_default() {
            sql_literal(col, value)?;
        }
        defs.push(format!("{} {}", col, value.declared_type_text(true)));
    }
    Ok(format!("CREATE TABLE {}({}); ", name, defs.join(", ")))
}

fn check_columns(cache: &SchemaCache, name: &str, column: &Column) -> Result<()> {
    if column.is_empty() {
        return Err(schema_error(format!("no columns given for table '{}'", name)));
    }
    let known = cache
        .get(name)
        .ok_or_else(|| schema_error(format!("table '{}' is not in the schema", name)))?;
    match column.names().find(|col| !known.contains(col)) {
        Some(missing) => Err(schema_error(format!(
            "column '{}' does not exist in table '{}'",
            missing, name
        ))),
        None => Ok(()),
    }
}

/// `CREATE TABLE` for every entry, declaring each new table in `cache`.
///
/// Every statement is built before the cache is touched, so a failure
/// leaves `cache` exactly as it was.
pub fn gen_create(cache: &mut SchemaCache, tables: &TableInfo) -> Result<String> {
    let mut sql = String::new();
    for (name, column) in tables {
        sql.push_str(&create_statement(name, column)?);
    }
    for (name, column) in tables {
        cache.declare(name.as_str(), column.clone());
    }
    if !tables.is_empty() {
        cache.mark_dirty();
    }
    debug!(tables = tables.len(), %sql, "generated create");
    Ok(sql)
}

/// CREATE for the shape of `rows[0]`, then an INSERT per row. The INSERTs
/// are checked against the shape the cache will hold before anything is
/// declared, so a bad row leaves `cache` untouched.
pub fn gen_create_rows(cache: &mut SchemaCache, name: &str, rows: &[Column]) -> Result<String> {
    let first = rows
        .first()
        .ok_or_else(|| schema_error(format!("no rows given for table '{}'", name)))?;

    let mut shape = TableInfo::new();
    shape.insert(name.to_string(), first.clone());

    let mut staged = TableInfo::new();
    staged.insert(name.to_string(), cache.get(name).unwrap_or(first).clone());
    let inserts = gen_insert_rows(&SchemaCache::from_tables(staged), name, rows)?;

    let mut sql = gen_create(cache, &shape)?;
    sql.push_str(&inserts);
    Ok(sql)
}

pub fn gen_create_row(cache: &mut SchemaCache, name: &str, row: &Column) -> Result<String> {
    gen_create_rows(cache, name, std::slice::from_ref(row))
}

/// [`gen_create_rows`] for every table; the first failure stops generation.
pub fn gen_create_table(cache: &mut SchemaCache, tables: &Table) -> Result<String> {
    let mut sql = String::new();
    for (name, rows) in tables {
        sql.push_str(&gen_create_rows(cache, name, rows)?);
    }
    Ok(sql)
}

pub fn gen_insert(cache: &SchemaCache, name: &str, row: &Column) -> Result<String> {
    check_columns(cache, name, row)?;

    let names: Vec<&str> = row.names().collect();
    let values = row
        .iter()
        .map(|(col, v)| sql_literal(col, v))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!(
        "INSERT INTO {}({}) VALUES({}); ",
        name,
        names.join(", "),
        values.join(", ")
    ))
}

pub fn gen_insert_rows(cache: &SchemaCache, name: &str, rows: &[Column]) -> Result<String> {
    let mut sql = String::new();
    for row in rows {
        sql.push_str(&gen_insert(cache, name, row)?);
    }
    Ok(sql)
}

/// `UPDATE` keyed on the row's first primary-key column. Other primary-key
/// columns are left out of the SET list. Without a key the statement has
/// no WHERE clause and touches every row.
pub fn gen_update(cache: &SchemaCache, name: &str, row: &Column) -> Result<String> {
    check_columns(cache, name, row)?;

    let assignments = row
        .iter()
        .filter(|(_, v)| !v.is_primary_key())
        .map(|(col, v)| Ok(format!("{} = {}", col, sql_literal(col, v)?)))
        .collect::<Result<Vec<_>>>()?;
    if assignments.is_empty() {
        return Err(schema_error(format!(
            "nothing to update in table '{}': every column is a primary key",
            name
        )));
    }

    let mut sql = format!("UPDATE {} SET {}", name, assignments.join(", "));
    match row.primary_key() {
        Some((key, value)) => {
            sql.push_str(&format!(" WHERE {} = {}", key, sql_literal(key, value)?));
        }
        None => warn!(table = name, "update without primary key affects every row"),
    }
    Ok(sql)
}
