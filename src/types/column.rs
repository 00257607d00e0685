//! # Rows and Table Shapes
//!
//! A [`Column`] is one row: column names mapped to values, in declaration
//! order. That order is what generated SQL follows, so insertion order is
//! preserved and re-inserting an existing name replaces the value in place.
//!
//! | Alias | Shape | Used for |
//! |-------|-------|----------|
//! | `ColumnList` | `Vec<Column>` | rows sharing one shape |
//! | `TableInfo` | table name -> `Column` | one schema row per table |
//! | `Table` | table name -> `ColumnList` | schema plus bulk data |
//!
//! Both maps iterate in table-name order.

use super::TypedValue;
use std::collections::BTreeMap;

pub type ColumnList = Vec<Column>;
pub type TableInfo = BTreeMap<String, Column>;
pub type Table = BTreeMap<String, ColumnList>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Column {
    entries: Vec<(String, TypedValue)>,
}

impl Column {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts or replaces `name`, returning the previous value if any.
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: TypedValue) -> Option<TypedValue> {
        let name = name.into();
        match self.position(&name) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: TypedValue) -> Self {
        self.insert(name, value);
        self
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TypedValue> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First column flagged `PRIMARY_KEY`; later flagged columns are ignored.
    pub fn primary_key(&self) -> Option<(&str, &TypedValue)> {
        self.iter().find(|(_, v)| v.is_primary_key())
    }
}

impl<N: Into<String>> FromIterator<(N, TypedValue)> for Column {
    fn from_iter<I: IntoIterator<Item = (N, TypedValue)>>(iter: I) -> Self {
        let mut column = Column::new();
        for (name, value) in iter {
            column.insert(name, value);
        }
        column
    }
}

impl IntoIterator for Column {
    type Item = (String, TypedValue);
    type IntoIter = std::vec::IntoIter<(String, TypedValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeyFlags, TypeTag};

    #[test]
    fn insertion_order_is_kept() {
        let col = Column::new()
            .with("zeta", TypedValue::of(1i64))
            .with("alpha", TypedValue::of(2i64))
            .with("mid", TypedValue::of(3i64));

        let names: Vec<_> = col.names().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn replacing_keeps_position() {
        let mut col = Column::new()
            .with("a", TypedValue::of(1i64))
            .with("b", TypedValue::of(2i64));

        let old = col.insert("a", TypedValue::of("x"));
        assert_eq!(old.unwrap().get::<i64>().unwrap(), 1);
        assert_eq!(col.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(col.get("a").unwrap().tag(), TypeTag::Text);
        assert_eq!(col.len(), 2);
    }

    #[test]
    fn first_primary_key_wins() {
        let col = Column::new()
            .with("name", TypedValue::of("n"))
            .with(
                "id",
                TypedValue::from_tag(TypeTag::Int64, KeyFlags::PRIMARY_KEY).with_value(1i64),
            )
            .with(
                "other_id",
                TypedValue::from_tag(TypeTag::Int64, KeyFlags::PRIMARY_KEY).with_value(2i64),
            );

        let (name, value) = col.primary_key().unwrap();
        assert_eq!(name, "id");
        assert_eq!(value.get::<i64>().unwrap(), 1);
    }

    #[test]
    fn collects_from_pairs() {
        let col: Column = vec![("a", TypedValue::of(true)), ("b", TypedValue::of(1.5f64))]
            .into_iter()
            .collect();
        assert!(col.contains("a"));
        assert!(!col.contains("c"));
        assert_eq!(col.get("b").unwrap().tag(), TypeTag::Double);
    }
}
