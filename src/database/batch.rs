//! # Statement-by-Statement Execution
//!
//! `exec_separate` runs a multi-statement script one statement at a time,
//! keeping a separate [`ExecResult`] per statement. The first failure stops
//! the batch and is reported as `FetchError::Batch` with the zero-based
//! index and text of the failing statement. Statements that already ran
//! are not rolled back.
//!
//! ```ignore
//! let results = fetcher.exec_separate("INSERT ...; INSERT ...; SELECT ...")?;
//! assert_eq!(results.len(), 3);
//! ```

use super::{ExecResult, Fetcher};
use crate::engine::Engine;
use crate::error::FetchError;
use crate::sql::split_statements;
use eyre::Result;
use tracing::debug;

impl<E: Engine> Fetcher<E> {
    pub fn exec_separate(&mut self, sql: &str) -> Result<Vec<ExecResult>> {
        let statements = split_statements(sql);
        let mut results = Vec::with_capacity(statements.len());

        for (index, statement) in statements.into_iter().enumerate() {
            match self.exec(statement) {
                Ok(result) => results.push(result),
                Err(err) => {
                    debug!(index, completed = results.len(), "batch stopped");
                    return Err(FetchError::Batch {
                        index,
                        statement: statement.to_string(),
                        message: format!("{:#}", err),
                    }
                    .into());
                }
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ColumnInfo, ResultRow};
    use crate::error::ErrorKind;
    use crate::schema::SchemaCache;

    #[derive(Default)]
    struct Counting {
        calls: Vec<String>,
    }

    impl Engine for Counting {
        fn execute(&mut self, sql: &str) -> Result<Vec<ResultRow>> {
            self.calls.push(sql.to_string());
            if sql.starts_with("FAIL") {
                return Err(FetchError::Engine("no such table: x".to_string()).into());
            }
            Ok(vec![ResultRow::new().with("stmt", Some(sql))])
        }

        fn introspect_tables(&mut self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn introspect_columns(&mut self, _table: &str) -> Result<Vec<ColumnInfo>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn each_statement_gets_its_own_result() {
        let mut fetcher = Fetcher::from_parts(Counting::default(), SchemaCache::new());
        let results = fetcher.exec_separate("SELECT 1;\n\nSELECT 2; ").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].sql, "SELECT 1");
        assert_eq!(results[1].rows[0].get("stmt"), Some(Some("SELECT 2")));
    }

    #[test]
    fn first_failure_stops_and_names_the_statement() {
        let mut fetcher = Fetcher::from_parts(Counting::default(), SchemaCache::new());
        let err = fetcher
            .exec_separate("SELECT 1; FAIL now; SELECT 3")
            .unwrap_err();

        assert_eq!(FetchError::kind_of(&err), Some(ErrorKind::EngineError));
        match FetchError::find(&err) {
            Some(FetchError::Batch {
                index, statement, ..
            }) => {
                assert_eq!(*index, 1);
                assert_eq!(statement, "FAIL now");
            }
            other => panic!("expected batch error, got {:?}", other),
        }
        assert_eq!(fetcher.engine().calls, ["SELECT 1", "FAIL now"]);
    }

    #[test]
    fn blank_script_runs_nothing() {
        let mut fetcher = Fetcher::from_parts(Counting::default(), SchemaCache::new());
        assert!(fetcher.exec_separate(" ;\n; ").unwrap().is_empty());
        assert!(fetcher.engine().calls.is_empty());
    }
}
