//! Database handles and the execution boundary.
//!
//! Running queries is delegated to an injected [`QueryExecutor`]; this crate
//! only renders text and hands it over. Results come back in whatever form
//! the executor produces and are never inspected here.

use std::time::Instant;

use tracing::info;

use crate::error::{Error, ExecutionError, Result};
use crate::table::{DatabaseRef, Schema, TableExpr};
use crate::template::{Params, SetCommand, render_set, render_template_query};
use crate::value::DType;

/// Runs rendered queries and management commands against a database.
pub trait QueryExecutor {
    type Output;

    fn execute_query(&self, database: &str, query: &str) -> std::result::Result<Self::Output, ExecutionError>;

    /// Management commands are the texts starting with `.`; by default they
    /// go through the query path.
    fn execute_command(
        &self,
        database: &str,
        command: &str,
    ) -> std::result::Result<Self::Output, ExecutionError> {
        self.execute_query(database, command)
    }
}

/// Supplies table schemas for `inspect_table`.
pub trait SchemaSource {
    fn table_schema(
        &self,
        database: &str,
        table: &str,
    ) -> std::result::Result<Vec<(String, DType)>, ExecutionError>;
}

/// A database on a cluster, with the executor used to run queries on it.
#[derive(Debug, Clone)]
pub struct Database<E> {
    cluster: String,
    database: String,
    executor: E,
}

impl<E> Database<E> {
    pub fn new(cluster: impl Into<String>, database: impl Into<String>, executor: E) -> Self {
        Database {
            cluster: cluster.into(),
            database: database.into(),
            executor,
        }
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn name(&self) -> &str {
        &self.database
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn server_uri(&self) -> String {
        format!("https://{}.kusto.windows.net", self.cluster)
    }

    pub fn reference(&self) -> DatabaseRef {
        DatabaseRef::new(self.cluster.clone(), self.database.clone())
    }

    /// A table whose columns are not declared. Its schema is open, so
    /// builder calls accept any column name.
    pub fn table(&self, name: impl Into<String>) -> TableExpr {
        TableExpr::new(name, self.reference(), Schema::open())
    }

    pub fn table_with_schema(&self, name: impl Into<String>, schema: Schema) -> TableExpr {
        TableExpr::new(name, self.reference(), schema)
    }
}

impl<E: SchemaSource> Database<E> {
    /// A table whose columns are read from the schema source.
    pub fn inspect_table(&self, name: &str) -> Result<TableExpr> {
        let columns = self
            .executor
            .table_schema(&self.database, name)
            .map_err(Error::Execution)?;
        Ok(self.table_with_schema(name, Schema::from_pairs(columns)))
    }
}

impl<E: QueryExecutor> Database<E> {
    /// Renders a query template and runs it.
    pub fn execute(&self, query: &str, params: &Params) -> Result<E::Output> {
        let rendered = render_template_query(query, params)?;
        self.execute_rendered(&rendered)
    }

    /// Runs query text as-is. Text starting with `.` is sent as a command.
    pub fn execute_rendered(&self, text: &str) -> Result<E::Output> {
        let start = Instant::now();
        let result = if text.starts_with('.') {
            info!(database = %self.database, command = %text, "executing command");
            self.executor.execute_command(&self.database, text)
        } else {
            info!(database = %self.database, query = %text, "executing query");
            self.executor.execute_query(&self.database, text)
        };
        info!(
            database = %self.database,
            elapsed_secs = start.elapsed().as_secs_f64(),
            ok = result.is_ok(),
            "execution completed"
        );
        result.map_err(Error::Execution)
    }

    /// Runs a query and stores its results in a table.
    pub fn set(&self, query: &str, command: &SetCommand, params: &Params) -> Result<E::Output> {
        let rendered = render_set(query, command, params)?;
        self.execute_rendered(&rendered)
    }
}

impl TableExpr {
    /// Renders the pipeline and runs it on `db`.
    pub fn collect<E: QueryExecutor>(&self, db: &Database<E>) -> Result<E::Output> {
        db.execute_rendered(&self.render())
    }
}
