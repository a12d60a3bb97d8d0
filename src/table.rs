//! Table expressions: a source table plus an ordered pipeline of operations.
//!
//! A [`TableExpr`] is a value. Every builder method borrows `self` and returns
//! a new expression; the receiver is never changed. Operations are held in a
//! persistent list whose tail is shared between an expression and everything
//! built from it, so branching a pipeline costs one node.
//!
//! # Example
//!
//! ```
//! use kusto_tool::{DType, DatabaseRef, Project, Schema, TableExpr};
//!
//! let schema = Schema::from_pairs([("foo", DType::String), ("bar", DType::Long)]);
//! let tbl = TableExpr::new("tbl", DatabaseRef::new("test", "testdb"), schema);
//! let foo = tbl.col("foo").unwrap();
//! let bar = tbl.col("bar").unwrap();
//!
//! let query = tbl
//!     .project(Project::new([&foo, &bar]).rename("baz", &bar))
//!     .unwrap();
//! assert_eq!(
//!     query.render(),
//!     "cluster('test').database('testdb').['tbl']\n| project foo,\nbar,\nbaz = bar\n"
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::ast::{
    Column, Count, Distinct, Evaluate, Expr, Extend, Ident, Join, JoinKind, JoinStrategy, Limit,
    Operation, Order, Project, SortKey, Summarize, Where,
};
use crate::error::{Error, Result};
use crate::value::DType;

/// Cluster and database a table lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRef {
    pub cluster: String,
    pub database: String,
}

impl DatabaseRef {
    pub fn new(cluster: impl Into<String>, database: impl Into<String>) -> Self {
        DatabaseRef {
            cluster: cluster.into(),
            database: database.into(),
        }
    }
}

/// Ordered set of columns, keyed by name.
///
/// A schema is either closed, listing every column the pipeline produces,
/// or open: the listed columns are known but others may exist. Tables
/// whose columns were never declared start open, and plugins run with
/// `evaluate` open the schema again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    columns: Vec<Column>,
    open: bool,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// An open schema with no known columns.
    pub fn open() -> Self {
        Schema {
            columns: Vec::new(),
            open: true,
        }
    }

    /// Marks the schema as possibly holding columns beyond the listed ones.
    pub fn into_open(mut self) -> Self {
        self.open = true;
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, DType)>,
        K: Into<String>,
    {
        Schema::from_columns(pairs.into_iter().map(|(name, dtype)| Column::new(name, dtype)))
    }

    /// Later columns replace earlier ones with the same name.
    pub fn from_columns<I: IntoIterator<Item = Column>>(columns: I) -> Self {
        columns
            .into_iter()
            .fold(Schema::new(), |schema, column| schema.with_column(column))
    }

    /// Builds a schema from JSON: either an object mapping names to type
    /// names, or an array of `{"name": ..., "type": ...}` objects.
    ///
    /// ```
    /// use kusto_tool::{DType, Schema};
    ///
    /// let json = serde_json::json!({"foo": "string", "bar": "long"});
    /// let schema = Schema::from_json(&json).unwrap();
    /// assert_eq!(schema.get("bar").unwrap().dtype(), DType::Long);
    ///
    /// assert!(Schema::from_json(&serde_json::json!("foo")).is_err());
    /// ```
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(map) => {
                let mut columns = Vec::with_capacity(map.len());
                for (name, dtype) in map {
                    columns.push(Column::new(name.clone(), json_dtype(dtype)?));
                }
                Ok(Schema::from_columns(columns))
            }
            serde_json::Value::Array(items) => {
                let mut columns = Vec::with_capacity(items.len());
                for item in items {
                    let name = item.get("name").and_then(|n| n.as_str()).ok_or_else(|| {
                        Error::Schema(format!("column entry without a name: {}", item))
                    })?;
                    let dtype = item.get("type").ok_or_else(|| {
                        Error::Schema(format!("column '{}' has no type", name))
                    })?;
                    columns.push(Column::new(name, json_dtype(dtype)?));
                }
                Ok(Schema::from_columns(columns))
            }
            other => Err(Error::Schema(format!(
                "columns must be an object or a list of columns, got {}",
                other
            ))),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Adds a column, replacing any existing column with the same name in place.
    pub fn with_column(mut self, column: Column) -> Self {
        match self.columns.iter_mut().find(|c| c.name() == column.name()) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        self
    }
}

fn json_dtype(value: &serde_json::Value) -> Result<DType> {
    match value.as_str() {
        Some(name) => name.parse(),
        None => Err(Error::Schema(format!("type must be a type name, got {}", value))),
    }
}

#[derive(Debug)]
struct Node {
    op: Operation,
    prev: Option<Arc<Node>>,
}

// Unlinks the chain iteratively; the default drop recurses once per node.
impl Drop for Node {
    fn drop(&mut self) {
        let mut prev = self.prev.take();
        while let Some(node) = prev {
            match Arc::try_unwrap(node) {
                Ok(mut node) => prev = node.prev.take(),
                Err(_) => break,
            }
        }
    }
}

/// Persistent, append-only operation list. Pushing returns a new handle and
/// leaves the old one untouched.
#[derive(Debug, Clone, Default)]
struct OpList {
    head: Option<Arc<Node>>,
    len: usize,
}

impl OpList {
    fn push(&self, op: Operation) -> Self {
        OpList {
            head: Some(Arc::new(Node {
                op,
                prev: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Operations in pipeline order.
    fn to_vec(&self) -> Vec<&Operation> {
        let mut ops = Vec::with_capacity(self.len);
        let mut cursor = self.head.as_deref();
        while let Some(node) = cursor {
            ops.push(&node.op);
            cursor = node.prev.as_deref();
        }
        ops.reverse();
        ops
    }
}

/// A table pipeline bound to a source table.
#[derive(Debug, Clone)]
pub struct TableExpr {
    name: String,
    database: DatabaseRef,
    schema: Schema,
    ops: OpList,
}

impl TableExpr {
    pub fn new(name: impl Into<String>, database: DatabaseRef, schema: Schema) -> Self {
        TableExpr {
            name: name.into(),
            database,
            schema,
            ops: OpList::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database(&self) -> &DatabaseRef {
        &self.database
    }

    /// Columns produced by the pipeline as built so far.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn operations(&self) -> Vec<&Operation> {
        self.ops.to_vec()
    }

    /// Looks up a column of the current schema.
    pub fn col(&self, name: &str) -> Result<Column> {
        self.schema.get(name).cloned().ok_or_else(|| self.unknown(name))
    }

    fn unknown(&self, name: &str) -> Error {
        Error::UnknownColumn {
            table: self.name.clone(),
            column: name.to_string(),
        }
    }

    /// Column named in a builder call. Names missing from an open schema
    /// pass through with `fallback` as their type.
    fn resolve_or(&self, name: &str, fallback: impl FnOnce() -> Column) -> Result<Column> {
        match self.schema.get(name) {
            Some(column) => Ok(column.clone()),
            None if self.schema.is_open() => Ok(fallback()),
            None => Err(self.unknown(name)),
        }
    }

    fn resolve(&self, ident: &Ident) -> Result<Column> {
        self.resolve_or(ident.as_str(), || Column::new(ident.as_str(), DType::Dynamic))
    }

    fn push(&self, op: Operation, schema: Schema) -> TableExpr {
        debug!(table = %self.name, op = %op.summary(), "appending operation");
        TableExpr {
            name: self.name.clone(),
            database: self.database.clone(),
            schema,
            ops: self.ops.push(op),
        }
    }

    /// Keeps only the listed columns plus the renamed ones.
    ///
    /// Positional columns keep their type; renamed columns take the type of
    /// their defining expression. Positional expressions that are not plain
    /// columns are rendered but get no schema entry. Columns are checked
    /// against the schema unless it is open.
    pub fn project(&self, project: Project) -> Result<TableExpr> {
        let mut schema = Schema::new();
        for expr in &project.columns {
            if let Expr::Column(column) = expr {
                schema = schema.with_column(self.resolve_or(column.name(), || column.clone())?);
            }
        }
        for (name, expr) in &project.renames {
            schema = schema.with_column(Column::new(name.clone(), expr.dtype()));
        }
        Ok(self.push(Operation::Project(project), schema))
    }

    /// Projects columns named by string.
    pub fn project_names<I, T>(&self, names: I) -> Result<TableExpr>
    where
        I: IntoIterator<Item = T>,
        T: Into<Ident>,
    {
        let columns = names
            .into_iter()
            .map(|name| self.resolve(&name.into()))
            .collect::<Result<Vec<_>>>()?;
        self.project(Project::new(columns))
    }

    /// `| where`; several expressions are joined with `and`. With no
    /// expressions nothing is appended.
    pub fn filter<I: IntoIterator<Item = Expr>>(&self, exprs: I) -> TableExpr {
        let filter = Where::new(exprs);
        if filter.exprs.is_empty() {
            return self.clone();
        }
        self.push(Operation::Where(filter), self.schema.clone())
    }

    /// `| distinct`; the schema narrows to the listed expressions.
    ///
    /// Strings convert to literals here, as everywhere else an [`Expr`] is
    /// expected. Use [`TableExpr::distinct_names`] to name columns by string.
    pub fn distinct<I, T>(&self, columns: I) -> Result<TableExpr>
    where
        I: IntoIterator<Item = T>,
        T: Into<Expr>,
    {
        let distinct = Distinct::new(columns);
        let mut schema = Schema::new();
        for expr in &distinct.columns {
            let column = match expr {
                Expr::Column(column) => self.resolve_or(column.name(), || column.clone())?,
                other => Column::new(other.default_name(), other.dtype()),
            };
            schema = schema.with_column(column);
        }
        Ok(self.push(Operation::Distinct(distinct), schema))
    }

    /// Distinct over columns named by string.
    pub fn distinct_names<I, T>(&self, names: I) -> Result<TableExpr>
    where
        I: IntoIterator<Item = T>,
        T: Into<Ident>,
    {
        let columns = names
            .into_iter()
            .map(|name| self.resolve(&name.into()))
            .collect::<Result<Vec<_>>>()?;
        self.distinct(columns)
    }

    /// `| count`; the output is a single `Count` column.
    pub fn count(&self) -> TableExpr {
        let schema = Schema::from_pairs([("Count", DType::Long)]);
        self.push(Operation::Count(Count), schema)
    }

    /// Joins `right` on the named columns, which must exist on both sides
    /// unless that side's schema is open.
    ///
    /// Right-hand columns that clash with a left-hand column, join keys
    /// included, get a `1` suffix, as the engine does. The result is open
    /// when a side it keeps columns from is open.
    pub fn join<I, T>(
        &self,
        right: &TableExpr,
        on: I,
        kind: JoinKind,
        strategy: Option<JoinStrategy>,
    ) -> Result<TableExpr>
    where
        I: IntoIterator<Item = T>,
        T: Into<Ident>,
    {
        let join = Join::new(right.clone(), on, kind).strategy(strategy);
        for key in &join.on {
            self.resolve(key)?;
            right.resolve(key)?;
        }

        let mut schema = Schema::new();
        if kind.keeps_left_columns() {
            schema = self.schema.clone();
        }
        if kind.keeps_right_columns() {
            for column in right.schema.columns() {
                schema = if schema.contains(column.name()) {
                    schema.with_column(column.renamed(format!("{}1", column.name())))
                } else {
                    schema.with_column(column.clone())
                };
            }
            if right.schema.is_open() {
                schema = schema.into_open();
            }
        }
        Ok(self.push(Operation::Join(join), schema))
    }

    /// Aggregates; the output schema is the group-by columns followed by the
    /// aggregates. Group-by columns missing from an open schema are typed
    /// `dynamic`.
    pub fn summarize(&self, summarize: Summarize) -> Result<TableExpr> {
        let mut schema = Schema::new();
        for key in &summarize.by {
            schema = schema.with_column(self.resolve(key)?);
        }
        for key in &summarize.shufflekey {
            self.resolve(key)?;
        }
        for (name, expr) in summarize.aggregates() {
            schema = schema.with_column(Column::new(name, expr.dtype()));
        }
        Ok(self.push(Operation::Summarize(summarize), schema))
    }

    /// Adds computed columns, typed from their expressions. With no
    /// assignments nothing is appended.
    ///
    /// ```
    /// use kusto_tool::{DType, DatabaseRef, Expr, Schema, TableExpr};
    ///
    /// let schema = Schema::from_pairs([("foo", DType::String)]);
    /// let tbl = TableExpr::new("tbl", DatabaseRef::new("test", "testdb"), schema);
    /// let wider = tbl.extend([("bar", Expr::from("baz"))]);
    ///
    /// assert!(wider.schema().contains("bar"));
    /// assert!(!tbl.schema().contains("bar"));
    /// ```
    pub fn extend<I, K, V>(&self, assignments: I) -> TableExpr
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Expr>,
    {
        let extend = Extend::new(assignments);
        if extend.assignments.is_empty() {
            return self.clone();
        }
        let schema = extend
            .assignments
            .iter()
            .fold(self.schema.clone(), |schema, (name, expr)| {
                schema.with_column(Column::new(name.clone(), expr.dtype()))
            });
        self.push(Operation::Extend(extend), schema)
    }

    /// `| order by`. With no keys nothing is appended.
    pub fn order<I, T>(&self, keys: I) -> TableExpr
    where
        I: IntoIterator<Item = T>,
        T: Into<SortKey>,
    {
        let order = Order::new(keys);
        if order.keys.is_empty() {
            return self.clone();
        }
        self.push(Operation::Order(order), self.schema.clone())
    }

    pub fn limit(&self, n: u64) -> TableExpr {
        self.push(Operation::Limit(Limit(n)), self.schema.clone())
    }

    /// Alias of [`TableExpr::limit`].
    pub fn take(&self, n: u64) -> TableExpr {
        self.limit(n)
    }

    /// `| evaluate plugin(...)`. Plugin output columns are not known
    /// statically, so the schema keeps its columns and becomes open.
    pub fn evaluate(&self, expr: Expr) -> TableExpr {
        self.push(Operation::Evaluate(Evaluate(expr)), self.schema.clone().into_open())
    }

    /// `cluster('c').database('d').['t']`
    pub fn anchor(&self) -> String {
        format!(
            "cluster('{}').database('{}').['{}']",
            self.database.cluster, self.database.database, self.name
        )
    }

    /// Full query text: the anchor and one line per operation, each
    /// terminated by a newline.
    pub fn render(&self) -> String {
        let mut query = self.anchor();
        query.push('\n');
        for op in self.ops.to_vec() {
            query.push_str(&op.to_string());
            query.push('\n');
        }
        debug!(table = %self.name, operations = self.ops.len, "rendered pipeline");
        query
    }
}

impl fmt::Display for TableExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
