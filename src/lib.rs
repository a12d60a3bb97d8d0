pub mod ast;
pub mod cli;
pub mod database;
pub mod error;
pub mod function;
pub mod output;
pub mod table;
pub mod template;
pub mod value;

pub use ast::{
    Column, Expr, Ident, JoinKind, JoinStrategy, Op, OpCategory, Operation, Project, SortKey,
    SortOrder, Summarize,
};
pub use database::{Database, QueryExecutor, SchemaSource};
pub use error::{Error, ExecutionError, Result, TemplateError};
pub use output::{dict_to_datatable, list_to_kusto, quote};
pub use table::{DatabaseRef, Schema, TableExpr};
pub use template::{Params, SetCommand, render_set, render_template_query};
pub use value::{DType, Value};
