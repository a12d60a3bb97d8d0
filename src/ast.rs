//! # Query AST
//!
//! Typed building blocks for table pipelines, each of which renders to the
//! exact text the query engine expects.
//!
//! ## Architecture Overview
//!
//! - **[operators]** - Closed set of operator tokens with their symbols and categories
//! - **[expressions]** - Expression trees (columns, properties, literals, unary and binary nodes)
//! - **[column]** - Typed column handles, column names and sort keys
//! - **[operations]** - One node per pipeline stage (`project`, `where`, `join`, ...)
//!
//! ## Rendering Rules
//!
//! The structural kind of an operand decides how it renders, never its text:
//!
//! - a column renders as a bare identifier (`foo`)
//! - a property renders as a dotted path (`foo.bar`)
//! - any other value renders as a literal (`'a'`, `2`, `dynamic([...])`)
//!
//! `and`/`or` always parenthesize both sides, so nested boolean trees keep
//! their grouping:
//!
//! ```text
//! (foo == 'a') and ((bar == 'b') or (baz > 2))
//! ```
//!
//! ## Example
//!
//! ```
//! use kusto_tool::{Column, DType};
//!
//! let foo = Column::new("foo", DType::String);
//! let bar = Column::new("bar", DType::Long);
//! let expr = foo.eq("a") & bar.gt(2);
//! assert_eq!(expr.to_string(), "(foo == 'a') and (bar > 2)");
//! ```
pub mod column;
pub mod expressions;
pub mod operations;
pub mod operators;

pub use column::{Column, Ident, SortKey, SortOrder};
pub use expressions::Expr;
pub use operations::{
    Count, Distinct, Evaluate, Extend, Join, JoinKind, JoinStrategy, Limit, Operation, Order,
    Project, Summarize, Where,
};
pub use operators::{Arity, Op, OpCategory};
