use std::fmt;

use crate::ast::{Expr, Op};
use crate::error::Result;
use crate::value::{DType, Value};

/// A typed column handle.
///
/// Columns are immutable: sort direction lives on the [`SortKey`] returned
/// by [`Column::asc`]/[`Column::desc`], so one column can appear in several
/// `order by` clauses with different directions.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: DType,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: DType) -> Self {
        Column {
            name: name.into(),
            dtype,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Same column under another name, keeping its type.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Column::new(name, self.dtype)
    }

    /// Field of a dynamic column, rendered as `column.field`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kusto_tool::{Column, DType};
    ///
    /// let bag = Column::new("foo", DType::Dynamic);
    /// assert_eq!(bag.field("bar").unwrap().to_string(), "foo.bar");
    ///
    /// let text = Column::new("foo", DType::String);
    /// assert!(text.field("bar").is_err());
    /// ```
    pub fn field(&self, name: impl Into<String>) -> Result<Expr> {
        Expr::from(self).field(name)
    }

    pub fn eq(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).eq(rhs)
    }

    pub fn ne(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).ne(rhs)
    }

    pub fn lt(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).lt(rhs)
    }

    pub fn le(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).le(rhs)
    }

    pub fn gt(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).gt(rhs)
    }

    pub fn ge(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).ge(rhs)
    }

    pub fn contains(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).contains(rhs)
    }

    pub fn ncontains(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).ncontains(rhs)
    }

    pub fn has(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).has(rhs)
    }

    pub fn nhas(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).nhas(rhs)
    }

    pub fn startswith(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).startswith(rhs)
    }

    pub fn endswith(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).endswith(rhs)
    }

    pub fn is_in<T: Into<Value>>(&self, values: Vec<T>) -> Expr {
        Expr::from(self).is_in(values)
    }

    pub fn not_in<T: Into<Value>>(&self, values: Vec<T>) -> Expr {
        Expr::from(self).not_in(values)
    }

    // Aggregates

    pub fn sum(&self) -> Expr {
        Expr::unary(Op::Sum, [self])
    }

    pub fn avg(&self) -> Expr {
        Expr::unary(Op::Avg, [self])
    }

    pub fn min(&self) -> Expr {
        Expr::unary(Op::Min, [self])
    }

    pub fn max(&self) -> Expr {
        Expr::unary(Op::Max, [self])
    }

    /// Distinct count with the default accuracy level (1).
    pub fn dcount(&self) -> Expr {
        self.dcount_with_accuracy(1)
    }

    /// Distinct count; the accuracy level is passed as the second argument.
    pub fn dcount_with_accuracy(&self, accuracy: i64) -> Expr {
        Expr::unary(Op::DCount, [Expr::from(self), Expr::from(accuracy)])
    }

    /// `bag_unpack(column)`, usually wrapped in an `evaluate` clause.
    pub fn bag_unpack(&self) -> Expr {
        Expr::unary(Op::BagUnpack, [self])
    }

    pub fn asc(&self) -> SortKey {
        SortKey::new(self, Some(SortOrder::Ascending))
    }

    pub fn desc(&self) -> SortKey {
        SortKey::new(self, Some(SortOrder::Descending))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A column named by reference rather than by handle.
///
/// Used where the grammar takes plain column names (`by`, `on`,
/// `hint.shufflekey`). An `Ident` always renders bare, never as a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Ident(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Ident(s.to_string())
    }
}

impl From<String> for Ident {
    fn from(s: String) -> Self {
        Ident(s)
    }
}

impl From<&Column> for Ident {
    fn from(column: &Column) -> Self {
        Ident(column.name.clone())
    }
}

impl From<Column> for Ident {
    fn from(column: Column) -> Self {
        Ident(column.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// One `order by` term.
///
/// Without an explicit direction the bare expression is rendered and the
/// engine applies its default (descending).
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub expr: Expr,
    pub direction: Option<SortOrder>,
}

impl SortKey {
    pub fn new(expr: impl Into<Expr>, direction: Option<SortOrder>) -> Self {
        SortKey {
            expr: expr.into(),
            direction,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Some(order) => write!(f, "{} {}", self.expr, order.as_str()),
            None => write!(f, "{}", self.expr),
        }
    }
}

impl From<&Column> for SortKey {
    fn from(column: &Column) -> Self {
        SortKey::new(column, None)
    }
}

impl From<Column> for SortKey {
    fn from(column: Column) -> Self {
        SortKey::new(column, None)
    }
}

impl From<Expr> for SortKey {
    fn from(expr: Expr) -> Self {
        SortKey::new(expr, None)
    }
}
