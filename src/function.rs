//! Free-standing function builders.

use crate::ast::{Expr, Op};

/// String concatenation of columns and literals.
///
/// ```
/// use kusto_tool::{Column, DType, Expr, function};
///
/// let foo = Column::new("foo", DType::String);
/// let expr = function::strcat([Expr::from(&foo), "_".into(), "bar".into()]);
/// assert_eq!(expr.to_string(), "strcat(foo, '_', 'bar')");
/// ```
pub fn strcat<I, T>(args: I) -> Expr
where
    I: IntoIterator<Item = T>,
    T: Into<Expr>,
{
    Expr::unary(Op::StrCat, args)
}

/// `bag_unpack` plugin call for `evaluate`.
pub fn bag_unpack(expr: impl Into<Expr>) -> Expr {
    Expr::unary(Op::BagUnpack, [expr.into()])
}

/// Row count aggregate, `count()`.
pub fn count() -> Expr {
    Expr::unary(Op::Count, Vec::<Expr>::new())
}
