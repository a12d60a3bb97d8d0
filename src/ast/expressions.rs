use std::fmt;
use std::ops::{Add, BitAnd, BitOr, Div, Mul, Not, Rem, Sub};

use rust_decimal::Decimal;

use crate::ast::{Column, Op, SortKey, SortOrder};
use crate::error::{Error, Result};
use crate::output::quote;
use crate::value::{DType, Value};

/// Expression tree node.
///
/// Nodes are immutable once built; combinators consume their inputs and
/// return a new tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference, rendered as its bare name
    ///
    /// # Example
    /// ```text
    /// foo
    /// ```
    Column(Column),

    /// Field of a dynamic property bag
    ///
    /// # Example
    /// ```text
    /// foo.bar
    /// ```
    Property { object: Box<Expr>, field: String },

    /// Literal value, rendered through [`quote`]
    ///
    /// # Examples
    /// ```text
    /// 'a'
    /// 42
    /// dynamic([
    ///     'a',
    ///     'b'
    /// ])
    /// ```
    Literal(Value),

    /// Binary operation (comparison, boolean, arithmetic)
    Binary {
        op: Op,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Function-style operation (`not`, aggregates, scalar functions)
    ///
    /// # Examples
    /// ```text
    /// not(foo == 'a')
    /// sum(bar)
    /// strcat(foo, '_', 'bar')
    /// ```
    Unary {
        op: Op,
        terms: Vec<Expr>,
        aggregate: bool,
    },
}

impl Expr {
    pub fn binary(op: Op, left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left.into()),
            right: Box::new(right.into()),
        }
    }

    /// Function-style node; the aggregate flag follows the operator's category.
    pub fn unary<I, T>(op: Op, terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Expr>,
    {
        Expr::Unary {
            op,
            terms: terms.into_iter().map(Into::into).collect(),
            aggregate: op.is_aggregate(),
        }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn eq(self, rhs: impl Into<Expr>) -> Self {
        Expr::binary(Op::Eq, self, rhs)
    }

    pub fn ne(self, rhs: impl Into<Expr>) -> Self {
        Expr::binary(Op::Ne, self, rhs)
    }

    pub fn lt(self, rhs: impl Into<Expr>) -> Self {
        Expr::binary(Op::Lt, self, rhs)
    }

    pub fn le(self, rhs: impl Into<Expr>) -> Self {
        Expr::binary(Op::Le, self, rhs)
    }

    pub fn gt(self, rhs: impl Into<Expr>) -> Self {
        Expr::binary(Op::Gt, self, rhs)
    }

    pub fn ge(self, rhs: impl Into<Expr>) -> Self {
        Expr::binary(Op::Ge, self, rhs)
    }

    pub fn contains(self, rhs: impl Into<Expr>) -> Self {
        Expr::binary(Op::Contains, self, rhs)
    }

    pub fn ncontains(self, rhs: impl Into<Expr>) -> Self {
        Expr::binary(Op::NContains, self, rhs)
    }

    pub fn has(self, rhs: impl Into<Expr>) -> Self {
        Expr::binary(Op::Has, self, rhs)
    }

    pub fn nhas(self, rhs: impl Into<Expr>) -> Self {
        Expr::binary(Op::NHas, self, rhs)
    }

    pub fn startswith(self, rhs: impl Into<Expr>) -> Self {
        Expr::binary(Op::StartsWith, self, rhs)
    }

    pub fn endswith(self, rhs: impl Into<Expr>) -> Self {
        Expr::binary(Op::EndsWith, self, rhs)
    }

    /// Set membership against a literal list: `foo in (dynamic([...]))`.
    pub fn is_in<T: Into<Value>>(self, values: Vec<T>) -> Self {
        Expr::binary(Op::In, self, Value::from(values))
    }

    pub fn not_in<T: Into<Value>>(self, values: Vec<T>) -> Self {
        Expr::binary(Op::NIn, self, Value::from(values))
    }

    pub fn and(self, rhs: impl Into<Expr>) -> Self {
        Expr::binary(Op::And, self, rhs)
    }

    pub fn or(self, rhs: impl Into<Expr>) -> Self {
        Expr::binary(Op::Or, self, rhs)
    }

    /// Logical negation, rendered as `not(expr)`.
    pub fn not(self) -> Self {
        Expr::unary(Op::Not, [self])
    }

    /// Field of a property bag.
    ///
    /// Only expressions whose type is [`DType::Dynamic`] have fields; a
    /// property is itself dynamic, so fields chain freely.
    pub fn field(self, name: impl Into<String>) -> Result<Self> {
        let field = name.into();
        let dtype = self.dtype();
        if !dtype.is_dynamic() {
            return Err(Error::InvalidPropertyAccess {
                column: self.to_string(),
                dtype,
                field,
            });
        }
        Ok(Expr::Property {
            object: Box::new(self),
            field,
        })
    }

    pub fn asc(self) -> SortKey {
        SortKey::new(self, Some(SortOrder::Ascending))
    }

    pub fn desc(self) -> SortKey {
        SortKey::new(self, Some(SortOrder::Descending))
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Expr::Unary { aggregate: true, .. })
    }

    /// Output type of the expression, used to type columns created by
    /// `extend`, `project` renames and `summarize`.
    ///
    /// Binary nodes take the type of their left operand and function-style
    /// nodes the type of their first term. `count`/`dcount` are always
    /// `long` and `avg` is always `real`.
    pub fn dtype(&self) -> DType {
        match self {
            Expr::Column(column) => column.dtype(),
            Expr::Property { .. } => DType::Dynamic,
            Expr::Literal(value) => value.dtype(),
            Expr::Binary { left, .. } => left.dtype(),
            Expr::Unary { op, terms, .. } => match op {
                Op::Count | Op::DCount => DType::Long,
                Op::Avg => DType::Real,
                Op::StrCat => DType::String,
                Op::BagUnpack => DType::Dynamic,
                _ => terms.first().map(Expr::dtype).unwrap_or(DType::Long),
            },
        }
    }

    /// Column name the engine assigns to an unnamed aggregate, e.g. `sum_bar`.
    pub fn default_name(&self) -> String {
        let raw = match self {
            Expr::Unary { op, terms, .. } => match terms.first() {
                Some(first) => format!("{}_{}", op.symbol(), first),
                None => format!("{}_", op.symbol()),
            },
            other => other.to_string(),
        };
        raw.chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
            .collect()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(column) => write!(f, "{}", column),
            Expr::Property { object, field } => write!(f, "{}.{}", object, field),
            Expr::Literal(value) => f.write_str(&quote(value)),
            Expr::Binary { op, left, right } if op.is_logical_connective() => {
                write!(f, "({}) {} ({})", left, op, right)
            }
            Expr::Binary {
                op: op @ (Op::In | Op::NIn),
                left,
                right,
            } => write!(f, "{} {} ({})", left, op, right),
            Expr::Binary { op, left, right } => write!(f, "{} {} {}", left, op, right),
            Expr::Unary { op, terms, .. } => {
                let terms: Vec<String> = terms.iter().map(ToString::to_string).collect();
                write!(f, "{}({})", op, terms.join(", "))
            }
        }
    }
}

impl From<Column> for Expr {
    fn from(column: Column) -> Self {
        Expr::Column(column)
    }
}

impl From<&Column> for Expr {
    fn from(column: &Column) -> Self {
        Expr::Column(column.clone())
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::Literal(Value::from(s))
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(Value::String(s))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::Literal(Value::Boolean(b))
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::Literal(Value::from(n))
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::Literal(Value::Integer(n))
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Expr::Literal(Value::Float(n))
    }
}

impl From<Decimal> for Expr {
    fn from(d: Decimal) -> Self {
        Expr::Literal(Value::Decimal(d))
    }
}

impl BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        self.and(rhs)
    }
}

impl BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        self.or(rhs)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::not(self)
    }
}

impl<R: Into<Expr>> Add<R> for Expr {
    type Output = Expr;

    fn add(self, rhs: R) -> Expr {
        Expr::binary(Op::Add, self, rhs)
    }
}

impl<R: Into<Expr>> Sub<R> for Expr {
    type Output = Expr;

    fn sub(self, rhs: R) -> Expr {
        Expr::binary(Op::Sub, self, rhs)
    }
}

impl<R: Into<Expr>> Mul<R> for Expr {
    type Output = Expr;

    fn mul(self, rhs: R) -> Expr {
        Expr::binary(Op::Mul, self, rhs)
    }
}

impl<R: Into<Expr>> Div<R> for Expr {
    type Output = Expr;

    fn div(self, rhs: R) -> Expr {
        Expr::binary(Op::Div, self, rhs)
    }
}

impl<R: Into<Expr>> Rem<R> for Expr {
    type Output = Expr;

    fn rem(self, rhs: R) -> Expr {
        Expr::binary(Op::Mod, self, rhs)
    }
}
