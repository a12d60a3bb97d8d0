use std::fmt;

/// Operator tokens.
///
/// Each variant renders to one fixed symbol. The renderer matches on this
/// enum exhaustively, so a new operator cannot be added without a render rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    // Comparison
    /// Equal (`==`)
    Eq,
    /// Not equal (`!=`)
    Ne,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    Le,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    Ge,
    /// Substring match (`contains`)
    Contains,
    /// Negated substring match (`!contains`)
    NContains,
    /// Whole-term match (`has`)
    Has,
    /// Negated whole-term match (`!has`)
    NHas,
    /// Prefix match (`startswith`)
    StartsWith,
    /// Suffix match (`endswith`)
    EndsWith,
    /// Set membership (`in`)
    In,
    /// Negated set membership (`!in`)
    NIn,

    // Boolean
    /// Logical AND (`and`)
    And,
    /// Logical OR (`or`)
    Or,
    /// Logical NOT (`not`)
    Not,

    // Arithmetic
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,

    // Aggregates
    Sum,
    Avg,
    Min,
    Max,
    Count,
    DCount,

    // Scalar functions and plugins
    StrCat,
    BagUnpack,
}

/// Operator category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCategory {
    Comparison,
    Boolean,
    Arithmetic,
    Aggregate,
    Function,
}

/// Number of operands an operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
    Variadic,
}

impl Op {
    /// Render the operator as its query-language symbol or keyword.
    pub fn symbol(&self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Contains => "contains",
            Op::NContains => "!contains",
            Op::Has => "has",
            Op::NHas => "!has",
            Op::StartsWith => "startswith",
            Op::EndsWith => "endswith",
            Op::In => "in",
            Op::NIn => "!in",
            Op::And => "and",
            Op::Or => "or",
            Op::Not => "not",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "%",
            Op::Sum => "sum",
            Op::Avg => "avg",
            Op::Min => "min",
            Op::Max => "max",
            Op::Count => "count",
            Op::DCount => "dcount",
            Op::StrCat => "strcat",
            Op::BagUnpack => "bag_unpack",
        }
    }

    pub fn category(&self) -> OpCategory {
        match self {
            Op::Eq
            | Op::Ne
            | Op::Lt
            | Op::Le
            | Op::Gt
            | Op::Ge
            | Op::Contains
            | Op::NContains
            | Op::Has
            | Op::NHas
            | Op::StartsWith
            | Op::EndsWith
            | Op::In
            | Op::NIn => OpCategory::Comparison,
            Op::And | Op::Or | Op::Not => OpCategory::Boolean,
            Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Mod => OpCategory::Arithmetic,
            Op::Sum | Op::Avg | Op::Min | Op::Max | Op::Count | Op::DCount => {
                OpCategory::Aggregate
            }
            Op::StrCat | Op::BagUnpack => OpCategory::Function,
        }
    }

    pub fn arity(&self) -> Arity {
        match self.category() {
            OpCategory::Comparison | OpCategory::Arithmetic => Arity::Binary,
            OpCategory::Boolean if *self == Op::Not => Arity::Unary,
            OpCategory::Boolean => Arity::Binary,
            OpCategory::Aggregate | OpCategory::Function => match self {
                Op::BagUnpack => Arity::Unary,
                _ => Arity::Variadic,
            },
        }
    }

    pub fn is_aggregate(&self) -> bool {
        self.category() == OpCategory::Aggregate
    }

    /// `and`/`or` wrap both operands in parentheses when rendered.
    pub fn is_logical_connective(&self) -> bool {
        matches!(self, Op::And | Op::Or)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
