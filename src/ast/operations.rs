//! Table operation nodes.
//!
//! Each node renders to exactly one `| ...` clause. Column lists use two
//! different separators and both are part of the wire format: `project` and
//! `distinct` put each item on a new line with no indent (`",\n"`), while
//! `extend`, `order` and `summarize` indent each item with a tab (`",\n\t"`).

use std::fmt;
use std::str::FromStr;

use crate::ast::{Expr, Ident, SortKey};
use crate::error::Error;
use crate::table::TableExpr;

/// One stage of a table pipeline.
#[derive(Debug, Clone)]
pub enum Operation {
    Project(Project),
    Where(Where),
    Distinct(Distinct),
    Count(Count),
    Join(Join),
    Summarize(Summarize),
    Extend(Extend),
    Order(Order),
    Limit(Limit),
    Evaluate(Evaluate),
}

impl Operation {
    /// Compact one-line description for logs, e.g. `Distinct(foo, bar)`.
    pub fn summary(&self) -> String {
        match self {
            Operation::Project(p) => format!("Project({})", p.items().join(", ")),
            Operation::Where(w) => format!("Where({})", w.joined()),
            Operation::Distinct(d) => format!("Distinct({})", join_display(&d.columns, ", ")),
            Operation::Count(_) => "Count()".to_string(),
            Operation::Join(j) => format!("Join({}, on {})", j.kind, join_display(&j.on, ", ")),
            Operation::Summarize(s) => format!("Summarize(by {})", join_display(&s.by, ", ")),
            Operation::Extend(e) => format!("Extend({})", e.items().join(", ")),
            Operation::Order(o) => format!("Order({})", join_display(&o.keys, ", ")),
            Operation::Limit(l) => format!("Limit({})", l.0),
            Operation::Evaluate(e) => format!("Evaluate({})", e.0),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Project(op) => fmt::Display::fmt(op, f),
            Operation::Where(op) => fmt::Display::fmt(op, f),
            Operation::Distinct(op) => fmt::Display::fmt(op, f),
            Operation::Count(op) => fmt::Display::fmt(op, f),
            Operation::Join(op) => fmt::Display::fmt(op, f),
            Operation::Summarize(op) => fmt::Display::fmt(op, f),
            Operation::Extend(op) => fmt::Display::fmt(op, f),
            Operation::Order(op) => fmt::Display::fmt(op, f),
            Operation::Limit(op) => fmt::Display::fmt(op, f),
            Operation::Evaluate(op) => fmt::Display::fmt(op, f),
        }
    }
}

fn join_display<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

/// `| project c1,\nc2,\nnew = expr`
///
/// Items are expressions, so a `&str` renders as a quoted literal. Pass
/// [`crate::Column`] values, or use [`crate::TableExpr::project_names`] to name
/// columns by string.
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub columns: Vec<Expr>,
    pub renames: Vec<(String, Expr)>,
}

impl Project {
    pub fn new<I, T>(columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Expr>,
    {
        Project {
            columns: columns.into_iter().map(Into::into).collect(),
            renames: Vec::new(),
        }
    }

    /// Adds `name = expr` after the positional columns.
    pub fn rename(mut self, name: impl Into<String>, expr: impl Into<Expr>) -> Self {
        self.renames.push((name.into(), expr.into()));
        self
    }

    fn items(&self) -> Vec<String> {
        let positional = self.columns.iter().map(ToString::to_string);
        let renamed = self.renames.iter().map(|(k, v)| format!("{} = {}", k, v));
        positional.chain(renamed).collect()
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "| project {}", self.items().join(",\n"))
    }
}

/// `| where e1 and e2`
///
/// Needs at least one expression to be a valid clause;
/// [`crate::TableExpr::filter`] skips an empty one.
#[derive(Debug, Clone)]
pub struct Where {
    pub exprs: Vec<Expr>,
}

impl Where {
    pub fn new<I: IntoIterator<Item = Expr>>(exprs: I) -> Self {
        Where {
            exprs: exprs.into_iter().collect(),
        }
    }

    fn joined(&self) -> String {
        join_display(&self.exprs, " and ")
    }
}

impl fmt::Display for Where {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "| where {}", self.joined())
    }
}

/// `| distinct c1,\nc2`
///
/// As with [`Project`], a `&str` item is a literal, not a column name.
#[derive(Debug, Clone)]
pub struct Distinct {
    pub columns: Vec<Expr>,
}

impl Distinct {
    pub fn new<I, T>(columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Expr>,
    {
        Distinct {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Distinct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "| distinct {}", join_display(&self.columns, ",\n"))
    }
}

/// `| count`
#[derive(Debug, Clone, Copy, Default)]
pub struct Count;

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("| count")
    }
}

/// `| limit n`; `take` builds the same node.
#[derive(Debug, Clone, Copy)]
pub struct Limit(pub u64);

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "| limit {}", self.0)
    }
}

/// Join flavor, rendered as `kind=...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    InnerUnique,
    LeftOuter,
    RightOuter,
    FullOuter,
    LeftSemi,
    RightSemi,
    LeftAnti,
    RightAnti,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "inner",
            JoinKind::InnerUnique => "innerunique",
            JoinKind::LeftOuter => "leftouter",
            JoinKind::RightOuter => "rightouter",
            JoinKind::FullOuter => "fullouter",
            JoinKind::LeftSemi => "leftsemi",
            JoinKind::RightSemi => "rightsemi",
            JoinKind::LeftAnti => "leftanti",
            JoinKind::RightAnti => "rightanti",
        }
    }

    /// Whether the right side's columns appear in the output.
    pub fn keeps_right_columns(&self) -> bool {
        !matches!(
            self,
            JoinKind::LeftSemi | JoinKind::LeftAnti | JoinKind::RightSemi | JoinKind::RightAnti
        )
    }

    /// Whether the left side's columns appear in the output.
    pub fn keeps_left_columns(&self) -> bool {
        !matches!(self, JoinKind::RightSemi | JoinKind::RightAnti)
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inner" => Ok(JoinKind::Inner),
            "innerunique" => Ok(JoinKind::InnerUnique),
            "left" | "leftouter" => Ok(JoinKind::LeftOuter),
            "right" | "rightouter" => Ok(JoinKind::RightOuter),
            "full" | "fullouter" => Ok(JoinKind::FullOuter),
            "leftsemi" => Ok(JoinKind::LeftSemi),
            "rightsemi" => Ok(JoinKind::RightSemi),
            "leftanti" => Ok(JoinKind::LeftAnti),
            "rightanti" => Ok(JoinKind::RightAnti),
            _ => Err(Error::UnknownJoinKind(s.to_string())),
        }
    }
}

/// Distribution hint for `join`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStrategy {
    Broadcast,
    Shuffle,
}

impl JoinStrategy {
    /// Parses a hint name; anything other than `broadcast`/`shuffle` means
    /// no hint (single-node join).
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint {
            "broadcast" => Some(JoinStrategy::Broadcast),
            "shuffle" => Some(JoinStrategy::Shuffle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinStrategy::Broadcast => "broadcast",
            JoinStrategy::Shuffle => "shuffle",
        }
    }
}

/// `| join kind=K [hint.strategy=S ](\n\t{right}) on c1, c2`
///
/// The right side is rendered as a complete pipeline, trailing newline
/// included, so the closing parenthesis lands on its own line.
#[derive(Debug, Clone)]
pub struct Join {
    pub right: TableExpr,
    pub on: Vec<Ident>,
    pub kind: JoinKind,
    pub strategy: Option<JoinStrategy>,
}

impl Join {
    pub fn new<I, T>(right: TableExpr, on: I, kind: JoinKind) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Ident>,
    {
        Join {
            right,
            on: on.into_iter().map(Into::into).collect(),
            kind,
            strategy: None,
        }
    }

    pub fn strategy(mut self, strategy: Option<JoinStrategy>) -> Self {
        self.strategy = strategy;
        self
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hint = match self.strategy {
            Some(strategy) => format!("hint.strategy={} ", strategy.as_str()),
            None => String::new(),
        };
        write!(
            f,
            "| join kind={} {}(\n\t{}) on {}",
            self.kind,
            hint,
            self.right.render(),
            join_display(&self.on, ", ")
        )
    }
}

/// Aggregation clause.
///
/// ```
/// use kusto_tool::{Column, DType, Summarize};
///
/// let bar = Column::new("bar", DType::Long);
/// let clause = Summarize::new()
///     .named("baz", bar.sum())
///     .by(["foo"])
///     .shufflekey(["baz", "quux"])
///     .num_partitions(10);
/// assert_eq!(
///     clause.to_string(),
///     "| summarize hint.shufflekey=baz, quux hint.num_partitions=10\n\tbaz=sum(bar)\n\tby foo"
/// );
/// ```
///
/// Unnamed aggregates render before named ones. An aggregate whose name is
/// already taken replaces the earlier one in its position.
#[derive(Debug, Clone, Default)]
pub struct Summarize {
    pub positional: Vec<(String, Expr)>,
    pub named: Vec<(String, Expr)>,
    pub by: Vec<Ident>,
    pub shuffle: bool,
    pub shufflekey: Vec<Ident>,
    pub num_partitions: Option<u32>,
}

impl Summarize {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unnamed aggregate, named `{op}_{operand}` the way the engine names it.
    pub fn agg(mut self, expr: Expr) -> Self {
        upsert(&mut self.positional, expr.default_name(), expr);
        self
    }

    pub fn named(mut self, name: impl Into<String>, expr: Expr) -> Self {
        upsert(&mut self.named, name.into(), expr);
        self
    }

    /// Output aggregates in render order.
    pub fn aggregates(&self) -> Vec<(String, Expr)> {
        self.named
            .iter()
            .cloned()
            .fold(self.positional.clone(), |mut all, (name, expr)| {
                upsert(&mut all, name, expr);
                all
            })
    }

    pub fn by<I, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Ident>,
    {
        self.by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Requests `hint.strategy=shuffle`. Ignored when a shuffle key is set.
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Shuffle on the given keys; implies shuffle mode.
    pub fn shufflekey<I, T>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Ident>,
    {
        self.shufflekey.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Partition count hint; only emitted in shuffle mode.
    pub fn num_partitions(mut self, n: u32) -> Self {
        self.num_partitions = Some(n);
        self
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle || !self.shufflekey.is_empty()
    }
}

impl fmt::Display for Summarize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("| summarize")?;
        if self.is_shuffled() {
            if self.shufflekey.is_empty() {
                f.write_str(" hint.strategy=shuffle")?;
            } else {
                write!(f, " hint.shufflekey={}", join_display(&self.shufflekey, ", "))?;
            }
            if let Some(n) = self.num_partitions {
                write!(f, " hint.num_partitions={}", n)?;
            }
        }
        let aggregates: Vec<String> = self
            .aggregates()
            .iter()
            .map(|(name, expr)| format!("{}={}", name, expr))
            .collect();
        if !aggregates.is_empty() {
            write!(f, "\n\t{}", aggregates.join(",\n\t"))?;
        }
        if !self.by.is_empty() {
            write!(f, "\n\tby {}", join_display(&self.by, ", "))?;
        }
        Ok(())
    }
}

fn upsert(entries: &mut Vec<(String, Expr)>, name: String, expr: Expr) {
    match entries.iter_mut().find(|(existing, _)| *existing == name) {
        Some(entry) => entry.1 = expr,
        None => entries.push((name, expr)),
    }
}

/// `| extend\n\tk1=v1,\n\tk2=v2`
///
/// Needs at least one assignment; [`crate::TableExpr::extend`] skips an
/// empty one.
#[derive(Debug, Clone, Default)]
pub struct Extend {
    pub assignments: Vec<(String, Expr)>,
}

impl Extend {
    pub fn new<I, K, V>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Expr>,
    {
        Extend {
            assignments: assignments
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn items(&self) -> Vec<String> {
        self.assignments
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect()
    }
}

impl fmt::Display for Extend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "| extend\n\t{}", self.items().join(",\n\t"))
    }
}

/// `| order by\n\tc1,\n\tc2 asc`
///
/// Needs at least one key; [`crate::TableExpr::order`] skips an empty one.
#[derive(Debug, Clone)]
pub struct Order {
    pub keys: Vec<SortKey>,
}

impl Order {
    pub fn new<I, T>(keys: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SortKey>,
    {
        Order {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "| order by\n\t{}", join_display(&self.keys, ",\n\t"))
    }
}

/// `| evaluate plugin(args)`
#[derive(Debug, Clone)]
pub struct Evaluate(pub Expr);

impl fmt::Display for Evaluate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "| evaluate {}", self.0)
    }
}
