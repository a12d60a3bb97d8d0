use std::fmt;

use crate::value::DType;

/// Opaque failure reported by an execution sink or schema source.
///
/// It is carried through [`Error::Execution`] unchanged; nothing in this
/// crate inspects or retries it.
pub type ExecutionError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or executing a table expression.
///
/// Every error is raised by the call that breaks the contract, before any
/// operation is appended to the pipeline.
#[derive(Debug)]
pub enum Error {
    /// Column definitions were neither a mapping nor a list of columns
    Schema(String),

    /// Column name not present in the current schema
    UnknownColumn { table: String, column: String },

    /// Field access on a column that is not a dynamic property bag
    InvalidPropertyAccess {
        column: String,
        dtype: DType,
        field: String,
    },

    /// Type name that does not map to a column type
    UnknownType(String),

    /// Join kind name that the engine does not support
    UnknownJoinKind(String),

    /// Query template could not be rendered
    Template(TemplateError),

    /// Failure surfaced from the execution sink
    Execution(ExecutionError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Schema(msg) => write!(f, "Schema error: {}", msg),
            Error::UnknownColumn { table, column } => {
                write!(f, "Unknown column: '{}' is not in the schema of '{}'", column, table)
            }
            Error::InvalidPropertyAccess { column, dtype, field } => write!(
                f,
                "Invalid property access: '{}.{}' requires a dynamic column, but '{}' is {}",
                column, field, column, dtype
            ),
            Error::UnknownType(name) => write!(f, "Unknown type: '{}'", name),
            Error::UnknownJoinKind(kind) => write!(f, "Unknown join kind: '{}'", kind),
            Error::Template(e) => write!(f, "Template error: {}", e),
            Error::Execution(e) => write!(f, "Execution error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(e) => Some(e),
            Error::Execution(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<TemplateError> for Error {
    fn from(e: TemplateError) -> Self {
        Error::Template(e)
    }
}

/// Errors that can occur while rendering a query template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateError {
    /// `{{ name }}` placeholder with no matching parameter
    MissingParameter(String),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::MissingParameter(name) => {
                write!(f, "no value supplied for parameter '{}'", name)
            }
        }
    }
}

impl std::error::Error for TemplateError {}
