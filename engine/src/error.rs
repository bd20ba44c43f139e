use std::io;

use thiserror::Error as ThisError;

/// Failure modes surfaced by the catalog, column store, operators, and
/// persistence routines.
///
/// Each variant maps to one of the status codes the transport returns to a
/// client (see [`StatusCode`] and [`EngineError::status`]).
#[derive(Debug, ThisError)]
pub enum EngineError {
    /// `create_db` was called while a database is already active.
    #[error("a database is already active")]
    AlreadyActive,
    /// A statement referenced a database other than the one currently active.
    #[error("`{0}` is not the active database")]
    WrongDatabase(String),
    /// `create_column` was called on a table that already has its declared
    /// complement of columns.
    #[error("table `{0}` already has its full complement of columns")]
    TableFull(String),
    /// A qualified name did not resolve to a catalog object, or a handle
    /// name was not found in the session's handle table.
    #[error("object not found: `{0}`")]
    NotFound(String),
    /// A table was declared with fewer than one column.
    #[error("a table must declare at least one column")]
    InvalidColumnCount,
    /// A row presented to `relational_insert` did not have one value per
    /// declared column.
    #[error("row has {got} values, expected {expected}")]
    RowWidthMismatch { got: usize, expected: usize },
    /// Two operands to an elementwise or print operator did not share a
    /// tuple count.
    #[error("operands have mismatched tuple counts: {left} vs {right}")]
    SizeMismatch { left: usize, right: usize },
    /// An aggregate was requested over zero tuples.
    #[error("aggregate over an empty input is undefined")]
    EmptyInput,
    /// A bulk load failed: unopenable file, wrong database qualifier,
    /// unknown table, or a row width mismatch.
    #[error("failed to load `{path}`: {reason}")]
    LoadError { path: String, reason: String },
    /// An I/O failure during startup or shutdown persistence.
    #[error("persistence failure: {0}")]
    Persistence(#[from] io::Error),
    /// A branch that should be unreachable given a well-formed operator
    /// record was hit anyway.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Status codes returned to the transport for every request, per the
/// command-language boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    OkDone,
    OkWaitForResponse,
    UnknownCommand,
    IncorrectFormat,
    ObjectNotFound,
    InvalidArgument,
    QueryUnsupported,
    ExecutionError,
}

impl EngineError {
    /// Maps this error to the status code the transport should report.
    pub fn status(&self) -> StatusCode {
        match self {
            EngineError::NotFound(_) => StatusCode::ObjectNotFound,
            EngineError::AlreadyActive
            | EngineError::WrongDatabase(_)
            | EngineError::TableFull(_)
            | EngineError::InvalidColumnCount
            | EngineError::RowWidthMismatch { .. }
            | EngineError::SizeMismatch { .. }
            | EngineError::EmptyInput => StatusCode::InvalidArgument,
            EngineError::LoadError { .. }
            | EngineError::Persistence(_)
            | EngineError::Internal(_) => StatusCode::ExecutionError,
        }
    }
}
