//! The operator interface: the tagged-union contract the parser fills in
//! and the executor drains.
//!
//! Every operator here is resolved only as far as *names*: a qualified
//! `db.table.col` string or a session handle name. Resolving those names
//! into catalog/session references happens once, in
//! [`crate::executor::execute`], which is the only place that needs
//! simultaneous mutable access to the catalog and a session's handle
//! table. This keeps `DbOperator` an owned, 'static record. The parser is
//! responsible for producing well-formed names; `execute` surfaces
//! `NotFound` for any name that does not resolve.

use std::path::PathBuf;

use crate::operators::select::Bound;

/// One of the three `create(...)` targets.
#[derive(Debug, Clone)]
pub enum CreateOperator {
    Db {
        name: String,
    },
    Table {
        db: String,
        name: String,
        num_columns: usize,
    },
    Column {
        /// Qualified `db.table`.
        table: String,
        name: String,
    },
}

/// Either a raw column or a prior result, named rather than resolved (see
/// module docs). Used by `select`'s domain-scan form is not modeled here
/// since both of its inputs are always prior results; this is used by
/// `aggregate`, whose input may be either.
#[derive(Debug, Clone)]
pub enum GeneralizedColumnRef {
    /// Qualified `db.table.col`.
    Column(String),
    /// A session handle name.
    Handle(String),
}

/// `select`'s two shapes.
#[derive(Debug, Clone)]
pub enum SelectSource {
    /// Full scan over a qualified `db.table.col`.
    Column(String),
    /// Domain scan: a prior INDEX handle and a prior INT handle of the
    /// same tuple count.
    Domain {
        positions_handle: String,
        values_handle: String,
    },
}

#[derive(Debug, Clone)]
pub struct SelectOperator {
    pub source: SelectSource,
    pub bound: Bound,
    pub handle: String,
}

#[derive(Debug, Clone)]
pub struct FetchOperator {
    /// Qualified `db.table.col`.
    pub column: String,
    pub positions_handle: String,
    pub handle: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
}

#[derive(Debug, Clone)]
pub struct ArithmeticOperator {
    pub op: ArithOp,
    pub left_handle: String,
    pub right_handle: String,
    pub handle: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggOp {
    Sum,
    Avg,
    Min,
    Max,
}

#[derive(Debug, Clone)]
pub struct AggregateOperator {
    pub op: AggOp,
    pub input: GeneralizedColumnRef,
    pub handle: String,
}

#[derive(Debug, Clone)]
pub struct PrintOperator {
    /// Names of previously bound handles, in the order to print them.
    pub targets: Vec<String>,
}

/// The tagged operator record dispatched by the executor.
#[derive(Debug, Clone)]
pub enum DbOperator {
    Create(CreateOperator),
    Insert {
        /// Qualified `db.table`.
        table: String,
        row: Vec<i32>,
    },
    Load {
        path: PathBuf,
    },
    Select(SelectOperator),
    Fetch(FetchOperator),
    Arithmetic(ArithmeticOperator),
    Aggregate(AggregateOperator),
    Print(PrintOperator),
    Shutdown,
}
