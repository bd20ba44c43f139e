//! `columndb-engine`: the catalog, column store, result/handle model,
//! operators, persistence, and session lifecycle of a single-node,
//! interactive, column-oriented analytical database.
//!
//! This crate is pure: no socket, no parsing, no process-level state
//! beyond what a caller constructs and owns. Transport framing, the
//! statement parser, and the CLI client live in the sibling
//! `columndb-server` and `columndb-client` binaries, which drive this
//! crate through [`executor::execute`] and [`persistence`].

pub mod catalog;
pub mod error;
pub mod executor;
pub mod handle;
mod load;
pub mod operator;
pub mod operators;
pub mod persistence;
pub mod result;
pub mod session;

/// Default root directory for persisted catalog/column data.
pub const DEFAULT_DATA_DIR: &str = "db_data";

pub use catalog::Catalog;
pub use error::{EngineError, EngineResult};
pub use executor::{execute, ExecutionOutcome};
pub use session::Session;
