//! The executor: dispatches a [`DbOperator`] to the catalog or an
//! operator routine, binds results into the issuing session's handle
//! table, and reports shutdown.

use crate::catalog::Catalog;
use crate::error::{EngineError, EngineResult};
use crate::load;
use crate::operator::{
    AggOp, ArithOp, CreateOperator, DbOperator, GeneralizedColumnRef, SelectSource,
};
use crate::operators::{add, avg, fetch, max, min, select_domain, select_scan, sub, sum, AggInput};
use crate::result::{GeneralizedColumn, Payload, QueryResult};
use crate::session::Session;

/// What the caller (the transport, out of scope here) should do once
/// `execute` returns.
pub enum ExecutionOutcome {
    /// The statement mutated state or bound a handle; nothing to send
    /// beyond the status code.
    Done,
    /// `print` produced a byte string to return to the client.
    Response(Vec<u8>),
    /// `shutdown` was received; the accept loop should stop serving new
    /// connections after this session ends.
    Shutdown,
}

/// Resolves `name` as either a qualified `db.table.col` (if it contains a
/// `.`) or a session handle name, per the `sum(x)`/`avg(x)`/... grammar
/// where `x` may be either.
fn resolve_generalized<'a>(
    catalog: &'a Catalog,
    session: &'a Session,
    name: &str,
) -> EngineResult<GeneralizedColumn<'a>> {
    if name.contains('.') {
        catalog.lookup_column(name).map(GeneralizedColumn::Column)
    } else {
        session
            .handles
            .lookup(name)
            .map(GeneralizedColumn::Result)
            .ok_or_else(|| EngineError::NotFound(name.to_string()))
    }
}

fn resolve_handle<'a>(session: &'a Session, name: &str) -> EngineResult<&'a QueryResult> {
    session
        .handles
        .lookup(name)
        .ok_or_else(|| EngineError::NotFound(name.to_string()))
}

fn as_index<'a>(result: &'a QueryResult, handle: &str) -> EngineResult<&'a [usize]> {
    result
        .as_index_slice()
        .ok_or_else(|| EngineError::Internal(format!("`{handle}` is not an index result")))
}

fn as_int<'a>(result: &'a QueryResult, handle: &str) -> EngineResult<&'a [i32]> {
    result
        .as_int_slice()
        .ok_or_else(|| EngineError::Internal(format!("`{handle}` is not an int result")))
}

/// Dispatches one operator record. `catalog` is the process-wide catalog;
/// `session` is the issuing client's handle table.
pub fn execute(
    op: DbOperator,
    catalog: &mut Catalog,
    session: &mut Session,
) -> EngineResult<ExecutionOutcome> {
    match op {
        DbOperator::Create(create) => {
            match create {
                CreateOperator::Db { name } => catalog.create_db(name)?,
                CreateOperator::Table {
                    db,
                    name,
                    num_columns,
                } => catalog.create_table(&db, name, num_columns)?,
                CreateOperator::Column { table, name } => catalog.create_column(&table, name)?,
            }
            Ok(ExecutionOutcome::Done)
        }

        DbOperator::Insert { table, row } => {
            catalog.lookup_table_mut(&table)?.relational_insert(&row)?;
            Ok(ExecutionOutcome::Done)
        }

        DbOperator::Load { path } => {
            load::load_table(catalog, &path)?;
            Ok(ExecutionOutcome::Done)
        }

        DbOperator::Select(select) => {
            let result = match select.source {
                SelectSource::Column(qualified_column) => {
                    let column = catalog.lookup_column(&qualified_column)?;
                    select_scan(column.as_slice(), select.bound)
                }
                SelectSource::Domain {
                    positions_handle,
                    values_handle,
                } => {
                    let positions = as_index(resolve_handle(session, &positions_handle)?, &positions_handle)?;
                    let values = as_int(resolve_handle(session, &values_handle)?, &values_handle)?;
                    select_domain(positions, values, select.bound)?
                }
            };
            session.handles.bind(&select.handle, result);
            Ok(ExecutionOutcome::Done)
        }

        DbOperator::Fetch(op) => {
            let column = catalog.lookup_column(&op.column)?;
            let positions = as_index(
                resolve_handle(session, &op.positions_handle)?,
                &op.positions_handle,
            )?;
            let result = fetch(column.as_slice(), positions);
            session.handles.bind(&op.handle, result);
            Ok(ExecutionOutcome::Done)
        }

        DbOperator::Arithmetic(op) => {
            let left = as_int(resolve_handle(session, &op.left_handle)?, &op.left_handle)?;
            let right = as_int(resolve_handle(session, &op.right_handle)?, &op.right_handle)?;
            let result = match op.op {
                ArithOp::Add => add(left, right)?,
                ArithOp::Sub => sub(left, right)?,
            };
            session.handles.bind(&op.handle, result);
            Ok(ExecutionOutcome::Done)
        }

        DbOperator::Aggregate(op) => {
            let name = match &op.input {
                GeneralizedColumnRef::Column(c) => c.clone(),
                GeneralizedColumnRef::Handle(h) => h.clone(),
            };
            let generalized = resolve_generalized(catalog, session, &name)?;
            let result = match op.op {
                AggOp::Sum => sum(int_slice_of(&generalized, &name)?),
                AggOp::Avg => avg(int_slice_of(&generalized, &name)?)?,
                AggOp::Min => min(agg_input_of(&generalized, &name)?)?,
                AggOp::Max => max(agg_input_of(&generalized, &name)?)?,
            };
            session.handles.bind(&op.handle, result);
            Ok(ExecutionOutcome::Done)
        }

        DbOperator::Print(print) => {
            let results: Vec<&QueryResult> = print
                .targets
                .iter()
                .map(|name| resolve_handle(session, name))
                .collect::<EngineResult<_>>()?;
            let body = crate::operators::format_rows(&results)?;
            Ok(ExecutionOutcome::Response(body))
        }

        DbOperator::Shutdown => Ok(ExecutionOutcome::Shutdown),
    }
}

fn int_slice_of<'a>(gc: &GeneralizedColumn<'a>, name: &str) -> EngineResult<&'a [i32]> {
    match gc {
        GeneralizedColumn::Column(c) => Ok(c.as_slice()),
        GeneralizedColumn::Result(r) => as_int(r, name),
    }
}

fn agg_input_of<'a>(gc: &GeneralizedColumn<'a>, name: &str) -> EngineResult<AggInput<'a>> {
    match gc {
        GeneralizedColumn::Column(c) => Ok(AggInput::Int(c.as_slice())),
        GeneralizedColumn::Result(r) => match &r.payload {
            Payload::Int(v) => Ok(AggInput::Int(v)),
            Payload::Long(v) => Ok(AggInput::Long(v)),
            Payload::Float(v) => Ok(AggInput::Float(v)),
            Payload::Index(_) => Err(EngineError::Internal(format!(
                "`{name}` is an index result; min/max need a value type"
            ))),
        },
    }
}
