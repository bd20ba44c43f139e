use crate::error::{EngineError, EngineResult};
use crate::result::QueryResult;

/// Sum over a raw column or INT result. 64-bit accumulator; each element
/// is widening-converted before adding, so this cannot overflow for any
/// input representable in 32 bits.
pub fn sum(values: &[i32]) -> QueryResult {
    let total: i64 = values.iter().map(|&v| v as i64).sum();
    QueryResult::long_scalar(total)
}

/// Average over a raw column or INT result, computed as the 64-bit integer
/// sum divided by the count (as a float). Undefined, and rejected, for an
/// empty input.
pub fn avg(values: &[i32]) -> EngineResult<QueryResult> {
    if values.is_empty() {
        return Err(EngineError::EmptyInput);
    }
    let total: i64 = values.iter().map(|&v| v as i64).sum();
    Ok(QueryResult::float_scalar(total as f64 / values.len() as f64))
}

/// A generalized-column input to `min`/`max`: the output element type
/// equals the input's, whether that is a raw INT column, an INT result, or
/// (less commonly) a LONG/FLOAT scalar result being re-aggregated.
pub enum AggInput<'a> {
    Int(&'a [i32]),
    Long(&'a [i64]),
    Float(&'a [f64]),
}

pub fn min(input: AggInput) -> EngineResult<QueryResult> {
    match input {
        AggInput::Int(v) => v
            .iter()
            .min()
            .map(|&m| QueryResult::int_scalar(m))
            .ok_or(EngineError::EmptyInput),
        AggInput::Long(v) => v
            .iter()
            .min()
            .map(|&m| QueryResult::long_scalar(m))
            .ok_or(EngineError::EmptyInput),
        AggInput::Float(v) => v
            .iter()
            .cloned()
            .fold(None, |acc, x| match acc {
                None => Some(x),
                Some(a) if x < a => Some(x),
                Some(a) => Some(a),
            })
            .map(QueryResult::float_scalar)
            .ok_or(EngineError::EmptyInput),
    }
}

pub fn max(input: AggInput) -> EngineResult<QueryResult> {
    match input {
        AggInput::Int(v) => v
            .iter()
            .max()
            .map(|&m| QueryResult::int_scalar(m))
            .ok_or(EngineError::EmptyInput),
        AggInput::Long(v) => v
            .iter()
            .max()
            .map(|&m| QueryResult::long_scalar(m))
            .ok_or(EngineError::EmptyInput),
        AggInput::Float(v) => v
            .iter()
            .cloned()
            .fold(None, |acc, x| match acc {
                None => Some(x),
                Some(a) if x > a => Some(x),
                Some(a) => Some(a),
            })
            .map(QueryResult::float_scalar)
            .ok_or(EngineError::EmptyInput),
    }
}
