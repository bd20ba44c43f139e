use crate::error::{EngineError, EngineResult};
use crate::result::QueryResult;

/// A half-open `[low, high)` comparator. Either endpoint may be absent,
/// meaning unbounded on that side. `Option<i32>` carries absence
/// explicitly, so a bound of zero is never confused with no bound at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bound {
    pub low: Option<i32>,
    pub high: Option<i32>,
}

impl Bound {
    pub fn contains(&self, value: i32) -> bool {
        self.low.map_or(true, |lo| value >= lo) && self.high.map_or(true, |hi| value < hi)
    }
}

/// Full scan: emits every position `i` in row order such that
/// `bound.contains(data[i])`.
pub fn select_scan(data: &[i32], bound: Bound) -> QueryResult {
    let mut positions = Vec::new();
    for (i, &value) in data.iter().enumerate() {
        if bound.contains(value) {
            positions.push(i);
        }
    }
    QueryResult::index(positions)
}

/// Domain scan: `positions` and `values` must share a tuple count (values
/// is typically the output of fetching some column at `positions`). For
/// each `i` where `bound.contains(values[i])`, emits `positions[i]`,
/// preserving original row identifiers, not new indices into `values`.
pub fn select_domain(positions: &[usize], values: &[i32], bound: Bound) -> EngineResult<QueryResult> {
    if positions.len() != values.len() {
        return Err(EngineError::SizeMismatch {
            left: positions.len(),
            right: values.len(),
        });
    }
    let mut out = Vec::new();
    for (&position, &value) in positions.iter().zip(values) {
        if bound.contains(value) {
            out.push(position);
        }
    }
    Ok(QueryResult::index(out))
}
