use crate::result::QueryResult;

/// Gather: `result[i] = data[positions[i]]`. Positions are assumed in
/// range. An index result's payload is always bounded by the originating
/// column's length at the moment it was produced; a position that has
/// since run off the end of a grown/truncated column is a contract
/// violation this function does not guard against.
pub fn fetch(data: &[i32], positions: &[usize]) -> QueryResult {
    let values: Vec<i32> = positions.iter().map(|&p| data[p]).collect();
    QueryResult::int(values)
}
