use crate::error::{EngineError, EngineResult};
use crate::result::{Payload, QueryResult};

/// Formats an ordered list of results into the byte string returned to the
/// client: `N` rows of `K` comma-separated values each, every row
/// terminated by `\n` (no trailing newline beyond the last row's).
///
/// Builds each row into a `String` and appends it to a single growable
/// buffer, so no column's formatted width can overflow another's
/// allowance.
pub fn format_rows(results: &[&QueryResult]) -> EngineResult<Vec<u8>> {
    let Some(first) = results.first() else {
        return Ok(Vec::new());
    };
    let tuple_count = first.tuple_count();
    for result in results {
        if result.tuple_count() != tuple_count {
            return Err(EngineError::SizeMismatch {
                left: tuple_count,
                right: result.tuple_count(),
            });
        }
    }

    let mut out = String::new();
    for row in 0..tuple_count {
        for (col, result) in results.iter().enumerate() {
            if col > 0 {
                out.push(',');
            }
            format_value(&mut out, result, row);
        }
        out.push('\n');
    }
    Ok(out.into_bytes())
}

fn format_value(out: &mut String, result: &QueryResult, row: usize) {
    use std::fmt::Write;
    match &result.payload {
        Payload::Index(v) => write!(out, "{}", v[row]).unwrap(),
        Payload::Int(v) => write!(out, "{}", v[row]).unwrap(),
        Payload::Long(v) => write!(out, "{}", v[row]).unwrap(),
        Payload::Float(v) => write!(out, "{:.2}", v[row]).unwrap(),
    }
}
