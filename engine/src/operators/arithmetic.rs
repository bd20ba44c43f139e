use crate::error::{EngineError, EngineResult};
use crate::result::QueryResult;

fn checked_zip<'a>(a: &'a [i32], b: &'a [i32]) -> EngineResult<impl Iterator<Item = (&'a i32, &'a i32)>> {
    if a.len() != b.len() {
        return Err(EngineError::SizeMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b))
}

/// Elementwise addition. Wraps on overflow, matching plain `i32`
/// arithmetic.
pub fn add(a: &[i32], b: &[i32]) -> EngineResult<QueryResult> {
    let values: Vec<i32> = checked_zip(a, b)?.map(|(x, y)| x.wrapping_add(*y)).collect();
    Ok(QueryResult::int(values))
}

/// Elementwise subtraction. Wraps on overflow, see [`add`].
pub fn sub(a: &[i32], b: &[i32]) -> EngineResult<QueryResult> {
    let values: Vec<i32> = checked_zip(a, b)?.map(|(x, y)| x.wrapping_sub(*y)).collect();
    Ok(QueryResult::int(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_elementwise() {
        let result = add(&[10, 20, 30], &[100, 200, 300]).unwrap();
        assert_eq!(result.as_int_slice().unwrap(), &[110, 220, 330]);
    }

    #[test]
    fn sub_is_elementwise() {
        let result = sub(&[10, 20, 30], &[1, 2, 3]).unwrap();
        assert_eq!(result.as_int_slice().unwrap(), &[9, 18, 27]);
    }

    #[test]
    fn mismatched_operand_counts_fail() {
        let err = add(&[1, 2], &[1]).unwrap_err();
        assert!(matches!(err, EngineError::SizeMismatch { left: 2, right: 1 }));
    }
}
