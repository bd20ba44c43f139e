//! Tabular coverage of `select`'s half-open bound semantics across the
//! bounded/unbounded combinations a client script can produce.

use columndb_engine::operators::{select_scan, Bound};
use test_case::test_case;

const DATA: [i32; 6] = [-10, 0, 5, 10, 15, 20];

#[test_case(Some(5), Some(15), &[2, 3] ; "both bounds present")]
#[test_case(None, Some(10), &[0, 1, 2] ; "unbounded below")]
#[test_case(Some(10), None, &[3, 4, 5] ; "unbounded above")]
#[test_case(None, None, &[0, 1, 2, 3, 4, 5] ; "fully unbounded")]
#[test_case(Some(0), None, &[1, 2, 3, 4, 5] ; "a lower bound of zero is not absence")]
#[test_case(Some(100), Some(200), &[] ; "no rows satisfy the bound")]
fn select_scan_matches_expected_positions(low: Option<i32>, high: Option<i32>, expected: &[usize]) {
    let result = select_scan(&DATA, Bound { low, high });
    assert_eq!(result.as_index_slice().unwrap(), expected);
}
