//! Common test utilities for the valuation-checker library tests

use valuation_checker::test_utils;
use valuation_checker::ValuationGrid;

/// The expected header in canonical column order.
#[allow(dead_code)]
pub fn expected_header() -> Vec<String> {
    test_utils::expected_header()
}

/// A row that passes every check.
#[allow(dead_code)]
pub fn valid_row() -> Vec<String> {
    test_utils::valid_row()
}

/// A valid row with the named cells overridden.
#[allow(dead_code)]
pub fn row_with(overrides: &[(&str, &str)]) -> Vec<String> {
    test_utils::row_with(overrides)
}

/// Build a grid over the expected header from prepared rows.
#[allow(dead_code)]
pub fn grid_with_rows(rows: Vec<Vec<String>>) -> ValuationGrid {
    test_utils::grid_with_rows(rows)
}
