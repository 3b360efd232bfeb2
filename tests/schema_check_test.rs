//! Tests for the upload-schema precondition check

use valuation_checker::{check_schema, missing_columns, CheckerError, EXPECTED_COLUMNS};

mod common;

#[test]
fn test_canonical_header_is_accepted() {
    assert!(check_schema(&common::expected_header()).is_ok());
}

#[test]
fn test_extra_columns_are_tolerated() {
    let mut header = common::expected_header();
    header.insert(0, "row_number".to_string());
    header.push("appraiser_remarks".to_string());

    assert!(check_schema(&header).is_ok());
}

#[test]
fn test_missing_columns_fail_fast_with_names() {
    let header: Vec<String> = common::expected_header()
        .into_iter()
        .filter(|column| column != "inspection_date" && column != "cost_approach")
        .collect();

    let error = check_schema(&header).unwrap_err();
    let CheckerError::MissingColumns { columns } = &error else {
        panic!("expected a missing-columns error, got {error:?}");
    };

    assert_eq!(columns, &["inspection_date", "cost_approach"]);

    // The displayed message lists the missing names for the caller
    let message = error.to_string();
    assert!(message.contains("inspection_date"));
    assert!(message.contains("cost_approach"));
}

#[test]
fn test_empty_header_reports_every_expected_column() {
    let missing = missing_columns(&[]);
    assert_eq!(missing.len(), EXPECTED_COLUMNS.len());
}

#[test]
fn test_column_order_does_not_matter() {
    let mut header = common::expected_header();
    header.reverse();

    assert!(check_schema(&header).is_ok());
}
