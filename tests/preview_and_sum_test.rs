//! Tests for the JSON preview structure and the sum aggregation mode

use serde_json::json;
use valuation_checker::preview::build_preview;
use valuation_checker::rules::{run_check, sum_final_values, Check};

mod common;

#[test]
fn test_preview_shape_for_single_check() {
    let mut grid = common::grid_with_rows(vec![common::row_with(&[("final_value", "5.5"), (
        "market_approach_value",
        "5.5",
    )])]);

    let report = run_check(Check::FinalValue, &mut grid);
    let response = build_preview(Check::FinalValue, &grid, &report);

    assert_eq!(response.header, common::expected_header());
    assert_eq!(response.preview.len(), 1);

    let row = &response.preview[0];
    assert_eq!(
        row.get("final_value").unwrap(),
        &json!({ "value": "5.5 | must be a non-decimal integer", "highlight": true })
    );
    assert_eq!(
        row.get("asset_id").unwrap(),
        &json!({ "value": "A-1001", "highlight": false })
    );

    // Only sum and full-aggregate previews carry a total
    assert!(response.total.is_none());
    let serialized = serde_json::to_value(&response).unwrap();
    assert!(serialized.get("total").is_none());
}

#[test]
fn test_single_check_runs_in_isolation() {
    // A row full of unrelated problems: the date check must not flag them
    let mut grid = common::grid_with_rows(vec![common::row_with(&[
        ("final_value", "abc"),
        ("market_approach_value", "abc"),
        ("asset_usage_id", "99"),
        ("inspection_date", "07-03-2024"),
    ])]);

    let report = run_check(Check::Date, &mut grid);

    assert_eq!(report.violations, 0);
    assert!(report.flags.is_empty());
    assert_eq!(report.summary.len(), 1);
}

#[test]
fn test_sum_mode_totals_final_values_leniently() {
    let mut rows = Vec::new();
    for value in ["100", "abc", "", "50,000"] {
        rows.push(common::row_with(&[
            ("final_value", value),
            ("market_approach", ""),
            ("market_approach_value", ""),
        ]));
    }
    let mut grid = common::grid_with_rows(rows);

    assert_eq!(sum_final_values(&grid), 50100.0);

    let report = run_check(Check::Sum, &mut grid);
    let response = build_preview(Check::Sum, &grid, &report);

    assert_eq!(response.total, Some(50100.0));
    assert!(response.summary.is_empty());
    assert!(report.flags.is_empty());

    // Sum is an aggregation, not a check: nothing is annotated
    assert_eq!(grid.cell(1, "final_value").unwrap().annotated(), "abc");
}

#[test]
fn test_full_aggregate_preview_includes_total_and_summary() {
    let mut grid = common::grid_with_rows(vec![common::row_with(&[])]);

    let report = run_check(Check::All, &mut grid);
    let response = build_preview(Check::All, &grid, &report);

    assert_eq!(response.total, Some(200.0));
    assert!(!response.summary.is_empty());
}

#[test]
fn test_preview_shows_rewritten_dates() {
    let mut grid = common::grid_with_rows(vec![common::row_with(&[(
        "inspection_date",
        "2024-03-07",
    )])]);

    let report = run_check(Check::Date, &mut grid);
    let response = build_preview(Check::Date, &grid, &report);

    assert_eq!(
        response.preview[0].get("inspection_date").unwrap(),
        &json!({ "value": "07-03-2024", "highlight": false })
    );
}
