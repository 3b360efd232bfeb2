// Test utilities available to both unit and integration tests
// Only compiled when testing

use crate::grid::ValuationGrid;
use crate::schema::EXPECTED_COLUMNS;

/// The expected header in canonical column order.
#[allow(dead_code)]
pub fn expected_header() -> Vec<String> {
    EXPECTED_COLUMNS.iter().map(|c| c.to_string()).collect()
}

/// A row that passes every check: market approach 1 with a matching
/// market_approach_value, cost columns left empty.
#[allow(dead_code)]
pub fn valid_row() -> Vec<String> {
    [
        "A-1001",        // asset_id
        "Rolling mill drive", // asset_name
        "Plant 2",       // asset_location
        "Maintenance",   // department
        "J. Keller",     // inspector_name
        "07-03-2024",    // inspection_date
        "40",            // asset_usage_id
        "3",             // value_base
        "200",           // final_value
        "EUR",           // currency
        "120.5",         // production_capacity
        "owned",         // ownership_status
        "good",          // condition_rating
        "1",             // market_approach
        "200",           // market_approach_value
        "",              // cost_approach
        "",              // cost_approach_value
    ]
    .iter()
    .map(|v| v.to_string())
    .collect()
}

/// A valid row with the named cells overridden.
#[allow(dead_code)]
pub fn row_with(overrides: &[(&str, &str)]) -> Vec<String> {
    let mut row = valid_row();
    for (field, value) in overrides {
        let index = EXPECTED_COLUMNS
            .iter()
            .position(|column| column == field)
            .unwrap_or_else(|| panic!("unknown column in test override: {field}"));
        row[index] = value.to_string();
    }
    row
}

/// Build a grid over the expected header from prepared rows.
#[allow(dead_code)]
pub fn grid_with_rows(rows: Vec<Vec<String>>) -> ValuationGrid {
    ValuationGrid::new(expected_header(), rows)
}
