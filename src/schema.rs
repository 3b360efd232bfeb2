//! The fixed upload schema: which columns a valuation sheet must carry and
//! which of them must be filled on every row.

use thiserror::Error;

/// Columns every upload must contain, in canonical order. The upload may
/// carry extra columns; they are passed through untouched.
pub const EXPECTED_COLUMNS: [&str; 17] = [
    "asset_id",
    "asset_name",
    "asset_location",
    "department",
    "inspector_name",
    "inspection_date",
    "asset_usage_id",
    "value_base",
    "final_value",
    "currency",
    "production_capacity",
    "ownership_status",
    "condition_rating",
    "market_approach",
    "market_approach_value",
    "cost_approach",
    "cost_approach_value",
];

/// Fields that must be non-empty on every row.
///
/// Two entries carry documented exceptions enforced by the mandatory-fields
/// rule itself: `market_approach` is never enforced (an empty value reads as
/// an implicit 0) and `market_approach_value` is enforced only on rows whose
/// `market_approach` resolves to a non-zero integer.
pub const MANDATORY_FIELDS: [&str; 15] = [
    "asset_id",
    "asset_name",
    "asset_location",
    "department",
    "inspector_name",
    "inspection_date",
    "asset_usage_id",
    "value_base",
    "final_value",
    "currency",
    "production_capacity",
    "ownership_status",
    "condition_rating",
    "market_approach",
    "market_approach_value",
];

#[derive(Error, Debug, Clone)]
pub enum CheckerError {
    #[error(
        "The uploaded sheet is missing required columns: {}. Please add them and upload again.",
        .columns.join(", ")
    )]
    MissingColumns { columns: Vec<String> },

    #[error("The uploaded sheet has no header row")]
    MissingHeader,
}

/// List the expected columns absent from an uploaded header.
///
/// Header cells are compared after trimming; result order follows
/// [`EXPECTED_COLUMNS`] so the caller's error message is stable.
pub fn missing_columns(header: &[String]) -> Vec<String> {
    EXPECTED_COLUMNS
        .iter()
        .filter(|expected| !header.iter().any(|column| column.trim() == **expected))
        .map(|expected| expected.to_string())
        .collect()
}

/// Hard precondition for every validation run: the header must be a superset
/// of the expected schema. No partial validation is attempted on failure.
pub fn check_schema(header: &[String]) -> Result<(), CheckerError> {
    let missing = missing_columns(header);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CheckerError::MissingColumns { columns: missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_header_passes() {
        let header: Vec<String> = EXPECTED_COLUMNS.iter().map(|c| c.to_string()).collect();
        assert!(check_schema(&header).is_ok());
    }

    #[test]
    fn test_superset_header_passes() {
        let mut header: Vec<String> = EXPECTED_COLUMNS.iter().map(|c| c.to_string()).collect();
        header.push("internal_remarks".to_string());
        assert!(check_schema(&header).is_ok());
    }

    #[test]
    fn test_missing_columns_are_listed_in_schema_order() {
        let header: Vec<String> = EXPECTED_COLUMNS
            .iter()
            .filter(|c| **c != "final_value" && **c != "asset_id")
            .map(|c| c.to_string())
            .collect();

        let missing = missing_columns(&header);
        assert_eq!(missing, vec!["asset_id", "final_value"]);
    }

    #[test]
    fn test_header_cells_are_trimmed_before_comparison() {
        let header: Vec<String> = EXPECTED_COLUMNS
            .iter()
            .map(|c| format!("  {c} "))
            .collect();
        assert!(check_schema(&header).is_ok());
    }

    #[test]
    fn test_mandatory_fields_are_a_subset_of_expected() {
        for field in MANDATORY_FIELDS {
            assert!(EXPECTED_COLUMNS.contains(&field), "{field} not expected");
        }
    }
}
