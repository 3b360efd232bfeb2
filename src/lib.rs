#![allow(clippy::needless_return)]

pub mod grid;
pub mod preview;
pub mod rules;
pub mod schema;
pub mod utils;
pub mod workbook;

// Test utilities - only compiled when testing or with test feature
// #[cfg(test)] alone doesn't work for integration tests (they're external crates)
// The feature flag makes it available to integration tests via dev-dependencies
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use grid::{CellRecord, CellRef, FlagMap, RuleCategory, ValuationGrid};
pub use rules::{run_check, sum_final_values, validate_all, Check, ValidationReport};
pub use schema::{check_schema, missing_columns, CheckerError, EXPECTED_COLUMNS, MANDATORY_FIELDS};

pub const ERRORS_LOG_FILE: &str = "errors.log";
