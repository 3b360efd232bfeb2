//! The validation rule engine: eight per-concern checks over the grid, the
//! aggregator that runs them in a fixed order, and the single-check selector
//! the preview interface uses.
//!
//! Every check scans all data rows for one concern, appends a message to each
//! offending cell and records a flag. Checks share no state beyond the grid
//! and flag map they are handed, but the aggregator runs them sequentially on
//! the same grid, so the trail a cell accumulates is ordered by check order.
//! A check must run at most once per fresh upload: re-running one on an
//! already-annotated grid appends the same messages again.

use crate::grid::{CellRef, FlagMap, RuleCategory, ValuationGrid};
use crate::schema::MANDATORY_FIELDS;
use crate::utils::{is_empty, parse_total, to_float, to_int};

const MSG_MANDATORY: &str = "mandatory and cannot be empty";
const MSG_FINAL_INTEGER: &str = "must be a non-decimal integer";
const MSG_DATE_FORMAT: &str = "must be a date in dd-mm-yyyy format";
const MSG_ASSET_USAGE_RANGE: &str = "must be an integer between 38 and 56";
const MSG_VALUE_BASE_RANGE: &str = "must be an integer between 1 and 9";
const MSG_MARKET_ENUM: &str = "must be 0, 1 or 2";
const MSG_MARKET_VALUE_MISMATCH: &str = "must equal final_value when market_approach is 1 or 2";
const MSG_COST_ENUM: &str = "must be 1 or 2 when market_approach is 0";
const MSG_COST_VALUE_MISMATCH: &str = "must equal final_value when the cost approach is used";
const MSG_PRODUCTION_CAPACITY: &str = "must be a non-negative number";

/// What a single check found: its itemized violation count, the cross-field
/// mismatches swept into the aggregator's catch-all count, the number of
/// silently auto-fixed cells (date check only) and its human summary lines.
#[derive(Debug, Clone, Default)]
pub struct RuleSummary {
    pub violations: usize,
    pub consistency_violations: usize,
    pub auto_fixed: usize,
    pub lines: Vec<String>,
}

/// The outcome of a validation run: the merged flag map and the concatenated
/// summaries. The grid itself carries the per-cell message trails.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub flags: FlagMap,
    pub summary: Vec<String>,
    pub violations: usize,
}

/// Record one violation: append the message to the cell and flag it. A cell
/// already flagged by an earlier check keeps its first category.
fn flag(
    grid: &mut ValuationGrid,
    flags: &mut FlagMap,
    row: usize,
    field: &str,
    category: RuleCategory,
    message: &str,
) {
    if let Some(cell) = grid.cell_mut(row, field) {
        cell.push_message(message);
    }
    flags.entry(CellRef::new(row, field)).or_insert(category);
}

/// Whether `market_approach_value` is required on this row.
///
/// The gate parses `market_approach` as a float and truncates, deliberately
/// looser than `to_int`: "1.5" still selects the market approach even though
/// the enum check will reject it separately.
fn market_value_required(grid: &ValuationGrid, row: usize) -> bool {
    match to_float(grid.value(row, "market_approach")) {
        Some(value) => value as i64 != 0,
        None => false,
    }
}

/// Check 1: the mandatory fields must be non-empty on every row.
///
/// `market_approach` is exempt (an empty value reads as an implicit 0) and
/// `market_approach_value` is required only on rows that actually select the
/// market approach.
pub fn check_mandatory_fields(grid: &mut ValuationGrid, flags: &mut FlagMap) -> RuleSummary {
    let mut violations = 0;

    for row in 0..grid.row_count() {
        for field in MANDATORY_FIELDS {
            if field == "market_approach" {
                continue;
            }
            if field == "market_approach_value" && !market_value_required(grid, row) {
                continue;
            }
            if is_empty(grid.value(row, field)) {
                flag(grid, flags, row, field, RuleCategory::Mandatory, MSG_MANDATORY);
                violations += 1;
            }
        }
    }

    let line = if violations == 0 {
        "All mandatory fields are filled.".to_string()
    } else {
        format!("{violations} mandatory cell(s) are empty. Mandatory fields cannot be left blank.")
    };

    RuleSummary {
        violations,
        lines: vec![line],
        ..Default::default()
    }
}

/// Check 2: `final_value` must be present and a non-decimal integer.
pub fn check_final_value(grid: &mut ValuationGrid, flags: &mut FlagMap) -> RuleSummary {
    let mut violations = 0;

    for row in 0..grid.row_count() {
        let value = grid.value(row, "final_value").to_string();
        if is_empty(&value) {
            flag(
                grid,
                flags,
                row,
                "final_value",
                RuleCategory::FinalValue,
                MSG_MANDATORY,
            );
            violations += 1;
        } else if to_int(&value).is_none() {
            flag(
                grid,
                flags,
                row,
                "final_value",
                RuleCategory::FinalValue,
                MSG_FINAL_INTEGER,
            );
            violations += 1;
        }
    }

    let line = if violations == 0 {
        "All final_value cells are non-decimal integers.".to_string()
    } else {
        format!("{violations} final_value cell(s) are missing or not non-decimal integers.")
    };

    RuleSummary {
        violations,
        lines: vec![line],
        ..Default::default()
    }
}

// Strict textual shapes for the two accepted date spellings. This is not a
// calendar-aware parse: "99-99-2024" matches the pattern and passes.
fn is_day_first_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[2] == b'-'
        && bytes[5] == b'-'
        && [0, 1, 3, 4, 6, 7, 8, 9]
            .iter()
            .all(|&index| bytes[index].is_ascii_digit())
}

fn is_year_first_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && [0, 1, 2, 3, 5, 6, 8, 9]
            .iter()
            .all(|&index| bytes[index].is_ascii_digit())
}

/// Check 3: `inspection_date` must be present and spelled `dd-mm-yyyy`.
///
/// A `yyyy-mm-dd` spelling is rewritten in place and counted as auto-fixed
/// rather than flagged. Any other shape, including otherwise valid dates with
/// different delimiters, is a format violation.
pub fn check_inspection_date(grid: &mut ValuationGrid, flags: &mut FlagMap) -> RuleSummary {
    let mut violations = 0;
    let mut auto_fixed = 0;

    for row in 0..grid.row_count() {
        let value = grid.value(row, "inspection_date").trim().to_string();
        if value.is_empty() {
            flag(
                grid,
                flags,
                row,
                "inspection_date",
                RuleCategory::DateFormat,
                MSG_MANDATORY,
            );
            violations += 1;
        } else if is_day_first_date(&value) {
            // Already in the reporting format, kept as-is
        } else if is_year_first_date(&value) {
            let rewritten = format!("{}-{}-{}", &value[8..10], &value[5..7], &value[0..4]);
            if let Some(cell) = grid.cell_mut(row, "inspection_date") {
                cell.rewrite_value(rewritten);
            }
            auto_fixed += 1;
        } else {
            flag(
                grid,
                flags,
                row,
                "inspection_date",
                RuleCategory::DateFormat,
                MSG_DATE_FORMAT,
            );
            violations += 1;
        }
    }

    let mut lines = vec![if violations == 0 {
        "All inspection_date cells use the dd-mm-yyyy format.".to_string()
    } else {
        format!("{violations} inspection_date cell(s) are missing or not in dd-mm-yyyy format.")
    }];
    if auto_fixed > 0 {
        lines.push(format!(
            "{auto_fixed} inspection_date cell(s) were rewritten from yyyy-mm-dd to dd-mm-yyyy."
        ));
    }

    RuleSummary {
        violations,
        auto_fixed,
        lines,
        ..Default::default()
    }
}

/// Shared body for the two bounded-integer checks: empty cells are left to
/// the mandatory check, everything else must coerce into the range.
fn check_int_range(
    grid: &mut ValuationGrid,
    flags: &mut FlagMap,
    field: &str,
    min: i64,
    max: i64,
    category: RuleCategory,
    message: &str,
) -> usize {
    let mut violations = 0;

    for row in 0..grid.row_count() {
        let value = grid.value(row, field).to_string();
        if is_empty(&value) {
            continue;
        }
        match to_int(&value) {
            Some(parsed) if (min..=max).contains(&parsed) => {}
            _ => {
                flag(grid, flags, row, field, category, message);
                violations += 1;
            }
        }
    }

    violations
}

/// Check 4: `asset_usage_id` must be an integer in [38, 56] when present.
pub fn check_asset_usage_id(grid: &mut ValuationGrid, flags: &mut FlagMap) -> RuleSummary {
    let violations = check_int_range(
        grid,
        flags,
        "asset_usage_id",
        38,
        56,
        RuleCategory::AssetUsageRange,
        MSG_ASSET_USAGE_RANGE,
    );

    let line = if violations == 0 {
        "All asset_usage_id cells are within the 38-56 range.".to_string()
    } else {
        format!("{violations} asset_usage_id cell(s) are not integers between 38 and 56.")
    };

    RuleSummary {
        violations,
        lines: vec![line],
        ..Default::default()
    }
}

/// Check 5: `value_base` must be an integer in [1, 9] when present.
pub fn check_value_base(grid: &mut ValuationGrid, flags: &mut FlagMap) -> RuleSummary {
    let violations = check_int_range(
        grid,
        flags,
        "value_base",
        1,
        9,
        RuleCategory::ValueBaseRange,
        MSG_VALUE_BASE_RANGE,
    );

    let line = if violations == 0 {
        "All value_base cells are within the 1-9 range.".to_string()
    } else {
        format!("{violations} value_base cell(s) are not integers between 1 and 9.")
    };

    RuleSummary {
        violations,
        lines: vec![line],
        ..Default::default()
    }
}

/// Check 6: `market_approach` must be 0, 1 or 2 when present. When it is
/// 1 or 2 the appraised `market_approach_value` must equal `final_value` as
/// an exact trimmed string comparison; a mismatch flags
/// `market_approach_value` as a consistency violation.
pub fn check_market_approach(grid: &mut ValuationGrid, flags: &mut FlagMap) -> RuleSummary {
    let mut violations = 0;
    let mut consistency_violations = 0;

    for row in 0..grid.row_count() {
        let raw = grid.value(row, "market_approach").to_string();
        if is_empty(&raw) {
            continue;
        }
        match to_int(&raw) {
            Some(code @ 0..=2) => {
                if code != 0 {
                    let market_value = grid.value(row, "market_approach_value").trim().to_string();
                    let final_value = grid.value(row, "final_value").trim().to_string();
                    if market_value != final_value {
                        flag(
                            grid,
                            flags,
                            row,
                            "market_approach_value",
                            RuleCategory::Consistency,
                            MSG_MARKET_VALUE_MISMATCH,
                        );
                        consistency_violations += 1;
                    }
                }
            }
            _ => {
                flag(
                    grid,
                    flags,
                    row,
                    "market_approach",
                    RuleCategory::MarketApproach,
                    MSG_MARKET_ENUM,
                );
                violations += 1;
            }
        }
    }

    let line = if violations == 0 {
        "All market_approach cells are one of 0, 1 or 2.".to_string()
    } else {
        format!("{violations} market_approach cell(s) are not one of 0, 1 or 2.")
    };

    RuleSummary {
        violations,
        consistency_violations,
        lines: vec![line],
        ..Default::default()
    }
}

/// Check 7: on rows valued without the market approach (`market_approach`
/// coerces to exactly 0), `cost_approach` must be 1 or 2, and then
/// `cost_approach_value` must equal `final_value`.
///
/// The equality check applies only to a valid 1-or-2 selector; an invalid
/// selector gets the enum violation alone.
pub fn check_cost_approach(grid: &mut ValuationGrid, flags: &mut FlagMap) -> RuleSummary {
    let mut violations = 0;
    let mut consistency_violations = 0;

    for row in 0..grid.row_count() {
        if to_int(grid.value(row, "market_approach")) != Some(0) {
            continue;
        }
        match to_int(grid.value(row, "cost_approach")) {
            Some(1) | Some(2) => {
                let cost_value = grid.value(row, "cost_approach_value").trim().to_string();
                let final_value = grid.value(row, "final_value").trim().to_string();
                if cost_value != final_value {
                    flag(
                        grid,
                        flags,
                        row,
                        "cost_approach_value",
                        RuleCategory::Consistency,
                        MSG_COST_VALUE_MISMATCH,
                    );
                    consistency_violations += 1;
                }
            }
            _ => {
                flag(
                    grid,
                    flags,
                    row,
                    "cost_approach",
                    RuleCategory::CostApproach,
                    MSG_COST_ENUM,
                );
                violations += 1;
            }
        }
    }

    let line = if violations == 0 {
        "All cost_approach cells are valid on rows valued without the market approach.".to_string()
    } else {
        format!(
            "{violations} cost_approach cell(s) are not 1 or 2 on rows where market_approach is 0."
        )
    };

    RuleSummary {
        violations,
        consistency_violations,
        lines: vec![line],
        ..Default::default()
    }
}

/// Check 8: `production_capacity` must be a non-negative number when present.
pub fn check_production_capacity(grid: &mut ValuationGrid, flags: &mut FlagMap) -> RuleSummary {
    let mut violations = 0;

    for row in 0..grid.row_count() {
        let value = grid.value(row, "production_capacity").to_string();
        if is_empty(&value) {
            continue;
        }
        match to_float(&value) {
            Some(parsed) if parsed >= 0.0 => {}
            _ => {
                flag(
                    grid,
                    flags,
                    row,
                    "production_capacity",
                    RuleCategory::ProductionCapacity,
                    MSG_PRODUCTION_CAPACITY,
                );
                violations += 1;
            }
        }
    }

    let line = if violations == 0 {
        "All production_capacity cells are non-negative numbers.".to_string()
    } else {
        format!("{violations} production_capacity cell(s) are not non-negative numbers.")
    };

    RuleSummary {
        violations,
        lines: vec![line],
        ..Default::default()
    }
}

/// Run all eight checks in their fixed order on the same grid, merging flags
/// and concatenating summaries.
///
/// Later checks see the rows as annotated by earlier ones and append further
/// messages rather than overwriting; the flag union keeps the first category
/// recorded for a cell. Cross-field consistency mismatches are not itemized
/// by their own checks and are reported in a catch-all line instead, so no
/// violation is counted twice.
pub fn validate_all(grid: &mut ValuationGrid) -> ValidationReport {
    let checks: [fn(&mut ValuationGrid, &mut FlagMap) -> RuleSummary; 8] = [
        check_mandatory_fields,
        check_final_value,
        check_inspection_date,
        check_asset_usage_id,
        check_value_base,
        check_market_approach,
        check_cost_approach,
        check_production_capacity,
    ];

    let mut flags = FlagMap::new();
    let mut summary = Vec::new();
    let mut itemized = 0;
    let mut consistency = 0;

    for check in checks {
        let outcome = check(grid, &mut flags);
        itemized += outcome.violations;
        consistency += outcome.consistency_violations;
        summary.extend(outcome.lines);
    }

    summary.push(format!(
        "{consistency} additional rule violation(s) found by cross-field consistency checks."
    ));

    let violations = itemized + consistency;
    if violations == 0 {
        summary.push("All cells passed validation.".to_string());
    }

    ValidationReport {
        flags,
        summary,
        violations,
    }
}

/// Sum of the `final_value` column. A pure aggregation, not a check:
/// unparsable or empty cells contribute 0.
pub fn sum_final_values(grid: &ValuationGrid) -> f64 {
    (0..grid.row_count())
        .map(|row| parse_total(grid.value(row, "final_value")))
        .sum()
}

/// Which check a preview request selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Mandatory,
    FinalValue,
    Date,
    AssetUsage,
    ValueBase,
    MarketApproach,
    CostApproach,
    ProductionCapacity,
    Sum,
    All,
}

impl Check {
    /// Map a preview selector to a check. An omitted or unrecognized
    /// selector runs the full aggregate.
    pub fn from_selector(selector: Option<&str>) -> Check {
        match selector.map(str::trim) {
            Some("mandatory") => Check::Mandatory,
            Some("final") => Check::FinalValue,
            Some("date") => Check::Date,
            Some("asset_usage") => Check::AssetUsage,
            Some("value_base") => Check::ValueBase,
            Some("market_approach") => Check::MarketApproach,
            Some("cost_approach") => Check::CostApproach,
            Some("production_capacity") => Check::ProductionCapacity,
            Some("sum") => Check::Sum,
            _ => Check::All,
        }
    }

    /// True for the modes whose preview carries the `final_value` total.
    pub fn includes_total(&self) -> bool {
        matches!(self, Check::Sum | Check::All)
    }
}

/// Run one selected check in isolation (or the full aggregate for
/// [`Check::All`]). [`Check::Sum`] flags nothing and reports nothing; its
/// result is the total alone, attached at the presentation layer.
pub fn run_check(check: Check, grid: &mut ValuationGrid) -> ValidationReport {
    let single: fn(&mut ValuationGrid, &mut FlagMap) -> RuleSummary = match check {
        Check::All => return validate_all(grid),
        Check::Sum => {
            return ValidationReport {
                flags: FlagMap::new(),
                summary: Vec::new(),
                violations: 0,
            };
        }
        Check::Mandatory => check_mandatory_fields,
        Check::FinalValue => check_final_value,
        Check::Date => check_inspection_date,
        Check::AssetUsage => check_asset_usage_id,
        Check::ValueBase => check_value_base,
        Check::MarketApproach => check_market_approach,
        Check::CostApproach => check_cost_approach,
        Check::ProductionCapacity => check_production_capacity,
    };

    let mut flags = FlagMap::new();
    let outcome = single(grid, &mut flags);

    ValidationReport {
        flags,
        summary: outcome.lines,
        violations: outcome.violations + outcome.consistency_violations,
    }
}
