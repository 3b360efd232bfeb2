//! JSON preview of a validation run: per-cell annotated text plus a
//! highlight marker, the summary block, and the `final_value` total for the
//! modes that carry one.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::grid::{CellRef, ValuationGrid};
use crate::rules::{sum_final_values, Check, ValidationReport};

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub header: Vec<String>,
    /// One object per data row, mapping each column to
    /// `{ "value": <annotated text>, "highlight": <bool> }`.
    pub preview: Vec<Map<String, Value>>,
    pub summary: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

/// Render a validated grid into the preview structure. The message trails
/// are concatenated into the displayed value here, at the presentation
/// boundary; the grid keeps them structured.
pub fn build_preview(check: Check, grid: &ValuationGrid, report: &ValidationReport) -> PreviewResponse {
    let preview = grid
        .rows()
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            let mut object = Map::new();
            for (column_index, column) in grid.header().iter().enumerate() {
                let cell = &row[column_index];
                let highlight = report
                    .flags
                    .contains_key(&CellRef::new(row_index, column));
                object.insert(
                    column.clone(),
                    json!({ "value": cell.annotated(), "highlight": highlight }),
                );
            }
            object
        })
        .collect();

    let total = if check.includes_total() {
        Some(sum_final_values(grid))
    } else {
        None
    };

    PreviewResponse {
        header: grid.header().to_vec(),
        preview,
        summary: report.summary.clone(),
        total,
    }
}
