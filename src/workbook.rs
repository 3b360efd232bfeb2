//! Spreadsheet I/O around the validation core: reading an uploaded workbook
//! into a [`ValuationGrid`] and rendering the validated grid back out as a
//! freshly built, annotated workbook.
//!
//! The output is a clean rebuild. No formulas, merged cells or original
//! formatting survive; the only content is the header, the cell values and
//! the validation annotations.

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, FormatAlign, FormatPattern, Note, Workbook};

use crate::grid::{CellRef, FlagMap, ValuationGrid};
use crate::schema::CheckerError;

const HEADER_FILL: u32 = 0x4472C4;
const HEADER_FONT: u32 = 0xFFFFFF;
const INVALID_FILL: u32 = 0xFFC7CE;
const INVALID_FONT: u32 = 0x9C0006;
const VALID_FILL: u32 = 0xC6EFCE;
const VALID_FONT: u32 = 0x006100;

const COLUMN_WIDTH: f64 = 18.0;

/// Read one sheet of an uploaded workbook into a grid.
///
/// The first row is the header; fully empty rows are skipped. When no sheet
/// name is given the first sheet is used.
pub fn read_grid(path: &str, sheet_name: Option<&str>) -> Result<ValuationGrid> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).with_context(|| format!("Unable to open spreadsheet '{path}'"))?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("The workbook '{path}' contains no sheets"))?,
    };

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| anyhow!("Error reading sheet '{}': {}", sheet, e))?;

    let mut header: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for (row_index, row) in range.rows().enumerate() {
        if row_index == 0 {
            header = row.iter().map(cell_to_string).collect();
            continue;
        }

        if is_empty_row(row) {
            continue;
        }

        rows.push(row.iter().map(cell_to_string).collect());
    }

    if header.is_empty() {
        return Err(CheckerError::MissingHeader.into());
    }

    Ok(ValuationGrid::new(header, rows))
}

fn is_empty_row(row: &[Data]) -> bool {
    row.iter().all(|cell| match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        Data::Error(_) => true,
        _ => false,
    })
}

/// Stringify one upload cell. Whole-number floats render without the
/// spurious decimal; date cells render as `yyyy-mm-dd` text, which the date
/// rule then rewrites into the reporting format.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_to_string(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => datetime_to_string(dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

fn float_to_string(value: f64) -> String {
    if value.is_finite()
        && value.fract().abs() < f64::EPSILON
        && value >= i64::MIN as f64
        && value <= i64::MAX as f64
    {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

fn datetime_to_string(dt: &calamine::ExcelDateTime) -> String {
    use chrono::{Duration, NaiveDate, NaiveTime};

    // Excel serial dates count days from 1899-12-30
    let excel_base = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();
    let serial = dt.as_f64();
    let days = serial as i64;
    let seconds = ((serial - days as f64) * 86400.0).round() as i64;
    let timestamp =
        excel_base.and_hms_opt(0, 0, 0).unwrap() + Duration::days(days) + Duration::seconds(seconds);

    if timestamp.time() == NaiveTime::MIN {
        timestamp.format("%Y-%m-%d").to_string()
    } else {
        timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Render the validated grid as a new workbook, returned as bytes.
///
/// Row 1 carries the styled header with a frozen pane below it. Flagged
/// cells get the highlight fill and their message trail as an inline note;
/// every other cell gets the neutral valid styling. Cell text is the current
/// value, so auto-fixed dates appear in their rewritten form and message
/// trails never leak into the data.
pub fn render_workbook(grid: &ValuationGrid, flags: &FlagMap) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Validated")?;

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_background_color(HEADER_FILL)
        .set_font_color(HEADER_FONT)
        .set_pattern(FormatPattern::Solid);

    let invalid_format = Format::new()
        .set_background_color(INVALID_FILL)
        .set_font_color(INVALID_FONT)
        .set_pattern(FormatPattern::Solid);

    let valid_format = Format::new()
        .set_background_color(VALID_FILL)
        .set_font_color(VALID_FONT)
        .set_pattern(FormatPattern::Solid);

    for (column_index, column) in grid.header().iter().enumerate() {
        worksheet.write_with_format(0, column_index as u16, column.as_str(), &header_format)?;
        worksheet.set_column_width(column_index as u16, COLUMN_WIDTH)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (row_index, row) in grid.rows().iter().enumerate() {
        let sheet_row = (row_index + 1) as u32;
        for (column_index, cell) in row.iter().enumerate() {
            let column = &grid.header()[column_index];
            let flagged = flags.contains_key(&CellRef::new(row_index, column));

            if flagged {
                worksheet.write_with_format(
                    sheet_row,
                    column_index as u16,
                    cell.value(),
                    &invalid_format,
                )?;
                let note = Note::new(cell.messages().join(" | ")).add_author_prefix(false);
                worksheet.insert_note(sheet_row, column_index as u16, &note)?;
            } else {
                worksheet.write_with_format(
                    sheet_row,
                    column_index as u16,
                    cell.value(),
                    &valid_format,
                )?;
            }
        }
    }

    let buffer = workbook
        .save_to_buffer()
        .context("Failed to build the annotated workbook")?;

    Ok(buffer)
}
