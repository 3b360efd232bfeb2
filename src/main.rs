// reset; cargo run -- --excel-file ./data/valuations_march.xlsx
// reset; cargo run -- --excel-file ./data/valuations_march.xlsx --check date

use clap::Parser;
use valuation_checker::{
    preview::build_preview,
    rules::{run_check, validate_all, Check},
    schema::check_schema,
    utils::write_error_to_log,
    workbook::{read_grid, render_workbook},
    ERRORS_LOG_FILE,
};

#[derive(Parser)]
#[command(name = "valuation-checker")]
#[command(about = "Validates asset-valuation spreadsheet uploads against the fixed schema")]
#[command(version)]
struct Args {
    /// Path to the spreadsheet upload to validate
    #[arg(short, long)]
    excel_file: String,

    /// Optional sheet name to validate (if not specified, validates the first sheet)
    #[arg(long)]
    sheet_name: Option<String>,

    /// Run a single check and print its JSON preview: mandatory, final, date,
    /// asset_usage, value_base, market_approach, cost_approach,
    /// production_capacity or sum. Anything else runs the full aggregate.
    #[arg(long)]
    check: Option<String>,

    /// Print the JSON preview of the full validation instead of writing a workbook
    #[arg(long)]
    preview: bool,

    /// Path for the annotated workbook (defaults to <input>_validated.xlsx)
    #[arg(short, long)]
    output: Option<String>,
}

fn main() {
    let arguments = Args::parse();

    let mut grid = match read_grid(&arguments.excel_file, arguments.sheet_name.as_deref()) {
        Ok(grid) => grid,
        Err(e) => {
            write_error_to_log("Spreadsheet Read Error", &format!("{e:#}"));
            eprintln!("❌ Unable to process the uploaded spreadsheet: {e}");
            eprintln!("❌ Check {} for details.", ERRORS_LOG_FILE);
            std::process::exit(1);
        }
    };

    // Hard precondition: no partial validation when columns are missing
    if let Err(e) = check_schema(grid.header()) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }

    if arguments.check.is_some() || arguments.preview {
        let check = Check::from_selector(arguments.check.as_deref());
        let report = run_check(check, &mut grid);
        let response = build_preview(check, &grid, &report);

        match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("❌ Failed to serialize the preview: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let report = validate_all(&mut grid);

    let output_path = arguments
        .output
        .unwrap_or_else(|| default_output_path(&arguments.excel_file));

    let buffer = match render_workbook(&grid, &report.flags) {
        Ok(buffer) => buffer,
        Err(e) => {
            write_error_to_log("Workbook Render Error", &format!("{e:#}"));
            eprintln!("❌ Failed to build the annotated workbook: {e}");
            eprintln!("❌ Check {} for details.", ERRORS_LOG_FILE);
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::write(&output_path, &buffer) {
        // Do not leave a half-written workbook behind
        let _ = std::fs::remove_file(&output_path);
        eprintln!("❌ Failed to write {output_path}: {e}");
        std::process::exit(1);
    }

    println!("✅ Annotated workbook written to {output_path}");
    for line in &report.summary {
        println!("{line}");
    }

    if report.violations > 0 {
        write_error_to_log("Valuation Validation Report", &report.summary.join("\n"));
        println!("❌ Validation found {} rule violation(s)", report.violations);
        eprintln!("❌ Check {} for details.", ERRORS_LOG_FILE);
        std::process::exit(1);
    }

    println!("✅ Validation completed!");
}

fn default_output_path(input: &str) -> String {
    let stem = input.strip_suffix(".xlsx").unwrap_or(input);
    format!("{stem}_validated.xlsx")
}
