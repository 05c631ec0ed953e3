use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use staff_evaluation::*;

use std::fs;
use std::io::Write;

use chrono::Local;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::*;
use crate::eval::config_reader::*;
use crate::eval::io_common::{InputRow, InputType};
use crate::eval::sqlite_store::SqliteStore;

pub mod config_reader;
pub mod export;
pub mod io_common;
pub mod io_csv;
pub mod io_xlsx;
pub mod report;
pub mod sqlite_store;

#[derive(Debug, Snafu)]
pub enum EvalError {
    #[snafu(display("Error opening CSV file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Malformed CSV content at row {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: u64 },
    #[snafu(display("Row {lineno} has {found} fields but the header only has {expected}"))]
    CsvTooManyFields {
        lineno: u64,
        found: usize,
        expected: usize,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Excel file {path} has no worksheet or no header row"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {worksheet_name} not found in {path}"))]
    MissingWorksheet {
        worksheet_name: String,
        path: String,
    },
    #[snafu(display(
        "Excel file {path} has several worksheets, the worksheet name must be provided"
    ))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("Unknown input type {input_type:?} (expected csv or xlsx)"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Error reading JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Invalid CSV delimiter {delimiter:?}, expected a single ASCII character"))]
    InvalidDelimiter { delimiter: String },
    #[snafu(display("Error opening the evaluation database {path}"))]
    OpeningDatabase {
        source: rusqlite::Error,
        path: String,
    },
    #[snafu(display("Evaluation store failure"))]
    Store { source: StoreError },
    #[snafu(display("Error writing the export to {path}"))]
    WritingExport { source: csv::Error, path: String },
    #[snafu(display("Error writing to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Runs the command given on the command line.
pub fn run(args: &Args) -> EvalResult<()> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => EvalConfig::default(),
    };
    debug!("run: config: {:?}", config);
    let db_path = args
        .database
        .clone()
        .unwrap_or_else(|| config.database_path());

    match &args.command {
        Command::Import(import) => import_file(&db_path, &config, import),
        Command::Add(add) => add_evaluation(&db_path, add),
        Command::List => list_evaluations(&db_path),
        Command::Summary(summary) => summarize_evaluations(&db_path, summary),
        Command::Export(export) => export_evaluations(&db_path, &config, export),
        Command::Reset(reset) => reset_evaluations(&db_path, reset),
    }
}

/// Reads all the rows of an input file. Nothing is returned if any part of
/// the file cannot be read.
pub fn read_input_rows(
    path: &str,
    input_type: InputType,
    config: &EvalConfig,
    worksheet_name: Option<&str>,
) -> EvalResult<Vec<InputRow>> {
    info!("Attempting to read {:?} file {:?}", input_type, path);
    let rows = match input_type {
        InputType::Csv => io_csv::read_csv_rows(path, config.csv_delimiter()?)?,
        InputType::Xlsx => {
            let ws = worksheet_name.or(config.excel_worksheet_name.as_deref());
            io_xlsx::read_xlsx_rows(path, ws)?
        }
    };
    info!("Read {} rows from {:?}", rows.len(), path);
    Ok(rows)
}

fn import_file(db_path: &str, config: &EvalConfig, import: &ImportArgs) -> EvalResult<()> {
    let input_type = InputType::resolve(&import.input, import.input_type.as_deref())?;
    // The whole file is read before touching the store.
    let rows = read_input_rows(
        &import.input,
        input_type,
        config,
        import.excel_worksheet_name.as_deref(),
    )?;
    let drafts: Vec<EvaluationDraft> = rows.iter().map(|r| reconcile_row(&r.cells)).collect();

    let mut store = SqliteStore::open(db_path)?;
    let report = store.append_bulk(&drafts);
    for msg in failure_messages(&rows, &report) {
        eprintln!("{}", msg);
    }
    println!("{} rows imported", report.success_count());
    Ok(())
}

// Failures refer to the rows of the input file, not to positions in the batch.
fn failure_messages(rows: &[InputRow], report: &BulkImportReport) -> Vec<String> {
    report
        .failures
        .iter()
        .map(|failure| match rows.get(failure.row) {
            Some(r) => format!("Could not import row {}: {}", r.row, failure.error),
            None => format!("Could not import record {}: {}", failure.row + 1, failure.error),
        })
        .collect()
}

fn add_evaluation(db_path: &str, add: &AddArgs) -> EvalResult<()> {
    let date = add.date.unwrap_or_else(|| Local::now().date_naive());
    let scores = Scores::default()
        .with(Criterion::Leadership, add.leadership)
        .with(Criterion::Attendance, add.attendance)
        .with(Criterion::Flexibility, add.flexibility)
        .with(Criterion::Theory, add.theory)
        .with(Criterion::Command, add.command)
        .with(Criterion::Control, add.control)
        .with(Criterion::BodyDragLeftRight, add.body_drag_left_right)
        .with(Criterion::WaterStart, add.water_start)
        .with(Criterion::BoardLeftRight, add.board_left_right)
        .with(Criterion::Upwind, add.upwind);
    let draft = EvaluationDraft {
        project: add.project.clone(),
        name: add.name.clone(),
        role: add.role.clone(),
        date: date.format("%Y-%m-%d").to_string(),
        scores,
        comments: add.comments.clone(),
    };

    let mut store = SqliteStore::open(db_path)?;
    let id = store.append(&draft).context(StoreSnafu {})?;
    info!("Evaluation {} saved for {:?}", id, draft.name);
    println!("Evaluation {} saved", id);
    Ok(())
}

fn list_evaluations(db_path: &str) -> EvalResult<()> {
    let store = SqliteStore::open(db_path)?;
    let records = store.list_all().context(StoreSnafu {})?;
    print!("{}", report::format_records(&records));
    Ok(())
}

fn summarize_evaluations(db_path: &str, args: &SummaryArgs) -> EvalResult<()> {
    let store = SqliteStore::open(db_path)?;
    let records = store.list_all().context(StoreSnafu {})?;
    let summary = summarize(&records);
    debug!("summarize_evaluations: {:?}", summary);

    let summary_js = report::summary_to_json(&summary);
    let pretty_js_stats =
        serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;

    match args.out.as_deref() {
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, &pretty_js_stats).context(WritingOutputSnafu { path })?;
        }
        None => print!("{}", report::format_summary(&summary)),
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &summary_js)?;
    }
    Ok(())
}

/// Compares a summary with a reference JSON file and prints the differences.
pub fn check_reference(reference_path: &str, summary_js: &JSValue) -> EvalResult<()> {
    let summary_ref = read_summary(reference_path)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    let pretty_js_stats = serde_json::to_string_pretty(summary_js).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary");
        print_diff(
            pretty_js_summary_ref.as_str(),
            pretty_js_stats.as_ref(),
            "\n",
        );
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("Summary matches the reference {:?}", reference_path);
    Ok(())
}

fn export_evaluations(db_path: &str, config: &EvalConfig, args: &ExportArgs) -> EvalResult<()> {
    let store = SqliteStore::open(db_path)?;
    let records = store.list_all().context(StoreSnafu {})?;
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| config.export_file_name());
    if out == "stdout" {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        export::write_records(&records, &mut handle).context(WritingExportSnafu { path: "stdout" })?;
        handle.flush().context(WritingOutputSnafu { path: "stdout" })?;
    } else {
        export::export_to_file(&records, &out)?;
        println!("{} evaluations exported to {}", records.len(), out);
    }
    Ok(())
}

fn reset_evaluations(db_path: &str, args: &ResetArgs) -> EvalResult<()> {
    if !args.yes {
        whatever!("Refusing to delete all the evaluations of {} without --yes", db_path)
    }
    let mut store = SqliteStore::open(db_path)?;
    store.reset().context(StoreSnafu {})?;
    warn!("All the evaluations of {} were deleted", db_path);
    println!("Database reset, all evaluations deleted.");
    Ok(())
}
