use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Records, imports and summarizes the performance evaluations of kitesurfing staff.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. See the manual for the accepted keys.
    #[clap(short, long, value_parser, global = true)]
    pub config: Option<String>,

    /// (file path) The SQLite database holding the evaluations. Setting this option overrides
    /// the path that may be specified with the --config option. Defaults to evaluations.db
    #[clap(short, long, value_parser, global = true)]
    pub database: Option<String>,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Imports all the rows of a CSV or Excel file. Rows the database refuses are reported and skipped.
    Import(ImportArgs),
    /// Records one evaluation.
    Add(AddArgs),
    /// Lists all the evaluations, most recent first.
    List,
    /// Prints the summary statistics.
    Summary(SummaryArgs),
    /// Writes all the evaluations in CSV format.
    Export(ExportArgs),
    /// Deletes all the evaluations. This cannot be undone.
    Reset(ResetArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ImportArgs {
    /// (file path) The file to import.
    #[clap(value_parser)]
    pub input: String,

    /// (csv or xlsx) The type of the input. Guessed from the file extension if not provided.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. Required when the
    /// workbook has more than one worksheet.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct AddArgs {
    /// The name of the person evaluated.
    #[clap(long, value_parser)]
    pub name: String,

    #[clap(long, value_parser, default_value = "")]
    pub role: String,

    #[clap(long, value_parser, default_value = staff_evaluation::DEFAULT_PROJECT)]
    pub project: String,

    /// (YYYY-MM-DD) The date of the evaluation. Defaults to today.
    #[clap(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    #[clap(long, value_parser = parse_score, default_value_t = 50.0)]
    pub leadership: f64,
    #[clap(long, value_parser = parse_score, default_value_t = 50.0)]
    pub attendance: f64,
    #[clap(long, value_parser = parse_score, default_value_t = 50.0)]
    pub flexibility: f64,
    #[clap(long, value_parser = parse_score, default_value_t = 50.0)]
    pub theory: f64,
    #[clap(long, value_parser = parse_score, default_value_t = 50.0)]
    pub command: f64,
    #[clap(long, value_parser = parse_score, default_value_t = 50.0)]
    pub control: f64,
    #[clap(long, value_parser = parse_score, default_value_t = 50.0)]
    pub body_drag_left_right: f64,
    #[clap(long, value_parser = parse_score, default_value_t = 50.0)]
    pub water_start: f64,
    #[clap(long, value_parser = parse_score, default_value_t = 50.0)]
    pub board_left_right: f64,
    #[clap(long, value_parser = parse_score, default_value_t = 50.0)]
    pub upwind: f64,

    #[clap(long, value_parser, default_value = "")]
    pub comments: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SummaryArgs {
    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to
    /// the given location instead of being printed as text.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, kiteval will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ExportArgs {
    /// (file path or 'stdout') Where to write the CSV export. Defaults to the export file name of
    /// the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ResetArgs {
    /// Confirms that all the evaluations should be deleted.
    #[clap(long, takes_value = false)]
    pub yes: bool,
}

// Scores are entered on a 0-100 scale.
fn parse_score(s: &str) -> Result<f64, String> {
    let x: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("{:?} is not a number", s))?;
    if (0.0..=100.0).contains(&x) {
        Ok(x)
    } else {
        Err(format!("{} is not between 0 and 100", x))
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("{:?}: {}", s, e))
}
