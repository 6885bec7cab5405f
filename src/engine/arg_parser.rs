use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Parse a `YYMMDD` date code.
fn parse_date_code(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%y%m%d").map_err(|e| format!("expected YYMMDD: {e}"))
}

/// Batch image pipeline: dated run directory, numbered stage folders, configured modules.
#[derive(Clone, Parser)]
#[command(name = "stagerun")]
#[command(about = "Run one batch: create a dated run directory, provision stage folders, dispatch modules.")]
pub struct Cli {
    /// Working directory. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Settings directory holding start.json and folders.json. Default: `settings` in DIR.
    #[arg(long, short)]
    pub settings: Option<PathBuf>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Strict mode: abort the run on the first failed module instead of continuing.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub strict: Option<bool>,

    /// Reuse the most recent run directory instead of creating a new one.
    #[arg(long, short = 'l', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub latest: Option<bool>,

    /// Date code for the run directory (YYMMDD). Default: today.
    #[arg(long, value_parser = parse_date_code)]
    pub date: Option<NaiveDate>,
}
