use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::FilterRequest;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "synthfilter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Keep the lines of a text file whose 8th field is listed in a spreadsheet")]
#[command(
    long_about = "SynthFilter reads the identifiers in the SINTETICOS column of a spreadsheet and \
                  copies every line of a semicolon-separated, Latin-1 text file whose 8th field \
                  matches one of them into <name>_filtrado<ext> next to the input."
)]
#[command(before_help = "🔍 SynthFilter - Synthetic identifier filter")]
#[command(after_help = "EXAMPLES:\n  \
    synthfilter --spreadsheet sinteticos.xlsx --input movimientos.txt\n  \
    synthfilter -s ids.xlsx -i data.txt --sheet Hoja2 --verbose\n  \
    synthfilter -s ids.csv -i data.txt --csv-delimiter ';' --output-format json\n  \
    synthfilter -s ids.xlsx -i data.txt --dry-run")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Spreadsheet containing the SINTETICOS column
    #[arg(short, long, env = "SYNTHFILTER_SPREADSHEET")]
    pub spreadsheet: Option<PathBuf>,

    /// Semicolon-separated text file to filter
    #[arg(short, long, env = "SYNTHFILTER_INPUT")]
    pub input: Option<PathBuf>,

    /// Worksheet holding the identifier column
    #[arg(long, help = "Worksheet name (default: first sheet)")]
    pub sheet: Option<String>,

    /// Field separator when the spreadsheet is a .csv file
    #[arg(long)]
    pub csv_delimiter: Option<char>,

    /// Stage output in a temporary file and rename it when complete
    #[arg(long, help = "Write output atomically (default: true)")]
    pub atomic_write: Option<bool>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Also write the run report as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Load identifiers and show the plan without writing anything")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_sheet(self.sheet.clone())
            .with_csv_delimiter(self.csv_delimiter)
            .with_atomic_write(self.atomic_write)
    }

    pub fn filter_request(&self) -> FilterRequest {
        FilterRequest {
            spreadsheet: self.spreadsheet.clone(),
            input: self.input.clone(),
        }
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
