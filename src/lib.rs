pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod identifiers;
pub mod report;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, OutputConfig, ProcessingConfig, SpreadsheetConfig};
pub use error::{Result, SynthFilterError, UserFriendlyError};

// Core functionality re-exports
pub use filter::{filter_file, filtered_output_path, FilterOutcome, FilterProgress, LineFilter};
pub use identifiers::{load_identifiers, IdentifierLoader, IdentifierSet, IDENTIFIER_COLUMN};
pub use report::{format_summary, FilterReport, Summary};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};
use std::time::Instant;

/// The two paths a run needs. Either may be absent when coming from a UI.
#[derive(Debug, Clone, Default)]
pub struct FilterRequest {
    pub spreadsheet: Option<PathBuf>,
    pub input: Option<PathBuf>,
}

impl FilterRequest {
    pub fn new<S: Into<PathBuf>, I: Into<PathBuf>>(spreadsheet: S, input: I) -> Self {
        Self {
            spreadsheet: Some(spreadsheet.into()),
            input: Some(input.into()),
        }
    }

    /// Both paths, or `MissingInput` naming whichever are absent.
    pub fn resolve(&self) -> Result<(&Path, &Path)> {
        match (&self.spreadsheet, &self.input) {
            (Some(spreadsheet), Some(input)) => Ok((spreadsheet.as_path(), input.as_path())),
            (spreadsheet, input) => {
                let mut missing = Vec::new();
                if spreadsheet.is_none() {
                    missing.push("spreadsheet".to_string());
                }
                if input.is_none() {
                    missing.push("text file".to_string());
                }
                Err(SynthFilterError::MissingInput { missing })
            }
        }
    }
}

/// Identifiers loaded and paths resolved; nothing written yet.
#[derive(Debug, Clone)]
pub struct FilterPlan {
    pub spreadsheet: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub identifiers: IdentifierSet,
}

/// Main library interface for SynthFilter functionality
pub struct SynthFilter {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl SynthFilter {
    /// Create an instance that cancels on Ctrl+C.
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let shutdown = GracefulShutdown::new()?;
        Ok(Self::with_shutdown(config, output_mode, verbose, quiet, shutdown))
    }

    /// Create an instance without installing a signal handler (embedding, tests).
    pub fn detached(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self::with_shutdown(config, output_mode, verbose, quiet, GracefulShutdown::detached())
    }

    fn with_shutdown(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
        shutdown: GracefulShutdown,
    ) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    /// Create SynthFilter instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Resolve paths and load identifiers. Touches only the spreadsheet.
    pub fn plan(&self, request: &FilterRequest) -> Result<FilterPlan> {
        let (spreadsheet, input) = request.resolve()?;
        self.shutdown.check_shutdown()?;

        let identifiers = self.load_identifiers(spreadsheet)?;
        let output = filtered_output_path(input)?;

        Ok(FilterPlan {
            spreadsheet: spreadsheet.to_path_buf(),
            input: input.to_path_buf(),
            output,
            identifiers,
        })
    }

    /// Run the whole pipeline: identifiers, filtered file, summary.
    pub fn run(&self, request: &FilterRequest) -> Result<FilterReport> {
        let start_time = Instant::now();

        self.shutdown.check_shutdown()?;
        self.output_formatter.start_operation("Starting synthetic filter");

        // Step 1: Load identifiers (fails before any text-file I/O)
        let plan = self.plan(request)?;
        self.shutdown.check_shutdown()?;

        if plan.identifiers.is_empty() {
            log::warn!("identifier set from {} is empty", plan.spreadsheet.display());
            self.output_formatter.warning(&format!(
                "Column {} has no values; no line can match",
                IDENTIFIER_COLUMN
            ));
        }

        // Step 2: Filter the text file
        let outcome = self.filter_lines(&plan)?;

        // Step 3: Summarize
        let summary = Summary::new(&outcome, &plan.output)?;
        log::info!(
            "{} of {} lines matched ({})",
            summary.matched_lines,
            summary.total_lines,
            summary.percentage_label()
        );

        Ok(FilterReport::new(
            &plan.spreadsheet,
            &plan.input,
            &plan.output,
            plan.identifiers.len(),
            summary,
            start_time.elapsed(),
        ))
    }

    fn load_identifiers(&self, spreadsheet: &Path) -> Result<IdentifierSet> {
        self.output_formatter.start_operation("Reading identifiers");

        let spinner = self.progress_manager.create_spinner(&format!(
            "Reading {} from {}",
            IDENTIFIER_COLUMN,
            ui::display_file_name(spreadsheet, ui::output::MAX_DISPLAY_NAME)
        ));
        let started = Instant::now();

        let loader = IdentifierLoader::new()
            .with_sheet(self.config.spreadsheet.sheet.clone())
            .with_csv_delimiter(self.config.csv_delimiter_byte());

        match loader.load(spreadsheet) {
            Ok(identifiers) => {
                ui::progress::finish_progress_with_summary(
                    &spinner,
                    &format!("Loaded {} identifiers", identifiers.len()),
                    started.elapsed(),
                );
                self.output_formatter
                    .info(&format!("Loaded {} identifiers", identifiers.len()));
                Ok(identifiers)
            }
            Err(e) => {
                spinner.abandon_with_message("Could not read identifiers");
                Err(e)
            }
        }
    }

    fn filter_lines(&self, plan: &FilterPlan) -> Result<FilterOutcome> {
        self.output_formatter.start_operation("Filtering lines");
        log::debug!(
            "filtering {} into {}",
            plan.input.display(),
            plan.output.display()
        );

        let total_bytes = std::fs::metadata(&plan.input).map(|m| m.len()).unwrap_or(0);
        let progress_bar = self
            .progress_manager
            .create_bytes_progress(total_bytes, "Filtering lines...");

        let progress_callback = |progress: &FilterProgress| -> Result<()> {
            ui::progress::update_filter_progress(&progress_bar, progress);
            self.shutdown.check_shutdown()
        };

        let line_filter = LineFilter::new()
            .with_atomic_write(self.config.output.atomic_write)
            .with_buffer_size(self.config.processing.buffer_size)
            .with_progress_interval(self.config.processing.progress_interval);

        let started = Instant::now();
        let result = self.shutdown.with_shutdown_check(|| {
            line_filter.filter(
                &plan.identifiers,
                &plan.input,
                &plan.output,
                Some(&progress_callback),
            )
        });

        match result {
            Ok(outcome) => {
                ui::progress::finish_progress_with_summary(
                    &progress_bar,
                    &format!(
                        "Filtered {} lines, kept {}",
                        outcome.total_lines, outcome.matched_lines
                    ),
                    started.elapsed(),
                );
                Ok(outcome)
            }
            Err(e) => {
                progress_bar.abandon_with_message("Filtering stopped");
                Err(e)
            }
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &SynthFilterError) {
        self.progress_manager.clear();
        self.output_formatter.print_user_friendly_error(error);
    }
}
