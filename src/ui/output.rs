use crate::config::Config;
use crate::error::{SynthFilterError, UserFriendlyError};
use crate::report::FilterReport;
use crate::FilterPlan;
use crate::ui::progress::format_duration;
use console::{style, Emoji, Term};
use std::path::Path;

/// Longest file name shown before it is shortened with `...`.
pub const MAX_DISPLAY_NAME: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "v ");
static CROSS: Emoji = Emoji("❌ ", "x ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static CHART: Emoji = Emoji("📊 ", "");
static DISK: Emoji = Emoji("💾 ", "");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &SynthFilterError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    // Summary and reporting
    pub fn print_filter_report(&self, report: &FilterReport) {
        match self.mode {
            OutputMode::Human => self.print_human_report(report),
            OutputMode::Json => match report.to_json() {
                Ok(json_output) => println!("{}", json_output),
                Err(e) => self.error(&e.to_string()),
            },
            OutputMode::Plain => self.print_plain_report(report),
        }
    }

    /// What a run would do, for `--dry-run`.
    pub fn print_plan(&self, plan: &FilterPlan, config: &Config) {
        let sample = plan.identifiers.sample(5);
        match self.mode {
            OutputMode::Json => {
                let document = serde_json::json!({
                    "dry_run": true,
                    "spreadsheet": plan.spreadsheet.display().to_string(),
                    "sheet": config.spreadsheet.sheet,
                    "csv_delimiter": config.spreadsheet.csv_delimiter.to_string(),
                    "identifiers": plan.identifiers.len(),
                    "sample": sample,
                    "input": plan.input.display().to_string(),
                    "input_exists": plan.input.is_file(),
                    "output": plan.output.display().to_string(),
                    "output_exists": plan.output.exists(),
                    "atomic_write": config.output.atomic_write,
                    "buffer_size": config.processing.buffer_size,
                });
                match serde_json::to_string_pretty(&document) {
                    Ok(json_output) => println!("{}", json_output),
                    Err(e) => self.error(&e.to_string()),
                }
            }
            OutputMode::Human | OutputMode::Plain => {
                println!(
                    "  Sheet: {}",
                    config.spreadsheet.sheet.as_deref().unwrap_or("(first sheet)")
                );
                println!("  CSV delimiter: {:?}", config.spreadsheet.csv_delimiter);
                println!("  Atomic write: {}", config.output.atomic_write);
                println!("  Buffer size: {} bytes", config.processing.buffer_size);
                self.print_separator();
                println!("  Spreadsheet: {}", plan.spreadsheet.display());
                println!("  Identifiers: {}", plan.identifiers.len());
                if !sample.is_empty() {
                    println!("  Sample: {}", sample.join(", "));
                }
                println!("  Input: {}", plan.input.display());
                println!("  Output: {}", plan.output.display());
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {} // No separator in JSON mode
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    /// Event lines go to stderr so stdout holds a single JSON document.
    fn print_json_object(&self, obj: &serde_json::Value) {
        eprintln!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_report(&self, report: &FilterReport) {
        let summary = &report.summary;

        if self.quiet {
            println!("{}", summary);
            return;
        }

        self.print_separator();
        if self.use_colors {
            println!(
                "{}{}",
                CHECKMARK,
                style("Processing completed successfully!").green().bold()
            );
        } else {
            println!("✓ Processing completed successfully!");
        }
        println!();

        let highlight = |value: String| {
            if self.use_colors {
                style(value).cyan().bold().to_string()
            } else {
                value
            }
        };

        println!(
            "{}Total lines processed: {}",
            CHART,
            highlight(crate::report::group_thousands(summary.total_lines))
        );
        println!(
            "  Matching lines:        {}",
            highlight(crate::report::group_thousands(summary.matched_lines))
        );
        println!(
            "  Percentage matched:    {}",
            highlight(summary.percentage_label())
        );
        println!(
            "  Identifiers loaded:    {}",
            crate::report::group_thousands(report.identifiers_loaded as u64)
        );
        println!("  Time taken:            {}", format_duration(report.duration()));
        println!();
        println!(
            "{}Saved to: {}",
            DISK,
            highlight(display_file_name(&report.output, MAX_DISPLAY_NAME))
        );
        self.print_separator();
    }

    fn print_plain_report(&self, report: &FilterReport) {
        let summary = &report.summary;
        println!("COMPLETED: Filter");
        println!("Total lines: {}", summary.total_lines);
        println!("Matched lines: {}", summary.matched_lines);
        println!("Percentage: {}", summary.percentage_label());
        println!("Identifiers: {}", report.identifiers_loaded);
        println!("Output: {}", report.output.display());
        println!("Duration: {}", format_duration(report.duration()));
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

/// File name of `path`, shortened to `max_chars` characters with a trailing `...`.
pub fn display_file_name(path: &Path, max_chars: usize) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    if name.chars().count() > max_chars {
        let keep = max_chars.saturating_sub(3);
        let mut shortened: String = name.chars().take(keep).collect();
        shortened.push_str("...");
        shortened
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_creation() {
        let formatter = OutputFormatter::new(OutputMode::Human, 1, false);
        assert_eq!(formatter.mode, OutputMode::Human);
        assert_eq!(formatter.verbose_level, 1);
        assert!(!formatter.quiet);
    }

    #[test]
    fn test_quiet_mode() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert_eq!(formatter.verbose_level, 0);
        assert!(!formatter.should_show_message(0));
    }

    #[test]
    fn test_should_show_message() {
        let formatter = OutputFormatter::new(OutputMode::Plain, 1, false);
        assert!(formatter.should_show_message(0));
        assert!(formatter.should_show_message(1));
        assert!(!formatter.should_show_message(2));
    }

    #[test]
    fn test_display_file_name() {
        assert_eq!(
            display_file_name(Path::new("/data/short.txt"), MAX_DISPLAY_NAME),
            "short.txt"
        );

        let long = Path::new("/data/a_really_long_export_name_from_the_bank.txt");
        let shown = display_file_name(long, MAX_DISPLAY_NAME);
        assert_eq!(shown.chars().count(), 30);
        assert_eq!(shown, "a_really_long_export_name_f...");
    }

    #[test]
    fn test_display_file_name_counts_characters() {
        let name = Path::new("ñññññññññññññññññññññññññññññññññ.txt");
        let shown = display_file_name(name, MAX_DISPLAY_NAME);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), 30);
    }
}
