use clap::Parser;
use std::process;
use synthfilter::{
    Cli, OutputFormatter, OutputMode, SynthFilter, SynthFilterError, UserFriendlyError,
};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();
    setup_logging(cli.verbosity_level(), cli.quiet);

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    // Create SynthFilter instance
    let synth = match SynthFilter::from_cli(&cli) {
        Ok(synth) => synth,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    // Handle dry run mode
    if cli.dry_run {
        return handle_dry_run(&cli, &synth);
    }

    match synth.run(&cli.filter_request()) {
        Ok(report) => {
            synth.output_formatter().print_filter_report(&report);

            if let Some(ref report_path) = cli.report {
                if let Err(e) = report.save_json(report_path) {
                    synth.handle_error(&e);
                    return exit_code_for(&e);
                }
                synth
                    .output_formatter()
                    .info(&format!("Report written to {}", report_path.display()));
            }

            0
        }
        Err(e) => {
            log::debug!("run failed: {e:?}");
            synth.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &SynthFilterError) -> i32 {
    match error {
        SynthFilterError::Cancelled => 130, // Interrupted (SIGINT)
        SynthFilterError::MissingInput { .. } => 2,
        SynthFilterError::MissingColumn { .. } => 3,
        SynthFilterError::FileAccess { .. } | SynthFilterError::Io(_) => 4,
        SynthFilterError::ZeroTotal { .. } => 5,
        SynthFilterError::Spreadsheet { .. } => 6,
        _ => 1, // General error
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "synthfilter.toml".to_string());

    match SynthFilter::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!(
                "  synthfilter -s <spreadsheet> -i <text file> --config {}",
                config_path
            );
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(cli: &Cli, synth: &SynthFilter) -> i32 {
    let formatter = synth.output_formatter();

    formatter.info("DRY RUN MODE - No files will be written");
    formatter.print_separator();

    let plan = match synth.plan(&cli.filter_request()) {
        Ok(plan) => plan,
        Err(e) => {
            synth.handle_error(&e);
            return exit_code_for(&e);
        }
    };

    formatter.info("Filter plan:");
    formatter.print_plan(&plan, synth.config());

    if !plan.input.is_file() {
        formatter.warning(&format!(
            "Text file {} does not exist or is not a file",
            plan.input.display()
        ));
    }
    if plan.output.exists() {
        formatter.warning("Output file exists and would be overwritten");
    }

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to write the filtered file");

    0
}

fn print_startup_error(error: &SynthFilterError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(verbosity: u8, quiet: bool) {
    let default_filter = match (quiet, verbosity) {
        (true, _) => "synthfilter=error",
        (false, 0) => "synthfilter=warn",
        (false, 1) => "synthfilter=info",
        (false, _) => "synthfilter=debug",
    };

    // RUST_LOG still wins when set
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
