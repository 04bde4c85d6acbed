//! pagewatch CLI
//!
//! Runs one check cycle and exits. Intended to be invoked by an external
//! scheduler (cron, CI).
//!
//! Exit codes: 0 no change, 1 change detected, 2 operational failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pagewatch::{
    config::Settings,
    error::{AppError, Result},
    models::Config,
    pipeline,
};

/// pagewatch - notify when a webpage changes
#[derive(Parser, Debug)]
#[command(name = "pagewatch", version, about = "Detects webpage content changes")]
struct Cli {
    /// URL to check (WEBPAGE_URL takes precedence)
    url: Option<String>,

    /// Path to TOML config file
    #[arg(short, long, default_value = "pagewatch.toml")]
    config: PathBuf,

    /// Override the checksum state file location
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,

    /// Print the check report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Initialize logging based on verbosity flags.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Assemble settings: config file, then environment, then flags.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let config = Config::load_or_default(&cli.config)?;
    let mut settings = Settings::from_env(config, cli.url.clone())?;

    if let Some(path) = &cli.state_file {
        settings.config.state.checksum_file = path.clone();
        settings.config.validate()?;
    }
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<()> {
    log::info!("Validating configuration...");
    settings.config.validate()?;
    log::info!("✓ Config OK");
    log::info!("    Checksum file: {}", settings.config.state.checksum_file.display());
    log::info!(
        "    Algorithm: {}",
        settings.config.fingerprint.algorithm.as_str()
    );

    let target = settings.target()?;
    pagewatch::utils::parse_target(target)?;
    log::info!("✓ Target OK: {}", target);

    match &settings.notifier {
        Some(notifier) => log::info!("✓ Notification channel: {}", notifier.channel()),
        None => log::info!("No notification channel configured"),
    }
    Ok(())
}

fn exit_with(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(u8::MAX))
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => return fail(e),
    };

    if cli.validate {
        return match validate(&settings) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(e),
        };
    }

    match pipeline::run_check(&settings).await {
        Ok(report) => {
            if cli.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{json}"),
                    Err(e) => log::error!("Failed to serialize report: {}", e),
                }
            }
            exit_with(report.exit_code())
        }
        Err(e) => fail(e),
    }
}

fn fail(error: AppError) -> ExitCode {
    log::error!("{}", error);
    exit_with(error.exit_code())
}
