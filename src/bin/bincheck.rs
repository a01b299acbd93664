//! CLI tool for card number checking.
//!
//! # Usage
//!
//! ```bash
//! # Check numbers against the public BIN directory
//! bincheck check 4111111111111111 "5500 0000 0000 0004"
//!
//! # JSON output, offline directory
//! bincheck check 4111111111111111 --output json --offline bins.json
//!
//! # Checksum only
//! bincheck luhn 4111111111111111
//!
//! # Mask a number
//! bincheck mask 4111-1111-1111-1111
//! ```

use bincheck::directory::{BinlistClient, BinlistConfig, MemoryDirectory, DEFAULT_BASE_URL};
use bincheck::{luhn, mask, normalize, BatchChecker, BinDirectory, CheckerConfig};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bincheck")]
#[command(
    author,
    version,
    about = "Card number checksum validation with BIN directory lookup"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check card numbers and look up their issuers
    Check {
        /// Card numbers (spaces and dashes allowed)
        #[arg(required = true)]
        numbers: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,

        /// Use a JSON directory file instead of the network
        #[arg(long, value_name = "FILE")]
        offline: Option<PathBuf>,

        #[command(flatten)]
        settings: Settings,
    },

    /// Check if a number passes the Luhn algorithm
    Luhn {
        /// Card number to check (spaces and dashes allowed)
        card_number: String,
    },

    /// Mask a card number for display
    Mask {
        /// Card number to mask
        card_number: String,
    },
}

#[derive(Args)]
struct Settings {
    /// BIN directory base URL
    #[arg(long, env = "BINCHECK_DIRECTORY_URL", default_value = DEFAULT_BASE_URL)]
    directory_url: String,

    /// Lookup timeout in milliseconds
    #[arg(long, env = "BINCHECK_TIMEOUT_MS", default_value = "5000")]
    timeout_ms: u64,

    /// Pause between numbers in milliseconds
    #[arg(long, env = "BINCHECK_PACING_MS", default_value = "80")]
    pacing_ms: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            numbers,
            output,
            offline,
            settings,
        } => cmd_check(numbers, output, offline, settings).await,
        Commands::Luhn { card_number } => cmd_luhn(&card_number),
        Commands::Mask { card_number } => cmd_mask(&card_number),
    }
}

async fn cmd_check(
    numbers: Vec<String>,
    output: OutputFormat,
    offline: Option<PathBuf>,
    settings: Settings,
) -> ExitCode {
    let config = CheckerConfig::default().pacing(Duration::from_millis(settings.pacing_ms));

    match offline {
        Some(path) => match MemoryDirectory::from_file(&path) {
            Ok(directory) => {
                run_check(BatchChecker::with_config(directory, config), &numbers, output).await
            }
            Err(e) => {
                eprintln!("Error: cannot load {}: {}", path.display(), e);
                ExitCode::FAILURE
            }
        },
        None => {
            let client = BinlistClient::with_config(
                BinlistConfig::default()
                    .base_url(settings.directory_url)
                    .timeout(Duration::from_millis(settings.timeout_ms)),
            );
            match client {
                Ok(client) => {
                    run_check(BatchChecker::with_config(client, config), &numbers, output).await
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

async fn run_check<D: BinDirectory>(
    checker: BatchChecker<D>,
    numbers: &[String],
    output: OutputFormat,
) -> ExitCode {
    let response = match checker.check_all(numbers).await {
        Ok(response) => response,
        Err(e) => {
            match output {
                OutputFormat::Text => eprintln!("Error [{}]: {}", e.code(), e),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "ok": false, "code": e.code(), "message": e.to_string() })
                ),
            }
            return ExitCode::from(2);
        }
    };

    match output {
        OutputFormat::Text => {
            for result in response.results() {
                println!("{}  {}", result.masked(), result.summary());
                if let Some(error) = result.error() {
                    println!("    Error: {}", error.message);
                }
                if let Some(lookup) = result.lookup() {
                    println!("    BIN {}: {}", result.bin().map(|b| b.as_str()).unwrap_or("-"), lookup);
                }
            }
            println!();
            println!("{}", response.note());
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

fn cmd_luhn(card_number: &str) -> ExitCode {
    match luhn::validate_str(&normalize::normalize(card_number)) {
        Ok(true) => {
            println!("Luhn check: PASS");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println!("Luhn check: FAIL");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn cmd_mask(card_number: &str) -> ExitCode {
    println!("{}", mask::mask(&normalize::normalize(card_number)));
    ExitCode::SUCCESS
}
