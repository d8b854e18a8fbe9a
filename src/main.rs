// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use interpretations::logging::{init_logging, LogSink};
use interpretations::{ApiConfig, HttpApi, InterpretationApi, DEFAULT_API_URL};
use std::path::PathBuf;
use std::time::Duration;

/// Browse and edit interpretation records held by a remote API
#[derive(Parser, Debug)]
#[command(name = "interpretations", version, about)]
struct Cli {
    /// Base URL of the record API
    #[arg(long, env = "INTERPRETATIONS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Request timeout in seconds (HTTP client default when omitted)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log file used while the terminal UI is running
    #[arg(long, env = "INTERPRETATIONS_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print every record once and exit
    List,
}

impl Cli {
    fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_url.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::List) => run_list(&cli)?,
        None => run_ui_mode(&cli)?,
    }

    Ok(())
}

fn run_list(cli: &Cli) -> Result<()> {
    init_logging(cli.verbose, LogSink::Stderr)?;

    let api = HttpApi::new(cli.api_config())?;
    let records = api
        .list()
        .with_context(|| format!("Failed to load interpretations from {}", cli.api_url))?;

    if records.is_empty() {
        println!("{}", interpretations::views::NO_RECORDS);
        return Ok(());
    }

    for record in &records {
        println!("{}  {}", record.id, record.term);
        println!("    {}", record.interpretation);
    }
    println!("\n{} interpretation(s)", records.len());

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(cli: &Cli) -> Result<()> {
    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(interpretations::logging::default_log_file);
    init_logging(cli.verbose, LogSink::File(log_file))?;

    let api = HttpApi::new(cli.api_config())?;
    tracing::info!(url = %api.collection(), "starting terminal UI");

    let mut app = interpretations::App::new(api);
    ui::run_ui(&mut app)?;

    tracing::info!("terminal UI closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_cli: &Cli) -> Result<()> {
    eprintln!("Terminal UI not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print records with: interpretations list");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["interpretations"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.api_config().timeout, None);
    }

    #[test]
    fn test_cli_list_with_options() {
        let cli = Cli::try_parse_from([
            "interpretations",
            "--api-url",
            "http://example.com/api",
            "--timeout-secs",
            "5",
            "list",
        ])
        .unwrap();

        assert_eq!(cli.command, Some(Command::List));
        let config = cli.api_config();
        assert_eq!(config.base_url, "http://example.com/api");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
