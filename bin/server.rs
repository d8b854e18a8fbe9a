// Interpretations - local record API
// Serves /api/interpretations from a SQLite file so the terminal client can run end to end

use anyhow::{Context, Result};
use clap::Parser;
use interpretations::db::{open_database, verify_count};
use interpretations::logging::{init_logging, LogSink};
use interpretations::server::{serve, AppState};
use std::path::PathBuf;

/// Local backend for interpretation records
#[derive(Parser, Debug)]
#[command(name = "interpretations-server", version, about)]
struct Args {
    /// SQLite database file (created if missing)
    #[arg(long, env = "INTERPRETATIONS_DB", default_value = "interpretations.db")]
    db: PathBuf,

    /// Address to listen on
    #[arg(long, env = "INTERPRETATIONS_ADDR", default_value = "127.0.0.1:3000")]
    addr: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, LogSink::Stderr)?;

    let conn = open_database(&args.db)?;
    let count = verify_count(&conn)?;
    tracing::info!(db = ?args.db, records = count, "database opened");

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", args.addr))?;

    tracing::info!(addr = %args.addr, "serving http://{}/api/interpretations", args.addr);

    serve(listener, AppState::new(conn)).await
}
