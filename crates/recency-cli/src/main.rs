//! Recency CLI - line-oriented shell over an LRU cache

mod handler;
mod reply;

use anyhow::{Context, Result};
use clap::Parser;
use recency::{CacheConfig, SharedCache};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::handler::CommandHandler;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of entries)
    #[arg(short, long, default_value_t = 5)]
    capacity: usize,

    /// Upper bound on capacity (defaults to RECENCY_MAX_CAPACITY or 65535)
    #[arg(long)]
    max_capacity: Option<usize>,

    /// Read commands from a file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Print each command before its reply
    #[arg(short, long)]
    echo: bool,
}

/// Totals for one session
#[derive(Debug, Default, PartialEq, Eq)]
struct SessionSummary {
    commands: usize,
    errors: usize,
}

fn main() -> Result<()> {
    // Logs go to stderr so replies on stdout stay clean
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match args.max_capacity {
        Some(max) => CacheConfig::with_max_capacity(max)?,
        None => CacheConfig::from_env()?,
    };

    info!("Starting recency-cli v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Cache capacity: {} (max {})",
        args.capacity,
        config.max_capacity()
    );

    let cache = SharedCache::with_config(args.capacity, &config)
        .context("failed to create cache")?;
    let handler = CommandHandler::new(cache);

    let stdout = io::stdout();
    let summary = match &args.script {
        Some(path) => {
            info!("Reading commands from {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            run_session(&handler, BufReader::new(file), stdout.lock(), args.echo)?
        }
        None => run_session(&handler, io::stdin().lock(), stdout.lock(), args.echo)?,
    };

    if summary.errors > 0 {
        warn!(
            "{} of {} command(s) failed",
            summary.errors, summary.commands
        );
    }
    info!("Processed {} command(s)", summary.commands);

    Ok(())
}

fn run_session<R: BufRead, W: Write>(
    handler: &CommandHandler,
    reader: R,
    mut writer: W,
    echo: bool,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();

    for line in reader.lines() {
        let line = line.context("failed to read command")?;

        let Some(reply) = handler.handle_line(&line) else {
            continue;
        };

        if echo {
            writeln!(writer, "> {}", line.trim())?;
        }
        writeln!(writer, "{}", reply)?;

        summary.commands += 1;
        if reply.is_error() {
            summary.errors += 1;
        }
    }

    writer.flush()?;
    Ok(summary)
}
