use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use snemovna_core::{MalformedPolicy, SessionRange};
use speeches::{Extractor, SessionWalker};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "extract-speeches",
    version,
    about = "Extract every speech by a politician from the local speech corpus"
)]
struct Cli {
    /// Politician name or part of it; diacritics optional ("Babis" finds Babiš)
    query: String,
    /// Directory holding the per-session speech folders
    #[arg(long, default_value = "parliament_speeches")]
    root: PathBuf,
    /// Inclusive session range to search, e.g. "126-146" or "127"
    #[arg(long, default_value_t = SessionRange::DEFAULT)]
    sessions: SessionRange,
    /// Report dropped malformed records on stderr instead of staying quiet
    #[arg(long)]
    warn_malformed: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let query = cli.query.trim();
    if query.is_empty() {
        tracing::error!("query must not be empty");
        std::process::exit(2);
    }
    let policy = if cli.warn_malformed {
        MalformedPolicy::Warn
    } else {
        MalformedPolicy::Ignore
    };
    tracing::info!(query, root = %cli.root.display(), sessions = %cli.sessions, "searching for speeches");

    let walker = SessionWalker::new(&cli.root, cli.sessions);
    let extractor = Extractor::with_policy(walker, query, policy);

    // Bodies go to stdout only, one blank line apart, so the stream can be
    // redirected straight into a corpus file.
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut printed = 0usize;
    for body in extractor {
        if printed > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{body}")?;
        printed += 1;
    }
    out.flush()?;

    if printed == 0 {
        tracing::warn!(query, "no speeches found");
    } else {
        tracing::info!(count = printed, "speeches written");
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
