use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crawler::{fetcher, overview, stenoprot, writer, CrawlState, SessionOverview};
use snemovna_core::{SessionRange, SpeechRecord};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "crawler",
    version,
    about = "Crawl PSP stenoprotocol pages into the local speech corpus"
)]
struct Cli {
    /// Cache directory for fetched overview and transcript pages
    #[arg(long, default_value = "parliament_transcripts")]
    transcripts: PathBuf,
    /// Directory the per-session speech files are written under
    #[arg(long, default_value = "parliament_speeches")]
    speeches: PathBuf,
    /// Inclusive session range to crawl, e.g. "126-146" or "127"
    #[arg(long, default_value_t = SessionRange::DEFAULT)]
    sessions: SessionRange,
    /// Crawl state file; lets an interrupted crawl resume where it stopped
    #[arg(long, default_value = "crawler_state.json")]
    state: PathBuf,
    /// Base politeness delay between requests, in milliseconds
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,
    /// Re-process overview parts already recorded in the crawl state
    #[arg(long)]
    refresh: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    fs::create_dir_all(&cli.transcripts)
        .with_context(|| format!("cannot create {}", cli.transcripts.display()))?;
    fs::create_dir_all(&cli.speeches)
        .with_context(|| format!("cannot create {}", cli.speeches.display()))?;

    let client = fetcher::build_client()?;
    let mut state = CrawlState::load(&cli.state)?;
    tracing::info!(sessions = %cli.sessions, speeches = %cli.speeches.display(), "starting crawl");

    // One failed session must not take the rest of the crawl with it.
    for session in cli.sessions.sessions() {
        match crawl_session(&cli, &client, session, &mut state).await {
            Ok(written) => tracing::info!(session, written, "session crawled"),
            Err(e) => tracing::error!(session, error = %e, "failed to crawl session"),
        }
        state.save(&cli.state)?;
    }
    Ok(())
}

/// Crawl one session: walk its overview parts until the archive runs out,
/// then extract and write every speech the new parts reference. Parts enter
/// the crawl state only after the whole session has been written.
async fn crawl_session(
    cli: &Cli,
    client: &reqwest::Client,
    session: u32,
    state: &mut CrawlState,
) -> Result<usize> {
    let delay = Duration::from_millis(cli.delay_ms);

    let mut processed_keys = Vec::new();
    let mut parts = Vec::new();
    let mut part = 1u32;
    loop {
        let key = CrawlState::part_key(session, part);
        if !cli.refresh && state.is_done(&key) {
            part += 1;
            continue;
        }
        let cache_name = format!("{session}-{part}.htm");
        let page = load_or_fetch(
            client,
            &cli.transcripts,
            &cache_name,
            &fetcher::overview_url(session, part),
            delay,
        )
        .await?;
        let Some(html) = page else {
            break;
        };
        parts.push(overview::parse_overview(&html));
        processed_keys.push(key);
        part += 1;
    }
    if parts.is_empty() {
        return Ok(0);
    }

    let merged = SessionOverview::merge(parts);
    tracing::info!(session, date = %merged.date, speeches = merged.refs.len(), "overview parsed");

    let mut written = 0usize;
    for r in &merged.refs {
        let page = load_or_fetch(
            client,
            &cli.transcripts,
            &r.file,
            &fetcher::transcript_url(session, &r.file),
            delay,
        )
        .await;
        let html = match page {
            Ok(Some(html)) => html,
            Ok(None) => {
                tracing::warn!(file = %r.file, "transcript page missing, entry skipped");
                continue;
            }
            Err(e) => {
                tracing::warn!(file = %r.file, error = %e, "transcript fetch failed, entry skipped");
                continue;
            }
        };
        let Some(body) = stenoprot::extract_speech(&html, &r.anchor) else {
            tracing::warn!(file = %r.file, anchor = %r.anchor, "anchor not found in transcript");
            continue;
        };
        if body.is_empty() {
            tracing::warn!(file = %r.file, anchor = %r.anchor, speaker = %r.speaker, "no speech text extracted");
        }
        let record = SpeechRecord {
            file_id: r.file.clone(),
            anchor: r.anchor.clone(),
            date: merged.date.clone(),
            speaker: r.speaker.clone(),
            body,
        };
        writer::write_record(&cli.speeches, session, &record)?;
        written += 1;
    }

    for key in processed_keys {
        state.mark_done(key);
    }
    Ok(written)
}

/// Serve a page from the transcript cache, fetching and caching it on a
/// miss. `Ok(None)` passes the fetcher's end-of-pagination signal through.
async fn load_or_fetch(
    client: &reqwest::Client,
    cache_dir: &Path,
    name: &str,
    url: &str,
    delay: Duration,
) -> Result<Option<String>> {
    let cached = cache_dir.join(name);
    if cached.is_file() {
        let content = fs::read_to_string(&cached)
            .with_context(|| format!("cannot read cached page {}", cached.display()))?;
        return Ok(Some(content));
    }
    let Some(html) = fetcher::fetch_page(client, url, delay).await? else {
        return Ok(None);
    };
    fs::write(&cached, &html)
        .with_context(|| format!("cannot cache page {}", cached.display()))?;
    Ok(Some(html))
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
