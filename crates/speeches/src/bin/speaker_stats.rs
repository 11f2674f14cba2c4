use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use snemovna_core::{RecordParser, SessionRange};
use speeches::SessionWalker;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "speaker-stats",
    version,
    about = "Per-speaker statistics over the speech corpus"
)]
struct Cli {
    /// Directory holding the per-session speech folders
    #[arg(long, default_value = "parliament_speeches")]
    root: PathBuf,
    /// Inclusive session range to scan, e.g. "126-146"
    #[arg(long, default_value_t = SessionRange::DEFAULT)]
    sessions: SessionRange,
    /// Write the CSV here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
    /// Also dump the ranked statistics as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct Accumulator {
    speech_count: usize,
    total_words: usize,
    total_chars: usize,
    words_per_speech: Vec<usize>,
    sessions: BTreeSet<String>,
}

#[derive(Debug, Serialize)]
struct SpeakerRow {
    rank: usize,
    speaker: String,
    speeches: usize,
    total_words: usize,
    total_chars: usize,
    avg_words: f64,
    median_words: f64,
    sessions: usize,
    sessions_active: String,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let speakers = scan(&cli.root, cli.sessions);
    tracing::info!(speakers = speakers.len(), "corpus scanned");

    let rows = rank(speakers);

    if let Some(path) = &cli.json {
        let json = serde_json::to_string_pretty(&rows)?;
        fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))?;
        tracing::info!(path = %path.display(), "JSON statistics written");
    }

    match &cli.out {
        Some(path) => {
            let mut wtr = csv::Writer::from_path(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            for row in &rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
            tracing::info!(path = %path.display(), rows = rows.len(), "CSV statistics written");
        }
        None => {
            let mut wtr = csv::Writer::from_writer(io::stdout().lock());
            for row in &rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}

/// Fold every record of the corpus into per-speaker accumulators, keyed by
/// the title-stripped speaker name.
fn scan(root: &Path, range: SessionRange) -> BTreeMap<String, Accumulator> {
    let mut speakers: BTreeMap<String, Accumulator> = BTreeMap::new();
    for path in SessionWalker::new(root, range).files() {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable speech file");
                continue;
            }
        };
        let session = path
            .parent()
            .and_then(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        for record in RecordParser::new(&content) {
            let name = speaker_match::strip_title(&record.speaker).to_string();
            if name.is_empty() {
                continue;
            }
            let body = record.body.trim();
            let words = body.split_whitespace().count();
            let entry = speakers.entry(name).or_default();
            entry.speech_count += 1;
            entry.total_words += words;
            entry.total_chars += body.chars().count();
            entry.words_per_speech.push(words);
            entry.sessions.insert(session.clone());
        }
    }
    speakers
}

/// Order speakers by speech count (name as tie-break) and flatten into rows.
fn rank(speakers: BTreeMap<String, Accumulator>) -> Vec<SpeakerRow> {
    let mut ranked: Vec<(String, Accumulator)> = speakers.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.speech_count
            .cmp(&a.1.speech_count)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked
        .into_iter()
        .enumerate()
        .map(|(i, (speaker, mut acc))| {
            let median_words = median(&mut acc.words_per_speech);
            let avg_words = if acc.speech_count > 0 {
                acc.total_words as f64 / acc.speech_count as f64
            } else {
                0.0
            };
            SpeakerRow {
                rank: i + 1,
                speaker,
                speeches: acc.speech_count,
                total_words: acc.total_words,
                total_chars: acc.total_chars,
                avg_words,
                median_words,
                sessions: acc.sessions.len(),
                sessions_active: acc
                    .sessions
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(" "),
            }
        })
        .collect()
}

fn median(values: &mut [usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) as f64 / 2.0
    } else {
        values[mid] as f64
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use snemovna_core::SpeechRecord;

    fn write_record(dir: &Path, name: &str, speaker: &str, body: &str) {
        let record = SpeechRecord {
            file_id: "s126001.htm".into(),
            anchor: "r1".into(),
            date: "15. ledna 2025".into(),
            speaker: speaker.into(),
            body: body.into(),
        };
        fs::write(dir.join(name), record.render()).unwrap();
    }

    #[test]
    fn aggregates_counts_words_and_sessions() {
        let root = tempfile::tempdir().unwrap();
        for session in ["126", "127"] {
            fs::create_dir(root.path().join(session)).unwrap();
        }
        write_record(
            &root.path().join("126"),
            "s126001_r1.txt",
            "Poslanec Andrej Babiš",
            "jedna dva tři",
        );
        write_record(
            &root.path().join("127"),
            "s127001_r1.txt",
            "Andrej Babiš",
            "jedna dva tři čtyři pět",
        );
        write_record(
            &root.path().join("127"),
            "s127001_r2.txt",
            "Předseda vlády Petr Fiala",
            "krátký projev",
        );

        let range = SessionRange::new(126, 127).unwrap();
        let rows = rank(scan(root.path(), range));

        assert_eq!(rows.len(), 2);
        // Title-stripped names merge across sessions; most speeches rank first.
        assert_eq!(rows[0].speaker, "Andrej Babiš");
        assert_eq!(rows[0].speeches, 2);
        assert_eq!(rows[0].total_words, 8);
        assert_eq!(rows[0].avg_words, 4.0);
        assert_eq!(rows[0].median_words, 4.0);
        assert_eq!(rows[0].sessions, 2);
        assert_eq!(rows[0].sessions_active, "126 127");
        assert_eq!(rows[1].speaker, "Petr Fiala");
        assert_eq!(rows[1].speeches, 1);
    }

    #[test]
    fn median_handles_odd_and_even_lengths() {
        assert_eq!(median(&mut [3, 1, 2]), 2.0);
        assert_eq!(median(&mut [4, 1, 2, 3]), 2.5);
        assert_eq!(median(&mut []), 0.0);
    }
}
