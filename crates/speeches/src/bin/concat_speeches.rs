use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use snemovna_core::RecordParser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "concat-speeches",
    version,
    about = "Concatenate the speech files of one folder into a single file"
)]
struct Cli {
    /// Folder with speech files
    folder: PathBuf,
    /// Output file
    output: PathBuf,
    /// Only include files with this extension
    #[arg(short, long, default_value = "txt")]
    ext: String,
    /// Leave out the FILE: <name> headers and separators
    #[arg(long)]
    no_headers: bool,
    /// Separator written between files
    #[arg(short, long, default_value_t = default_separator())]
    separator: String,
}

fn default_separator() -> String {
    format!("\n{}\n", "=".repeat(50))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut files: Vec<PathBuf> = fs::read_dir(&cli.folder)
        .with_context(|| format!("cannot read folder {}", cli.folder.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == cli.ext.as_str()))
        .collect();
    files.sort();
    if files.is_empty() {
        bail!("no .{} files in {}", cli.ext, cli.folder.display());
    }
    tracing::info!(count = files.len(), folder = %cli.folder.display(), "concatenating speech files");

    let out = File::create(&cli.output)
        .with_context(|| format!("cannot create {}", cli.output.display()))?;
    let mut out = BufWriter::new(out);
    let mut written = 0usize;
    for path in &files {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                continue;
            }
        };
        if !cli.no_headers {
            if written > 0 {
                write!(out, "{}", cli.separator)?;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default();
            writeln!(out, "FILE: {name}\n")?;
        }
        // Keep Date/Speaker, drop the File/Anchor bookkeeping. Files that are
        // not in the speech format pass through untouched.
        let mut records = 0usize;
        for record in RecordParser::new(&content) {
            writeln!(
                out,
                "Date: {}\nSpeaker: {}\n\n{}",
                record.date, record.speaker, record.body
            )?;
            records += 1;
        }
        if records == 0 {
            out.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                writeln!(out)?;
            }
        }
        written += 1;
    }
    out.flush()?;
    tracing::info!(files = written, output = %cli.output.display(), "concatenation complete");
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
