use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Which overview parts have already been processed, with their fetch time.
///
/// Lets an interrupted crawl resume without re-extracting finished parts.
/// Parts are only marked once their whole session has been written out, so
/// a crash mid-session re-does that session and nothing else.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CrawlState {
    parts: BTreeMap<String, DateTime<Utc>>,
}

impl CrawlState {
    /// Key of one overview part, e.g. `"126-3"`.
    pub fn part_key(session: u32, part: u32) -> String {
        format!("{session}-{part}")
    }

    /// A missing state file is a fresh crawl, not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read crawl state {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("crawl state {} is not valid JSON", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("cannot serialize crawl state")?;
        fs::write(path, json)
            .with_context(|| format!("cannot write crawl state {}", path.display()))
    }

    pub fn is_done(&self, key: &str) -> bool {
        self.parts.contains_key(key)
    }

    pub fn mark_done(&mut self, key: String) {
        self.parts.insert(key, Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_done_parts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawler_state.json");

        let mut state = CrawlState::default();
        state.mark_done(CrawlState::part_key(126, 1));
        state.mark_done(CrawlState::part_key(126, 2));
        state.save(&path).unwrap();

        let loaded = CrawlState::load(&path).unwrap();
        assert!(loaded.is_done("126-1"));
        assert!(loaded.is_done("126-2"));
        assert!(!loaded.is_done("127-1"));
    }

    #[test]
    fn missing_file_loads_as_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = CrawlState::load(&dir.path().join("nope.json")).unwrap();
        assert!(!state.is_done("126-1"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawler_state.json");
        fs::write(&path, "not json").unwrap();
        assert!(CrawlState::load(&path).is_err());
    }
}
