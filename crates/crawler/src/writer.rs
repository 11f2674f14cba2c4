use anyhow::{Context, Result};
use snemovna_core::SpeechRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// File name for one speech: transcript stem plus anchor, e.g.
/// `s126001_r1.txt`. Name order is chronological order, which the session
/// walker relies on.
pub fn speech_file_name(file_id: &str, anchor: &str) -> String {
    let stem = file_id.strip_suffix(".htm").unwrap_or(file_id);
    format!("{stem}_{anchor}.txt")
}

/// Write one record into its session directory under the speeches root.
pub fn write_record(root: &Path, session: u32, record: &SpeechRecord) -> Result<PathBuf> {
    let dir = root.join(session.to_string());
    fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create session directory {}", dir.display()))?;
    let path = dir.join(speech_file_name(&record.file_id, &record.anchor));
    fs::write(&path, record.render())
        .with_context(|| format!("cannot write speech file {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snemovna_core::RecordParser;

    #[test]
    fn file_name_is_stem_plus_anchor() {
        assert_eq!(speech_file_name("s126001.htm", "r1"), "s126001_r1.txt");
        assert_eq!(speech_file_name("odd-name", "r2"), "odd-name_r2.txt");
    }

    #[test]
    fn written_record_parses_back_identical() {
        let root = tempfile::tempdir().unwrap();
        let record = SpeechRecord {
            file_id: "s126001.htm".into(),
            anchor: "r1".into(),
            date: "15. ledna 2025".into(),
            speaker: "Poslanec Andrej Babiš".into(),
            body: "Vážené dámy, vážení pánové.".into(),
        };

        let path = write_record(root.path(), 126, &record).unwrap();
        assert_eq!(
            path,
            root.path().join("126").join("s126001_r1.txt")
        );

        let content = fs::read_to_string(&path).unwrap();
        let parsed: Vec<_> = RecordParser::new(&content).collect();
        assert_eq!(parsed, vec![record]);
    }
}
