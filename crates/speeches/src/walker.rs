use snemovna_core::SessionRange;
use std::fs;
use std::path::{Path, PathBuf};

/// Walks per-session speech directories under a corpus root.
///
/// Sessions come out in ascending numeric order driven by the range, not by
/// directory listing order; files within a session are sorted by name, which
/// the crawler's naming keeps chronological. Sessions missing locally are
/// expected and skipped without a sound.
pub struct SessionWalker {
    root: PathBuf,
    range: SessionRange,
}

impl SessionWalker {
    pub fn new(root: impl Into<PathBuf>, range: SessionRange) -> Self {
        SessionWalker {
            root: root.into(),
            range,
        }
    }

    /// Speech file paths in session, then filename order.
    pub fn files(self) -> impl Iterator<Item = PathBuf> {
        let root = self.root;
        self.range
            .sessions()
            .flat_map(move |session| session_files(&root.join(session.to_string())))
    }
}

fn session_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable session directory");
            return Vec::new();
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use snemovna_core::SessionRange;

    fn touch(path: &Path) {
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn sessions_come_out_in_range_order() {
        let root = tempfile::tempdir().unwrap();
        // Created in reverse so a listing-order walk would get it wrong.
        fs::create_dir(root.path().join("127")).unwrap();
        touch(&root.path().join("127").join("s127001_r1.txt"));
        fs::create_dir(root.path().join("126")).unwrap();
        touch(&root.path().join("126").join("s126001_r1.txt"));

        let range = SessionRange::new(126, 127).unwrap();
        let files: Vec<_> = SessionWalker::new(root.path(), range).files().collect();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["126/s126001_r1.txt", "127/s127001_r1.txt"]);
    }

    #[test]
    fn files_within_a_session_are_name_sorted() {
        let root = tempfile::tempdir().unwrap();
        let session = root.path().join("126");
        fs::create_dir(&session).unwrap();
        touch(&session.join("s126002_r1.txt"));
        touch(&session.join("s126001_r2.txt"));
        touch(&session.join("s126001_r1.txt"));

        let range = SessionRange::new(126, 126).unwrap();
        let names: Vec<_> = SessionWalker::new(root.path(), range)
            .files()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["s126001_r1.txt", "s126001_r2.txt", "s126002_r1.txt"]);
    }

    #[test]
    fn absent_sessions_and_foreign_files_are_skipped() {
        let root = tempfile::tempdir().unwrap();
        let session = root.path().join("130");
        fs::create_dir(&session).unwrap();
        touch(&session.join("s130001_r1.txt"));
        touch(&session.join("notes.md"));

        // 126..=129 and 131..=132 do not exist on disk.
        let range = SessionRange::new(126, 132).unwrap();
        let files: Vec<_> = SessionWalker::new(root.path(), range).files().collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name().unwrap(), "s130001_r1.txt");
    }
}
