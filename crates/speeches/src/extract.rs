use crate::walker::SessionWalker;
use snemovna_core::{MalformedPolicy, RecordParser};
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;

/// Streams the bodies of speeches whose speaker matches the query.
///
/// One file is fully read and parsed before the next is opened, so memory
/// stays bounded by the largest single speech file. An unreadable file is
/// warned about and skipped; output produced so far stays valid no matter
/// what happens later in the corpus.
pub struct Extractor {
    query: String,
    policy: MalformedPolicy,
    files: Box<dyn Iterator<Item = PathBuf>>,
    ready: VecDeque<String>,
}

impl Extractor {
    pub fn new(walker: SessionWalker, query: impl Into<String>) -> Self {
        Self::with_policy(walker, query, MalformedPolicy::default())
    }

    pub fn with_policy(
        walker: SessionWalker,
        query: impl Into<String>,
        policy: MalformedPolicy,
    ) -> Self {
        Extractor {
            query: query.into(),
            policy,
            files: Box::new(walker.files()),
            ready: VecDeque::new(),
        }
    }
}

impl Iterator for Extractor {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(body) = self.ready.pop_front() {
                return Some(body);
            }
            let path = self.files.next()?;
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable speech file");
                    continue;
                }
            };
            for record in RecordParser::with_policy(&content, self.policy) {
                if speaker_match::matches(&record.speaker, &self.query) {
                    let body = record.body.trim();
                    if !body.is_empty() {
                        self.ready.push_back(body.to_string());
                    }
                }
            }
        }
    }
}
