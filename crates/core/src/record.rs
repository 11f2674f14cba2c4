use serde::{Deserialize, Serialize};

const FILE_FIELD: &str = "File:";
const ANCHOR_FIELD: &str = "Anchor:";
const DATE_FIELD: &str = "Date:";
const SPEAKER_FIELD: &str = "Speaker:";

/// One speech as captured from a stenoprotocol page.
///
/// Records are transient: parsed, filtered, emitted, dropped. Two records
/// with the same speaker are independent, never merged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRecord {
    /// Source transcript file, e.g. "s126001.htm".
    pub file_id: String,
    /// In-page anchor the speech hangs off, kept for traceability.
    pub anchor: String,
    /// Session date as printed on the overview page; never parsed further.
    pub date: String,
    /// Raw speaker label, usually with a role prefix ("Poslanec Andrej Babiš").
    pub speaker: String,
    /// Speech text, internal blank lines preserved.
    pub body: String,
}

impl SpeechRecord {
    /// Render into the flat speech-file format that `RecordParser` reads back.
    pub fn render(&self) -> String {
        format!(
            "File: {}\nAnchor: {}\nDate: {}\nSpeaker: {}\n\n{}\n",
            self.file_id, self.anchor, self.date, self.speaker, self.body
        )
    }
}

/// What to do with a record that is missing a required field when it is
/// flushed. Gaps from partially scraped sessions are expected, so the
/// default stays quiet; `Warn` surfaces every dropped fragment on the error
/// channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    #[default]
    Ignore,
    Warn,
}

/// Lazy iterator over the records of one speech file's content.
///
/// A `File:` line flushes the record in progress and starts the next one.
/// `Anchor:`/`Date:`/`Speaker:` lines fill their fields; a repeated field is
/// warned about and the later value wins. Everything else belongs to the
/// body. Parsing is pure: the same input always yields the same sequence.
pub struct RecordParser<'a> {
    lines: std::str::Lines<'a>,
    current: Option<RecordBuilder<'a>>,
    policy: MalformedPolicy,
    finished: bool,
}

impl<'a> RecordParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_policy(input, MalformedPolicy::default())
    }

    pub fn with_policy(input: &'a str, policy: MalformedPolicy) -> Self {
        RecordParser {
            lines: input.lines(),
            current: None,
            policy,
            finished: false,
        }
    }
}

impl<'a> Iterator for RecordParser<'a> {
    type Item = SpeechRecord;

    fn next(&mut self) -> Option<SpeechRecord> {
        if self.finished {
            return None;
        }
        loop {
            let Some(line) = self.lines.next() else {
                self.finished = true;
                return self.current.take().and_then(|b| b.build(self.policy));
            };
            if let Some(file_id) = field_value(line, FILE_FIELD) {
                let flushed = self.current.replace(RecordBuilder::new(file_id));
                if let Some(record) = flushed.and_then(|b| b.build(self.policy)) {
                    return Some(record);
                }
            } else if let Some(builder) = self.current.as_mut() {
                builder.feed(line);
            }
            // Lines before the first `File:` marker belong to no record.
        }
    }
}

struct RecordBuilder<'a> {
    file_id: &'a str,
    anchor: Option<&'a str>,
    date: Option<&'a str>,
    speaker: Option<&'a str>,
    body: Vec<&'a str>,
}

impl<'a> RecordBuilder<'a> {
    fn new(file_id: &'a str) -> Self {
        RecordBuilder {
            file_id,
            anchor: None,
            date: None,
            speaker: None,
            body: Vec::new(),
        }
    }

    fn feed(&mut self, line: &'a str) {
        if let Some(value) = field_value(line, ANCHOR_FIELD) {
            Self::set_field(&mut self.anchor, value, "Anchor", self.file_id);
        } else if let Some(value) = field_value(line, DATE_FIELD) {
            Self::set_field(&mut self.date, value, "Date", self.file_id);
        } else if let Some(value) = field_value(line, SPEAKER_FIELD) {
            Self::set_field(&mut self.speaker, value, "Speaker", self.file_id);
        } else {
            self.body.push(line);
        }
    }

    fn set_field(slot: &mut Option<&'a str>, value: &'a str, field: &str, file_id: &str) {
        if slot.replace(value).is_some() {
            tracing::warn!(field, file_id, "duplicate field in record, keeping the later value");
        }
    }

    fn build(self, policy: MalformedPolicy) -> Option<SpeechRecord> {
        let (Some(anchor), Some(date), Some(speaker)) = (self.anchor, self.date, self.speaker)
        else {
            if policy == MalformedPolicy::Warn {
                tracing::warn!(file_id = self.file_id, "dropping record with missing fields");
            }
            return None;
        };
        Some(SpeechRecord {
            file_id: self.file_id.to_string(),
            anchor: anchor.to_string(),
            date: date.to_string(),
            speaker: speaker.to_string(),
            body: trim_blank_edges(&self.body).join("\n"),
        })
    }
}

fn field_value<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.strip_prefix(marker).map(str::trim)
}

/// Drop the run of blank lines at each end of the body, nothing else.
fn trim_blank_edges<'s, 'a>(lines: &'s [&'a str]) -> &'s [&'a str] {
    let Some(start) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return &[];
    };
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(lines.len(), |i| i + 1);
    &lines[start..end]
}
