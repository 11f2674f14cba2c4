use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeMap;

/// One speech as listed on a session overview page: which transcript file
/// holds it, the anchor within that file, and the speaker the archive names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechRef {
    pub file: String,
    pub anchor: String,
    pub speaker: String,
}

/// What one overview part contributes: the session date from its title and
/// the speech links it lists.
#[derive(Debug)]
pub struct OverviewPart {
    pub date: String,
    pub refs: Vec<SpeechRef>,
}

/// The merged view of all overview parts of one session.
#[derive(Debug)]
pub struct SessionOverview {
    pub date: String,
    pub refs: Vec<SpeechRef>,
}

/// Parse one overview part.
///
/// Speech links look like `s126001.htm#r1` with the speaker as link text;
/// anything else (navigation, anchors without text) is ignored.
pub fn parse_overview(html: &str) -> OverviewPart {
    let document = Html::parse_document(html);
    let link = Selector::parse("a[href]").expect("static selector");
    let mut refs = Vec::new();
    for a in document.select(&link) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        let Some((file, anchor)) = split_speech_href(href) else {
            continue;
        };
        let speaker = a.text().collect::<String>().trim().to_string();
        if speaker.is_empty() {
            continue;
        }
        refs.push(SpeechRef {
            file,
            anchor,
            speaker,
        });
    }
    OverviewPart {
        date: session_date(&document),
        refs,
    }
}

impl SessionOverview {
    /// Merge the parts of a session in part order.
    ///
    /// The date comes from the first part. Entries are deduplicated by
    /// (file, anchor) with the later part winning, then ordered by the same
    /// key, which is the chronological order of the transcript.
    pub fn merge(parts: Vec<OverviewPart>) -> Self {
        let date = parts
            .first()
            .map(|part| part.date.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let mut merged: BTreeMap<(String, String), String> = BTreeMap::new();
        for part in parts {
            for r in part.refs {
                merged.insert((r.file, r.anchor), r.speaker);
            }
        }
        let refs = merged
            .into_iter()
            .map(|((file, anchor), speaker)| SpeechRef {
                file,
                anchor,
                speaker,
            })
            .collect();
        SessionOverview { date, refs }
    }
}

fn split_speech_href(href: &str) -> Option<(String, String)> {
    if !href.starts_with('s') {
        return None;
    }
    let (stem, anchor) = href.split_once(".htm#")?;
    if anchor.is_empty() {
        return None;
    }
    Some((format!("{stem}.htm"), anchor.to_string()))
}

fn session_date(document: &Html) -> String {
    let title = Selector::parse("title").expect("static selector");
    let text = document
        .select(&title)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();
    let re = Regex::new(r"\d{1,2}\..*?\d{4}").expect("static regex");
    re.find(&text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}
