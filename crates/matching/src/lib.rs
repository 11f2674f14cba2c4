use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Honorific and role prefixes stripped from the front of a speaker label.
///
/// Closed list; compound variants must come before their own prefixes
/// ("Předseda vlády" before "Předseda"), since only the first match is taken.
pub const TITLE_PREFIXES: &[&str] = &[
    "Předseda vlády",
    "Předsedkyně vlády",
    "Místopředseda vlády",
    "Místopředsedkyně vlády",
    "Předseda PSP",
    "Předsedkyně PSP",
    "Místopředseda PSP",
    "Místopředsedkyně PSP",
    "Předsedající",
    "Předseda",
    "Předsedkyně",
    "Místopředseda",
    "Místopředsedkyně",
    "Poslanec",
    "Poslankyně",
    "Ministr",
    "Ministryně",
    "Zpravodaj",
    "Zpravodajka",
    "Senátor",
    "Senátorka",
];

/// Strip at most one leading role prefix from a speaker label.
///
/// Matching is case-insensitive and whole-word: "Poslanec Andrej Babiš"
/// loses its title, "Petr Poslanec" keeps the surname intact.
pub fn strip_title(speaker: &str) -> &str {
    let label = speaker.trim();
    for prefix in TITLE_PREFIXES {
        if let Some(rest) = strip_prefix_ignore_case(label, prefix) {
            if rest.is_empty() {
                return rest;
            }
            if rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }
    label
}

/// Lowercase, strip diacritics, collapse runs of whitespace.
pub fn normalize(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Does the speaker label match the politician query?
///
/// The title-stripped speaker and the query are both normalized; every
/// whitespace token of the query must then occur as a substring of the
/// space-joined speaker name. Order-independent, so "Pekarová Adamová" and
/// "Adamová Pekarová" match the same labels. An empty or whitespace-only
/// query matches nothing. Pure function of its two inputs.
pub fn matches(speaker_raw: &str, query: &str) -> bool {
    let haystack = normalize(strip_title(speaker_raw));
    let needle = normalize(query);
    if needle.is_empty() || haystack.is_empty() {
        return false;
    }
    needle.split(' ').all(|token| haystack.contains(token))
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = s;
    for expected in prefix.chars() {
        let mut chars = rest.chars();
        let got = chars.next()?;
        if !got.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        rest = chars.as_str();
    }
    Some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_diacritics_and_folds_case() {
        assert_eq!(normalize("Markéta   Pekarová Adamová"), "marketa pekarova adamova");
        assert_eq!(normalize("Šimon Ťok"), "simon tok");
    }

    #[test]
    fn matches_ignores_diacritics_and_case() {
        assert!(matches("Andrej Babiš", "babis"));
        assert!(matches("Petr Fiala", "FIALA"));
    }

    #[test]
    fn multi_token_query_requires_every_token() {
        assert!(matches("Markéta Pekarová Adamová", "Pekarová Adamová"));
        assert!(!matches("Markéta Pekarová Adamová", "Adamová Novák"));
    }

    #[test]
    fn token_matching_is_substring_not_equality() {
        assert!(matches("Andrej Babiš", "Babi"));
        assert!(matches("Markéta Pekarová Adamová", "Adamová Pekar"));
    }

    #[test]
    fn leading_title_is_stripped_before_matching() {
        assert!(matches("Poslanec Andrej Babiš", "Babiš"));
        assert_eq!(
            matches("Poslanec Andrej Babiš", "Babiš"),
            matches("Andrej Babiš", "Babiš")
        );
    }

    #[test]
    fn compound_title_beats_its_prefix() {
        assert_eq!(strip_title("Předseda vlády Petr Fiala"), "Petr Fiala");
        assert_eq!(strip_title("Předseda PSP Radek Vondráček"), "Radek Vondráček");
        assert_eq!(strip_title("Předsedající Jan Novák"), "Jan Novák");
    }

    #[test]
    fn title_stripping_is_case_insensitive_and_whole_word() {
        assert_eq!(strip_title("poslanec Andrej Babiš"), "Andrej Babiš");
        // Surname happens to equal a title; not a leading whole-word prefix.
        assert_eq!(strip_title("Petr Poslanec"), "Petr Poslanec");
        assert_eq!(strip_title("Poslanecký klub"), "Poslanecký klub");
    }

    #[test]
    fn mid_string_title_is_left_alone() {
        assert_eq!(strip_title("Jan Ministr Novák"), "Jan Ministr Novák");
    }

    #[test]
    fn empty_query_never_matches() {
        assert!(!matches("Andrej Babiš", ""));
        assert!(!matches("Andrej Babiš", "   "));
        assert!(!matches("", ""));
    }

    #[test]
    fn title_only_label_matches_nothing() {
        assert!(!matches("Poslanec", "Poslanec"));
    }
}
