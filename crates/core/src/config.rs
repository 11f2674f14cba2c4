use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inclusive range of parliamentary session numbers to process.
///
/// Passed explicitly to whatever walks the corpus, so tests can use synthetic
/// ranges instead of the production default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRange {
    pub first: u32,
    pub last: u32,
}

impl SessionRange {
    /// Sessions of the 2021 electoral term covered by the corpus.
    pub const DEFAULT: SessionRange = SessionRange {
        first: 126,
        last: 146,
    };

    pub fn new(first: u32, last: u32) -> Result<Self, String> {
        if first > last {
            return Err(format!("session range start {first} is after end {last}"));
        }
        Ok(SessionRange { first, last })
    }

    /// Session numbers in ascending order.
    pub fn sessions(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }

    pub fn contains(&self, session: u32) -> bool {
        (self.first..=self.last).contains(&session)
    }
}

impl Default for SessionRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SessionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

impl FromStr for SessionRange {
    type Err = String;

    /// Accepts "126-146" or a single session number like "127".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid session number '{part}'"))
        };
        match s.split_once('-') {
            Some((first, last)) => SessionRange::new(parse(first)?, parse(last)?),
            None => {
                let n = parse(s)?;
                Ok(SessionRange { first: n, last: n })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_range_and_single_session() {
        assert_eq!(
            "126-146".parse::<SessionRange>().unwrap(),
            SessionRange {
                first: 126,
                last: 146
            }
        );
        assert_eq!(
            "127".parse::<SessionRange>().unwrap(),
            SessionRange {
                first: 127,
                last: 127
            }
        );
    }

    #[test]
    fn rejects_inverted_and_garbage_input() {
        assert!("146-126".parse::<SessionRange>().is_err());
        assert!("abc".parse::<SessionRange>().is_err());
        assert!("12-".parse::<SessionRange>().is_err());
    }

    #[test]
    fn sessions_iterate_ascending() {
        let range = SessionRange::new(126, 128).unwrap();
        assert_eq!(range.sessions().collect::<Vec<_>>(), vec![126, 127, 128]);
        assert!(range.contains(127));
        assert!(!range.contains(129));
    }

    #[test]
    fn display_round_trips() {
        let range = SessionRange::DEFAULT;
        assert_eq!(range.to_string().parse::<SessionRange>().unwrap(), range);
    }
}
