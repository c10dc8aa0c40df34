use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Display letter for one of the four answer variants shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Letter {
    A,
    B,
    C,
    D,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("answer letter must be one of a, b, c, d (got {0:?})")]
pub struct LetterParseError(String);

impl Letter {
    /// All four letters in display order.
    pub const ALL: [Letter; 4] = [Letter::A, Letter::B, Letter::C, Letter::D];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Letter::A => "a",
            Letter::B => "b",
            Letter::C => "c",
            Letter::D => "d",
        }
    }

    #[must_use]
    pub const fn as_upper_str(self) -> &'static str {
        match self {
            Letter::A => "A",
            Letter::B => "B",
            Letter::C => "C",
            Letter::D => "D",
        }
    }
}

impl FromStr for Letter {
    type Err = LetterParseError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(Letter::A),
            "b" => Ok(Letter::B),
            "c" => Ok(Letter::C),
            "d" => Ok(Letter::D),
            _ => Err(LetterParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Letter;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("a".parse::<Letter>().unwrap(), Letter::A);
        assert_eq!("B".parse::<Letter>().unwrap(), Letter::B);
        assert_eq!("  c ".parse::<Letter>().unwrap(), Letter::C);
        assert_eq!("D".parse::<Letter>().unwrap(), Letter::D);
    }

    #[test]
    fn parse_rejects_unknown_letters() {
        assert!("e".parse::<Letter>().is_err());
        assert!("".parse::<Letter>().is_err());
        assert!("ab".parse::<Letter>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_strings() {
        assert_eq!(serde_json::to_string(&Letter::C).unwrap(), "\"c\"");
        let parsed: Letter = serde_json::from_str("\"d\"").unwrap();
        assert_eq!(parsed, Letter::D);
    }
}
