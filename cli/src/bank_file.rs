//! TOML question-bank files.
//!
//! A bank file holds `[[questions]]` entries (four answers, the first one
//! correct) and an optional `[rules]` section overriding the time limit or
//! the whole prize ladder.

use millionaire_engine::{GameRules, InMemoryBank, Question, QuestionError, QuestionId};
use millionaire_types::{LadderError, PrizeLadder};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Deserialize)]
pub struct BankFile {
    #[serde(default)]
    rules: Option<RulesSection>,
    questions: Vec<QuestionEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct RulesSection {
    time_limit_secs: Option<u32>,
    /// Strictly increasing prize per level; replaces the classic ladder.
    prizes: Option<Vec<u64>>,
    #[serde(default)]
    fireproof: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct QuestionEntry {
    level: u8,
    text: String,
    /// Exactly four; the first one is the true answer.
    answers: Vec<String>,
}

#[derive(Debug, Error)]
pub enum BankFileError {
    #[error("failed to read bank file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse bank file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("question {index}: expected exactly 4 answers, got {count}")]
    AnswerCount { index: usize, count: usize },
    #[error("question {index} is invalid")]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },
    #[error("invalid prize ladder in [rules]")]
    Ladder(#[from] LadderError),
}

impl BankFile {
    pub fn load(path: &Path) -> Result<Self, BankFileError> {
        let raw = fs::read_to_string(path).map_err(|source| BankFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| BankFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse file contents directly (used for the built-in bank).
    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Materialize the bank and session rules. Question ids are assigned
    /// from file order.
    pub fn into_parts(self) -> Result<(InMemoryBank, GameRules), BankFileError> {
        let rules_section = self.rules.unwrap_or_default();
        let ladder = match rules_section.prizes {
            Some(prizes) => PrizeLadder::new(prizes, rules_section.fireproof)?,
            None => PrizeLadder::classic(),
        };
        let time_limit = rules_section
            .time_limit_secs
            .unwrap_or(GameRules::DEFAULT_TIME_LIMIT_SECS);
        let rules = GameRules::new(ladder, time_limit);

        let mut bank = InMemoryBank::default();
        for (index, entry) in self.questions.into_iter().enumerate() {
            let count = entry.answers.len();
            let answers: [String; 4] = entry
                .answers
                .try_into()
                .map_err(|_| BankFileError::AnswerCount { index, count })?;
            let question = Question::new(
                QuestionId::new(index as u64),
                entry.level,
                entry.text,
                answers,
            )
            .map_err(|source| BankFileError::Question { index, source })?;
            bank.push(question);
        }
        Ok((bank, rules))
    }
}

#[cfg(test)]
mod tests {
    use super::{BankFile, BankFileError};
    use std::io::Write;

    const MINIMAL: &str = r#"
[rules]
time_limit_secs = 120
prizes = [100, 500, 1000]
fireproof = [1]

[[questions]]
level = 0
text = "first question"
answers = ["right", "wrong", "wrong", "wrong"]
"#;

    #[test]
    fn parses_rules_and_questions() {
        let file = BankFile::parse(MINIMAL).unwrap();
        let (bank, rules) = file.into_parts().unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(rules.ladder().len(), 3);
        assert_eq!(rules.time_limit().num_seconds(), 120);
        assert!(rules.ladder().is_fireproof(1));
    }

    #[test]
    fn defaults_to_the_classic_ladder() {
        let file = BankFile::parse(
            r#"
[[questions]]
level = 0
text = "q"
answers = ["a", "b", "c", "d"]
"#,
        )
        .unwrap();
        let (_, rules) = file.into_parts().unwrap();
        assert_eq!(rules.ladder().len(), 15);
        assert_eq!(rules.time_limit().num_seconds(), 35 * 60);
    }

    #[test]
    fn rejects_wrong_answer_counts() {
        let file = BankFile::parse(
            r#"
[[questions]]
level = 0
text = "q"
answers = ["only", "three", "answers"]
"#,
        )
        .unwrap();
        let err = file.into_parts().unwrap_err();
        assert!(matches!(
            err,
            BankFileError::AnswerCount { index: 0, count: 3 }
        ));
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let missing = BankFile::load("/nonexistent/bank.toml".as_ref()).unwrap_err();
        assert!(matches!(missing, BankFileError::Read { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not [ valid toml").unwrap();
        let malformed = BankFile::load(file.path()).unwrap_err();
        assert!(matches!(malformed, BankFileError::Parse { .. }));
    }
}
