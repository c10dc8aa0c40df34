//! Bank questions and the read-only bank seam the engine draws from.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Identifier of a question inside a bank.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct QuestionId(u64);

impl QuestionId {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question text must not be empty")]
    EmptyText,
    #[error("answer in canonical slot {slot} must not be empty")]
    EmptyAnswer { slot: u8 },
}

/// A bank question: difficulty level, text, and four canonical answers.
///
/// Canonical slot 1 (`answers[0]`) always holds the true answer; games never
/// show answers in canonical order, the per-game [`AnswerShuffle`] decides
/// which display letter each slot lands on.
///
/// [`AnswerShuffle`]: millionaire_types::AnswerShuffle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    level: u8,
    text: String,
    answers: [String; 4],
}

impl Question {
    pub fn new(
        id: QuestionId,
        level: u8,
        text: impl Into<String>,
        answers: [String; 4],
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        for (i, answer) in answers.iter().enumerate() {
            if answer.trim().is_empty() {
                return Err(QuestionError::EmptyAnswer {
                    slot: (i + 1) as u8,
                });
            }
        }
        Ok(Self {
            id,
            level,
            text,
            answers,
        })
    }

    #[must_use]
    pub const fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Answer text in canonical slot `1..=4`. Panics on any other slot;
    /// callers resolve slots through a validated shuffle.
    #[must_use]
    pub fn answer(&self, slot: u8) -> &str {
        &self.answers[usize::from(slot - 1)]
    }

    /// The true answer (canonical slot 1).
    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.answers[0]
    }
}

/// Read-only source of questions, tagged with difficulty levels.
///
/// The engine requests one question per ladder level at game creation and
/// passes the ids already drawn so a single game never repeats a question.
pub trait QuestionBank {
    /// One question of difficulty `level`, chosen uniformly at random among
    /// candidates not in `exclude`. `None` when the bank cannot supply one.
    fn sample_for_level(
        &self,
        level: u8,
        exclude: &HashSet<QuestionId>,
        rng: &mut dyn Rng,
    ) -> Option<Question>;
}

/// Straightforward in-memory bank, also the test double for the seam.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryBank {
    questions: Vec<Question>,
}

impl InMemoryBank {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn push(&mut self, question: Question) {
        self.questions.push(question);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl QuestionBank for InMemoryBank {
    fn sample_for_level(
        &self,
        level: u8,
        exclude: &HashSet<QuestionId>,
        rng: &mut dyn Rng,
    ) -> Option<Question> {
        let candidates: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| q.level() == level && !exclude.contains(&q.id()))
            .collect();
        candidates.choose(rng).map(|q| (*q).clone())
    }
}
