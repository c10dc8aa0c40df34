//! Game-progression state machine for the millionaire quiz.
//!
//! One [`Game`] owns one materialized [`GameQuestion`] per ladder level and
//! drives the answer / cash-out / hint transitions. The engine is a pure,
//! single-threaded state machine: randomness comes in as `&mut impl Rng`,
//! time comes in as an explicit `DateTime<Utc>`, and every mutating
//! operation either fully applies its transition or applies none of it.
//!
//! Collaborators the surrounding layer provides:
//! - a [`QuestionBank`] to draw questions from at game creation;
//! - serialization of the aggregate (everything here derives serde);
//! - per-game operation ordering and the one-active-game-per-owner rule.

pub mod game;
pub mod game_question;
pub mod help_gen;
pub mod question;

pub use game::{
    AnswerOutcome, Game, GameCreationError, GameError, GameLoadError, GameRules, PlayerId,
    UseHelpError,
};
pub use game_question::GameQuestion;
pub use question::{InMemoryBank, Question, QuestionBank, QuestionError, QuestionId};
