//! Core domain types for the millionaire quiz game.
//!
//! This crate contains pure domain types with no IO, no randomness, and no
//! clock access. Invariants are enforced at construction time: an
//! [`AnswerShuffle`] is always a permutation, a [`PrizeLadder`] is always
//! strictly increasing, and a [`HelpState`] key can never be overwritten.

mod help;
mod ladder;
mod letter;
mod shuffle;
mod status;

pub use help::{AudienceVotes, FiftyFifty, HelpAlreadyRecorded, HelpKind, HelpState};
pub use ladder::{LadderError, PrizeLadder};
pub use letter::{Letter, LetterParseError};
pub use shuffle::{AnswerShuffle, ShuffleError};
pub use status::{FinishReason, GameStatus};
