use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a game finished. Set exactly once, at the single terminal
/// transition point; the public status is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The player cashed out.
    TookMoney,
    /// The last submitted answer was wrong.
    WrongAnswer,
    /// The session time budget had elapsed when an answer arrived.
    TimedOut,
    /// Every ladder level was cleared.
    Cleared,
}

/// Observable game state. Everything except `InProgress` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won,
    Fail,
    Timeout,
    Money,
}

impl GameStatus {
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GameStatus::InProgress => "in_progress",
            GameStatus::Won => "won",
            GameStatus::Fail => "fail",
            GameStatus::Timeout => "timeout",
            GameStatus::Money => "money",
        }
    }
}

impl From<FinishReason> for GameStatus {
    fn from(reason: FinishReason) -> Self {
        match reason {
            FinishReason::TookMoney => GameStatus::Money,
            FinishReason::WrongAnswer => GameStatus::Fail,
            FinishReason::TimedOut => GameStatus::Timeout,
            FinishReason::Cleared => GameStatus::Won,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
