use crate::Letter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The three one-time-use hint mechanisms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpKind {
    FiftyFifty,
    AudienceHelp,
    FriendCall,
}

impl HelpKind {
    pub const ALL: [HelpKind; 3] = [
        HelpKind::FiftyFifty,
        HelpKind::AudienceHelp,
        HelpKind::FriendCall,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HelpKind::FiftyFifty => "fifty_fifty",
            HelpKind::AudienceHelp => "audience_help",
            HelpKind::FriendCall => "friend_call",
        }
    }
}

impl fmt::Display for HelpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two letters surviving a fifty-fifty, correct one first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiftyFifty {
    pub correct: Letter,
    pub other: Letter,
}

impl FiftyFifty {
    /// Survivors in stored order: `[correct, other]`.
    #[must_use]
    pub const fn letters(self) -> [Letter; 2] {
        [self.correct, self.other]
    }

    #[must_use]
    pub fn contains(self, letter: Letter) -> bool {
        letter == self.correct || letter == self.other
    }
}

/// Audience poll result: vote percentage per candidate letter.
///
/// Letters eliminated by an earlier fifty-fifty are absent, not zero-filled.
pub type AudienceVotes = BTreeMap<Letter, u8>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} hint is already recorded for this question")]
pub struct HelpAlreadyRecorded(pub HelpKind);

/// Accumulated hint payloads for one game question.
///
/// A closed record rather than an open map: each key is written at most once
/// for the lifetime of the question (`record_*` rejects a second write), and
/// no key is ever cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fifty_fifty: Option<FiftyFifty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    audience_help: Option<AudienceVotes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    friend_call: Option<String>,
}

impl HelpState {
    #[must_use]
    pub fn fifty_fifty(&self) -> Option<FiftyFifty> {
        self.fifty_fifty
    }

    #[must_use]
    pub fn audience_help(&self) -> Option<&AudienceVotes> {
        self.audience_help.as_ref()
    }

    #[must_use]
    pub fn friend_call(&self) -> Option<&str> {
        self.friend_call.as_deref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fifty_fifty.is_none() && self.audience_help.is_none() && self.friend_call.is_none()
    }

    pub fn record_fifty_fifty(&mut self, survivors: FiftyFifty) -> Result<(), HelpAlreadyRecorded> {
        if self.fifty_fifty.is_some() {
            return Err(HelpAlreadyRecorded(HelpKind::FiftyFifty));
        }
        self.fifty_fifty = Some(survivors);
        Ok(())
    }

    pub fn record_audience_help(&mut self, votes: AudienceVotes) -> Result<(), HelpAlreadyRecorded> {
        if self.audience_help.is_some() {
            return Err(HelpAlreadyRecorded(HelpKind::AudienceHelp));
        }
        self.audience_help = Some(votes);
        Ok(())
    }

    pub fn record_friend_call(&mut self, guess: String) -> Result<(), HelpAlreadyRecorded> {
        if self.friend_call.is_some() {
            return Err(HelpAlreadyRecorded(HelpKind::FriendCall));
        }
        self.friend_call = Some(guess);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AudienceVotes, FiftyFifty, HelpKind, HelpState, Letter};

    fn survivors() -> FiftyFifty {
        FiftyFifty {
            correct: Letter::C,
            other: Letter::A,
        }
    }

    #[test]
    fn records_are_append_only() {
        let mut help = HelpState::default();
        assert!(help.is_empty());

        help.record_fifty_fifty(survivors()).unwrap();
        let err = help.record_fifty_fifty(survivors()).unwrap_err();
        assert_eq!(err.0, HelpKind::FiftyFifty);
        assert_eq!(help.fifty_fifty().unwrap().letters(), [Letter::C, Letter::A]);

        help.record_friend_call("Marina thinks the answer is C".to_string())
            .unwrap();
        assert!(help.record_friend_call(String::new()).is_err());
        assert_eq!(
            help.friend_call().unwrap(),
            "Marina thinks the answer is C"
        );
    }

    #[test]
    fn audience_votes_recorded_once() {
        let mut help = HelpState::default();
        let votes: AudienceVotes = [(Letter::A, 60), (Letter::C, 40)].into_iter().collect();
        help.record_audience_help(votes.clone()).unwrap();
        assert!(help.record_audience_help(votes).is_err());
    }

    #[test]
    fn serde_skips_absent_keys() {
        let mut help = HelpState::default();
        assert_eq!(serde_json::to_string(&help).unwrap(), "{}");

        help.record_fifty_fifty(survivors()).unwrap();
        let json = serde_json::to_string(&help).unwrap();
        assert!(json.contains("fifty_fifty"));
        assert!(!json.contains("audience_help"));

        let back: HelpState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, help);
    }
}
