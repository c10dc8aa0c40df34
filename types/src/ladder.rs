use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Prize amounts for the classic 15-level ladder.
const CLASSIC_PRIZES: [u64; 15] = [
    100, 200, 300, 500, 1_000, 2_000, 4_000, 8_000, 16_000, 32_000, 64_000, 125_000, 250_000,
    500_000, 1_000_000,
];

/// Fire-proof levels of the classic ladder (0-based).
const CLASSIC_FIREPROOF: [u8; 3] = [4, 9, 14];

/// Fixed level-to-prize policy: strictly increasing prizes plus a set of
/// fire-proof levels whose amounts survive a later wrong answer.
///
/// Pure data and lookups; no mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LadderWire", into = "LadderWire")]
pub struct PrizeLadder {
    prizes: Vec<u64>,
    fireproof: BTreeSet<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LadderError {
    #[error("prize ladder must have at least one level")]
    Empty,
    #[error("prizes must be strictly increasing (violated at level {level})")]
    NotIncreasing { level: u8 },
    #[error("fire-proof level {level} is outside the ladder")]
    FireproofOutOfRange { level: u8 },
    #[error("prize ladder cannot exceed {max} levels (got {levels})", max = PrizeLadder::MAX_LEVELS)]
    TooManyLevels { levels: usize },
}

#[derive(Serialize, Deserialize)]
struct LadderWire {
    prizes: Vec<u64>,
    fireproof: Vec<u8>,
}

impl PrizeLadder {
    /// Longest ladder a `u8` level index can address, counting the
    /// one-past-the-end position a cleared game occupies.
    pub const MAX_LEVELS: usize = u8::MAX as usize;

    /// Validated constructor: non-empty, at most [`Self::MAX_LEVELS`] long,
    /// strictly increasing prizes, fire-proof indices inside the ladder.
    pub fn new(
        prizes: Vec<u64>,
        fireproof: impl IntoIterator<Item = u8>,
    ) -> Result<Self, LadderError> {
        if prizes.is_empty() {
            return Err(LadderError::Empty);
        }
        if prizes.len() > Self::MAX_LEVELS {
            return Err(LadderError::TooManyLevels {
                levels: prizes.len(),
            });
        }
        for (i, pair) in prizes.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(LadderError::NotIncreasing { level: (i + 1) as u8 });
            }
        }
        let fireproof: BTreeSet<u8> = fireproof.into_iter().collect();
        if let Some(&level) = fireproof.iter().find(|&&l| usize::from(l) >= prizes.len()) {
            return Err(LadderError::FireproofOutOfRange { level });
        }
        Ok(Self { prizes, fireproof })
    }

    /// The classic 15-step ladder up to 1,000,000 with safe levels at
    /// 1,000 / 32,000 / 1,000,000.
    #[must_use]
    pub fn classic() -> Self {
        Self::new(CLASSIC_PRIZES.to_vec(), CLASSIC_FIREPROOF)
            .expect("the classic ladder is a valid ladder")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        // Construction rejects empty ladders; kept for API symmetry.
        self.prizes.is_empty()
    }

    /// Index of the hardest level.
    #[must_use]
    pub fn last_index(&self) -> u8 {
        (self.prizes.len() - 1) as u8
    }

    #[must_use]
    pub fn is_fireproof(&self, level: u8) -> bool {
        self.fireproof.contains(&level)
    }

    /// Prize for successfully clearing `level`, if the level exists.
    #[must_use]
    pub fn prize_for_won(&self, level: u8) -> Option<u64> {
        self.prizes.get(usize::from(level)).copied()
    }

    /// Reward for clearing every level.
    #[must_use]
    pub fn top_prize(&self) -> u64 {
        *self.prizes.last().expect("ladder is never empty")
    }

    /// Safe amount retained after a loss, given the highest level already
    /// cleared (`None` when no level was cleared): the prize of the highest
    /// fire-proof level at or below it, or 0 if none was reached.
    #[must_use]
    pub fn fireproof_prize(&self, cleared: Option<u8>) -> u64 {
        let Some(cleared) = cleared else { return 0 };
        self.fireproof
            .range(..=cleared)
            .next_back()
            .and_then(|&level| self.prize_for_won(level))
            .unwrap_or(0)
    }
}

impl Default for PrizeLadder {
    fn default() -> Self {
        Self::classic()
    }
}

impl TryFrom<LadderWire> for PrizeLadder {
    type Error = LadderError;

    fn try_from(wire: LadderWire) -> Result<Self, Self::Error> {
        Self::new(wire.prizes, wire.fireproof)
    }
}

impl From<PrizeLadder> for LadderWire {
    fn from(ladder: PrizeLadder) -> Self {
        Self {
            prizes: ladder.prizes,
            fireproof: ladder.fireproof.into_iter().collect(),
        }
    }
}
