use crate::Letter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Permutation mapping display letters to canonical answer slots `1..=4`.
///
/// Slot 1 always holds the true answer in the bank, so the shuffle alone
/// decides which display letter is correct for a given game question. The
/// mapping is frozen at game-creation time and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ShuffleWire", into = "ShuffleWire")]
pub struct AnswerShuffle {
    a: u8,
    b: u8,
    c: u8,
    d: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("answer shuffle {0:?} is not a permutation of slots 1..=4")]
pub struct ShuffleError(pub [u8; 4]);

#[derive(Serialize, Deserialize)]
struct ShuffleWire {
    a: u8,
    b: u8,
    c: u8,
    d: u8,
}

impl AnswerShuffle {
    /// Canonical slot that holds the true answer.
    pub const CORRECT_SLOT: u8 = 1;

    /// Build a shuffle from slots in display order `[a, b, c, d]`.
    ///
    /// Rejects anything that is not exactly a permutation of `{1, 2, 3, 4}`.
    pub fn new(slots: [u8; 4]) -> Result<Self, ShuffleError> {
        let mut seen = [false; 4];
        for &slot in &slots {
            if !(1..=4).contains(&slot) {
                return Err(ShuffleError(slots));
            }
            let idx = usize::from(slot - 1);
            if seen[idx] {
                return Err(ShuffleError(slots));
            }
            seen[idx] = true;
        }
        Ok(Self {
            a: slots[0],
            b: slots[1],
            c: slots[2],
            d: slots[3],
        })
    }

    /// The unshuffled mapping: letter `a` is correct.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            a: 1,
            b: 2,
            c: 3,
            d: 4,
        }
    }

    /// Canonical slot shown under `letter`.
    #[must_use]
    pub const fn slot(self, letter: Letter) -> u8 {
        match letter {
            Letter::A => self.a,
            Letter::B => self.b,
            Letter::C => self.c,
            Letter::D => self.d,
        }
    }

    /// The display letter whose slot is the canonical correct slot.
    #[must_use]
    pub fn correct_letter(self) -> Letter {
        Letter::ALL
            .into_iter()
            .find(|&letter| self.slot(letter) == Self::CORRECT_SLOT)
            .expect("a valid shuffle maps exactly one letter to the correct slot")
    }

    /// Slots in display order `[a, b, c, d]`.
    #[must_use]
    pub const fn as_slots(self) -> [u8; 4] {
        [self.a, self.b, self.c, self.d]
    }
}

impl TryFrom<ShuffleWire> for AnswerShuffle {
    type Error = ShuffleError;

    fn try_from(wire: ShuffleWire) -> Result<Self, Self::Error> {
        Self::new([wire.a, wire.b, wire.c, wire.d])
    }
}

impl From<AnswerShuffle> for ShuffleWire {
    fn from(shuffle: AnswerShuffle) -> Self {
        Self {
            a: shuffle.a,
            b: shuffle.b,
            c: shuffle.c,
            d: shuffle.d,
        }
    }
}
