//! Hint payload synthesis: audience vote distributions and friend guesses.
//!
//! Pure functions, deterministic modulo the injected rng. Neither payload is
//! authoritative: the audience can be wrong and so can the friend.

use millionaire_types::{AudienceVotes, Letter};
use rand::seq::IndexedRandom;
use rand::{Rng, RngExt};

/// Probability that the friend names the correct letter.
const FRIEND_ACCURACY: f64 = 0.8;

/// Extra weight the correct letter gets in the audience poll. Small enough
/// that a lucky wrong letter can still out-poll it.
const CORRECT_BOOST: u32 = 25;

/// Base weight range every candidate draws from.
const BASE_WEIGHT: std::ops::RangeInclusive<u32> = 10..=50;

const FRIEND_NAMES: &[&str] = &["Alex", "Marina", "Victor", "Sophie", "Paul", "Nina"];

/// Percentage votes for every candidate letter, summing to exactly 100.
///
/// The correct letter's share is the largest in expectation only; letters
/// outside `candidates` are absent from the result.
pub fn audience_distribution(
    candidates: &[Letter],
    correct: Letter,
    rng: &mut impl Rng,
) -> AudienceVotes {
    debug_assert!(candidates.contains(&correct));

    let weights: Vec<(Letter, u32)> = candidates
        .iter()
        .map(|&letter| {
            let base = rng.random_range(BASE_WEIGHT);
            let weight = if letter == correct {
                base + CORRECT_BOOST
            } else {
                base
            };
            (letter, weight)
        })
        .collect();
    let total: u32 = weights.iter().map(|&(_, w)| w).sum();

    // Floor each share, then hand the rounding remainder to the correct
    // letter so the distribution always sums to 100.
    let mut votes = AudienceVotes::new();
    let mut assigned: u8 = 0;
    for &(letter, weight) in &weights {
        let share = (weight * 100 / total) as u8;
        votes.insert(letter, share);
        assigned += share;
    }
    if let Some(vote) = votes.get_mut(&correct) {
        *vote += 100 - assigned;
    }
    votes
}

/// Free-text guess from an imperfect friend, naming one candidate letter.
pub fn friend_call(candidates: &[Letter], correct: Letter, rng: &mut impl Rng) -> String {
    debug_assert!(candidates.contains(&correct));

    let guess = if rng.random_bool(FRIEND_ACCURACY) {
        correct
    } else {
        let wrong: Vec<Letter> = candidates
            .iter()
            .copied()
            .filter(|&letter| letter != correct)
            .collect();
        wrong.choose(rng).copied().unwrap_or(correct)
    };
    let name = FRIEND_NAMES
        .choose(rng)
        .expect("friend name list is not empty");
    format!("{name} thinks the answer is {}", guess.as_upper_str())
}
