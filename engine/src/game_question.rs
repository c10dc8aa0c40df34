//! One materialized question inside a game.

use crate::help_gen;
use crate::question::Question;
use millionaire_types::{AnswerShuffle, FiftyFifty, HelpAlreadyRecorded, HelpState, Letter};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// A bank question frozen into a specific game: the answer-letter shuffle is
/// fixed at creation and hint payloads accumulate in [`HelpState`].
///
/// Hint application goes through [`Game::use_help`]; the methods here only
/// know how to compute and record the payloads.
///
/// [`Game::use_help`]: crate::Game::use_help
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameQuestion {
    question: Question,
    #[serde(flatten)]
    shuffle: AnswerShuffle,
    #[serde(default)]
    help: HelpState,
}

impl GameQuestion {
    pub(crate) fn new(question: Question, shuffle: AnswerShuffle) -> Self {
        Self {
            question,
            shuffle,
            help: HelpState::default(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.question.text()
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        self.question.level()
    }

    #[must_use]
    pub fn shuffle(&self) -> AnswerShuffle {
        self.shuffle
    }

    #[must_use]
    pub fn help(&self) -> &HelpState {
        &self.help
    }

    /// Display-letter view of the shuffled answers.
    #[must_use]
    pub fn variants(&self) -> [(Letter, &str); 4] {
        Letter::ALL.map(|letter| (letter, self.question.answer(self.shuffle.slot(letter))))
    }

    /// The display letter hiding the true answer.
    #[must_use]
    pub fn correct_answer_key(&self) -> Letter {
        self.shuffle.correct_letter()
    }

    /// Text of the true answer.
    #[must_use]
    pub fn correct_answer(&self) -> &str {
        self.question.correct_answer()
    }

    #[must_use]
    pub fn answer_correct(&self, letter: Letter) -> bool {
        letter == self.correct_answer_key()
    }

    /// Letters still in play for hints: the fifty-fifty survivors once that
    /// hint exists, all four letters otherwise.
    #[must_use]
    pub fn candidate_letters(&self) -> Vec<Letter> {
        match self.help.fifty_fifty() {
            Some(survivors) => survivors.letters().to_vec(),
            None => Letter::ALL.to_vec(),
        }
    }

    pub(crate) fn apply_fifty_fifty(
        &mut self,
        rng: &mut impl Rng,
    ) -> Result<(), HelpAlreadyRecorded> {
        let correct = self.correct_answer_key();
        let eliminated: Vec<Letter> = Letter::ALL
            .into_iter()
            .filter(|&letter| letter != correct)
            .collect();
        let other = *eliminated
            .choose(rng)
            .expect("three wrong letters always remain");
        self.help.record_fifty_fifty(FiftyFifty { correct, other })
    }

    pub(crate) fn apply_audience_help(
        &mut self,
        rng: &mut impl Rng,
    ) -> Result<(), HelpAlreadyRecorded> {
        let votes =
            help_gen::audience_distribution(&self.candidate_letters(), self.correct_answer_key(), rng);
        self.help.record_audience_help(votes)
    }

    pub(crate) fn apply_friend_call(
        &mut self,
        rng: &mut impl Rng,
    ) -> Result<(), HelpAlreadyRecorded> {
        let guess =
            help_gen::friend_call(&self.candidate_letters(), self.correct_answer_key(), rng);
        self.help.record_friend_call(guess)
    }
}

#[cfg(test)]
mod tests {
    use super::GameQuestion;
    use crate::question::{Question, QuestionId};
    use millionaire_types::{AnswerShuffle, Letter};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn game_question(slots: [u8; 4]) -> GameQuestion {
        let question = Question::new(
            QuestionId::new(1),
            0,
            "capital of France?",
            [
                "Paris".to_string(),
                "Lyon".to_string(),
                "Marseille".to_string(),
                "Toulouse".to_string(),
            ],
        )
        .unwrap();
        GameQuestion::new(question, AnswerShuffle::new(slots).unwrap())
    }

    #[test]
    fn variants_resolve_the_shuffle() {
        let gq = game_question([3, 1, 4, 2]);
        let variants = gq.variants();
        assert_eq!(variants[0], (Letter::A, "Marseille"));
        assert_eq!(variants[1], (Letter::B, "Paris"));
        assert_eq!(variants[2], (Letter::C, "Toulouse"));
        assert_eq!(variants[3], (Letter::D, "Lyon"));
    }

    #[test]
    fn correct_key_and_answer_match() {
        let gq = game_question([3, 1, 4, 2]);
        assert_eq!(gq.correct_answer_key(), Letter::B);
        assert_eq!(gq.correct_answer(), "Paris");
        assert!(gq.answer_correct(Letter::B));
        assert!(!gq.answer_correct(Letter::A));
    }

    #[test]
    fn fifty_fifty_keeps_the_correct_letter_first() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut gq = game_question([2, 3, 1, 4]);
        gq.apply_fifty_fifty(&mut rng).unwrap();

        let survivors = gq.help().fifty_fifty().unwrap();
        assert_eq!(survivors.correct, Letter::C);
        assert_ne!(survivors.other, Letter::C);
        assert!(gq.apply_fifty_fifty(&mut rng).is_err());
    }

    #[test]
    fn candidates_narrow_after_fifty_fifty() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut gq = game_question([1, 2, 3, 4]);
        assert_eq!(gq.candidate_letters(), Letter::ALL.to_vec());

        gq.apply_fifty_fifty(&mut rng).unwrap();
        let candidates = gq.candidate_letters();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0], Letter::A);

        gq.apply_audience_help(&mut rng).unwrap();
        let votes = gq.help().audience_help().unwrap();
        assert_eq!(votes.keys().copied().collect::<Vec<_>>(), {
            let mut sorted = candidates.clone();
            sorted.sort();
            sorted
        });
    }

    #[test]
    fn serde_shape_flattens_the_shuffle() {
        let gq = game_question([2, 4, 1, 3]);
        let json = serde_json::to_value(&gq).unwrap();
        assert_eq!(json["a"], 2);
        assert_eq!(json["d"], 3);
        assert!(json.get("help").is_some());

        let back: GameQuestion = serde_json::from_value(json).unwrap();
        assert_eq!(back, gq);
    }
}
