//! The game aggregate: prize ladder progression, lazy timeout, cash-out,
//! and the once-per-game hint flags.

use crate::game_question::GameQuestion;
use crate::question::{QuestionBank, QuestionId};
use chrono::{DateTime, TimeDelta, Utc};
use millionaire_types::{
    AnswerShuffle, FinishReason, GameStatus, HelpAlreadyRecorded, HelpKind, HelpState, Letter,
    PrizeLadder,
};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Opaque owner reference. The core never reads identity details or any
/// balance; the surrounding layer credits the final prize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session policy: the ladder plus the whole-session time budget. The budget
/// is checked lazily, only when an answer arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    ladder: PrizeLadder,
    time_limit_secs: u32,
}

impl GameRules {
    /// 35 minutes, matching the classic session budget.
    pub const DEFAULT_TIME_LIMIT_SECS: u32 = 35 * 60;

    #[must_use]
    pub fn new(ladder: PrizeLadder, time_limit_secs: u32) -> Self {
        Self {
            ladder,
            time_limit_secs,
        }
    }

    #[must_use]
    pub fn ladder(&self) -> &PrizeLadder {
        &self.ladder
    }

    #[must_use]
    pub fn time_limit(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.time_limit_secs))
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self::new(PrizeLadder::classic(), Self::DEFAULT_TIME_LIMIT_SECS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameCreationError {
    #[error("the question bank has no unused question for level {level}")]
    NoQuestionsAvailable { level: u8 },
}

/// Mutating or reading a game that has already reached a terminal state.
///
/// Policy, applied uniformly: a finished game rejects every further
/// operation with this error and changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("the game is already finished")]
    AlreadyFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UseHelpError {
    #[error("the game is already finished")]
    AlreadyFinished,
    #[error("{0} has already been used in this game")]
    AlreadyUsed(HelpKind),
}

/// Result of evaluating one submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Correct; play continues at `level`.
    Advanced { level: u8 },
    /// Correct on the last level; the game is won.
    Won { prize: u64 },
    /// Wrong; the game ends with the fire-proof amount.
    Wrong { prize: u64 },
    /// The time budget had elapsed; the letter was not evaluated.
    TimedOut { prize: u64 },
}

impl AnswerOutcome {
    #[must_use]
    pub const fn is_correct(self) -> bool {
        matches!(self, AnswerOutcome::Advanced { .. } | AnswerOutcome::Won { .. })
    }
}

/// A persisted game document that violates the aggregate's invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameLoadError {
    #[error("expected one question per ladder level ({expected}), found {found}")]
    QuestionCount { expected: usize, found: usize },
    #[error("current level {level} is outside the ladder")]
    LevelOutOfRange { level: u8 },
}

/// One quiz session: an ordered run of [`GameQuestion`]s, one per ladder
/// level, created at game start and fixed afterwards.
///
/// `status` is derived, never stored: the terminal tag ([`FinishReason`])
/// and `finished_at` are set together, exactly once, by the single
/// finishing transition.
///
/// Deserialization re-validates through a wire struct: the question run
/// must match the ladder and `current_level` must be inside it (or one past
/// the end, the cleared-everything position).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameWire", into = "GameWire")]
pub struct Game {
    owner: PlayerId,
    rules: GameRules,
    questions: Vec<GameQuestion>,
    current_level: u8,
    prize: u64,
    fifty_fifty_used: bool,
    audience_help_used: bool,
    friend_call_used: bool,
    created_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    finish_reason: Option<FinishReason>,
}

#[derive(Serialize, Deserialize)]
struct GameWire {
    owner: PlayerId,
    rules: GameRules,
    questions: Vec<GameQuestion>,
    current_level: u8,
    prize: u64,
    fifty_fifty_used: bool,
    audience_help_used: bool,
    friend_call_used: bool,
    created_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    finish_reason: Option<FinishReason>,
}

impl TryFrom<GameWire> for Game {
    type Error = GameLoadError;

    fn try_from(wire: GameWire) -> Result<Self, Self::Error> {
        let expected = wire.rules.ladder().len();
        if wire.questions.len() != expected {
            return Err(GameLoadError::QuestionCount {
                expected,
                found: wire.questions.len(),
            });
        }
        if usize::from(wire.current_level) > expected {
            return Err(GameLoadError::LevelOutOfRange {
                level: wire.current_level,
            });
        }
        Ok(Self {
            owner: wire.owner,
            rules: wire.rules,
            questions: wire.questions,
            current_level: wire.current_level,
            prize: wire.prize,
            fifty_fifty_used: wire.fifty_fifty_used,
            audience_help_used: wire.audience_help_used,
            friend_call_used: wire.friend_call_used,
            created_at: wire.created_at,
            finished_at: wire.finished_at,
            finish_reason: wire.finish_reason,
        })
    }
}

impl From<Game> for GameWire {
    fn from(game: Game) -> Self {
        Self {
            owner: game.owner,
            rules: game.rules,
            questions: game.questions,
            current_level: game.current_level,
            prize: game.prize,
            fifty_fifty_used: game.fifty_fifty_used,
            audience_help_used: game.audience_help_used,
            friend_call_used: game.friend_call_used,
            created_at: game.created_at,
            finished_at: game.finished_at,
            finish_reason: game.finish_reason,
        }
    }
}

impl Game {
    /// Draw one question per ladder level (without replacement within the
    /// game) and freeze a fresh random shuffle for each.
    ///
    /// Fails with [`GameCreationError::NoQuestionsAvailable`] when the bank
    /// cannot fill a level; no partial game is produced.
    pub fn create<B, R>(
        owner: PlayerId,
        bank: &B,
        rules: GameRules,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Self, GameCreationError>
    where
        B: QuestionBank + ?Sized,
        R: Rng,
    {
        let levels = rules.ladder().len();
        let mut drawn: HashSet<QuestionId> = HashSet::with_capacity(levels);
        let mut questions = Vec::with_capacity(levels);
        for level in 0..levels as u8 {
            let question = bank
                .sample_for_level(level, &drawn, rng)
                .ok_or(GameCreationError::NoQuestionsAvailable { level })?;
            drawn.insert(question.id());

            let mut slots = [1u8, 2, 3, 4];
            slots.shuffle(rng);
            let shuffle =
                AnswerShuffle::new(slots).expect("shuffling preserves the slot permutation");
            questions.push(GameQuestion::new(question, shuffle));
        }

        tracing::info!(owner = %owner, levels, "game created");
        Ok(Self {
            owner,
            rules,
            questions,
            current_level: 0,
            prize: 0,
            fifty_fifty_used: false,
            audience_help_used: false,
            friend_call_used: false,
            created_at: now,
            finished_at: None,
            finish_reason: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────

    /// Derived status, in the fixed priority order: terminal tag first,
    /// then the cleared-everything check, else in progress.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        match self.finish_reason {
            Some(reason) => reason.into(),
            None if usize::from(self.current_level) >= self.rules.ladder().len() => {
                GameStatus::Won
            }
            None => GameStatus::InProgress,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status().is_finished()
    }

    #[must_use]
    pub fn owner(&self) -> &PlayerId {
        &self.owner
    }

    #[must_use]
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    #[must_use]
    pub fn questions(&self) -> &[GameQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn current_level(&self) -> u8 {
        self.current_level
    }

    /// Accumulated prize: monotone while playing, frozen once finished.
    #[must_use]
    pub fn prize(&self) -> u64 {
        self.prize
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finish_reason
    }

    #[must_use]
    pub fn help_used(&self, kind: HelpKind) -> bool {
        match kind {
            HelpKind::FiftyFifty => self.fifty_fifty_used,
            HelpKind::AudienceHelp => self.audience_help_used,
            HelpKind::FriendCall => self.friend_call_used,
        }
    }

    /// The question at the current level.
    pub fn current_question(&self) -> Result<&GameQuestion, GameError> {
        if self.is_finished() {
            return Err(GameError::AlreadyFinished);
        }
        Ok(&self.questions[usize::from(self.current_level)])
    }

    // ── Transitions ──────────────────────────────────────────

    /// Evaluate `letter` against the current question.
    ///
    /// The lazy timeout check runs first: past the budget the game times out
    /// on the fire-proof amount and the letter is never evaluated, even if
    /// it was correct.
    pub fn answer_current_question(
        &mut self,
        letter: Letter,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, GameError> {
        if self.is_finished() {
            return Err(GameError::AlreadyFinished);
        }

        if now - self.created_at > self.rules.time_limit() {
            let prize = self.rules.ladder().fireproof_prize(self.cleared_level());
            self.finish(FinishReason::TimedOut, prize, now);
            return Ok(AnswerOutcome::TimedOut { prize });
        }

        let correct = self.questions[usize::from(self.current_level)].answer_correct(letter);
        if correct {
            self.current_level += 1;
            if usize::from(self.current_level) >= self.rules.ladder().len() {
                let prize = self.rules.ladder().top_prize();
                self.finish(FinishReason::Cleared, prize, now);
                return Ok(AnswerOutcome::Won { prize });
            }
            self.prize = self
                .rules
                .ladder()
                .prize_for_won(self.current_level - 1)
                .expect("cleared level is inside the ladder");
            tracing::debug!(owner = %self.owner, level = self.current_level, prize = self.prize, "answer correct");
            Ok(AnswerOutcome::Advanced {
                level: self.current_level,
            })
        } else {
            let prize = self.rules.ladder().fireproof_prize(self.cleared_level());
            self.finish(FinishReason::WrongAnswer, prize, now);
            Ok(AnswerOutcome::Wrong { prize })
        }
    }

    /// Cash out: lock in the reward for the highest level already cleared
    /// (0 when none). The only way to keep a non-fire-proof amount.
    pub fn take_money(&mut self, now: DateTime<Utc>) -> Result<u64, GameError> {
        if self.is_finished() {
            return Err(GameError::AlreadyFinished);
        }
        let prize = match self.cleared_level() {
            Some(level) => self
                .rules
                .ladder()
                .prize_for_won(level)
                .expect("cleared level is inside the ladder"),
            None => 0,
        };
        self.finish(FinishReason::TookMoney, prize, now);
        Ok(prize)
    }

    /// Apply a hint to the current question. Each kind is usable once per
    /// game; level, status, and prize are unaffected.
    pub fn use_help(
        &mut self,
        kind: HelpKind,
        rng: &mut impl Rng,
    ) -> Result<&HelpState, UseHelpError> {
        if self.is_finished() {
            return Err(UseHelpError::AlreadyFinished);
        }
        if self.help_used(kind) {
            return Err(UseHelpError::AlreadyUsed(kind));
        }

        let level = usize::from(self.current_level);
        let question = &mut self.questions[level];
        let applied = match kind {
            HelpKind::FiftyFifty => question.apply_fifty_fifty(rng),
            HelpKind::AudienceHelp => question.apply_audience_help(rng),
            HelpKind::FriendCall => question.apply_friend_call(rng),
        };
        applied.map_err(|HelpAlreadyRecorded(recorded)| UseHelpError::AlreadyUsed(recorded))?;

        match kind {
            HelpKind::FiftyFifty => self.fifty_fifty_used = true,
            HelpKind::AudienceHelp => self.audience_help_used = true,
            HelpKind::FriendCall => self.friend_call_used = true,
        }
        tracing::debug!(owner = %self.owner, help = %kind, level = self.current_level, "help used");
        Ok(self.questions[level].help())
    }

    // ── Internals ────────────────────────────────────────────

    /// Highest level already cleared, if any.
    fn cleared_level(&self) -> Option<u8> {
        self.current_level.checked_sub(1)
    }

    /// The single terminal transition point.
    fn finish(&mut self, reason: FinishReason, prize: u64, now: DateTime<Utc>) {
        self.prize = prize;
        self.finished_at = Some(now);
        self.finish_reason = Some(reason);
        tracing::info!(owner = %self.owner, status = %self.status(), prize, "game finished");
    }
}

#[cfg(test)]
mod tests {
    use super::{AnswerOutcome, Game, GameCreationError, GameError, GameRules, PlayerId};
    use crate::question::{InMemoryBank, Question, QuestionId};
    use chrono::{TimeDelta, Utc};
    use millionaire_types::{GameStatus, HelpKind, Letter, PrizeLadder};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bank_for(ladder: &PrizeLadder) -> InMemoryBank {
        let mut bank = InMemoryBank::default();
        for level in 0..ladder.len() as u8 {
            bank.push(
                Question::new(
                    QuestionId::new(u64::from(level)),
                    level,
                    format!("question for level {level}"),
                    [
                        "correct".to_string(),
                        "wrong 1".to_string(),
                        "wrong 2".to_string(),
                        "wrong 3".to_string(),
                    ],
                )
                .unwrap(),
            );
        }
        bank
    }

    fn new_game(seed: u64) -> Game {
        let rules = GameRules::default();
        let bank = bank_for(rules.ladder());
        let mut rng = StdRng::seed_from_u64(seed);
        Game::create(PlayerId::new("alice"), &bank, rules, &mut rng, Utc::now()).unwrap()
    }

    fn correct_letter(game: &Game) -> Letter {
        game.current_question().unwrap().correct_answer_key()
    }

    fn wrong_letter(game: &Game) -> Letter {
        let correct = correct_letter(game);
        Letter::ALL
            .into_iter()
            .find(|&letter| letter != correct)
            .unwrap()
    }

    #[test]
    fn fresh_game_shape() {
        let game = new_game(1);
        assert_eq!(game.current_level(), 0);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.prize(), 0);
        assert_eq!(game.questions().len(), game.rules().ladder().len());
        assert!(game.finished_at().is_none());
        for (level, question) in game.questions().iter().enumerate() {
            assert_eq!(usize::from(question.level()), level);
            let mut slots = question.shuffle().as_slots();
            slots.sort_unstable();
            assert_eq!(slots, [1, 2, 3, 4]);
        }
    }

    #[test]
    fn creation_fails_without_a_question_for_some_level() {
        let rules = GameRules::default();
        // A bank that lacks level 7 entirely.
        let bank = InMemoryBank::new(
            (0..rules.ladder().len() as u8)
                .filter(|&level| level != 7)
                .map(|level| {
                    Question::new(
                        QuestionId::new(u64::from(level)),
                        level,
                        "q",
                        [
                            "a1".to_string(),
                            "a2".to_string(),
                            "a3".to_string(),
                            "a4".to_string(),
                        ],
                    )
                    .unwrap()
                })
                .collect(),
        );
        let mut rng = StdRng::seed_from_u64(2);
        let err = Game::create(PlayerId::new("bob"), &bank, rules, &mut rng, Utc::now())
            .unwrap_err();
        assert_eq!(err, GameCreationError::NoQuestionsAvailable { level: 7 });
    }

    #[test]
    fn correct_answers_climb_the_ladder() {
        let mut game = new_game(3);
        let now = Utc::now();

        let outcome = game.answer_current_question(correct_letter(&game), now).unwrap();
        assert_eq!(outcome, AnswerOutcome::Advanced { level: 1 });
        assert_eq!(game.prize(), 100);

        let outcome = game.answer_current_question(correct_letter(&game), now).unwrap();
        assert_eq!(outcome, AnswerOutcome::Advanced { level: 2 });
        assert_eq!(game.prize(), 200);
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn clearing_every_level_wins_the_top_prize() {
        let mut game = new_game(4);
        let now = Utc::now();
        for _ in 0..game.rules().ladder().len() - 1 {
            assert!(
                game.answer_current_question(correct_letter(&game), now)
                    .unwrap()
                    .is_correct()
            );
        }
        let outcome = game.answer_current_question(correct_letter(&game), now).unwrap();
        assert_eq!(outcome, AnswerOutcome::Won { prize: 1_000_000 });
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.prize(), 1_000_000);
        assert!(game.finished_at().is_some());
    }

    #[test]
    fn wrong_answer_falls_back_to_the_fireproof_amount() {
        let mut game = new_game(5);
        let now = Utc::now();
        // Clear levels 0..=5, then miss on level 6: fire-proof level 4 pays 1000.
        for _ in 0..6 {
            game.answer_current_question(correct_letter(&game), now).unwrap();
        }
        let outcome = game.answer_current_question(wrong_letter(&game), now).unwrap();
        assert_eq!(outcome, AnswerOutcome::Wrong { prize: 1_000 });
        assert_eq!(game.status(), GameStatus::Fail);
        assert_eq!(game.prize(), 1_000);
    }

    #[test]
    fn wrong_answer_before_any_fireproof_level_pays_nothing() {
        let mut game = new_game(6);
        let outcome = game
            .answer_current_question(wrong_letter(&game), Utc::now())
            .unwrap();
        assert_eq!(outcome, AnswerOutcome::Wrong { prize: 0 });
        assert_eq!(game.status(), GameStatus::Fail);
    }

    #[test]
    fn late_answer_times_out_even_when_correct() {
        let mut game = new_game(7);
        let now = Utc::now();
        game.answer_current_question(correct_letter(&game), now).unwrap();

        let late = now + game.rules().time_limit() + TimeDelta::seconds(1);
        let outcome = game.answer_current_question(correct_letter(&game), late).unwrap();
        // Level 0 cleared only, no fire-proof level reached.
        assert_eq!(outcome, AnswerOutcome::TimedOut { prize: 0 });
        assert_eq!(game.status(), GameStatus::Timeout);
        assert_eq!(game.finished_at(), Some(late));
    }

    #[test]
    fn answer_exactly_at_the_limit_still_counts() {
        let mut game = new_game(8);
        let at_limit = game.created_at() + game.rules().time_limit();
        let outcome = game
            .answer_current_question(correct_letter(&game), at_limit)
            .unwrap();
        assert!(outcome.is_correct());
    }

    #[test]
    fn take_money_locks_in_the_cleared_reward() {
        let mut game = new_game(9);
        let now = Utc::now();
        assert_eq!(game.take_money(now).unwrap(), 0);
        assert_eq!(game.status(), GameStatus::Money);

        let mut game = new_game(10);
        game.answer_current_question(correct_letter(&game), now).unwrap();
        game.answer_current_question(correct_letter(&game), now).unwrap();
        assert_eq!(game.take_money(now).unwrap(), 200);
        assert_eq!(game.status(), GameStatus::Money);
        assert_eq!(game.prize(), 200);
    }

    #[test]
    fn finished_game_rejects_every_mutation_unchanged() {
        let mut game = new_game(11);
        let now = Utc::now();
        game.take_money(now).unwrap();

        let snapshot = game.clone();
        let mut rng = StdRng::seed_from_u64(12);

        assert_eq!(
            game.answer_current_question(Letter::A, now),
            Err(GameError::AlreadyFinished)
        );
        assert_eq!(game.take_money(now), Err(GameError::AlreadyFinished));
        assert!(game.use_help(HelpKind::FiftyFifty, &mut rng).is_err());
        assert!(game.current_question().is_err());
        assert_eq!(game, snapshot);
    }

    #[test]
    fn each_help_kind_is_single_use() {
        let mut game = new_game(13);
        let mut rng = StdRng::seed_from_u64(14);

        for kind in HelpKind::ALL {
            assert!(!game.help_used(kind));
            game.use_help(kind, &mut rng).unwrap();
            assert!(game.help_used(kind));
            let err = game.use_help(kind, &mut rng).unwrap_err();
            assert_eq!(err, super::UseHelpError::AlreadyUsed(kind));
        }
        // Hints never move the game forward.
        assert_eq!(game.current_level(), 0);
        assert_eq!(game.prize(), 0);
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn fifty_fifty_narrows_a_later_audience_poll() {
        let mut game = new_game(15);
        let mut rng = StdRng::seed_from_u64(16);

        let help = game.use_help(HelpKind::FiftyFifty, &mut rng).unwrap();
        let survivors = help.fifty_fifty().unwrap();
        assert_eq!(survivors.correct, correct_letter(&game));

        let help = game.use_help(HelpKind::AudienceHelp, &mut rng).unwrap();
        let votes = help.audience_help().unwrap();
        let mut expected = survivors.letters().to_vec();
        expected.sort();
        assert_eq!(votes.keys().copied().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn corrupt_documents_are_rejected_on_load() {
        let game = new_game(19);

        let mut json = serde_json::to_value(&game).unwrap();
        json["questions"] = serde_json::Value::Array(vec![]);
        let err = serde_json::from_value::<Game>(json).unwrap_err();
        assert!(err.to_string().contains("one question per ladder level"));

        let mut json = serde_json::to_value(&game).unwrap();
        json["current_level"] = 200.into();
        let err = serde_json::from_value::<Game>(json).unwrap_err();
        assert!(err.to_string().contains("outside the ladder"));
    }

    #[test]
    fn cleared_game_sits_one_past_the_ladder_and_still_loads() {
        let mut game = new_game(20);
        let now = Utc::now();
        for _ in 0..game.rules().ladder().len() {
            game.answer_current_question(correct_letter(&game), now).unwrap();
        }
        assert_eq!(game.status(), GameStatus::Won);

        let json = serde_json::to_value(&game).unwrap();
        let back: Game = serde_json::from_value(json).unwrap();
        assert_eq!(back, game);
    }

    #[test]
    fn helps_spent_on_a_cleared_question_stay_spent() {
        let mut game = new_game(17);
        let mut rng = StdRng::seed_from_u64(18);
        let now = Utc::now();

        game.use_help(HelpKind::FiftyFifty, &mut rng).unwrap();
        game.answer_current_question(correct_letter(&game), now).unwrap();

        let err = game.use_help(HelpKind::FiftyFifty, &mut rng).unwrap_err();
        assert_eq!(err, super::UseHelpError::AlreadyUsed(HelpKind::FiftyFifty));
        // The new question has no fifty-fifty, so the poll covers all four.
        let help = game.use_help(HelpKind::AudienceHelp, &mut rng).unwrap();
        assert_eq!(help.audience_help().unwrap().len(), 4);
    }
}
