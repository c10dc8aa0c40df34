//! Interactive session loop over stdin/stdout.

use anyhow::Result;
use chrono::Utc;
use millionaire_engine::{AnswerOutcome, Game, GameRules, InMemoryBank, PlayerId};
use millionaire_types::{HelpKind, HelpState, Letter};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Answer(Letter),
    Help(HelpKind),
    TakeMoney,
    Quit,
}

impl Command {
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "take" | "money" => Some(Command::TakeMoney),
            "quit" | "q" | "exit" => Some(Command::Quit),
            "50" | "50/50" | "fifty" => Some(Command::Help(HelpKind::FiftyFifty)),
            "audience" | "aud" => Some(Command::Help(HelpKind::AudienceHelp)),
            "call" | "friend" => Some(Command::Help(HelpKind::FriendCall)),
            other => Letter::from_str(other).ok().map(Command::Answer),
        }
    }
}

pub fn run(bank: &InMemoryBank, rules: GameRules) -> Result<()> {
    let mut rng = rand::rng();
    let mut game = Game::create(PlayerId::new("player"), bank, rules, &mut rng, Utc::now())?;

    let stdin = io::stdin();
    let mut out = io::stdout();

    writeln!(
        out,
        "Answer with a/b/c/d. Hints: 50, audience, call. Cash out with take; quit to give up."
    )?;
    show_question(&game, &mut out)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let Some(command) = Command::parse(&line) else {
            writeln!(out, "Unrecognized input {:?} - try a, b, c, d, 50, audience, call, take.", line.trim())?;
            continue;
        };

        match command {
            Command::Quit => {
                writeln!(out, "Walking away without cashing out. Goodbye!")?;
                return Ok(());
            }
            Command::TakeMoney => {
                let prize = game.take_money(Utc::now())?;
                writeln!(out, "You take the money: {prize}")?;
                break;
            }
            Command::Help(kind) => match game.use_help(kind, &mut rng) {
                Ok(help) => show_help(help, &mut out)?,
                Err(err) => writeln!(out, "{err}")?,
            },
            Command::Answer(letter) => match game.answer_current_question(letter, Utc::now())? {
                AnswerOutcome::Advanced { level } => {
                    writeln!(out, "Correct! Prize so far: {}. On to level {level}.", game.prize())?;
                    show_question(&game, &mut out)?;
                }
                AnswerOutcome::Won { prize } => {
                    writeln!(out, "Correct - that was the last one. You won {prize}!")?;
                    break;
                }
                AnswerOutcome::Wrong { prize } => {
                    let correct = game.questions()[usize::from(game.current_level())]
                        .correct_answer_key();
                    writeln!(out, "Wrong - the answer was {correct}. You keep {prize}.")?;
                    break;
                }
                AnswerOutcome::TimedOut { prize } => {
                    writeln!(out, "Time is up. You keep {prize}.")?;
                    break;
                }
            },
        }
    }

    writeln!(out, "Final status: {}, prize: {}", game.status(), game.prize())?;
    Ok(())
}

fn show_question(game: &Game, out: &mut impl Write) -> Result<()> {
    let question = game.current_question()?;
    let level = game.current_level();
    let ladder = game.rules().ladder();
    let playing_for = ladder
        .prize_for_won(level)
        .expect("current level is inside the ladder");

    writeln!(out)?;
    writeln!(out, "Level {} of {} - playing for {playing_for}", level + 1, ladder.len())?;
    writeln!(out, "{}", question.text())?;
    let eliminated = question.help().fifty_fifty();
    for (letter, text) in question.variants() {
        let gone = eliminated.is_some_and(|ff| !ff.contains(letter));
        if gone {
            writeln!(out, "  {letter}) -")?;
        } else {
            writeln!(out, "  {letter}) {text}")?;
        }
    }
    Ok(())
}

fn show_help(help: &HelpState, out: &mut impl Write) -> Result<()> {
    if let Some(survivors) = help.fifty_fifty() {
        writeln!(out, "Fifty-fifty leaves: {} and {}", survivors.correct, survivors.other)?;
    }
    if let Some(votes) = help.audience_help() {
        write!(out, "The audience votes:")?;
        for (letter, share) in votes {
            write!(out, " {letter}: {share}%")?;
        }
        writeln!(out)?;
    }
    if let Some(guess) = help.friend_call() {
        writeln!(out, "Your friend says: {guess}")?;
    }
    Ok(())
}
