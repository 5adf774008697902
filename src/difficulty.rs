//! Computer opponents of graded strength
//!
//! Each tier mixes uniformly random moves with deliberate ones. `Hard`
//! never plays randomly and defers to the full game tree search, so it
//! cannot lose.

use anyhow::{anyhow, Result};
use rand::Rng;
use tracing::{debug, instrument};

use std::fmt;
use std::str::FromStr;

use crate::{board::*, solver};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// The probability of playing a uniformly random move
    pub fn random_chance(self) -> f64 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Medium => 0.5,
            Difficulty::Hard => 0.0,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "easy" | "e" => Ok(Difficulty::Easy),
            "medium" | "m" => Ok(Difficulty::Medium),
            "hard" | "h" => Ok(Difficulty::Hard),
            _ => Err(anyhow!(
                "unknown difficulty '{}', expected easy, medium or hard",
                name
            )),
        }
    }
}

/// Finds the first empty cell, in ascending order, where `mark` completes a line
pub fn winning_move(board: &Board, mark: Mark) -> Option<usize> {
    board
        .empty_indices()
        .into_iter()
        .find(|&index| board.with_move(index, mark).evaluate().winner() == Some(mark))
}

fn random_move<R: Rng>(empty: &[usize], rng: &mut R) -> usize {
    empty[rng.random_range(0..empty.len())]
}

/// Chooses a move for `mark` at the given difficulty
///
/// * `Easy` plays randomly 80% of the time, otherwise like `Medium`'s
///   considered move.
/// * `Medium` plays randomly 50% of the time, otherwise it completes its own
///   line, blocks the opponent's, or falls back to a random move.
/// * `Hard` plays the best move found by [`solver::best_move`].
///
/// Returns `None` if the board is full. The board must not already be won.
#[instrument(level = "debug", skip(board, rng))]
pub fn select_move<R: Rng>(
    board: &Board,
    mark: Mark,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<usize> {
    debug_assert!(
        board.evaluate().winner().is_none(),
        "asked for a move on a finished game"
    );

    let empty = board.empty_indices();
    if empty.is_empty() {
        return None;
    }

    let choice = match difficulty {
        Difficulty::Hard => solver::best_move(board, mark),
        Difficulty::Easy | Difficulty::Medium => {
            if rng.random::<f64>() < difficulty.random_chance() {
                Some(random_move(&empty, rng))
            } else {
                // win if possible, else block
                let considered = winning_move(board, mark)
                    .or_else(|| winning_move(board, mark.opponent()));
                Some(considered.unwrap_or_else(|| random_move(&empty, rng)))
            }
        }
    };

    debug!(choice = ?choice, "computer move selected");
    choice
}
