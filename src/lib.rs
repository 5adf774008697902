//! A tic-tac-toe engine with a computer opponent of selectable strength
//!
//! The engine evaluates 3x3 boards, searches the full game tree with
//! alpha-beta pruning, and blends that search with randomness to offer
//! three difficulty tiers. A [`Session`] ties it together for a
//! presentation layer.
//!
//! # Basic Usage
//!
//! ```
//! use tictactoe_ai::{board::Board, solver::Solver, Mark};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // X has played the corner, O to move
//! let mut solver = Solver::new(Board::from_moves("1")?, Mark::O);
//! let (score, best_move) = solver.solve();
//!
//! assert!((score, best_move) == (0, Some(4)));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod solver;

pub mod difficulty;

pub mod session;

pub mod arena;


pub use board::{Board, Cell, Line, Mark, Outcome, WIN_LINES};
pub use difficulty::Difficulty;
pub use session::{Mode, MoveError, Scores, Session, SessionEvent, SessionState};

/// The width and height of the game board in cells
pub const SIZE: usize = 3;

/// The number of cells on the game board
pub const CELLS: usize = SIZE * SIZE;

// every row, column and both diagonals
const_assert_eq!(board::WIN_LINES.len(), 2 * SIZE + 2);

/// Evaluates a board, see [`Board::evaluate`]
pub fn evaluate_board(board: &Board) -> Outcome {
    board.evaluate()
}

/// Lists the empty cells of a board in ascending order
pub fn legal_moves(board: &Board) -> Vec<usize> {
    board.empty_indices()
}

/// Picks a move for a computer playing `O` at the given difficulty
///
/// Returns `None` if the board is full.
pub fn select_computer_move(board: &Board, difficulty: Difficulty) -> Option<usize> {
    difficulty::select_move(board, Mark::O, difficulty, &mut rand::rng())
}
