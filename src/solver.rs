//! An agent to solve tic-tac-toe positions

use crate::{board::*, CELLS};

use static_assertions::const_assert;
use tracing::trace;

/// The score of a win found immediately, before any depth penalty
pub const WIN_SCORE: i32 = 10;
/// The minimum possible score of a position
pub const MIN_SCORE: i32 = -WIN_SCORE;
/// The maximum possible score of a position
pub const MAX_SCORE: i32 = WIN_SCORE;

/// Bound of a full search window, outside any reachable score
pub const INFINITY: i32 = MAX_SCORE + 1;

// even the deepest win must still score above a draw
const_assert!(WIN_SCORE > CELLS as i32);

/// Scores a position for `maximizer`, see [`Solver::minimax`]
pub fn score(
    board: &Board,
    maximizer: Mark,
    maximizing_turn: bool,
    alpha: i32,
    beta: i32,
    depth: i32,
) -> i32 {
    Solver::new(*board, maximizer).minimax(*board, maximizing_turn, alpha, beta, depth)
}

/// Finds the optimal move for `mark`, or `None` if the board is full
pub fn best_move(board: &Board, mark: Mark) -> Option<usize> {
    Solver::new(*board, mark).best_move()
}

/// An agent to solve tic-tac-toe positions
///
/// # Notes
/// The full game tree of a 3x3 board is small, so the search always runs
/// to the end of the game without any node or time budget.
///
/// # Position Scoring
/// Positions are scored from the point of view of the maximizing mark.
/// A win scores `10 - depth` and a loss `depth - 10`, where `depth` is the
/// number of moves played below the position being searched, so faster
/// wins and slower losses are preferred. A drawn position scores 0.
#[derive(Clone)]
pub struct Solver {
    board: Board,
    maximizer: Mark,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
}

impl Solver {
    /// Creates a new `Solver` searching on behalf of `maximizer`
    pub fn new(board: Board, maximizer: Mark) -> Self {
        Self {
            board,
            maximizer,
            node_count: 0,
        }
    }

    /// Performs game tree search with alpha-beta pruning
    ///
    /// Every child is searched on its own copy of the board, so there is no
    /// placement to undo when a branch is cut off.
    ///
    /// Returns the score of the position (see [Position Scoring])
    ///
    /// [Position Scoring]: #position-scoring
    pub fn minimax(
        &mut self,
        board: Board,
        maximizing_turn: bool,
        mut alpha: i32,
        mut beta: i32,
        depth: i32,
    ) -> i32 {
        self.node_count += 1;

        match board.evaluate() {
            Outcome::Win(mark, _) if mark == self.maximizer => return WIN_SCORE - depth,
            Outcome::Win(..) => return depth - WIN_SCORE,
            Outcome::Draw => return 0,
            Outcome::InProgress => {}
        }

        if maximizing_turn {
            let mut best = -INFINITY;
            for index in board.empty_indices() {
                let child = board.with_move(index, self.maximizer);
                best = best.max(self.minimax(child, false, alpha, beta, depth + 1));
                alpha = alpha.max(best);
                // the minimizer already has a better option elsewhere
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = INFINITY;
            for index in board.empty_indices() {
                let child = board.with_move(index, self.maximizer.opponent());
                best = best.min(self.minimax(child, true, alpha, beta, depth + 1));
                beta = beta.min(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }

    /// Calculates the best move for the maximizing mark
    pub fn best_move(&mut self) -> Option<usize> {
        self.solve().1
    }

    /// Calculates the score and best move of the current position
    ///
    /// Moves are tried in ascending order and only a strictly better score
    /// replaces the current choice, so ties go to the lowest index.
    pub fn solve(&mut self) -> (i32, Option<usize>) {
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for index in self.board.empty_indices() {
            let child = self.board.with_move(index, self.maximizer);
            // the opponent replies to the trial move
            let score = self.minimax(child, false, -INFINITY, INFINITY, 0);
            if score > best_score {
                best_score = score;
                best_move = Some(index);
            }
        }

        // full board, the position speaks for itself
        if best_move.is_none() {
            best_score = self.minimax(self.board, true, -INFINITY, INFINITY, 0);
        }

        trace!(
            maximizer = %self.maximizer,
            nodes = self.node_count,
            score = best_score,
            best_move = ?best_move,
            "search finished"
        );
        (best_score, best_move)
    }

    /// Converts a position score to the number of moves until the game is decided
    ///
    /// Counts the moves of both players, including the one being chosen.
    /// Returns `None` for a drawn score.
    pub fn score_to_win_distance(score: i32) -> Option<usize> {
        if score == 0 {
            None
        } else {
            Some((WIN_SCORE - score.abs()) as usize + 1)
        }
    }
}
