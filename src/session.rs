//! A game in progress and the running score between games
//!
//! A [`Session`] owns its board outright. The computer opponent only ever
//! sees a copy of it, and moves reach the board through
//! [`Session::apply_move`] and [`Session::play_computer_turn`], which answer
//! with a [`SessionEvent`] instead of failing.

use rand::{rngs::ThreadRng, Rng};
use tracing::{debug, info, instrument};

use std::fmt;
use std::str::FromStr;

use crate::{board::*, difficulty, Difficulty, CELLS};

/// The mark that opens every game
pub const FIRST_MARK: Mark = Mark::X;

/// The mark played by the computer in [`Mode::HumanVsComputer`]
pub const COMPUTER_MARK: Mark = Mark::O;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Mode {
    HumanVsHuman,
    HumanVsComputer,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::HumanVsHuman => write!(f, "pvp"),
            Mode::HumanVsComputer => write!(f, "bot"),
        }
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> anyhow::Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "pvp" | "human" | "p" => Ok(Mode::HumanVsHuman),
            "bot" | "computer" | "b" => Ok(Mode::HumanVsComputer),
            _ => Err(anyhow::anyhow!("unknown mode '{}', expected pvp or bot", name)),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SessionState {
    /// A human holding the given mark is to move
    AwaitingMove(Mark),
    /// The computer is to move, see [`Session::play_computer_turn`]
    ComputerThinking,
    Terminal(Outcome),
}

/// Why a move was refused
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    #[display("Invalid move, cell index {} is off the board", _0)]
    OutOfRange(usize),

    #[display("Invalid move, cell index {} is taken", _0)]
    Occupied(usize),

    #[display("The game is already over")]
    GameOver,

    /// A human move while the computer is thinking, or the reverse
    #[display("It is not your turn")]
    NotYourTurn,
}

impl std::error::Error for MoveError {}

/// The result of offering a move to a [`Session`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The move was played and the game goes on in the given state
    Accepted(SessionState),
    /// The move was refused and nothing changed
    Rejected(MoveError),
    /// The move finished the game
    GameEnded(Outcome),
}

/// Results of finished games
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct Scores {
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
}

impl Scores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a finished game; games still in progress are ignored
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Win(Mark::X, _) => self.x_wins += 1,
            Outcome::Win(Mark::O, _) => self.o_wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::InProgress => {}
        }
    }

    pub fn wins(&self, mark: Mark) -> u32 {
        match mark {
            Mark::X => self.x_wins,
            Mark::O => self.o_wins,
        }
    }

    pub fn games(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }

    /// Adds another tally to this one
    pub fn merge(mut self, other: Scores) -> Self {
        self.x_wins += other.x_wins;
        self.o_wins += other.o_wins;
        self.draws += other.draws;
        self
    }
}

/// A game between two humans or a human and the computer
pub struct Session<R = ThreadRng> {
    board: Board,
    state: SessionState,
    mode: Mode,
    difficulty: Difficulty,
    scores: Scores,
    rng: R,
}

impl Session<ThreadRng> {
    /// Creates a session with a fresh game, using the thread-local random source
    pub fn new(mode: Mode, difficulty: Difficulty) -> Self {
        Self::with_rng(mode, difficulty, rand::rng())
    }
}

impl<R: Rng> Session<R> {
    /// Creates a session with a fresh game, drawing the computer's random moves from `rng`
    pub fn with_rng(mode: Mode, difficulty: Difficulty, rng: R) -> Self {
        Self {
            board: Board::new(),
            state: SessionState::AwaitingMove(FIRST_MARK),
            mode,
            difficulty,
            scores: Scores::new(),
            rng,
        }
    }

    /// Clears the board for a new game with the given settings, keeping the scores
    #[instrument(level = "debug", skip(self))]
    pub fn start_new_game(&mut self, mode: Mode, difficulty: Difficulty) {
        self.mode = mode;
        self.difficulty = difficulty;
        self.board = Board::new();
        self.state = SessionState::AwaitingMove(FIRST_MARK);
    }

    /// Clears the board for another game with the same settings
    pub fn rematch(&mut self) {
        self.start_new_game(self.mode, self.difficulty);
    }

    pub fn reset_scores(&mut self) {
        self.scores = Scores::new();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    pub fn outcome(&self) -> Outcome {
        match self.state {
            SessionState::Terminal(outcome) => outcome,
            _ => Outcome::InProgress,
        }
    }

    /// The mark to move, or `None` once the game is over
    pub fn active_mark(&self) -> Option<Mark> {
        match self.state {
            SessionState::AwaitingMove(mark) => Some(mark),
            SessionState::ComputerThinking => Some(COMPUTER_MARK),
            SessionState::Terminal(_) => None,
        }
    }

    /// Display names for the `X` and `O` players
    pub fn labels(&self) -> (&'static str, &'static str) {
        match self.mode {
            Mode::HumanVsHuman => ("PLAYER 1", "PLAYER 2"),
            Mode::HumanVsComputer => ("PLAYER", "BOT"),
        }
    }

    pub fn is_computer(&self, mark: Mark) -> bool {
        self.mode == Mode::HumanVsComputer && mark == COMPUTER_MARK
    }

    /// Plays the human to move at `index`
    ///
    /// Moves off the board, onto a taken cell, out of turn or after the game
    /// has ended are answered with [`SessionEvent::Rejected`] and change nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn apply_move(&mut self, index: usize) -> SessionEvent {
        let mark = match self.state {
            SessionState::AwaitingMove(mark) => mark,
            SessionState::ComputerThinking => return Self::reject(MoveError::NotYourTurn),
            SessionState::Terminal(_) => return Self::reject(MoveError::GameOver),
        };
        if index >= CELLS {
            return Self::reject(MoveError::OutOfRange(index));
        }
        if !self.board.is_empty(index) {
            return Self::reject(MoveError::Occupied(index));
        }
        self.place(index, mark)
    }

    /// Asks the computer for its move without playing it
    ///
    /// The policy works on a copy of the board. Returns `None` unless the
    /// session is in [`SessionState::ComputerThinking`].
    pub fn select_computer_move(&mut self) -> Option<usize> {
        if self.state != SessionState::ComputerThinking {
            return None;
        }
        let board = self.board;
        difficulty::select_move(&board, COMPUTER_MARK, self.difficulty, &mut self.rng)
    }

    /// Selects and plays the computer's move
    ///
    /// Only valid in [`SessionState::ComputerThinking`]. Any delay shown to
    /// the player belongs to the caller.
    #[instrument(level = "debug", skip(self))]
    pub fn play_computer_turn(&mut self) -> SessionEvent {
        match self.state {
            SessionState::ComputerThinking => {}
            SessionState::AwaitingMove(_) => return Self::reject(MoveError::NotYourTurn),
            SessionState::Terminal(_) => return Self::reject(MoveError::GameOver),
        }
        match self.select_computer_move() {
            Some(index) => self.place(index, COMPUTER_MARK),
            // a thinking computer always has a free cell
            None => Self::reject(MoveError::GameOver),
        }
    }

    fn place(&mut self, index: usize, mark: Mark) -> SessionEvent {
        self.board.play(index, mark);

        let outcome = self.board.evaluate();
        if outcome.is_terminal() {
            self.state = SessionState::Terminal(outcome);
            self.scores.record(&outcome);
            info!(%outcome, "game over");
            return SessionEvent::GameEnded(outcome);
        }

        let next = mark.opponent();
        self.state = if self.is_computer(next) {
            SessionState::ComputerThinking
        } else {
            SessionState::AwaitingMove(next)
        };
        debug!(
            index,
            %mark,
            moves = self.board.num_moves(),
            state = ?self.state,
            "move accepted"
        );
        SessionEvent::Accepted(self.state)
    }

    fn reject(error: MoveError) -> SessionEvent {
        debug!(%error, "move rejected");
        SessionEvent::Rejected(error)
    }
}
