use anyhow::{anyhow, Result};
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::fmt;
use std::io::{stdout, Write};
use std::str::FromStr;

use crate::{CELLS, SIZE};

/// One of the two players' marks
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Mark {
    /// Always moves first
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            _ => false,
        }
    }

    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Mark::X),
            Cell::O => Some(Mark::O),
        }
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

/// Three cell indices that win the game when they hold the same mark
pub type Line = [usize; SIZE];

/// Every winning line: rows, then columns, then diagonals
///
/// [`Board::evaluate`] reports the first uniform line in this order.
pub const WIN_LINES: [Line; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// The state of play on a board
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Outcome {
    InProgress,
    /// A mark completed the given line
    Win(Mark, Line),
    /// The board is full and no line was completed
    Draw,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        match self {
            Outcome::InProgress => false,
            _ => true,
        }
    }

    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Win(mark, _) => Some(*mark),
            _ => None,
        }
    }

    pub fn line(&self) -> Option<Line> {
        match self {
            Outcome::Win(_, line) => Some(*line),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "in progress"),
            Outcome::Win(mark, line) => write!(
                f,
                "{} wins on {}-{}-{}",
                mark,
                line[0] + 1,
                line[1] + 1,
                line[2] + 1
            ),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// A 3x3 board, cells stored in row-major order
///
/// `Board` is a plain `Copy` value: searching code branches by copying
/// instead of mutating a shared buffer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    cells: [Cell; CELLS],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELLS],
        }
    }

    /// Replays a sequence of 1-indexed moves, alternating from `X`
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();

        for cell_char in moves.as_ref().chars() {
            match cell_char.to_digit(10).map(|c| c as usize) {
                Some(cell @ 1..=CELLS) => {
                    let index = cell - 1;
                    if !board.is_empty(index) {
                        return Err(anyhow!("Invalid move, cell {} taken", cell));
                    }
                    // abort if the position is won at any point
                    if board.evaluate().is_terminal() {
                        return Err(anyhow!("Invalid position, game is over"));
                    }
                    let mark = board.to_move();
                    board.play(index, mark);
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", cell_char)),
            }
        }
        Ok(board)
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Whether `index` names an empty cell; false for indices off the board
    pub fn is_empty(&self, index: usize) -> bool {
        match self.get(index) {
            Some(cell) => cell.is_empty(),
            None => false,
        }
    }

    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    pub fn num_moves(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// The mark to play next, assuming the marks alternated from `X`
    pub fn to_move(&self) -> Mark {
        let xs = self.cells.iter().filter(|&&cell| cell == Cell::X).count();
        let os = self.cells.iter().filter(|&&cell| cell == Cell::O).count();
        if xs > os {
            Mark::O
        } else {
            Mark::X
        }
    }

    /// Places a mark without checking that the cell is free
    pub fn play(&mut self, index: usize, mark: Mark) {
        self.cells[index] = mark.into();
    }

    /// Returns a copy of the board with a mark placed
    pub fn with_move(mut self, index: usize, mark: Mark) -> Self {
        self.play(index, mark);
        self
    }

    /// Returns the board with every `X` and `O` exchanged
    pub fn swapped(&self) -> Self {
        let mut board = *self;
        for cell in board.cells.iter_mut() {
            *cell = match cell {
                Cell::X => Cell::O,
                Cell::O => Cell::X,
                Cell::Empty => Cell::Empty,
            };
        }
        board
    }

    /// Indices of the empty cells in ascending order
    pub fn empty_indices(&self) -> Vec<usize> {
        (0..CELLS).filter(|&index| self.cells[index].is_empty()).collect()
    }

    pub fn evaluate(&self) -> Outcome {
        for &line in WIN_LINES.iter() {
            let [a, b, c] = line;
            if let Some(mark) = self.cells[a].mark() {
                if self.cells[a] == self.cells[b] && self.cells[a] == self.cells[c] {
                    return Outcome::Win(mark, line);
                }
            }
        }
        if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }

    /// Draws the board to the terminal, emphasising the cells of `highlight`
    pub fn display(&self, highlight: Option<Line>) -> Result<()> {
        let mut stdout = stdout();

        for row in 0..SIZE {
            stdout.queue(PrintStyledContent(style(String::from(" "))))?;
            for column in 0..SIZE {
                let index = row * SIZE + column;
                let (text, color) = match self.cells[index] {
                    Cell::X => (String::from("X"), Color::Red),
                    Cell::O => (String::from("O"), Color::Yellow),
                    Cell::Empty => ((index + 1).to_string(), Color::DarkGrey),
                };
                let mut content = style(text).with(color);
                if highlight.map_or(false, |line| line.contains(&index)) {
                    content = content.attribute(Attribute::Bold).on(Color::DarkGreen);
                }
                stdout.queue(PrintStyledContent(content))?;
                if column < SIZE - 1 {
                    stdout.queue(PrintStyledContent(style(String::from(" | "))))?;
                }
            }
            stdout.queue(PrintStyledContent(style(String::from("\n"))))?;
            if row < SIZE - 1 {
                stdout.queue(PrintStyledContent(style(String::from("---+---+---\n"))))?;
            }
        }
        stdout.flush()?;
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;

    /// Parses nine cells: `X`, `O`, or one of `_.-` for empty; whitespace is skipped
    fn from_str(cells: &str) -> Result<Self> {
        let mut board = Self::new();
        let mut index = 0;

        for cell_char in cells.chars().filter(|c| !c.is_whitespace()) {
            if index == CELLS {
                return Err(anyhow!("too many cells in '{}'", cells));
            }
            board.cells[index] = match cell_char.to_ascii_uppercase() {
                'X' => Cell::X,
                'O' => Cell::O,
                '_' | '.' | '-' => Cell::Empty,
                _ => return Err(anyhow!("could not parse '{}' as a cell", cell_char)),
            };
            index += 1;
        }
        if index != CELLS {
            return Err(anyhow!("expected {} cells, found {}", CELLS, index));
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            let cells: Vec<String> = (0..SIZE)
                .map(|column| {
                    let index = row * SIZE + column;
                    match self.cells[index] {
                        Cell::X => String::from("X"),
                        Cell::O => String::from("O"),
                        Cell::Empty => (index + 1).to_string(),
                    }
                })
                .collect();
            write!(f, " {} ", cells.join(" | "))?;
            if row < SIZE - 1 {
                write!(f, "\n---+---+---\n")?;
            }
        }
        Ok(())
    }
}
