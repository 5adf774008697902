//! Matches between computer players, for measuring the difficulty tiers

use indicatif::*;
use rand::Rng;
use rayon::prelude::*;
use tracing::info;

use crate::{board::*, difficulty, session::Scores, Difficulty};

/// Plays one game between two computer players, `x` moving first
pub fn play_game<R: Rng>(x: Difficulty, o: Difficulty, rng: &mut R) -> Outcome {
    let mut board = Board::new();
    let mut mark = Mark::X;

    loop {
        let outcome = board.evaluate();
        if outcome.is_terminal() {
            return outcome;
        }

        let tier = match mark {
            Mark::X => x,
            Mark::O => o,
        };
        match difficulty::select_move(&board, mark, tier, rng) {
            Some(index) => board.play(index, mark),
            None => return outcome,
        }
        mark = mark.opponent();
    }
}

/// A series of games between two difficulty tiers
///
/// Games are independent, each on its own board with its own random
/// source, so they are spread across the rayon thread pool.
pub struct Arena {
    x: Difficulty,
    o: Difficulty,
    show_progress: bool,
}

impl Arena {
    pub fn new(x: Difficulty, o: Difficulty) -> Self {
        Self {
            x,
            o,
            show_progress: false,
        }
    }

    /// Draws a progress bar on the terminal while games are played
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Plays `games` games and tallies the results
    pub fn run(&self, games: usize) -> Scores {
        let progress = if self.show_progress {
            ProgressBar::new(games as u64)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::default_bar()
                .template("Playing {msg}: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
                .progress_chars("█▓▒░  "),
        );
        progress.set_message(&format!("X {} vs O {}", self.x, self.o));

        let (x, o) = (self.x, self.o);
        let scores = (0..games)
            .into_par_iter()
            .map(|_| {
                let outcome = play_game(x, o, &mut rand::rng());
                progress.inc(1);

                let mut scores = Scores::new();
                scores.record(&outcome);
                scores
            })
            .reduce(Scores::new, Scores::merge);

        progress.finish_with_message("done");
        info!(
            x = %self.x,
            o = %self.o,
            x_wins = scores.x_wins,
            o_wins = scores.o_wins,
            draws = scores.draws,
            "arena finished"
        );
        scores
    }
}
