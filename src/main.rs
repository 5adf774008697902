use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use rand::Rng;
use tracing_subscriber::EnvFilter;

use std::io::{stdin, stdout, Write};
use std::time::Duration;

use tictactoe_ai::{arena::Arena, solver::Solver, *};

/// Tic-tac-toe against a friend or the computer
#[derive(Parser, Debug)]
#[command(name = "tictactoe_cli", version, long_about = None)]
struct Cli {
    /// pvp or bot, asked for when omitted
    #[arg(long)]
    mode: Option<Mode>,

    /// easy, medium or hard, asked for when omitted
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Play the computer's moves without a thinking pause
    #[arg(long)]
    no_delay: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the computer against itself and print the results
    Arena {
        /// Difficulty of the player moving first
        #[arg(long, default_value = "hard")]
        x: Difficulty,

        /// Difficulty of the player moving second
        #[arg(long, default_value = "easy")]
        o: Difficulty,

        #[arg(long, default_value_t = 1000)]
        games: usize,
    },
}

enum AfterGame {
    Rematch,
    Menu,
    Quit,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(Command::Arena { x, o, games }) = cli.command {
        return run_arena(x, o, games);
    }

    println!("Welcome to Tic-Tac-Toe\n");

    let (mode, difficulty) = choose_settings(cli.mode, cli.difficulty)?;
    let mut session = Session::new(mode, difficulty);

    loop {
        play(&mut session, !cli.no_delay)?;
        print_scores(&session);

        match ask_after_game()? {
            AfterGame::Rematch => session.rematch(),
            AfterGame::Menu => {
                let (mode, difficulty) = choose_settings(None, None)?;
                // a new mode starts a new score board
                session.reset_scores();
                session.start_new_game(mode, difficulty);
            }
            AfterGame::Quit => break,
        }
    }
    Ok(())
}

fn run_arena(x: Difficulty, o: Difficulty, games: usize) -> Result<()> {
    let scores = Arena::new(x, o).with_progress(true).run(games);

    println!("X ({}) wins: {}", x, scores.x_wins);
    println!("O ({}) wins: {}", o, scores.o_wins);
    println!("Draws: {}", scores.draws);
    Ok(())
}

fn prompt(question: &str) -> Result<String> {
    print!("{}", question);
    stdout().flush()?;

    let mut buffer = String::new();
    if stdin().read_line(&mut buffer)? == 0 {
        return Err(anyhow!("input closed"));
    }
    Ok(buffer)
}

fn choose_settings(
    mode: Option<Mode>,
    difficulty: Option<Difficulty>,
) -> Result<(Mode, Difficulty)> {
    let mode = match mode {
        Some(mode) => mode,
        None => loop {
            match prompt("Play against a friend or the computer? pvp/bot: ")?.parse::<Mode>() {
                Ok(mode) => break mode,
                Err(err) => println!("{}", err),
            }
        },
    };

    let difficulty = match (mode, difficulty) {
        (_, Some(difficulty)) => difficulty,
        // unused without a computer player
        (Mode::HumanVsHuman, None) => Difficulty::Easy,
        (Mode::HumanVsComputer, None) => loop {
            match prompt("Choose a difficulty, easy/medium/hard: ")?.parse::<Difficulty>() {
                Ok(difficulty) => break difficulty,
                Err(err) => println!("{}", err),
            }
        },
    };

    Ok((mode, difficulty))
}

fn ask_after_game() -> Result<AfterGame> {
    loop {
        let answer = prompt("Rematch, menu or quit? r/m/q: ")?;
        match answer.to_lowercase().chars().next() {
            Some('r') => return Ok(AfterGame::Rematch),
            Some('m') => return Ok(AfterGame::Menu),
            Some('q') => return Ok(AfterGame::Quit),
            _ => println!("Unknown answer given"),
        }
    }
}

fn name_of(session: &Session, mark: Mark) -> &'static str {
    let (name_x, name_o) = session.labels();
    match mark {
        Mark::X => name_x,
        Mark::O => name_o,
    }
}

/// Runs one game to its end
fn play(session: &mut Session, thinking_delay: bool) -> Result<()> {
    match session.mode() {
        Mode::HumanVsHuman => println!("\nPVP"),
        Mode::HumanVsComputer => {
            println!("\nBOT · {}", session.difficulty().to_string().to_uppercase())
        }
    }

    loop {
        println!();
        session.board().display(session.outcome().line())?;

        match session.state() {
            SessionState::AwaitingMove(mark) => {
                let question = format!(
                    "{}'s turn ({}), ? for a hint > ",
                    name_of(session, mark),
                    mark
                );
                let input = prompt(&question)?;
                let input = input.trim();

                if input == "?" {
                    print_hint(session.board(), mark);
                    continue;
                }

                let index = match input.parse::<usize>() {
                    Ok(cell) if cell >= 1 => cell - 1,
                    _ => {
                        println!("Invalid number: {}", input);
                        continue;
                    }
                };

                match session.apply_move(index) {
                    SessionEvent::Rejected(MoveError::OutOfRange(_)) => {
                        println!("Cells are numbered 1 to {}", CELLS)
                    }
                    SessionEvent::Rejected(MoveError::Occupied(_)) => {
                        println!("Cell {} is already taken", index + 1)
                    }
                    SessionEvent::Rejected(err) => println!("{}", err),
                    _ => {}
                }
            }
            SessionState::ComputerThinking => {
                println!("BOT IS THINKING…");
                stdout().flush()?;

                if thinking_delay {
                    let delay = rand::rng().random_range(400..800);
                    std::thread::sleep(Duration::from_millis(delay));
                }

                if let SessionEvent::Rejected(err) = session.play_computer_turn() {
                    return Err(anyhow!("computer could not move: {}", err));
                }
            }
            SessionState::Terminal(outcome) => {
                match outcome.winner() {
                    Some(mark) => println!("{} WINS!", name_of(session, mark)),
                    None => println!("IT'S A DRAW!"),
                }
                return Ok(());
            }
        }
    }
}

fn print_hint(board: &Board, mark: Mark) {
    let mut solver = Solver::new(*board, mark);
    let (score, best_move) = solver.solve();

    if let Some(best_move) = best_move {
        match Solver::score_to_win_distance(score) {
            Some(moves) if score > 0 => {
                println!("{} can force a win in at most {} moves.", mark, moves)
            }
            Some(moves) => println!("{} can hold out for at most {} moves.", mark, moves),
            None => println!("{} can at best force a draw.", mark),
        }
        println!("Best move: {}", best_move + 1);
    }
}

fn print_scores(session: &Session) {
    let scores = session.scores();
    println!(
        "\n{} (X): {}   {} (O): {}   DRAWS: {}",
        name_of(session, Mark::X),
        scores.x_wins,
        name_of(session, Mark::O),
        scores.o_wins,
        scores.draws
    );
}
