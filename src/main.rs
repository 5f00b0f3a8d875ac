//! Clashlane CLI - run single matches or replay batches from the command
//! line.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use clashlane::battle::BattleConfig;
use clashlane::cards::standard_catalog;
use clashlane::core::{PlayerId, PlayerPair};
use clashlane::driver::{generate_batch, run_match, MatchSetup, PlayerKind};
use clashlane::replay::ReplayError;

/// Clashlane - a deterministic lane-battle simulator
#[derive(Parser, Debug)]
#[command(name = "clashlane")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single match and save its replay
    Play {
        /// Controller for player 0
        #[arg(long, default_value = "ai")]
        player1: PlayerArg,

        /// Controller for player 1
        #[arg(long, default_value = "ai")]
        player2: PlayerArg,

        /// AI difficulty (1-3)
        #[arg(short, long, default_value = "2")]
        difficulty: u8,

        /// Maximum turns before the game is called
        #[arg(short, long, default_value = "100")]
        turns: u32,

        /// Random seed (default: derived from the clock)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Replay output path
        #[arg(short, long, default_value = "replay.json")]
        out: PathBuf,
    },

    /// Run many matches in parallel and save one replay per game
    Batch {
        /// Number of games to run
        #[arg(short, long, default_value = "100")]
        count: usize,

        /// AI difficulty (1-3)
        #[arg(short, long, default_value = "2")]
        difficulty: u8,

        /// Maximum turns per game
        #[arg(short, long, default_value = "100")]
        turns: u32,

        /// Base seed (default: derived from the clock); game N runs under
        /// a seed derived from it
        #[arg(short, long)]
        seed: Option<u64>,

        /// Directory for replay files
        #[arg(short, long, default_value = "replays")]
        out: PathBuf,
    },
}

/// Controller choice for a player slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlayerArg {
    /// AI-backed slot recorded as a person's game.
    Human,
    /// Built-in AI.
    Ai,
}

impl From<PlayerArg> for PlayerKind {
    fn from(arg: PlayerArg) -> Self {
        match arg {
            PlayerArg::Human => PlayerKind::Human,
            PlayerArg::Ai => PlayerKind::Ai,
        }
    }
}

/// CLI error type.
#[derive(Debug)]
struct CliError {
    message: String,
}

impl CliError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ReplayError> for CliError {
    fn from(e: ReplayError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<clashlane::core::ConfigError> for CliError {
    fn from(e: clashlane::core::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let result = match args.command {
        Commands::Play {
            player1,
            player2,
            difficulty,
            turns,
            seed,
            out,
        } => play(player1, player2, difficulty, turns, seed, out),

        Commands::Batch {
            count,
            difficulty,
            turns,
            seed,
            out,
        } => batch(count, difficulty, turns, seed, out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Clock-derived seed for runs that did not pin one.
fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn check_difficulty(difficulty: u8) -> Result<(), CliError> {
    if !(1..=3).contains(&difficulty) {
        return Err(CliError::new(format!(
            "difficulty must be 1, 2, or 3 (got {difficulty})"
        )));
    }
    Ok(())
}

fn setup_for(difficulty: u8, turns: u32, seed: u64) -> MatchSetup {
    let mut setup = MatchSetup::new(seed);
    setup.difficulty = difficulty;
    setup.config = BattleConfig {
        max_turns: turns,
        ..BattleConfig::default()
    };
    setup
}

fn play(
    player1: PlayerArg,
    player2: PlayerArg,
    difficulty: u8,
    turns: u32,
    seed: Option<u64>,
    out: PathBuf,
) -> Result<(), CliError> {
    check_difficulty(difficulty)?;
    let seed = seed.unwrap_or_else(random_seed);

    let mut setup = setup_for(difficulty, turns, seed);
    setup.players = PlayerPair::new(player1.into(), player2.into());

    let catalog = standard_catalog();
    let replay = run_match(&catalog, &setup)?;
    let summary = replay.summary();
    replay.save(&out)?;

    println!("seed: {seed}");
    println!("turns: {}", summary.turn_count);
    match summary.winner {
        Some(winner) => println!("winner: {winner}"),
        None => println!("winner: draw"),
    }
    for player in PlayerId::both() {
        println!(
            "{player}: tower {} HP, peak {} units",
            summary.final_tower_hp[player], summary.max_units[player]
        );
    }
    println!("replay written to {}", out.display());
    Ok(())
}

fn batch(
    count: usize,
    difficulty: u8,
    turns: u32,
    seed: Option<u64>,
    out: PathBuf,
) -> Result<(), CliError> {
    check_difficulty(difficulty)?;
    let seed = seed.unwrap_or_else(random_seed);

    let catalog = standard_catalog();
    let setup = setup_for(difficulty, turns, seed);

    println!("running {count} games from base seed {seed}...");
    let replays = generate_batch(&catalog, &setup, count)?;

    std::fs::create_dir_all(&out)?;
    let bar = ProgressBar::new(count as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .expect("static template is valid"),
    );

    let mut wins = PlayerPair::with_value(0usize);
    let mut draws = 0usize;
    for replay in &replays {
        let index = replay
            .meta
            .batch_index
            .expect("batch replays carry their index");
        replay.save(out.join(format!("game_{index:05}.json")))?;
        match replay.meta.winner {
            Some(winner) => wins[winner] += 1,
            None => draws += 1,
        }
        bar.inc(1);
    }
    bar.finish_with_message("done");

    for player in PlayerId::both() {
        println!("{player}: {} wins", wins[player]);
    }
    println!("draws: {draws}");
    println!("{count} replays written to {}", out.display());
    Ok(())
}
