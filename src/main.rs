//! Gomoku command-line driver
//!
//! Runs scripted self-play games and prints the helpers an online client
//! needs (room ids and relay endpoints).

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gomoku::net::generate_room_id;
use gomoku::{AIEngine, Difficulty, GameConfig, GameMode, GameOutcome, GameState, Player, RuleVariant};

#[derive(Parser)]
#[command(name = "gomoku", about = "Five-in-a-row game engine")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "gomoku.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play one game between two scripted opponents
    Selfplay {
        /// Override the configured difficulty for both sides
        #[arg(long, value_enum)]
        difficulty: Option<Difficulty>,

        /// Use professional rules (forbidden points for Black)
        #[arg(long)]
        professional: bool,

        /// Seed for reproducible games
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print a fresh room id
    RoomId,
    /// Print the relay endpoint for a room
    Endpoint {
        room_id: String,

        /// 1 for Black (creator), 2 for White
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
        role: u8,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = GameConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Command::Selfplay {
            difficulty,
            professional,
            seed,
        } => selfplay(config, difficulty, professional, seed),
        Command::RoomId => {
            println!("{}", generate_room_id(&mut rand::rng()));
            Ok(())
        }
        Command::Endpoint { room_id, role } => {
            let role = Player::try_from(role).map_err(|e| anyhow!(e))?;
            println!("{}", config.relay.endpoint(room_id.trim(), role));
            Ok(())
        }
    }
}

fn selfplay(
    mut config: GameConfig,
    difficulty: Option<Difficulty>,
    professional: bool,
    seed: Option<u64>,
) -> Result<()> {
    config.mode = GameMode::Local;
    if let Some(difficulty) = difficulty {
        config.ai.difficulty = difficulty;
    }
    if professional {
        config.rules.variant = RuleVariant::Professional;
    }
    let seed = seed.or(config.ai.seed);

    let engine_for = |offset: u64| {
        let engine = match seed {
            Some(seed) => AIEngine::with_seed(config.ai.difficulty, seed.wrapping_add(offset)),
            None => AIEngine::new(config.ai.difficulty),
        };
        engine.with_rules(config.rules)
    };
    let mut black = engine_for(0);
    let mut white = engine_for(1);
    let mut game = GameState::new(config.clone());

    tracing::info!(difficulty = ?config.ai.difficulty, variant = ?config.rules.variant, "self-play started");

    while !game.is_over() {
        let player = game.current_turn();
        if !game.has_legal_move() {
            // Only forbidden points are left for the side to move
            println!("{}", game.board());
            println!("Draw: {player} has no legal move");
            return Ok(());
        }
        let engine = match player {
            Player::Black => &mut black,
            Player::White => &mut white,
        };
        let pos = engine
            .get_move(game.board(), player)
            .ok_or_else(|| anyhow!("{player} has no legal move"))?;
        game.place(pos)
            .with_context(|| format!("{player} at {pos}"))?;
    }

    println!("{}", game.board());
    match game.outcome() {
        GameOutcome::Win { player, direction } => {
            println!("{player} wins ({direction:?}) after {} moves", game.board().history().len());
        }
        GameOutcome::Draw => println!("Draw"),
        GameOutcome::InProgress => {}
    }
    Ok(())
}
