//! Chess CLI - plays, inspects and counts positions in the 256-bit state form.

use std::path::PathBuf;

use anyhow::Context;
use chess_rules::{
    decode, in_check, initial_state, is_checkmate, is_stalemate, perft, perft_divide, CastleSide,
    Color, EncodedState, Position,
};
use chess_session::{GameArena, PlayerId, SessionConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Chess rules engine over a compact 256-bit game state.
#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Plays and inspects chess positions in their 256-bit encoded form")]
struct Args {
    /// Path to the session configuration file
    #[arg(long, default_value = "chess.toml")]
    config: PathBuf,

    /// Log filter, overrides the configured level (RUST_LOG wins over both)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay UCI moves from the initial position
    Play {
        /// Moves such as e2e4 or e7e8q
        moves: Vec<String>,
    },
    /// Describe an encoded state given as 0x-hex or decimal
    Decode {
        state: EncodedState,
    },
    /// Count leaf nodes of the legal move tree
    Perft {
        #[arg(long, default_value = "3")]
        depth: u32,

        /// Start from this FEN instead of the initial position
        #[arg(long)]
        fen: Option<String>,

        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// Print the encoded initial state
    Initial,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = SessionConfig::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    let level = args.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match args.command {
        Command::Play { moves } => play(config, &moves),
        Command::Decode { state } => describe(state),
        Command::Perft { depth, fen, divide } => run_perft(depth, fen.as_deref(), divide),
        Command::Initial => {
            println!("{}", initial_state());
            Ok(())
        }
    }
}

fn play(config: SessionConfig, moves: &[String]) -> anyhow::Result<()> {
    let mut arena = GameArena::new(config);
    let (white, black) = (PlayerId::from("white"), PlayerId::from("black"));
    let id = arena.create_game(white.clone(), black.clone())?;

    for (ply, uci) in moves.iter().enumerate() {
        let player = if ply % 2 == 0 { &white } else { &black };
        arena
            .submit_uci(id, player, uci)
            .with_context(|| format!("move {} ({})", ply + 1, uci))?;
    }

    let record = arena
        .game(id)
        .context("game disappeared from the arena")?;
    let position = arena.position(id)?;
    println!("{}", position);
    println!();
    println!("state:  {}", record.state);
    println!("status: {}", record.status);
    Ok(())
}

fn describe(state: EncodedState) -> anyhow::Result<()> {
    let position = decode(state).context("state does not decode")?;
    println!("{}", position);
    println!();
    println!("fen:        {}", position.to_fen());
    println!("castling:   {}", castling_summary(&position));
    match position.en_passant() {
        Some(sq) => println!("en passant: {}", sq),
        None => println!("en passant: -"),
    }
    println!("check:      {}", in_check(&position));
    println!("checkmate:  {}", is_checkmate(&position));
    println!("stalemate:  {}", is_stalemate(&position));
    Ok(())
}

fn castling_summary(position: &Position) -> String {
    let rights = position.castling();
    let flags = [
        (Color::White, CastleSide::Kingside, 'K'),
        (Color::White, CastleSide::Queenside, 'Q'),
        (Color::Black, CastleSide::Kingside, 'k'),
        (Color::Black, CastleSide::Queenside, 'q'),
    ];
    let summary: String = flags
        .iter()
        .filter(|(color, side, _)| rights.has(*color, *side))
        .map(|(_, _, c)| *c)
        .collect();
    if summary.is_empty() {
        "-".to_string()
    } else {
        summary
    }
}

fn run_perft(depth: u32, fen: Option<&str>, divide: bool) -> anyhow::Result<()> {
    let position = match fen {
        Some(fen) => Position::from_fen(fen).context("invalid FEN")?,
        None => Position::startpos(),
    };
    tracing::info!(depth, "running perft");

    if divide {
        let mut total = 0;
        for (uci, nodes) in perft_divide(&position, depth) {
            println!("{}: {}", uci, nodes);
            total += nodes;
        }
        println!();
        println!("nodes: {}", total);
    } else {
        println!("nodes: {}", perft(&position, depth));
    }
    Ok(())
}
