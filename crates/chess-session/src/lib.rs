//! Reference session layer for the chess rules engine.
//!
//! A [`GameArena`] owns the encoded state of every game, maps participants
//! to colors, and only lets the player whose color is to move submit a
//! move. Arenas persist to JSON and read their limits from a TOML
//! [`SessionConfig`].

mod arena;
pub mod config;
mod store;

pub use arena::{GameArena, GameId, GameRecord, GameStatus, PlayerId, SessionError};
pub use config::{ConfigError, SessionConfig};
pub use store::StoreError;
