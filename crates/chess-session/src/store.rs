//! JSON persistence for a [`GameArena`].

use std::path::Path;

use chess_rules::{decode, DecodeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GameArena, GameId, GameRecord, SessionConfig};

const FORMAT_VERSION: u32 = 1;

/// Errors that can occur when saving or loading an arena.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access arena file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid arena file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported arena file version {0}")]
    UnsupportedVersion(u32),

    #[error("arena file holds {found} games, capacity is {capacity}")]
    TooManyGames { found: usize, capacity: usize },

    #[error("game {id} has a corrupted state: {source}")]
    CorruptedGame {
        id: GameId,
        #[source]
        source: DecodeError,
    },
}

#[derive(Serialize, Deserialize)]
struct ArenaFile {
    version: u32,
    games: Vec<GameRecord>,
}

impl GameArena {
    /// Writes every game to `path` as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let mut games: Vec<GameRecord> = self.games().cloned().collect();
        games.sort_by_key(|record| record.id.to_string());
        let file = ArenaFile {
            version: FORMAT_VERSION,
            games,
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(path.as_ref(), json)?;
        tracing::debug!(games = file.games.len(), "arena saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reads an arena written by [`save`](Self::save).
    ///
    /// Every stored state is decoded once so a corrupted file is refused as
    /// a whole instead of failing later on the first move.
    pub fn load(path: impl AsRef<Path>, config: SessionConfig) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let file: ArenaFile = serde_json::from_str(&content)?;
        if file.version != FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion(file.version));
        }
        if file.games.len() > config.max_games {
            return Err(StoreError::TooManyGames {
                found: file.games.len(),
                capacity: config.max_games,
            });
        }

        let mut arena = GameArena::new(config);
        for record in file.games {
            if let Err(source) = decode(record.state) {
                return Err(StoreError::CorruptedGame {
                    id: record.id,
                    source,
                });
            }
            arena.insert_record(record);
        }
        tracing::info!(games = arena.len(), "arena loaded from {}", path.as_ref().display());
        Ok(arena)
    }
}
