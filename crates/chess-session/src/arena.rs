//! Games in progress, keyed by id.
//!
//! The arena exclusively owns one encoded state per game. The rules engine
//! is stateless; every move request decodes the stored state, runs it
//! through [`process_move`], and stores the successor only if every step
//! succeeded.

use std::collections::HashMap;
use std::fmt;

use chess_rules::codec::piece_code;
use chess_rules::{
    decode, initial_state, outcome, process_move, Color, DecodeError, EncodedState, GameOutcome,
    Move, MoveError, Position,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::SessionConfig;

/// Errors returned by arena operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("game not found: {0}")]
    GameNotFound(GameId),

    #[error("{player} is not playing in game {game}")]
    NotAParticipant { game: GameId, player: PlayerId },

    #[error("it is not {player}'s turn")]
    NotYourTurn { player: PlayerId },

    #[error("game {0} is already over")]
    GameOver(GameId),

    #[error("arena is full ({capacity} games)")]
    ArenaFull { capacity: usize },

    #[error("invalid UCI move: {0:?}")]
    InvalidNotation(String),

    #[error(transparent)]
    Move(#[from] MoveError),
}

impl From<DecodeError> for SessionError {
    fn from(err: DecodeError) -> Self {
        SessionError::Move(MoveError::CorruptedEncoding(err))
    }
}

/// Unique identifier of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(Uuid);

impl GameId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        GameId(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Name of a participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(name: impl Into<String>) -> Self {
        PlayerId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        PlayerId::new(name)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a game can still be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameStatus {
    Active,
    Checkmate { winner: Color },
    Stalemate,
}

impl GameStatus {
    /// Derives the status of a position from the terminal-state rules.
    pub fn of(position: &Position) -> Self {
        match outcome(position) {
            None => GameStatus::Active,
            Some(GameOutcome::Checkmate { winner }) => GameStatus::Checkmate { winner },
            Some(GameOutcome::Stalemate) => GameStatus::Stalemate,
        }
    }

    pub fn is_over(self) -> bool {
        self != GameStatus::Active
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Active => write!(f, "active"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            GameStatus::Stalemate => write!(f, "stalemate"),
        }
    }
}

/// Everything the arena stores about one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub white: PlayerId,
    pub black: PlayerId,
    pub state: EncodedState,
    pub status: GameStatus,
    /// Half-moves played so far.
    pub plies: u32,
}

impl GameRecord {
    /// The participant playing `color`.
    pub fn player(&self, color: Color) -> &PlayerId {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn is_participant(&self, player: &PlayerId) -> bool {
        self.white == *player || self.black == *player
    }
}

/// A collection of independent games.
#[derive(Debug, Default)]
pub struct GameArena {
    games: HashMap<GameId, GameRecord>,
    config: SessionConfig,
}

impl GameArena {
    /// Creates an empty arena.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            games: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Starts a new game from the initial position.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ArenaFull`] once `max_games` games are held.
    pub fn create_game(
        &mut self,
        white: impl Into<PlayerId>,
        black: impl Into<PlayerId>,
    ) -> Result<GameId, SessionError> {
        if self.games.len() >= self.config.max_games {
            return Err(SessionError::ArenaFull {
                capacity: self.config.max_games,
            });
        }
        let id = GameId::new();
        let record = GameRecord {
            id,
            white: white.into(),
            black: black.into(),
            state: initial_state(),
            status: GameStatus::Active,
            plies: 0,
        };
        tracing::info!(game = %id, white = %record.white, black = %record.black, "game created");
        self.games.insert(id, record);
        Ok(id)
    }

    /// Submits a move on behalf of `player`.
    ///
    /// The player must be a participant whose color is to move. On success
    /// the stored state advances and the new status is returned; on any
    /// error the record is unchanged.
    pub fn submit_move(
        &mut self,
        id: GameId,
        player: &PlayerId,
        from: u8,
        to: u8,
        promotion: u8,
    ) -> Result<GameStatus, SessionError> {
        let reject_after_terminal = self.config.reject_moves_after_terminal;
        let record = self
            .games
            .get_mut(&id)
            .ok_or(SessionError::GameNotFound(id))?;

        if reject_after_terminal && record.status.is_over() {
            return Err(SessionError::GameOver(id));
        }
        if !record.is_participant(player) {
            return Err(SessionError::NotAParticipant {
                game: id,
                player: player.clone(),
            });
        }
        let side = decode(record.state)?.side_to_move();
        if record.player(side) != player {
            tracing::warn!(game = %id, player = %player, "move submitted out of turn");
            return Err(SessionError::NotYourTurn {
                player: player.clone(),
            });
        }

        let next = process_move(record.state, from, to, promotion)?;
        let status = GameStatus::of(&decode(next)?);

        record.state = next;
        record.status = status;
        record.plies += 1;
        tracing::debug!(game = %id, from, to, plies = record.plies, "move stored");
        if status.is_over() {
            tracing::info!(game = %id, status = %status, "game finished");
        }
        Ok(status)
    }

    /// [`submit_move`](Self::submit_move) with the move in UCI notation.
    pub fn submit_uci(
        &mut self,
        id: GameId,
        player: &PlayerId,
        uci: &str,
    ) -> Result<GameStatus, SessionError> {
        let (from, to, promotion) =
            Move::parse_uci(uci).ok_or_else(|| SessionError::InvalidNotation(uci.to_string()))?;
        let record = self.game(id).ok_or(SessionError::GameNotFound(id))?;
        let side = decode(record.state)?.side_to_move();
        let code = promotion.map_or(0, |piece| piece_code(piece, side));
        self.submit_move(id, player, from.index(), to.index(), code)
    }

    pub fn game(&self, id: GameId) -> Option<&GameRecord> {
        self.games.get(&id)
    }

    /// Decodes the current position of a game.
    pub fn position(&self, id: GameId) -> Result<Position, SessionError> {
        let record = self.game(id).ok_or(SessionError::GameNotFound(id))?;
        Ok(decode(record.state)?)
    }

    pub fn remove_game(&mut self, id: GameId) -> Option<GameRecord> {
        self.games.remove(&id)
    }

    /// Iterates over every stored game in no particular order.
    pub fn games(&self) -> impl Iterator<Item = &GameRecord> {
        self.games.values()
    }

    pub(crate) fn insert_record(&mut self, record: GameRecord) {
        self.games.insert(record.id, record);
    }
}
