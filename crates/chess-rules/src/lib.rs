//! Chess rules over a compact 256-bit game state.
//!
//! This crate provides:
//! - [`EncodedState`] - a whole game state packed into 64 four-bit codes
//! - [`Position`] - the decoded form, with FEN support
//! - [`is_attacked`] - square attack detection
//! - [`classify`], [`is_pseudo_legal`], [`is_legal`] - move validation
//! - [`make_move`] and [`apply`] - move application
//! - [`in_check`], [`is_checkmate`], [`is_stalemate`] - terminal states
//! - [`process_move`] - decode, validate, apply and re-encode in one call
//!
//! # Example
//!
//! ```
//! use chess_rules::{decode, initial_state, process_move};
//!
//! // e2 = 12, e4 = 28
//! let state = process_move(initial_state(), 12, 28, 0).unwrap();
//! let position = decode(state).unwrap();
//! assert_eq!(
//!     position.to_fen(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
//! );
//! ```

mod apply;
pub mod attacks;
mod bitboard;
mod board;
mod castling;
pub mod codec;
mod perft;
mod position;
mod process;
mod terminal;
mod validate;

pub use apply::{apply, make_move};
pub use attacks::is_attacked;
pub use bitboard::{Bitboard, Squares};
pub use board::Board;
pub use castling::{CastleSide, CastlingRights};
pub use codec::{
    decode, encode, initial_position, initial_state, DecodeError, EncodedState, ParseStateError,
};
pub use perft::{perft, perft_divide};
pub use position::{Position, PositionError};
pub use process::{play, process_move, process_move_uci, validate_move, MoveError};
pub use terminal::{
    has_any_legal_move, in_check, is_checkmate, is_stalemate, legal_moves, outcome, GameOutcome,
};
pub use validate::{classify, is_legal, is_pseudo_legal, leaves_king_in_check, legal_move};

pub use chess_core::{Color, Move, MoveFlag, Piece, Square};
