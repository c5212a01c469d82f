//! Value types shared by the chess crates.
//!
//! - [`Piece`] and [`Color`]
//! - [`Square`], numbered a1 = 0 to h8 = 63
//! - [`Move`] and [`MoveFlag`] for moves the rules engine has classified
//! - FEN parsing and rendering via [`FenParser`]

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenCastling, FenError, FenParser};
pub use mov::{Move, MoveFlag};
pub use piece::Piece;
pub use square::Square;
