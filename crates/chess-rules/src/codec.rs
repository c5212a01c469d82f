//! Compact 256-bit state encoding.
//!
//! A whole position is packed into 64 four-bit square codes. Square `i`
//! (a1 = 0 .. h8 = 63) occupies bits `[4i, 4i + 4)`. Besides the twelve
//! ordinary piece codes, three marker codes carry the remaining state:
//!
//! | code | meaning |
//! |------|---------|
//! | 0 | empty |
//! | 1, 2 | white, black pawn |
//! | 3, 4 | white, black knight |
//! | 5, 6 | white, black bishop |
//! | 7, 8 | white, black rook |
//! | 9, 10 | white, black queen |
//! | 11, 12 | white, black king |
//! | 13 | pawn that just double-pushed; white on rank 4, black on rank 5 |
//! | 14 | king of the side to move; color is the opposite of the other king |
//! | 15 | unmoved king (e1/e8) or rook (a1/h1/a8/h8); color from the rank |
//!
//! The side-to-move king always carries code 14, also on its home square,
//! where it counts as unmoved for castling. A rook home square carries 15
//! exactly while its castling right is alive, and a waiting king carries 15
//! while its color holds any right.

use std::fmt;
use std::str::FromStr;

use chess_core::{Color, Piece, Square};
use thiserror::Error;

use crate::position::en_passant_victim;
use crate::{Board, CastleSide, CastlingRights, Position, PositionError};

pub const EMPTY: u8 = 0;
pub const DOUBLE_PUSHED_PAWN: u8 = 13;
pub const SIDE_TO_MOVE_KING: u8 = 14;
pub const UNMOVED: u8 = 15;

/// Returns the ordinary code (1-12) of a piece.
#[inline]
pub const fn piece_code(piece: Piece, color: Color) -> u8 {
    1 + 2 * piece as u8 + color as u8
}

/// Returns the piece behind an ordinary code (1-12).
#[inline]
pub const fn piece_from_code(code: u8) -> Option<(Piece, Color)> {
    if code == 0 || code > 12 {
        return None;
    }
    let kind = (code - 1) / 2;
    let color = if (code - 1) % 2 == 0 {
        Color::White
    } else {
        Color::Black
    };
    Some((Piece::ALL[kind as usize], color))
}

/// Decode-time invariant violations.
///
/// `encode` never produces any of these; seeing one means the value was
/// corrupted or forged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no square carries the side-to-move king marker")]
    MissingSideToMoveKing,

    #[error("second side-to-move king marker at {0}")]
    DuplicateSideToMoveKing(Square),

    #[error("no king for the side not to move")]
    MissingKing,

    #[error("second king for the side not to move at {0}")]
    DuplicateKing(Square),

    #[error("second double-pushed pawn marker at {0}")]
    DuplicateDoubleMovedPawn(Square),

    #[error("double-pushed pawn marker on impossible square {0}")]
    DoubleMovedPawnOnRank(Square),

    #[error("double-pushed pawn at {0} belongs to the side to move")]
    DoubleMovedPawnWrongTurn(Square),

    #[error("square {0} behind a double-pushed pawn is occupied")]
    EnPassantSquareOccupied(Square),

    #[error("unmoved marker on {0}, which is not a king or rook home square")]
    UnmovedMarkerOffHome(Square),

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(Square),

    #[error("decoded fields do not form a position: {0}")]
    InvalidPosition(#[from] PositionError),
}

/// Errors parsing the text form of an [`EncodedState`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseStateError {
    #[error("empty state string")]
    Empty,

    #[error("invalid digit '{0}' in state string")]
    InvalidDigit(char),

    #[error("state value does not fit in 256 bits")]
    Overflow,
}

/// The 256-bit wire form of a position.
///
/// Stored as four little-endian 64-bit limbs: limb 0 holds squares a1-h2.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EncodedState([u64; 4]);

impl EncodedState {
    pub const ZERO: EncodedState = EncodedState([0; 4]);

    /// Creates a state from little-endian limbs.
    #[inline]
    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        EncodedState(limbs)
    }

    /// Returns the little-endian limbs.
    #[inline]
    pub const fn limbs(self) -> [u64; 4] {
        self.0
    }

    /// Creates a state from its 32-byte big-endian form.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            limbs[3 - i] = u64::from_be_bytes(word);
        }
        EncodedState(limbs)
    }

    /// Returns the 32-byte big-endian form.
    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for i in 0..4 {
            bytes[i * 8..i * 8 + 8].copy_from_slice(&self.0[3 - i].to_be_bytes());
        }
        bytes
    }

    /// Returns the four-bit code stored for a square.
    #[inline]
    pub const fn code_at(self, sq: Square) -> u8 {
        let i = sq.index() as usize;
        ((self.0[i / 16] >> ((i % 16) * 4)) & 0xF) as u8
    }

    /// Returns a copy with the code for one square replaced.
    #[inline]
    pub const fn with_code(self, sq: Square, code: u8) -> Self {
        let i = sq.index() as usize;
        let shift = (i % 16) * 4;
        let mut limbs = self.0;
        limbs[i / 16] = (limbs[i / 16] & !(0xF << shift)) | (((code & 0xF) as u64) << shift);
        EncodedState(limbs)
    }

    /// Renders the value as a base-10 integer.
    pub fn to_decimal_string(self) -> String {
        const CHUNK: u64 = 10_000_000_000_000_000_000;
        let mut limbs = self.0;
        let mut chunks = Vec::new();
        while limbs.iter().any(|&l| l != 0) {
            let mut rem: u128 = 0;
            for limb in limbs.iter_mut().rev() {
                let cur = (rem << 64) | *limb as u128;
                *limb = (cur / CHUNK as u128) as u64;
                rem = cur % CHUNK as u128;
            }
            chunks.push(rem as u64);
        }
        match chunks.split_last() {
            None => "0".to_string(),
            Some((head, rest)) => {
                let mut out = head.to_string();
                for chunk in rest.iter().rev() {
                    out.push_str(&format!("{:019}", chunk));
                }
                out
            }
        }
    }

    fn parse_hex(digits: &str) -> Result<Self, ParseStateError> {
        if digits.len() > 64 {
            return Err(ParseStateError::Overflow);
        }
        let mut limbs = [0u64; 4];
        for (i, c) in digits.chars().rev().enumerate() {
            let nibble = c.to_digit(16).ok_or(ParseStateError::InvalidDigit(c))? as u64;
            limbs[i / 16] |= nibble << ((i % 16) * 4);
        }
        Ok(EncodedState(limbs))
    }

    fn parse_decimal(digits: &str) -> Result<Self, ParseStateError> {
        let mut limbs = [0u64; 4];
        for c in digits.chars() {
            let digit = c.to_digit(10).ok_or(ParseStateError::InvalidDigit(c))? as u128;
            let mut carry = digit;
            for limb in limbs.iter_mut() {
                let cur = *limb as u128 * 10 + carry;
                *limb = cur as u64;
                carry = cur >> 64;
            }
            if carry != 0 {
                return Err(ParseStateError::Overflow);
            }
        }
        Ok(EncodedState(limbs))
    }
}

impl fmt::Debug for EncodedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedState({})", self)
    }
}

impl fmt::Display for EncodedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self)
    }
}

impl fmt::LowerHex for EncodedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for limb in self.0.iter().rev() {
            write!(f, "{:016x}", limb)?;
        }
        Ok(())
    }
}

impl FromStr for EncodedState {
    type Err = ParseStateError;

    /// Parses either `0x`-prefixed hex or a plain decimal integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, hex) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        if digits.is_empty() {
            return Err(ParseStateError::Empty);
        }
        if hex {
            Self::parse_hex(digits)
        } else {
            Self::parse_decimal(digits)
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EncodedState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for EncodedState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Packs a position into its 256-bit form.
pub fn encode(position: &Position) -> EncodedState {
    let side = position.side_to_move();
    let rights = position.castling();
    let ep_pawn = position
        .en_passant()
        .and_then(|target| en_passant_victim(side, target));

    let mut state = EncodedState::ZERO;
    for sq in Square::all() {
        let code = match position.piece_at(sq) {
            None => EMPTY,
            Some((Piece::King, color)) if color == side => SIDE_TO_MOVE_KING,
            Some((Piece::King, color))
                if sq == CastleSide::king_home(color) && rights.any(color) =>
            {
                UNMOVED
            }
            Some((Piece::Rook, color))
                if CastleSide::for_rook_home(sq)
                    .is_some_and(|(c, s)| c == color && rights.has(c, s)) =>
            {
                UNMOVED
            }
            Some((Piece::Pawn, _)) if Some(sq) == ep_pawn => DOUBLE_PUSHED_PAWN,
            Some((piece, color)) => piece_code(piece, color),
        };
        state = state.with_code(sq, code);
    }
    state
}

/// Unpacks a 256-bit state into a position, validating every marker.
pub fn decode(state: EncodedState) -> Result<Position, DecodeError> {
    let mut board = Board::empty();
    let mut mover_king: Option<Square> = None;
    let mut waiting_king: Option<(Square, Color)> = None;
    let mut pushed_pawn: Option<(Square, Color)> = None;

    for sq in Square::all() {
        let code = state.code_at(sq);
        match code {
            EMPTY => {}
            DOUBLE_PUSHED_PAWN => {
                let color = match sq.rank_index() {
                    3 => Color::White,
                    4 => Color::Black,
                    _ => return Err(DecodeError::DoubleMovedPawnOnRank(sq)),
                };
                if pushed_pawn.replace((sq, color)).is_some() {
                    return Err(DecodeError::DuplicateDoubleMovedPawn(sq));
                }
                board.set(sq, Piece::Pawn, color);
            }
            SIDE_TO_MOVE_KING => {
                if mover_king.replace(sq).is_some() {
                    return Err(DecodeError::DuplicateSideToMoveKing(sq));
                }
            }
            UNMOVED => {
                let (piece, color) = match sq {
                    Square::E1 => (Piece::King, Color::White),
                    Square::E8 => (Piece::King, Color::Black),
                    Square::A1 | Square::H1 => (Piece::Rook, Color::White),
                    Square::A8 | Square::H8 => (Piece::Rook, Color::Black),
                    _ => return Err(DecodeError::UnmovedMarkerOffHome(sq)),
                };
                if piece == Piece::King && waiting_king.replace((sq, color)).is_some() {
                    return Err(DecodeError::DuplicateKing(sq));
                }
                board.set(sq, piece, color);
            }
            _ => {
                let Some((piece, color)) = piece_from_code(code) else {
                    unreachable!("four-bit codes above 12 are markers");
                };
                match piece {
                    Piece::King => {
                        if waiting_king.replace((sq, color)).is_some() {
                            return Err(DecodeError::DuplicateKing(sq));
                        }
                    }
                    Piece::Pawn if sq.rank_index() == 0 || sq.rank_index() == 7 => {
                        return Err(DecodeError::PawnOnBackRank(sq));
                    }
                    _ => {}
                }
                board.set(sq, piece, color);
            }
        }
    }

    let mover_king = mover_king.ok_or(DecodeError::MissingSideToMoveKing)?;
    let (_, waiting) = waiting_king.ok_or(DecodeError::MissingKing)?;
    let side = waiting.opposite();
    board.set(mover_king, Piece::King, side);

    let en_passant = match pushed_pawn {
        None => None,
        Some((pawn, color)) => {
            if color == side {
                return Err(DecodeError::DoubleMovedPawnWrongTurn(pawn));
            }
            let back = -color.pawn_direction();
            for behind in [pawn.offset(0, back), pawn.offset(0, 2 * back)]
                .into_iter()
                .flatten()
            {
                if !board.is_empty(behind) {
                    return Err(DecodeError::EnPassantSquareOccupied(behind));
                }
            }
            pawn.offset(0, back)
        }
    };

    let mut rights = CastlingRights::NONE;
    for color in Color::ALL {
        let home = CastleSide::king_home(color);
        let king_unmoved = match state.code_at(home) {
            UNMOVED => true,
            SIDE_TO_MOVE_KING => side == color,
            _ => false,
        };
        if !king_unmoved {
            continue;
        }
        for castle in CastleSide::ALL {
            if state.code_at(castle.rook_home(color)) == UNMOVED {
                rights.insert(color, castle);
            }
        }
    }

    Ok(Position::from_parts(board, side, rights, en_passant)?)
}

/// The standard starting position, White to move with all rights.
pub fn initial_position() -> Position {
    Position::startpos()
}

/// The encoded form of [`initial_position`].
pub fn initial_state() -> EncodedState {
    encode(&initial_position())
}
