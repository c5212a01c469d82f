//! Chess position representation.

use std::fmt;

use chess_core::{Color, FenCastling, FenError, FenParser, Piece, Square};
use thiserror::Error;

use crate::{Board, CastleSide, CastlingRights};

/// Reasons a set of fields cannot form a position.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("{0} has no king")]
    MissingKing(Color),

    #[error("{0} has more than one king")]
    ExtraKing(Color),

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(Square),
}

/// Complete chess position state.
///
/// Positions are values: applying a move produces a new one and never
/// touches the original. The king squares are cached and kept in step with
/// the board by every constructor and by move application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    kings: [Square; 2],
}

impl Position {
    /// Builds a position, checking that each side has exactly one king and
    /// that no pawn stands on a back rank.
    ///
    /// Castling rights whose king or rook is off its home square are dropped,
    /// and an en passant target is kept only if a pawn of the side not to
    /// move stands directly in front of it with its origin square empty.
    pub fn from_parts(
        board: Board,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
    ) -> Result<Self, PositionError> {
        let mut kings = [None; 2];
        for sq in Square::all() {
            match board.piece_at(sq) {
                Some((Piece::King, color)) => {
                    if kings[color.index()].replace(sq).is_some() {
                        return Err(PositionError::ExtraKing(color));
                    }
                }
                Some((Piece::Pawn, _)) if sq.rank_index() == 0 || sq.rank_index() == 7 => {
                    return Err(PositionError::PawnOnBackRank(sq));
                }
                _ => {}
            }
        }
        let white = kings[0].ok_or(PositionError::MissingKing(Color::White))?;
        let black = kings[1].ok_or(PositionError::MissingKing(Color::Black))?;

        let en_passant = en_passant.filter(|&target| {
            en_passant_is_consistent(&board, side_to_move, target)
        });

        Ok(Position {
            castling: castling.normalized(&board),
            board,
            side_to_move,
            en_passant,
            kings: [white, black],
        })
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenParser::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let parsed = FenParser::parse(fen)?;
        let mut castling = CastlingRights::NONE;
        let flags = [
            (parsed.castling.white_kingside, Color::White, CastleSide::Kingside),
            (parsed.castling.white_queenside, Color::White, CastleSide::Queenside),
            (parsed.castling.black_kingside, Color::Black, CastleSide::Kingside),
            (parsed.castling.black_queenside, Color::Black, CastleSide::Queenside),
        ];
        for (set, color, side) in flags {
            if set {
                castling.insert(color, side);
            }
        }
        Self::from_parts(
            Board::from_squares(parsed.placement),
            parsed.active_color,
            castling,
            parsed.en_passant,
        )
    }

    /// Converts the position to a FEN string with zeroed move counters.
    pub fn to_fen(&self) -> String {
        FenParser {
            placement: *self.board.squares(),
            active_color: self.side_to_move,
            castling: FenCastling {
                white_kingside: self.castling.has(Color::White, CastleSide::Kingside),
                white_queenside: self.castling.has(Color::White, CastleSide::Queenside),
                black_kingside: self.castling.has(Color::Black, CastleSide::Kingside),
                black_queenside: self.castling.has(Color::Black, CastleSide::Queenside),
            },
            en_passant: self.en_passant,
        }
        .to_fen()
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Returns the square of the king of the given color.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    /// Returns the piece and color at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.board.piece_at(sq)
    }

    // Mutators for move application. They keep the cached king squares in
    // step but leave other invariants to the caller.

    pub(crate) fn move_piece(&mut self, from: Square, to: Square, becomes: Option<Piece>) {
        if let Some((piece, color)) = self.board.clear(from) {
            let piece = becomes.unwrap_or(piece);
            self.board.set(to, piece, color);
            if piece == Piece::King {
                self.kings[color.index()] = to;
            }
        }
    }

    pub(crate) fn remove_piece(&mut self, sq: Square) -> Option<(Piece, Color)> {
        self.board.clear(sq)
    }

    pub(crate) fn castling_mut(&mut self) -> &mut CastlingRights {
        &mut self.castling
    }

    pub(crate) fn set_en_passant(&mut self, target: Option<Square>) {
        self.en_passant = target;
    }

    pub(crate) fn pass_turn(&mut self) {
        self.side_to_move = self.side_to_move.opposite();
    }
}

/// Square a pawn of `mover` would capture on `target` from, i.e. the square
/// of the pawn that double-pushed past `target`.
pub(crate) fn en_passant_victim(mover: Color, target: Square) -> Option<Square> {
    target.offset(0, -mover.pawn_direction())
}

fn en_passant_is_consistent(board: &Board, side_to_move: Color, target: Square) -> bool {
    let pusher = side_to_move.opposite();
    if target.rank_index() as i8 != pusher.pawn_rank() as i8 + pusher.pawn_direction() {
        return false;
    }
    let origin = target.offset(0, -pusher.pawn_direction());
    let landing = en_passant_victim(side_to_move, target);
    board.is_empty(target)
        && origin.is_some_and(|sq| board.is_empty(sq))
        && landing.and_then(|sq| board.piece_at(sq)) == Some((Piece::Pawn, pusher))
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let sq = Square::from_coords(file as i8, rank as i8).ok_or(fmt::Error)?;
                let c = match self.piece_at(sq) {
                    Some((piece, color)) => piece.to_fen_char(color),
                    None => '.',
                };
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        write!(f, "{} to move", self.side_to_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_fields() {
        let pos = Position::startpos();
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.castling(), CastlingRights::ALL);
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.king_square(Color::White), Square::E1);
        assert_eq!(pos.king_square(Color::Black), Square::E8);
        assert_eq!(pos.to_fen(), FenParser::STARTPOS);
    }

    #[test]
    fn fen_roundtrip_with_en_passant() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.en_passant(), Square::from_algebraic("e3"));
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn inconsistent_en_passant_is_dropped() {
        // No black pawn on d5 to have double-pushed past d6.
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - d6").unwrap();
        assert_eq!(pos.en_passant(), None);
    }

    #[test]
    fn castling_rights_are_normalized() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w KQkq -").unwrap();
        assert!(pos.castling().has(Color::White, CastleSide::Kingside));
        assert!(!pos.castling().has(Color::White, CastleSide::Queenside));
        assert!(!pos.castling().any(Color::Black));
    }

    #[test]
    fn king_count_is_enforced() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/4K3 w - -"),
            Err(PositionError::MissingKing(Color::Black))
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/3KK3 w - -"),
            Err(PositionError::ExtraKing(Color::White))
        );
    }

    #[test]
    fn pawns_on_back_rank_are_rejected() {
        assert_eq!(
            Position::from_fen("4k2P/8/8/8/8/8/8/4K3 w - -"),
            Err(PositionError::PawnOnBackRank(Square::H8))
        );
    }

    #[test]
    fn display_diagram() {
        let text = Position::startpos().to_string();
        assert!(text.starts_with("8 r n b q k b n r"));
        assert!(text.ends_with("White to move"));
    }
}
