//! Castling rights and castling geometry.

use chess_core::{Color, Piece, Square};

use crate::Board;

/// The two wings a king can castle towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    /// Home square of the king of `color`.
    #[inline]
    pub const fn king_home(color: Color) -> Square {
        match color {
            Color::White => Square::E1,
            Color::Black => Square::E8,
        }
    }

    /// Home square of the rook that castles on this side.
    #[inline]
    pub const fn rook_home(self, color: Color) -> Square {
        match (self, color) {
            (CastleSide::Kingside, Color::White) => Square::H1,
            (CastleSide::Queenside, Color::White) => Square::A1,
            (CastleSide::Kingside, Color::Black) => Square::H8,
            (CastleSide::Queenside, Color::Black) => Square::A8,
        }
    }

    /// Where the king lands.
    #[inline]
    pub const fn king_target(self, color: Color) -> Square {
        let file = match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        };
        Square::at(file, color.back_rank())
    }

    /// Where the rook lands; also the square the king passes over.
    #[inline]
    pub const fn rook_target(self, color: Color) -> Square {
        let file = match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        };
        Square::at(file, color.back_rank())
    }

    /// Squares strictly between king and rook, which must all be empty.
    pub fn between(self, color: Color) -> &'static [Square] {
        const WHITE_KING: [Square; 2] = [Square::F1, Square::G1];
        const WHITE_QUEEN: [Square; 3] = [Square::D1, Square::C1, Square::B1];
        const BLACK_KING: [Square; 2] = [Square::F8, Square::G8];
        const BLACK_QUEEN: [Square; 3] = [Square::D8, Square::C8, Square::B8];
        match (self, color) {
            (CastleSide::Kingside, Color::White) => &WHITE_KING,
            (CastleSide::Queenside, Color::White) => &WHITE_QUEEN,
            (CastleSide::Kingside, Color::Black) => &BLACK_KING,
            (CastleSide::Queenside, Color::Black) => &BLACK_QUEEN,
        }
    }

    /// Recognises a king move from its home square to a castling target.
    pub fn from_king_move(color: Color, from: Square, to: Square) -> Option<CastleSide> {
        if from != Self::king_home(color) {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|side| side.king_target(color) == to)
    }

    /// Identifies which right, if any, is tied to a rook home square.
    pub fn for_rook_home(sq: Square) -> Option<(Color, CastleSide)> {
        match sq {
            Square::H1 => Some((Color::White, CastleSide::Kingside)),
            Square::A1 => Some((Color::White, CastleSide::Queenside)),
            Square::H8 => Some((Color::Black, CastleSide::Kingside)),
            Square::A8 => Some((Color::Black, CastleSide::Queenside)),
            _ => None,
        }
    }
}

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => Self::WHITE_KINGSIDE,
            (Color::White, CastleSide::Queenside) => Self::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::Kingside) => Self::BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queenside) => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if `color` may still castle on `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    /// Returns true if `color` holds either right.
    #[inline]
    pub const fn any(self, color: Color) -> bool {
        self.has(color, CastleSide::Kingside) || self.has(color, CastleSide::Queenside)
    }

    /// Grants a single right.
    #[inline]
    pub fn insert(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::flag(color, side);
    }

    /// Revokes a single right.
    #[inline]
    pub fn remove(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::flag(color, side);
    }

    /// Revokes both rights of a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove(color, CastleSide::Kingside);
        self.remove(color, CastleSide::Queenside);
    }

    /// Drops every right whose king or rook is not on its home square.
    pub fn normalized(self, board: &Board) -> Self {
        let mut rights = self;
        for color in Color::ALL {
            for side in CastleSide::ALL {
                let king_home = board.piece_at(CastleSide::king_home(color));
                let rook_home = board.piece_at(side.rook_home(color));
                if king_home != Some((Piece::King, color)) || rook_home != Some((Piece::Rook, color))
                {
                    rights.remove(color, side);
                }
            }
        }
        rights
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rights_flags() {
        let mut rights = CastlingRights::ALL;
        assert!(rights.has(Color::White, CastleSide::Kingside));
        rights.remove(Color::White, CastleSide::Kingside);
        assert!(!rights.has(Color::White, CastleSide::Kingside));
        assert!(rights.has(Color::White, CastleSide::Queenside));
        rights.remove_color(Color::Black);
        assert!(!rights.any(Color::Black));
        assert!(rights.any(Color::White));
        rights.insert(Color::Black, CastleSide::Queenside);
        assert_eq!(rights.raw(), CastlingRights::WHITE_QUEENSIDE | CastlingRights::BLACK_QUEENSIDE);
    }

    #[test]
    fn geometry() {
        assert_eq!(CastleSide::Kingside.king_target(Color::White), Square::G1);
        assert_eq!(CastleSide::Kingside.rook_target(Color::White), Square::F1);
        assert_eq!(CastleSide::Queenside.king_target(Color::Black), Square::C8);
        assert_eq!(CastleSide::Queenside.rook_target(Color::Black), Square::D8);
        assert_eq!(CastleSide::Queenside.between(Color::White).len(), 3);
    }

    #[test]
    fn recognises_king_moves() {
        assert_eq!(
            CastleSide::from_king_move(Color::White, Square::E1, Square::G1),
            Some(CastleSide::Kingside)
        );
        assert_eq!(
            CastleSide::from_king_move(Color::Black, Square::E8, Square::C8),
            Some(CastleSide::Queenside)
        );
        assert_eq!(CastleSide::from_king_move(Color::White, Square::E1, Square::F1), None);
        assert_eq!(CastleSide::from_king_move(Color::Black, Square::E1, Square::G1), None);
    }

    #[test]
    fn normalization_requires_king_and_rook() {
        let mut board = Board::empty();
        board.set(Square::E1, Piece::King, Color::White);
        board.set(Square::H1, Piece::Rook, Color::White);
        board.set(Square::A8, Piece::Rook, Color::Black);
        let rights = CastlingRights::ALL.normalized(&board);
        assert!(rights.has(Color::White, CastleSide::Kingside));
        assert!(!rights.has(Color::White, CastleSide::Queenside));
        assert!(!rights.any(Color::Black));
    }
}
