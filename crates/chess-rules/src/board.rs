//! Square-array board.

use chess_core::{Color, Piece, Square};

use crate::Bitboard;

/// The contents of the 64 squares, indexed a1 = 0 .. h8 = 63.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<(Piece, Color)>; 64],
}

impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Self {
        Board {
            squares: [None; 64],
        }
    }

    /// Builds a board from raw square contents.
    pub const fn from_squares(squares: [Option<(Piece, Color)>; 64]) -> Self {
        Board { squares }
    }

    /// Returns the raw square contents.
    pub const fn squares(&self) -> &[Option<(Piece, Color)>; 64] {
        &self.squares
    }

    /// Returns the piece and color at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.squares[sq.index() as usize]
    }

    /// Returns true if nothing stands on the square.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Returns the color of the piece on the square, if any.
    #[inline]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.piece_at(sq).map(|(_, color)| color)
    }

    /// Puts a piece on the square, replacing whatever stood there.
    #[inline]
    pub fn set(&mut self, sq: Square, piece: Piece, color: Color) {
        self.squares[sq.index() as usize] = Some((piece, color));
    }

    /// Empties the square and returns its previous contents.
    #[inline]
    pub fn clear(&mut self, sq: Square) -> Option<(Piece, Color)> {
        self.squares[sq.index() as usize].take()
    }

    /// Returns the set of squares holding the given piece kind and color.
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.occupied_where(|p, c| p == piece && c == color)
    }

    /// Returns the set of squares holding any piece of the given color.
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied_where(|_, c| c == color)
    }

    fn occupied_where(&self, pred: impl Fn(Piece, Color) -> bool) -> Bitboard {
        let mut bb = Bitboard::EMPTY;
        for sq in Square::all() {
            if let Some((p, c)) = self.piece_at(sq) {
                if pred(p, c) {
                    bb.insert(sq);
                }
            }
        }
        bb
    }

    /// Returns the square of the king of the given color, scanning from a1.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| self.piece_at(sq) == Some((Piece::King, color)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let c = match self.squares[(rank * 8 + file) as usize] {
                    Some((piece, color)) => piece.to_fen_char(color),
                    None => '.',
                };
                write!(f, "{}", c)?;
            }
            if rank > 0 {
                write!(f, "/")?;
            }
        }
        Ok(())
    }
}
