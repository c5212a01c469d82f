//! Piece kinds.

use std::fmt;

use crate::Color;

/// Kind of a chess piece, independent of its color.
///
/// The discriminants are stable: they order the kinds the way the packed
/// state code table does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

/// Lowercase FEN letters, indexed by discriminant.
const LETTERS: [char; 6] = ['p', 'n', 'b', 'r', 'q', 'k'];

impl Piece {
    /// Every kind, ordered by discriminant.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Kinds a pawn may become on the last rank.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

    /// FEN letter: uppercase for White, lowercase for Black.
    pub const fn to_fen_char(self, color: Color) -> char {
        let letter = LETTERS[self as usize];
        match color {
            Color::White => letter.to_ascii_uppercase(),
            Color::Black => letter,
        }
    }

    /// Reads a FEN letter back into a kind and color.
    pub const fn from_fen_char(c: char) -> Option<(Piece, Color)> {
        let lower = c.to_ascii_lowercase();
        let mut i = 0;
        while i < LETTERS.len() {
            if LETTERS[i] == lower {
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                return Some((Piece::ALL[i], color));
            }
            i += 1;
        }
        None
    }

    #[inline]
    pub const fn is_promotion_choice(self) -> bool {
        !matches!(self, Piece::Pawn | Piece::King)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Piece::Pawn => "pawn",
            Piece::Knight => "knight",
            Piece::Bishop => "bishop",
            Piece::Rook => "rook",
            Piece::Queen => "queen",
            Piece::King => "king",
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_roundtrip() {
        for piece in Piece::ALL {
            for color in Color::ALL {
                let c = piece.to_fen_char(color);
                assert_eq!(Piece::from_fen_char(c), Some((piece, color)));
            }
        }
        assert_eq!(Piece::Knight.to_fen_char(Color::White), 'N');
        assert_eq!(Piece::Queen.to_fen_char(Color::Black), 'q');
    }

    #[test]
    fn unknown_letters() {
        for c in ['x', 'X', '1', '/', ' '] {
            assert_eq!(Piece::from_fen_char(c), None, "{:?}", c);
        }
    }

    #[test]
    fn promotion_choices() {
        let choices: Vec<Piece> = Piece::ALL
            .into_iter()
            .filter(|p| p.is_promotion_choice())
            .collect();
        assert_eq!(choices, Piece::PROMOTIONS);
    }

    #[test]
    fn display_names() {
        assert_eq!(Piece::Bishop.to_string(), "bishop");
    }
}
