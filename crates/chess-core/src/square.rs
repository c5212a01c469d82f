//! Board coordinates.

use std::fmt;

/// One of the 64 squares, numbered a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ...,
/// h8 = 63.
///
/// The number is also the square's slot in a packed state, so it never
/// changes meaning.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square::at(0, 0);
    pub const B1: Square = Square::at(1, 0);
    pub const C1: Square = Square::at(2, 0);
    pub const D1: Square = Square::at(3, 0);
    pub const E1: Square = Square::at(4, 0);
    pub const F1: Square = Square::at(5, 0);
    pub const G1: Square = Square::at(6, 0);
    pub const H1: Square = Square::at(7, 0);
    pub const A8: Square = Square::at(0, 7);
    pub const B8: Square = Square::at(1, 7);
    pub const C8: Square = Square::at(2, 7);
    pub const D8: Square = Square::at(3, 7);
    pub const E8: Square = Square::at(4, 7);
    pub const F8: Square = Square::at(5, 7);
    pub const G8: Square = Square::at(6, 7);
    pub const H8: Square = Square::at(7, 7);

    /// Square at `file` and `rank` indices, both 0..8.
    ///
    /// # Panics
    ///
    /// Panics if either index is 8 or more.
    #[inline]
    pub const fn at(file: u8, rank: u8) -> Self {
        assert!(file < 8 && rank < 8, "square coordinates out of range");
        Square(rank * 8 + file)
    }

    /// Square with the given number, if it is below 64.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Square at signed coordinates, or `None` off the board.
    #[inline]
    pub const fn from_coords(file: i8, rank: i8) -> Option<Self> {
        if file < 0 || file > 7 || rank < 0 || rank > 7 {
            return None;
        }
        Some(Square(rank as u8 * 8 + file as u8))
    }

    /// All squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }

    /// Parses a coordinate such as `e4` (the file letter may be uppercase).
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let (file, rank) = (chars.next()?, chars.next()?);
        if chars.next().is_some() {
            return None;
        }
        let file = "abcdefgh".find(file.to_ascii_lowercase())?;
        let rank = "12345678".find(rank)?;
        Some(Square::at(file as u8, rank as u8))
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn file_index(self) -> u8 {
        self.0 & 7
    }

    #[inline]
    pub const fn rank_index(self) -> u8 {
        self.0 >> 3
    }

    /// The square `file_delta` files and `rank_delta` ranks away, if it is
    /// still on the board.
    #[inline]
    pub const fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        Self::from_coords(
            self.file_index() as i8 + file_delta,
            self.rank_index() as i8 + rank_delta,
        )
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file_index()) as char;
        let rank = (b'1' + self.rank_index()) as char;
        write!(f, "{}{}", file, rank)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering() {
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(e4.index(), 28);
        assert_eq!((e4.file_index(), e4.rank_index()), (4, 3));
        assert_eq!(Square::at(4, 3), e4);
        assert_eq!(Square::H8.index(), 63);
        assert_eq!(Square::all().count(), 64);
        assert!(Square::all().zip(0..).all(|(sq, i)| sq.index() == i));
    }

    #[test]
    fn parsing() {
        assert_eq!(Square::from_algebraic("a1"), Some(Square::A1));
        assert_eq!(Square::from_algebraic("H8"), Some(Square::H8));
        for bad in ["", "e", "i1", "a0", "a9", "e44", "4e"] {
            assert_eq!(Square::from_algebraic(bad), None, "{:?}", bad);
        }
    }

    #[test]
    fn index_bounds() {
        assert_eq!(Square::from_index(63), Some(Square::H8));
        assert_eq!(Square::from_index(64), None);
        assert_eq!(Square::from_coords(-1, 0), None);
        assert_eq!(Square::from_coords(7, 8), None);
    }

    #[test]
    fn offsets_stay_on_board() {
        assert_eq!(Square::E1.offset(2, 0), Some(Square::G1));
        assert_eq!(Square::B1.offset(-1, 7), Some(Square::A8));
        assert_eq!(Square::A1.offset(-1, 0), None);
        assert_eq!(Square::H1.offset(1, 1), None);
        assert_eq!(Square::A8.offset(0, 1), None);
    }

    #[test]
    fn text() {
        assert_eq!(Square::G8.to_string(), "g8");
        assert_eq!(format!("{:?}", Square::C1), "Square(c1)");
    }
}
