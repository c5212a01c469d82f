//! Square sets packed into a `u64`, bit `i` standing for square `i`.
//!
//! The board itself is a square array; these sets only back the leaper
//! attack tables and the piece queries built on top of them.

use std::fmt;
use std::ops::BitAnd;

use chess_core::Square;

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    #[inline]
    const fn bit(sq: Square) -> u64 {
        1 << sq.index()
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_not_empty(self) -> bool {
        !self.is_empty()
    }

    /// Number of squares in the set.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & Self::bit(sq) != 0
    }

    #[inline]
    pub fn insert(&mut self, sq: Square) {
        self.0 |= Self::bit(sq);
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(*self).finish()
    }
}

/// Yields the squares of a set from a1 towards h8.
pub struct Squares(u64);

impl Iterator for Squares {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Square::from_index(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Squares {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = Squares;

    fn into_iter(self) -> Squares {
        Squares(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut set = Bitboard::EMPTY;
        assert!(set.is_empty());
        set.insert(Square::E1);
        set.insert(Square::E1);
        set.insert(Square::H8);
        assert_eq!(set.count(), 2);
        assert!(set.contains(Square::H8));
        assert!(!set.contains(Square::E8));
        assert_eq!(set.0, 1 << 4 | 1 << 63);
    }

    #[test]
    fn intersection() {
        let mut a = Bitboard::EMPTY;
        a.insert(Square::A1);
        a.insert(Square::B1);
        let mut b = Bitboard::EMPTY;
        b.insert(Square::B1);
        b.insert(Square::C1);
        assert_eq!((a & b).into_iter().collect::<Vec<_>>(), vec![Square::B1]);
        assert!((a & Bitboard::EMPTY).is_empty());
    }

    #[test]
    fn squares_come_out_in_index_order() {
        let set = Bitboard(0b1010 | 1 << 63);
        let squares: Vec<u8> = set.into_iter().map(|sq| sq.index()).collect();
        assert_eq!(squares, vec![1, 3, 63]);
        assert_eq!(set.into_iter().len(), 3);
    }

    #[test]
    fn debug_lists_squares() {
        let mut set = Bitboard::EMPTY;
        set.insert(Square::C8);
        set.insert(Square::A1);
        assert_eq!(format!("{:?}", set), "{Square(a1), Square(c8)}");
    }
}
