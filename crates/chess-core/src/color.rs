//! Side colors.

use std::fmt;

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 0 for White, 1 for Black; used to index per-color tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank step of a pawn advance: +1 for White, -1 for Black.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        1 - 2 * (self as i8)
    }

    /// Rank index of this side's pieces at the start: 0 or 7.
    #[inline]
    pub const fn back_rank(self) -> u8 {
        7 * self as u8
    }

    /// Rank index of this side's pawns at the start: 1 or 6.
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        (self.back_rank() as i8 + self.pawn_direction()) as u8
    }

    /// Rank index on which this side's pawns promote.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        self.opposite().back_rank()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "White",
            Color::Black => "Black",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_geometry() {
        assert_eq!(Color::White.pawn_direction(), 1);
        assert_eq!(Color::Black.pawn_direction(), -1);
        assert_eq!((Color::White.back_rank(), Color::Black.back_rank()), (0, 7));
        assert_eq!((Color::White.pawn_rank(), Color::Black.pawn_rank()), (1, 6));
        assert_eq!(
            (Color::White.promotion_rank(), Color::Black.promotion_rank()),
            (7, 0)
        );
    }

    #[test]
    fn opposite_is_an_involution() {
        for color in Color::ALL {
            assert_ne!(color.opposite(), color);
            assert_eq!(color.opposite().opposite(), color);
        }
    }

    #[test]
    fn display() {
        assert_eq!(Color::Black.to_string(), "Black");
    }
}
