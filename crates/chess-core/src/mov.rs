//! Classified moves and UCI text.

use std::fmt;

use crate::{Color, Piece, Square};

/// Which rule a move invokes beyond moving one piece.
///
/// Move requests only carry two squares and maybe a promotion piece; the
/// validator works out the flag so the applier can act on it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    /// Plain move or capture.
    Normal,
    /// Pawn advancing two ranks from its start rank.
    DoublePush,
    CastleKingside,
    CastleQueenside,
    /// Pawn capturing the pawn that just passed it.
    EnPassant,
    PromoteKnight,
    PromoteBishop,
    PromoteRook,
    PromoteQueen,
}

impl MoveFlag {
    /// The promotion flag for `piece`, if a pawn may become one.
    pub const fn promotion(piece: Piece) -> Option<Self> {
        Some(match piece {
            Piece::Knight => MoveFlag::PromoteKnight,
            Piece::Bishop => MoveFlag::PromoteBishop,
            Piece::Rook => MoveFlag::PromoteRook,
            Piece::Queen => MoveFlag::PromoteQueen,
            Piece::Pawn | Piece::King => return None,
        })
    }

    pub const fn promotion_piece(self) -> Option<Piece> {
        Some(match self {
            MoveFlag::PromoteKnight => Piece::Knight,
            MoveFlag::PromoteBishop => Piece::Bishop,
            MoveFlag::PromoteRook => Piece::Rook,
            MoveFlag::PromoteQueen => Piece::Queen,
            _ => return None,
        })
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion_piece().is_some()
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// A move the validator has accepted as matching a movement pattern.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    flag: MoveFlag,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        Move { from, to, flag }
    }

    /// A move with no special rule attached.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveFlag::Normal)
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        self.flag
    }

    /// What the pawn turns into, for promotions.
    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        self.flag.promotion_piece()
    }

    /// UCI long algebraic form, such as `e2e4` or `e7e8q`.
    pub fn to_uci(self) -> String {
        self.to_string()
    }

    /// Splits UCI text into origin, destination and promotion piece.
    ///
    /// The parts are not classified: whether `e1g1` castles depends on the
    /// position it is played in.
    pub fn parse_uci(s: &str) -> Option<(Square, Square, Option<Piece>)> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return None;
        }
        let (squares, suffix) = s.split_at(4);
        let from = Square::from_algebraic(&squares[..2])?;
        let to = Square::from_algebraic(&squares[2..])?;
        let promotion = match suffix.chars().next() {
            None => None,
            Some(c) => Some(Piece::from_fen_char(c)?.0).filter(|p| p.is_promotion_choice()),
        };
        if !suffix.is_empty() && promotion.is_none() {
            return None;
        }
        Some((from, to, promotion))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion() {
            write!(f, "{}", piece.to_fen_char(Color::Black))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}, {:?})", self, self.flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn accessors() {
        let m = Move::new(sq("e2"), sq("e4"), MoveFlag::DoublePush);
        assert_eq!((m.from(), m.to()), (sq("e2"), sq("e4")));
        assert_eq!(m.flag(), MoveFlag::DoublePush);
        assert_eq!(m.promotion(), None);
    }

    #[test]
    fn uci_text() {
        assert_eq!(Move::normal(Square::G1, Square::F1).to_uci(), "g1f1");
        assert_eq!(
            Move::new(sq("e7"), sq("e8"), MoveFlag::PromoteQueen).to_uci(),
            "e7e8q"
        );
        assert_eq!(
            format!("{:?}", Move::new(Square::E1, Square::G1, MoveFlag::CastleKingside)),
            "Move(e1g1, CastleKingside)"
        );
    }

    #[test]
    fn parse_uci() {
        assert_eq!(Move::parse_uci("e2e4"), Some((sq("e2"), sq("e4"), None)));
        assert_eq!(
            Move::parse_uci("a7a8Q"),
            Some((sq("a7"), sq("a8"), Some(Piece::Queen)))
        );
        assert_eq!(
            Move::parse_uci("b2b1n").map(|(_, _, p)| p),
            Some(Some(Piece::Knight))
        );
        for bad in ["e2", "e2e9", "e7e8k", "e7e8p", "e7e8x", "e7e8qq", "é2e4"] {
            assert!(Move::parse_uci(bad).is_none(), "{}", bad);
        }
    }

    #[test]
    fn promotion_flags() {
        for piece in Piece::PROMOTIONS {
            let flag = MoveFlag::promotion(piece).unwrap();
            assert!(flag.is_promotion());
            assert!(!flag.is_castling());
            assert_eq!(flag.promotion_piece(), Some(piece));
        }
        assert_eq!(MoveFlag::promotion(Piece::King), None);
        assert_eq!(MoveFlag::promotion(Piece::Pawn), None);
        assert!(MoveFlag::CastleQueenside.is_castling());
    }
}
