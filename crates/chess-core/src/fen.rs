//! FEN (Forsyth-Edwards Notation) parsing and serialization.
//!
//! Only the first four fields carry information the rules engine keeps.
//! The halfmove clock and fullmove number are accepted when present and
//! otherwise ignored, so both `"<placement> w KQkq -"` and a full six-field
//! FEN parse.

use crate::{Color, Piece, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 or 6 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid move counter: {0}")]
    InvalidCounter(String),
}

/// The castling flags written in a FEN castling field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenCastling {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

/// A parsed FEN record.
///
/// This holds the decoded fields without enforcing chess invariants; the
/// rules engine validates and normalises them when building a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Square contents, indexed a1 = 0 .. h8 = 63.
    pub placement: [Option<(Piece, Color)>; 64],
    /// Side to move.
    pub active_color: Color,
    /// Castling availability.
    pub castling: FenCastling,
    /// En passant target square.
    pub en_passant: Option<Square>,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 4 && parts.len() != 6 {
            return Err(FenError::InvalidFieldCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let active_color = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = Self::parse_castling(parts[2])?;
        let en_passant = Self::parse_en_passant(parts[3])?;

        for counter in parts.iter().skip(4) {
            if counter.parse::<u32>().is_err() {
                return Err(FenError::InvalidCounter(counter.to_string()));
            }
        }

        Ok(FenParser {
            placement,
            active_color,
            castling,
            en_passant,
        })
    }

    fn parse_placement(field: &str) -> Result<[Option<(Piece, Color)>; 64], FenError> {
        let rows: Vec<&str> = field.split('/').collect();
        if rows.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                rows.len()
            )));
        }

        let mut placement = [None; 64];
        // FEN lists rank 8 first.
        for (row, rank) in rows.iter().zip((0..8u8).rev()) {
            let mut file = 0u8;
            for c in row.chars() {
                match (c.to_digit(10), Piece::from_fen_char(c)) {
                    (Some(run @ 1..=8), _) => file += run as u8,
                    (None, Some(piece)) => {
                        if file < 8 {
                            placement[Square::at(file, rank).index() as usize] = Some(piece);
                        }
                        file += 1;
                    }
                    _ => {
                        return Err(FenError::InvalidPiecePlacement(format!(
                            "unexpected '{}' on rank {}",
                            c,
                            rank + 1
                        )))
                    }
                }
                if file > 8 {
                    break;
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} does not cover 8 files",
                    rank + 1
                )));
            }
        }
        Ok(placement)
    }

    fn parse_castling(castling: &str) -> Result<FenCastling, FenError> {
        let mut rights = FenCastling::default();
        if castling == "-" {
            return Ok(rights);
        }
        for c in castling.chars() {
            let slot = match c {
                'K' => &mut rights.white_kingside,
                'Q' => &mut rights.white_queenside,
                'k' => &mut rights.black_kingside,
                'q' => &mut rights.black_queenside,
                _ => {
                    return Err(FenError::InvalidCastlingRights(format!(
                        "invalid character '{}' in '{}'",
                        c, castling
                    )))
                }
            };
            *slot = true;
        }
        Ok(rights)
    }

    fn parse_en_passant(ep: &str) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }
        match Square::from_algebraic(ep) {
            Some(sq) if sq.rank_index() == 2 || sq.rank_index() == 5 => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }

    /// Renders the record back to FEN with zeroed move counters.
    pub fn to_fen(&self) -> String {
        let rows: Vec<String> = (0..8u8)
            .rev()
            .map(|rank| {
                let mut row = String::new();
                let mut gap = 0;
                for file in 0..8u8 {
                    match self.placement[Square::at(file, rank).index() as usize] {
                        None => gap += 1,
                        Some((piece, color)) => {
                            if gap > 0 {
                                row.push_str(&gap.to_string());
                                gap = 0;
                            }
                            row.push(piece.to_fen_char(color));
                        }
                    }
                }
                if gap > 0 {
                    row.push_str(&gap.to_string());
                }
                row
            })
            .collect();

        let side = match self.active_color {
            Color::White => "w",
            Color::Black => "b",
        };
        let c = self.castling;
        let mut castling: String = [
            (c.white_kingside, 'K'),
            (c.white_queenside, 'Q'),
            (c.black_kingside, 'k'),
            (c.black_queenside, 'q'),
        ]
        .into_iter()
        .filter_map(|(set, letter)| set.then_some(letter))
        .collect();
        if castling.is_empty() {
            castling.push('-');
        }
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!("{} {} {} {} 0 1", rows.join("/"), side, castling, en_passant)
    }
}

impl Default for FenParser {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = FenParser::parse(FenParser::STARTPOS).unwrap();
        assert_eq!(fen.active_color, Color::White);
        assert!(fen.castling.white_kingside && fen.castling.black_queenside);
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.placement[4], Some((Piece::King, Color::White)));
        assert_eq!(fen.placement[59], Some((Piece::Queen, Color::Black)));
        assert_eq!(fen.placement[28], None);
    }

    #[test]
    fn four_field_form() {
        let fen = FenParser::parse("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(fen.active_color, Color::Black);
        assert_eq!(fen.castling, FenCastling::default());
    }

    #[test]
    fn roundtrip() {
        let original = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        assert_eq!(FenParser::parse(original).unwrap().to_fen(), original);
        assert_eq!(FenParser::default().to_fen(), FenParser::STARTPOS);
    }

    #[test]
    fn partial_castling() {
        let fen = FenParser::parse("8/8/8/8/8/8/8/8 w Kq - 0 1").unwrap();
        assert!(fen.castling.white_kingside);
        assert!(!fen.castling.white_queenside);
        assert!(!fen.castling.black_kingside);
        assert!(fen.castling.black_queenside);
        assert!(fen.to_fen().contains(" Kq "));
    }

    #[test]
    fn invalid_fields() {
        assert!(matches!(
            FenParser::parse("invalid"),
            Err(FenError::InvalidFieldCount(1))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::InvalidActiveColor(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - x 1"),
            Err(FenError::InvalidCounter(_))
        ));
    }

    #[test]
    fn invalid_placement() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            FenParser::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            FenParser::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn error_display() {
        let err = FenError::InvalidActiveColor("x".to_string());
        assert!(err.to_string().contains("'x'"));
        assert!(FenError::InvalidFieldCount(3).to_string().contains('3'));
    }
}
