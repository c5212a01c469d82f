//! The encoded-state move entry point.
//!
//! [`process_move`] is the one operation a host needs: it takes a packed
//! state and a raw move request and either returns the packed successor or
//! says exactly why the request was refused. It is a pure function of its
//! inputs; nothing is cached between calls.

use chess_core::{Color, Move, Piece, Square};
use thiserror::Error;

use crate::apply::make_move;
use crate::codec::{decode, encode, piece_from_code, DecodeError, EncodedState};
use crate::validate::{classify, leaves_king_in_check};
use crate::Position;

/// Reasons a move request is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("square index out of range or repeated: from {from}, to {to}")]
    InvalidSquareIndex { from: u8, to: u8 },

    #[error("piece on {0} does not belong to the side to move")]
    WrongTurn(Square),

    #[error("illegal move {from}{to}")]
    IllegalMove { from: Square, to: Square },

    #[error("move {from}{to} leaves own king in check")]
    MoveLeavesOwnKingInCheck { from: Square, to: Square },

    #[error("corrupted state: {0}")]
    CorruptedEncoding(#[from] DecodeError),

    #[error("invalid UCI move: {0:?}")]
    InvalidNotation(String),
}

/// Checks a move request against a position and returns the classified move.
///
/// Errors are reported in a fixed order: an empty origin, a piece of the
/// wrong color, a malformed promotion, a movement-pattern violation, and
/// finally self-check.
pub fn validate_move(
    position: &Position,
    from: Square,
    to: Square,
    promotion: Option<Piece>,
) -> Result<Move, MoveError> {
    let Some((_, color)) = position.piece_at(from) else {
        return Err(MoveError::IllegalMove { from, to });
    };
    if color != position.side_to_move() {
        return Err(MoveError::WrongTurn(from));
    }
    let mv = classify(position, from, to, promotion).ok_or(MoveError::IllegalMove { from, to })?;
    if leaves_king_in_check(position, mv) {
        return Err(MoveError::MoveLeavesOwnKingInCheck { from, to });
    }
    Ok(mv)
}

/// Validates and plays a move request, returning the successor position.
pub fn play(
    position: &Position,
    from: Square,
    to: Square,
    promotion: Option<Piece>,
) -> Result<Position, MoveError> {
    let mv = validate_move(position, from, to, promotion)?;
    Ok(make_move(position, mv))
}

/// Reads a promotion code: 0 for none, otherwise the piece code of a knight,
/// bishop, rook or queen of the mover's color.
fn promotion_from_code(code: u8, mover: Color) -> Option<Option<Piece>> {
    if code == 0 {
        return Some(None);
    }
    match piece_from_code(code) {
        Some((piece, color)) if color == mover && piece.is_promotion_choice() => Some(Some(piece)),
        _ => None,
    }
}

/// Decodes `state`, validates the move `from -> to` with the given promotion
/// code, and returns the encoded successor.
///
/// Square indices are 0..64 with a1 = 0 and h8 = 63. The input state is
/// never modified; on error the caller's state remains current.
pub fn process_move(
    state: EncodedState,
    from: u8,
    to: u8,
    promotion: u8,
) -> Result<EncodedState, MoveError> {
    let result = process_move_inner(state, from, to, promotion);
    match &result {
        Ok(_) => tracing::debug!(from, to, promotion, "move accepted"),
        Err(MoveError::CorruptedEncoding(err)) => {
            tracing::warn!(state = %state, "rejecting corrupted state: {}", err)
        }
        Err(err) => tracing::debug!(from, to, promotion, "move rejected: {}", err),
    }
    result
}

fn process_move_inner(
    state: EncodedState,
    from: u8,
    to: u8,
    promotion: u8,
) -> Result<EncodedState, MoveError> {
    let (Some(from_sq), Some(to_sq)) = (Square::from_index(from), Square::from_index(to)) else {
        return Err(MoveError::InvalidSquareIndex { from, to });
    };
    if from_sq == to_sq {
        return Err(MoveError::InvalidSquareIndex { from, to });
    }

    let position = decode(state)?;
    let illegal = MoveError::IllegalMove {
        from: from_sq,
        to: to_sq,
    };
    let Some((_, color)) = position.piece_at(from_sq) else {
        return Err(illegal);
    };
    if color != position.side_to_move() {
        return Err(MoveError::WrongTurn(from_sq));
    }
    let promotion = promotion_from_code(promotion, color).ok_or(illegal)?;

    let next = play(&position, from_sq, to_sq, promotion)?;
    Ok(encode(&next))
}

/// [`process_move`] with the move given in UCI notation, e.g. `e2e4` or
/// `e7e8q`.
pub fn process_move_uci(state: EncodedState, uci: &str) -> Result<EncodedState, MoveError> {
    let (from, to, promotion) =
        Move::parse_uci(uci).ok_or_else(|| MoveError::InvalidNotation(uci.to_string()))?;
    let position = decode(state).map_err(|err| {
        tracing::warn!(state = %state, "rejecting corrupted state: {}", err);
        MoveError::from(err)
    })?;
    let next = play(&position, from, to, promotion)?;
    tracing::debug!(uci, "move accepted");
    Ok(encode(&next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{initial_state, piece_code};

    fn idx(name: &str) -> u8 {
        Square::from_algebraic(name).unwrap().index()
    }

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn state(fen: &str) -> EncodedState {
        encode(&Position::from_fen(fen).unwrap())
    }

    #[test]
    fn opening_move_roundtrips_through_encoding() {
        let next = process_move(initial_state(), idx("e2"), idx("e4"), 0).unwrap();
        let position = decode(next).unwrap();
        assert_eq!(
            position.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn square_index_errors_come_first() {
        assert_eq!(
            process_move(EncodedState::ZERO, 64, 0, 0),
            Err(MoveError::InvalidSquareIndex { from: 64, to: 0 })
        );
        assert_eq!(
            process_move(initial_state(), 12, 12, 0),
            Err(MoveError::InvalidSquareIndex { from: 12, to: 12 })
        );
    }

    #[test]
    fn corrupted_state_is_reported() {
        assert!(matches!(
            process_move(EncodedState::ZERO, idx("e2"), idx("e4"), 0),
            Err(MoveError::CorruptedEncoding(_))
        ));
    }

    #[test]
    fn empty_origin_is_illegal() {
        assert_eq!(
            process_move(initial_state(), idx("e4"), idx("e5"), 0),
            Err(MoveError::IllegalMove {
                from: sq("e4"),
                to: sq("e5")
            })
        );
    }

    #[test]
    fn wrong_turn() {
        assert_eq!(
            process_move(initial_state(), idx("e7"), idx("e5"), 0),
            Err(MoveError::WrongTurn(sq("e7")))
        );
    }

    #[test]
    fn promotion_codes() {
        let s = state("4k3/P7/8/8/8/8/8/4K3 w - -");
        let white_queen = piece_code(Piece::Queen, Color::White);
        let black_queen = piece_code(Piece::Queen, Color::Black);
        let white_king = piece_code(Piece::King, Color::White);

        let next = process_move(s, idx("a7"), idx("a8"), white_queen).unwrap();
        assert_eq!(
            decode(next).unwrap().piece_at(sq("a8")),
            Some((Piece::Queen, Color::White))
        );
        for bad in [0, black_queen, white_king, 13, 200] {
            assert!(
                matches!(
                    process_move(s, idx("a7"), idx("a8"), bad),
                    Err(MoveError::IllegalMove { .. })
                ),
                "code {}",
                bad
            );
        }
        // A promotion code on an ordinary move is refused too.
        assert!(matches!(
            process_move(s, idx("e1"), idx("d1"), white_queen),
            Err(MoveError::IllegalMove { .. })
        ));
    }

    #[test]
    fn self_check_error() {
        let s = state("4r1k1/8/8/8/8/8/4N3/4K3 w - -");
        assert_eq!(
            process_move(s, idx("e2"), idx("c3"), 0),
            Err(MoveError::MoveLeavesOwnKingInCheck {
                from: sq("e2"),
                to: sq("c3")
            })
        );
    }

    #[test]
    fn uci_entry_point() {
        let next = process_move_uci(initial_state(), "g1f3").unwrap();
        assert_eq!(
            decode(next).unwrap().piece_at(sq("f3")),
            Some((Piece::Knight, Color::White))
        );
        assert_eq!(
            process_move_uci(initial_state(), "z9"),
            Err(MoveError::InvalidNotation("z9".to_string()))
        );
    }

    #[test]
    fn play_leaves_input_untouched() {
        let start = Position::startpos();
        let next = play(&start, sq("d2"), sq("d4"), None).unwrap();
        assert_ne!(next, start);
        assert_eq!(start, Position::startpos());
    }
}
