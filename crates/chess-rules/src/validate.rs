//! Move legality.
//!
//! A raw request `(from, to, promotion)` is first classified against the
//! piece's movement pattern ([`classify`]); a classified move is legal when
//! playing it on a copy of the position does not leave the mover's king
//! attacked. Pins, discovered checks and walking into check all fall out of
//! that one trial application.

use chess_core::{Color, Move, MoveFlag, Piece, Square};

use crate::apply::make_move;
use crate::attacks::{
    first_blocker, is_attacked, king_attacks, knight_attacks, BISHOP_DIRECTIONS, ROOK_DIRECTIONS,
};
use crate::position::en_passant_victim;
use crate::{CastleSide, Position};

/// Classifies a move request by movement pattern, ignoring self-check.
///
/// Returns the move with its special-rule flag set, or `None` if the piece
/// on `from` does not belong to the side to move or cannot make the move.
/// A promotion piece must be given exactly when a pawn reaches the last
/// rank, and must be a knight, bishop, rook or queen.
pub fn classify(
    position: &Position,
    from: Square,
    to: Square,
    promotion: Option<Piece>,
) -> Option<Move> {
    if from == to {
        return None;
    }
    let (piece, us) = position.piece_at(from)?;
    if us != position.side_to_move() {
        return None;
    }
    if position.board().color_at(to) == Some(us) {
        return None;
    }

    if piece != Piece::Pawn && promotion.is_some() {
        return None;
    }
    let flag = match piece {
        Piece::Pawn => classify_pawn(position, us, from, to)?,
        Piece::Knight => return knight_attacks(from).contains(to).then(|| Move::normal(from, to)),
        Piece::Bishop => return slides_to(position, from, to, &BISHOP_DIRECTIONS),
        Piece::Rook => return slides_to(position, from, to, &ROOK_DIRECTIONS),
        Piece::Queen => {
            return slides_to(position, from, to, &BISHOP_DIRECTIONS)
                .or_else(|| slides_to(position, from, to, &ROOK_DIRECTIONS))
        }
        Piece::King => return classify_king(position, us, from, to),
    };

    let reaches_last_rank = to.rank_index() == us.promotion_rank();
    match (reaches_last_rank, promotion) {
        (false, None) => Some(Move::new(from, to, flag)),
        (true, Some(piece)) => MoveFlag::promotion(piece).map(|flag| Move::new(from, to, flag)),
        _ => None,
    }
}

/// Returns true if the move request fits the piece's movement pattern.
pub fn is_pseudo_legal(
    position: &Position,
    from: Square,
    to: Square,
    promotion: Option<Piece>,
) -> bool {
    classify(position, from, to, promotion).is_some()
}

/// Returns the classified move if it is fully legal.
pub fn legal_move(
    position: &Position,
    from: Square,
    to: Square,
    promotion: Option<Piece>,
) -> Option<Move> {
    classify(position, from, to, promotion).filter(|&mv| !leaves_king_in_check(position, mv))
}

/// Returns true if the move request is pseudo-legal and keeps the mover's
/// king safe.
pub fn is_legal(position: &Position, from: Square, to: Square, promotion: Option<Piece>) -> bool {
    legal_move(position, from, to, promotion).is_some()
}

/// Plays `mv` on a copy and reports whether the mover's king is attacked
/// afterwards.
pub fn leaves_king_in_check(position: &Position, mv: Move) -> bool {
    let us = position.side_to_move();
    let next = make_move(position, mv);
    is_attacked(next.board(), next.king_square(us), us.opposite())
}

/// Pawn pattern: single push, double push, capture, en passant. The
/// promotion decision is left to the caller.
fn classify_pawn(position: &Position, us: Color, from: Square, to: Square) -> Option<MoveFlag> {
    let board = position.board();
    let dir = us.pawn_direction();
    let file_delta = to.file_index() as i8 - from.file_index() as i8;
    let rank_delta = to.rank_index() as i8 - from.rank_index() as i8;

    match (file_delta, rank_delta) {
        (0, dr) if dr == dir => board.is_empty(to).then_some(MoveFlag::Normal),
        (0, dr) if dr == 2 * dir => {
            let skipped = from.offset(0, dir)?;
            (from.rank_index() == us.pawn_rank() && board.is_empty(skipped) && board.is_empty(to))
                .then_some(MoveFlag::DoublePush)
        }
        (-1 | 1, dr) if dr == dir => match board.color_at(to) {
            Some(color) if color != us => Some(MoveFlag::Normal),
            Some(_) => None,
            None => {
                let victim = en_passant_victim(us, to)?;
                (position.en_passant() == Some(to)
                    && board.piece_at(victim) == Some((Piece::Pawn, us.opposite())))
                .then_some(MoveFlag::EnPassant)
            }
        },
        _ => None,
    }
}

/// Slider pattern along one of `dirs` with every intermediate square empty.
fn slides_to(position: &Position, from: Square, to: Square, dirs: &[(i8, i8)]) -> Option<Move> {
    let file_delta = to.file_index() as i8 - from.file_index() as i8;
    let rank_delta = to.rank_index() as i8 - from.rank_index() as i8;
    let step = (file_delta.signum(), rank_delta.signum());
    let on_line = file_delta == 0 || rank_delta == 0 || file_delta.abs() == rank_delta.abs();
    if !on_line || !dirs.contains(&step) {
        return None;
    }
    // The first occupied square along the ray must be `to` itself, or the
    // ray must reach `to` through empty squares.
    match first_blocker(position.board(), from, step) {
        Some(blocker) => {
            let reach = (blocker.file_index() as i8 - from.file_index() as i8)
                .abs()
                .max((blocker.rank_index() as i8 - from.rank_index() as i8).abs());
            let want = file_delta.abs().max(rank_delta.abs());
            (want <= reach).then(|| Move::normal(from, to))
        }
        None => Some(Move::normal(from, to)),
    }
}

/// King pattern: one step anywhere, or castling.
fn classify_king(position: &Position, us: Color, from: Square, to: Square) -> Option<Move> {
    if king_attacks(from).contains(to) {
        return Some(Move::normal(from, to));
    }

    let side = CastleSide::from_king_move(us, from, to)?;
    if !position.castling().has(us, side) {
        return None;
    }
    let board = position.board();
    if board.piece_at(side.rook_home(us)) != Some((Piece::Rook, us)) {
        return None;
    }
    if side.between(us).iter().any(|&sq| !board.is_empty(sq)) {
        return None;
    }
    let them = us.opposite();
    let through = [from, side.rook_target(us), side.king_target(us)];
    if through.iter().any(|&sq| is_attacked(board, sq, them)) {
        return None;
    }
    let flag = match side {
        CastleSide::Kingside => MoveFlag::CastleKingside,
        CastleSide::Queenside => MoveFlag::CastleQueenside,
    };
    Some(Move::new(from, to, flag))
}
