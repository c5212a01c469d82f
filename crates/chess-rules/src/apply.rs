//! Move application.

use chess_core::{Move, MoveFlag, Piece, Square};

use crate::position::en_passant_victim;
use crate::{CastleSide, Position};

/// Plays a classified move and returns the resulting position.
///
/// The move is assumed to be at least pseudo-legal; its flag decides which
/// special rule applies. The input position is left untouched.
pub fn make_move(position: &Position, mv: Move) -> Position {
    let mut next = position.clone();
    let us = position.side_to_move();
    let (from, to) = (mv.from(), mv.to());
    let moving = position.piece_at(from).map(|(piece, _)| piece);

    match mv.flag() {
        MoveFlag::EnPassant => {
            if let Some(victim) = en_passant_victim(us, to) {
                next.remove_piece(victim);
            }
        }
        MoveFlag::CastleKingside => {
            let side = CastleSide::Kingside;
            next.move_piece(side.rook_home(us), side.rook_target(us), None);
        }
        MoveFlag::CastleQueenside => {
            let side = CastleSide::Queenside;
            next.move_piece(side.rook_home(us), side.rook_target(us), None);
        }
        _ => {}
    }

    next.move_piece(from, to, mv.promotion());

    let rights = next.castling_mut();
    if moving == Some(Piece::King) {
        rights.remove_color(us);
    }
    // Leaving a rook home square, or capturing onto one, ends that right.
    for sq in [from, to] {
        if let Some((color, side)) = CastleSide::for_rook_home(sq) {
            rights.remove(color, side);
        }
    }

    let en_passant = match mv.flag() {
        MoveFlag::DoublePush => from.offset(0, us.pawn_direction()),
        _ => None,
    };
    next.set_en_passant(en_passant);
    next.pass_turn();
    next
}

/// Plays a raw move request, inferring its special-rule flag from the
/// position.
///
/// Like [`make_move`], this assumes the request is pseudo-legal.
pub fn apply(position: &Position, from: Square, to: Square, promotion: Option<Piece>) -> Position {
    make_move(position, infer_move(position, from, to, promotion))
}

fn infer_move(position: &Position, from: Square, to: Square, promotion: Option<Piece>) -> Move {
    let flag = match position.piece_at(from) {
        Some((Piece::Pawn, _)) => {
            let rank_delta = to.rank_index().abs_diff(from.rank_index());
            if let Some(flag) = promotion.and_then(MoveFlag::promotion) {
                flag
            } else if rank_delta == 2 {
                MoveFlag::DoublePush
            } else if from.file_index() != to.file_index()
                && position.board().is_empty(to)
                && position.en_passant() == Some(to)
            {
                MoveFlag::EnPassant
            } else {
                MoveFlag::Normal
            }
        }
        Some((Piece::King, color)) => match CastleSide::from_king_move(color, from, to) {
            Some(CastleSide::Kingside) => MoveFlag::CastleKingside,
            Some(CastleSide::Queenside) => MoveFlag::CastleQueenside,
            None => MoveFlag::Normal,
        },
        _ => MoveFlag::Normal,
    };
    Move::new(from, to, flag)
}
