//! Check, checkmate and stalemate detection.

use chess_core::{Color, Move, Piece, Square};

use crate::attacks::is_attacked;
use crate::validate::legal_move;
use crate::Position;

const NO_PROMOTION: [Option<Piece>; 1] = [None];
const PROMOTIONS: [Option<Piece>; 4] = [
    Some(Piece::Knight),
    Some(Piece::Bishop),
    Some(Piece::Rook),
    Some(Piece::Queen),
];

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    /// The side to move is mated.
    Checkmate { winner: Color },
    /// The side to move has no legal move and is not in check.
    Stalemate,
}

impl GameOutcome {
    /// Returns the winner, or `None` for a draw.
    pub fn winner(self) -> Option<Color> {
        match self {
            GameOutcome::Checkmate { winner } => Some(winner),
            GameOutcome::Stalemate => None,
        }
    }
}

/// Returns true if the side to move's king is attacked.
pub fn in_check(position: &Position) -> bool {
    let us = position.side_to_move();
    is_attacked(position.board(), position.king_square(us), us.opposite())
}

/// Every `(from, to, promotion)` request worth asking the validator about:
/// pieces of the side to move paired with every square, and a pawn reaching
/// the last rank paired with each promotion choice.
fn candidates(position: &Position) -> impl Iterator<Item = (Square, Square, Option<Piece>)> + '_ {
    let us = position.side_to_move();
    position.board().occupied_by(us).into_iter().flat_map(move |from| {
        let is_pawn = position.piece_at(from).map(|(piece, _)| piece) == Some(Piece::Pawn);
        Square::all()
            .filter(move |&to| position.board().color_at(to) != Some(us))
            .flat_map(move |to| {
                let promotions: &'static [Option<Piece>] =
                    if is_pawn && to.rank_index() == us.promotion_rank() {
                        &PROMOTIONS
                    } else {
                        &NO_PROMOTION
                    };
                promotions.iter().map(move |&promo| (from, to, promo))
            })
    })
}

/// Returns true if the side to move has at least one legal move.
pub fn has_any_legal_move(position: &Position) -> bool {
    candidates(position).any(|(from, to, promo)| legal_move(position, from, to, promo).is_some())
}

/// Lists every legal move of the side to move.
pub fn legal_moves(position: &Position) -> Vec<Move> {
    candidates(position)
        .filter_map(|(from, to, promo)| legal_move(position, from, to, promo))
        .collect()
}

/// Returns true if the side to move is in check with no legal move.
pub fn is_checkmate(position: &Position) -> bool {
    in_check(position) && !has_any_legal_move(position)
}

/// Returns true if the side to move is not in check and has no legal move.
pub fn is_stalemate(position: &Position) -> bool {
    !in_check(position) && !has_any_legal_move(position)
}

/// Returns how the game ended, or `None` while the side to move can play.
pub fn outcome(position: &Position) -> Option<GameOutcome> {
    if has_any_legal_move(position) {
        return None;
    }
    if in_check(position) {
        Some(GameOutcome::Checkmate {
            winner: position.side_to_move().opposite(),
        })
    } else {
        Some(GameOutcome::Stalemate)
    }
}
