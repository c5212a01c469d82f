//! Square attack detection.
//!
//! Leaper attacks (pawn, knight, king) come from tables computed at compile
//! time. Slider attacks walk rays over the board and stop at the first
//! occupied square, whatever its color.

use chess_core::{Color, Piece, Square};

use crate::{Bitboard, Board};

/// Orthogonal ray directions as (file, rank) steps.
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Diagonal ray directions as (file, rank) steps.
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Precomputed knight attack tables.
const KNIGHT_ATTACKS: [Bitboard; 64] = compute_leaper_attacks(&KNIGHT_OFFSETS);

/// Precomputed king attack tables.
const KING_ATTACKS: [Bitboard; 64] = compute_leaper_attacks(&KING_OFFSETS);

/// Precomputed pawn attack tables [color][square].
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    compute_leaper_attacks(&[(-1, 1), (1, 1)]),
    compute_leaper_attacks(&[(-1, -1), (1, -1)]),
];

const fn compute_leaper_attacks(offsets: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut bb = 0u64;
        let mut i = 0;
        while i < offsets.len() {
            let f = file + offsets[i].0;
            let r = rank + offsets[i].1;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bb |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }
        attacks[sq as usize] = Bitboard(bb);
        sq += 1;
    }
    attacks
}

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Returns the squares a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Walks from `from` in direction `dir` and returns the first occupied
/// square, if the ray meets one before leaving the board.
pub fn first_blocker(board: &Board, from: Square, dir: (i8, i8)) -> Option<Square> {
    let mut cur = from;
    while let Some(next) = cur.offset(dir.0, dir.1) {
        if !board.is_empty(next) {
            return Some(next);
        }
        cur = next;
    }
    None
}

/// Returns true if any piece of `by` could move to `sq` by its movement
/// pattern alone.
///
/// Whose turn it is, what stands on `sq`, and whether the attacker is
/// pinned are all ignored. Pawns attack only diagonally forward; en passant
/// plays no part.
pub fn is_attacked(board: &Board, sq: Square, by: Color) -> bool {
    // A pawn of `by` attacks `sq` iff a pawn of the other color on `sq`
    // would attack the pawn's square.
    if (pawn_attacks(sq, by.opposite()) & board.pieces_of(Piece::Pawn, by)).is_not_empty() {
        return true;
    }
    if (knight_attacks(sq) & board.pieces_of(Piece::Knight, by)).is_not_empty() {
        return true;
    }
    if (king_attacks(sq) & board.pieces_of(Piece::King, by)).is_not_empty() {
        return true;
    }

    let slides = |dirs: &[(i8, i8)], piece: Piece| {
        dirs.iter().any(|&dir| {
            first_blocker(board, sq, dir).is_some_and(|blocker| {
                matches!(board.piece_at(blocker), Some((p, c)) if c == by && (p == piece || p == Piece::Queen))
            })
        })
    };
    slides(&ROOK_DIRECTIONS, Piece::Rook) || slides(&BISHOP_DIRECTIONS, Piece::Bishop)
}
