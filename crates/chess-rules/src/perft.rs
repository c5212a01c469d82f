//! Perft node counting.
//!
//! Counts the leaves of the legal move tree down to a fixed depth. The
//! published counts for a few well-known positions pin down every corner
//! of move legality.

use crate::apply::make_move;
use crate::terminal::legal_moves;
use crate::Position;

/// Counts the leaf nodes at the given depth.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|&m| perft(&make_move(position, m), depth - 1))
        .sum()
}

/// Perft split by root move, sorted by UCI notation.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = legal_moves(position)
        .into_iter()
        .map(|m| {
            let nodes = if depth > 1 {
                perft(&make_move(position, m), depth - 1)
            } else {
                1
            };
            (m.to_uci(), nodes)
        })
        .collect();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (FEN, node counts for depth 1, 2, ...)
    const REFERENCE: &[(&str, &[u64])] = &[
        (
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            &[20, 400, 8902],
        ),
        // "Kiwipete": castling, en passant, pins and promotions together.
        (
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            &[48, 2039],
        ),
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2812]),
        (
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            &[6, 264],
        ),
    ];

    #[test]
    fn matches_reference_counts() {
        for (fen, counts) in REFERENCE {
            let position = Position::from_fen(fen).unwrap();
            for (depth, &expected) in (1..).zip(counts.iter()) {
                assert_eq!(perft(&position, depth), expected, "{} at depth {}", fen, depth);
            }
        }
    }

    #[test]
    fn depth_zero_is_one_node() {
        assert_eq!(perft(&Position::startpos(), 0), 1);
    }

    #[test]
    fn divide_sums_to_perft() {
        let divide = perft_divide(&Position::startpos(), 2);
        assert_eq!(divide.len(), 20);
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 400);
        assert!(divide.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(divide.contains(&("e2e4".to_string(), 20)));
    }
}
