//! Properties that hold along any sequence of legal moves.

use chess_rules::{
    decode, encode, in_check, initial_state, is_attacked, is_checkmate, is_stalemate, legal_moves,
    make_move, process_move, EncodedState, MoveFlag, Position,
};
use proptest::prelude::*;

/// Plays a random legal game prefix, picking the move at `choice % n` each
/// ply, and returns every position reached along the way.
fn random_line(choices: &[usize]) -> Vec<Position> {
    let mut line = vec![Position::startpos()];
    for &choice in choices {
        let Some(current) = line.last() else { break };
        let moves = legal_moves(current);
        if moves.is_empty() {
            break;
        }
        let next = make_move(current, moves[choice % moves.len()]);
        line.push(next);
    }
    line
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn encoding_roundtrips(choices in prop::collection::vec(any::<usize>(), 0..40)) {
        for position in random_line(&choices) {
            prop_assert_eq!(decode(encode(&position)).unwrap(), position);
        }
    }

    #[test]
    fn accepted_moves_alternate_turns_and_are_deterministic(
        choices in prop::collection::vec(any::<usize>(), 1..30),
    ) {
        let line = random_line(&choices);
        for pair in line.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            prop_assert_eq!(after.side_to_move(), before.side_to_move().opposite());

            let state = encode(before);
            let mv = legal_moves(before)
                .into_iter()
                .find(|&m| make_move(before, m) == *after)
                .unwrap();
            let code = mv.promotion().map_or(0, |p| chess_rules::codec::piece_code(p, before.side_to_move()));
            let first = process_move(state, mv.from().index(), mv.to().index(), code).unwrap();
            let second = process_move(state, mv.from().index(), mv.to().index(), code).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(first, encode(after));
        }
    }

    #[test]
    fn no_legal_move_leaves_own_king_attacked(
        choices in prop::collection::vec(any::<usize>(), 0..30),
    ) {
        for position in random_line(&choices) {
            let us = position.side_to_move();
            for mv in legal_moves(&position) {
                let next = make_move(&position, mv);
                prop_assert!(!is_attacked(next.board(), next.king_square(us), us.opposite()));
            }
        }
    }

    #[test]
    fn terminal_states_are_exclusive(choices in prop::collection::vec(any::<usize>(), 0..60)) {
        for position in random_line(&choices) {
            let mate = is_checkmate(&position);
            let stale = is_stalemate(&position);
            prop_assert!(!(mate && stale));
            prop_assert_eq!(mate, in_check(&position) && legal_moves(&position).is_empty());
        }
    }

    #[test]
    fn en_passant_target_only_after_double_push(
        choices in prop::collection::vec(any::<usize>(), 1..40),
    ) {
        let line = random_line(&choices);
        for pair in line.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            let mv = legal_moves(before)
                .into_iter()
                .find(|&m| make_move(before, m) == *after)
                .unwrap();
            prop_assert_eq!(after.en_passant().is_some(), mv.flag() == MoveFlag::DoublePush);
        }
    }

    #[test]
    fn arbitrary_states_never_panic(limbs in any::<[u64; 4]>(), from in 0u8..70, to in 0u8..70, promo in 0u8..16) {
        let state = EncodedState::from_limbs(limbs);
        let _ = decode(state);
        let _ = process_move(state, from, to, promo);
    }
}

#[test]
fn input_state_is_never_mutated() {
    let state = initial_state();
    let copy = state;
    let _ = process_move(state, 12, 28, 0);
    let _ = process_move(state, 12, 36, 0);
    assert_eq!(state, copy);
}
