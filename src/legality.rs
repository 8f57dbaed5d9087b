// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::attacks;
use crate::movegen::{self, GenerationMode, MoveVec};
use crate::moves::Move;
use crate::position::GameState;
use crate::types::Square;

/// Returns the legal moves of the piece on `from`. Only pieces of the side to move have legal
/// moves; an empty square or an opposing piece yields an empty list.
///
/// Legality is tested the simple way: every pseudo-legal candidate is played out on a copy of
/// the board and kept only if the mover's king is not attacked afterwards.
pub fn legal_moves(state: &GameState, from: Square) -> MoveVec {
    let mut legal = MoveVec::new();
    let piece = match state.board().piece_at(from) {
        Some(piece) if piece.color == state.turn() => piece,
        _ => return legal,
    };

    let mode = GenerationMode::Pseudolegal {
        en_passant: state.en_passant_square(),
        castling: state.castle_status(),
    };
    for mov in movegen::generate(state.board(), from, mode) {
        let next = state.board().apply_move(&mov);
        if !attacks::is_check(&next, piece.color) {
            legal.push(mov);
        }
    }

    legal
}

/// Returns every legal move for the side to move.
pub fn all_legal_moves(state: &GameState) -> Vec<Move> {
    state
        .board()
        .pieces_of(state.turn())
        .flat_map(|(sq, _)| legal_moves(state, sq))
        .collect()
}

/// Returns whether the side to move has any legal move, stopping at the first one found.
pub fn has_legal_moves(state: &GameState) -> bool {
    state
        .board()
        .pieces_of(state.turn())
        .any(|(sq, _)| !legal_moves(state, sq).is_empty())
}

#[cfg(test)]
mod tests {
    use super::{all_legal_moves, has_legal_moves, legal_moves};
    use crate::position::GameState;
    use crate::types::Square;

    #[test]
    fn twenty_moves_from_start() {
        let state = GameState::new();
        assert_eq!(20, all_legal_moves(&state).len());
        assert!(has_legal_moves(&state));
    }

    #[test]
    fn opposing_pieces_have_no_legal_moves() {
        let state = GameState::new();
        assert!(legal_moves(&state, Square::new(6, 4)).is_empty());
        assert!(legal_moves(&state, Square::new(4, 4)).is_empty());
    }

    #[test]
    fn absolute_pin_legality() {
        // The bishop on c3 is pinned by the queen on a5 and may only move along the pin.
        let state = GameState::from_fen("4k3/8/8/q7/8/2B5/3K4/8 w - - 0 1").unwrap();
        let moves = legal_moves(&state, Square::new(2, 2));
        let mut targets: Vec<_> = moves.iter().map(|m| m.to).collect();
        targets.sort_by_key(|sq| (sq.row, sq.col));
        assert_eq!(vec![Square::new(3, 1), Square::new(4, 0)], targets);
    }

    #[test]
    fn king_cannot_step_into_controlled_empty_square() {
        let state = GameState::from_fen("4k3/8/8/8/8/8/r7/4K3 w - - 0 1").unwrap();
        let moves = legal_moves(&state, Square::new(0, 4));
        assert!(moves.iter().all(|m| m.to.row == 0));
        assert_eq!(2, moves.len());
    }

    #[test]
    fn king_may_capture_undefended_piece_only() {
        let undefended = GameState::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").unwrap();
        assert!(legal_moves(&undefended, Square::new(0, 4))
            .iter()
            .any(|m| m.to == Square::new(1, 4) && m.is_capture()));

        let defended = GameState::from_fen("4k3/4r3/8/8/8/8/4r3/4K3 w - - 0 1").unwrap();
        assert!(legal_moves(&defended, Square::new(0, 4))
            .iter()
            .all(|m| m.to != Square::new(1, 4)));
    }

    #[test]
    fn castling_into_check_is_filtered() {
        let state = GameState::from_fen("4k1r1/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        assert!(legal_moves(&state, Square::new(0, 4))
            .iter()
            .all(|m| !m.is_castle()));
    }
}
