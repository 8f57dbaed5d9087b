// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::board::Board;
use crate::movegen::{self, GenerationMode};
use crate::types::{Color, Square};

pub fn is_square_on_board(sq: Square) -> bool {
    sq.is_on_board()
}

/// Returns whether any piece of `attacker` threatens `target`.
///
/// This is a reachability query, not a legality query: the attacker's own king safety is not
/// considered, which keeps it free of recursion through the legality filter.
pub fn is_square_attacked(board: &Board, target: Square, attacker: Color) -> bool {
    board.pieces_of(attacker).any(|(sq, _)| {
        movegen::generate(board, sq, GenerationMode::AttackOnly)
            .iter()
            .any(|mov| mov.to == target)
    })
}

/// Returns whether the king of the given color is attacked. A board without a king of that
/// color is never in check.
pub fn is_check(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        Some(king) => is_square_attacked(board, king, color.toggle()),
        None => {
            debug_assert!(false, "board has no {} king", color);
            false
        }
    }
}
