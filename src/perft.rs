// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rayon::prelude::*;

use crate::legality;
use crate::moves::Move;
use crate::position::GameState;

/// Counts the leaf nodes of the legal move tree rooted at `state`, `depth` plies deep. The root
/// moves are counted in parallel.
pub fn perft(state: &GameState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    legality::all_legal_moves(state)
        .par_iter()
        .map(|mov| count(&state.commit(mov), depth - 1))
        .sum()
}

/// Like `perft`, but broken down by root move. Useful for finding which subtree disagrees with a
/// reference count.
pub fn divide(state: &GameState, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return vec![];
    }

    legality::all_legal_moves(state)
        .into_par_iter()
        .map(|mov| (mov, count(&state.commit(&mov), depth - 1)))
        .collect()
}

fn count(state: &GameState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legality::all_legal_moves(state);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|mov| count(&state.commit(mov), depth - 1))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::{divide, perft};
    use crate::position::GameState;

    fn perft_test(fen: &'static str, depth: u32, count: u64) {
        let state = GameState::from_fen(fen).unwrap();
        assert_eq!(count, perft(&state, depth));
    }

    macro_rules! perft_tests {
        () => {};
        ($name:ident ($depth:expr): $fen:expr => $count:expr; $($tail:tt)*) => {
            #[test]
            fn $name() {
                perft_test($fen, $depth, $count)
            }

            perft_tests!($($tail)*);
        };

        (skip $name:ident ($depth:expr): $fen:expr => $count:expr; $($tail:tt)*) => {
            #[test]
            #[ignore]
            fn $name() {
                perft_test($fen, $depth, $count)
            }

            perft_tests!($($tail)*);
        };
    }

    // Only positions whose trees contain no promotions at these depths; pawns always promote to a
    // queen here, so counts that include under-promotions would not match.
    perft_tests! {
        start_1 (1): "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1" => 20;
        start_2 (2): "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1" => 400;
        start_3 (3): "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1" => 8902;
        skip start_4 (4): "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1" => 197281;

        kiwipete_1 (1): "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1" => 48;
        kiwipete_2 (2): "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1" => 2039;
        skip kiwipete_3 (3): "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1" => 97862;

        position_3_1 (1): "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1" => 14;
        position_3_2 (2): "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1" => 191;
        position_3_3 (3): "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1" => 2812;
        skip position_3_4 (4): "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1" => 43238;
    }

    #[test]
    fn divide_sums_to_perft() {
        let state = GameState::new();
        let split = divide(&state, 2);
        assert_eq!(20, split.len());
        assert!(split.iter().all(|&(_, n)| n == 20));
        assert_eq!(perft(&state, 2), split.iter().map(|&(_, n)| n).sum::<u64>());
    }

    #[test]
    fn depth_zero_is_one_node() {
        assert_eq!(1, perft(&GameState::new(), 0));
    }
}
