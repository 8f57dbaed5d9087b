// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::attacks;
use crate::legality;
use crate::position::GameState;
use crate::types::Color;

/// Check, checkmate and stalemate flags for the side to move. At most one of `checkmate` and
/// `stalemate` is set, and `checkmate` implies `check`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Status {
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
}

/// How a concluded game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
}

impl Status {
    /// The outcome implied by these flags when `turn` is the side to move.
    pub fn outcome(self, turn: Color) -> Option<Outcome> {
        if self.checkmate {
            Some(Outcome::Checkmate {
                winner: turn.toggle(),
            })
        } else if self.stalemate {
            Some(Outcome::Stalemate)
        } else {
            None
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Checkmate {
                winner: Color::White,
            } => write!(f, "checkmate, white wins"),
            Outcome::Checkmate {
                winner: Color::Black,
            } => write!(f, "checkmate, black wins"),
            Outcome::Stalemate => write!(f, "stalemate"),
        }
    }
}

/// Derives the status flags for the side to move in `state`. The flags already stored on
/// `state` are not consulted.
pub fn evaluate(state: &GameState) -> Status {
    let check = attacks::is_check(state.board(), state.turn());
    let has_legal_moves = legality::has_legal_moves(state);
    Status {
        check,
        checkmate: check && !has_legal_moves,
        stalemate: !check && !has_legal_moves,
    }
}

#[cfg(test)]
mod tests {
    use super::{evaluate, Outcome, Status};
    use crate::position::GameState;
    use crate::types::Color;

    #[test]
    fn starting_position_is_normal() {
        assert_eq!(Status::default(), evaluate(&GameState::new()));
    }

    #[test]
    fn fools_mate_check() {
        let state =
            GameState::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        let status = evaluate(&state);
        assert!(status.check);
        assert!(status.checkmate);
        assert!(!status.stalemate);
        assert_eq!(
            Some(Outcome::Checkmate {
                winner: Color::Black
            }),
            status.outcome(state.turn())
        );
    }

    #[test]
    fn sliding_piece_pin() {
        let state = GameState::from_fen("4k3/8/4q3/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        let status = evaluate(&state);
        assert!(!status.check);
        assert!(!status.checkmate);
    }

    #[test]
    fn stalemate_smoke() {
        let state = GameState::from_fen("7k/5K2/6Q1/8/8/8/8/8 b - - 0 1").unwrap();
        let status = evaluate(&state);
        assert!(!status.check);
        assert!(!status.checkmate);
        assert!(status.stalemate);
        assert_eq!(Some(Outcome::Stalemate), status.outcome(state.turn()));
    }

    #[test]
    fn check_with_escape_is_not_mate() {
        let state = GameState::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        let status = evaluate(&state);
        assert!(status.check);
        assert!(!status.checkmate);
        assert!(!status.stalemate);
        assert_eq!(None, status.outcome(state.turn()));
    }
}
