// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::types::{CastleSide, Piece, PieceKind, Square};

/// A single move, as produced by the move generator. A move carries the moving piece as it was
/// before the move and the piece it captures (if any), so it fully determines the board
/// transition given the board it was generated from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub castle: Option<CastleSide>,
    pub en_passant: bool,
}

impl Move {
    pub fn quiet(from: Square, to: Square, piece: Piece) -> Move {
        Move {
            from,
            to,
            piece,
            captured: None,
            castle: None,
            en_passant: false,
        }
    }

    pub fn capture(from: Square, to: Square, piece: Piece, captured: Piece) -> Move {
        Move {
            captured: Some(captured),
            ..Move::quiet(from, to, piece)
        }
    }

    pub fn en_passant(from: Square, to: Square, piece: Piece, captured: Piece) -> Move {
        Move {
            captured: Some(captured),
            en_passant: true,
            ..Move::quiet(from, to, piece)
        }
    }

    pub fn castle(from: Square, side: CastleSide, king: Piece) -> Move {
        let to = Square::new(from.row, side.king_target_col());
        Move {
            castle: Some(side),
            ..Move::quiet(from, to, king)
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn is_castle(&self) -> bool {
        self.castle.is_some()
    }

    pub fn is_double_pawn_push(&self) -> bool {
        self.piece.kind == PieceKind::Pawn && (self.to.row - self.from.row).abs() == 2
    }

    /// True if this move puts a pawn on its farthest rank.
    pub fn is_promotion(&self) -> bool {
        self.piece.kind == PieceKind::Pawn && self.to.row == self.piece.color.promotion_rank()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}
