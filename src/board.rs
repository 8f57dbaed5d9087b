// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `Board` type, an immutable snapshot of piece placement.
//!
//! A board is a fixed-size 8x8 array of optional pieces and is `Copy`, so every transition
//! produces a fresh value and no snapshot held elsewhere can be observed changing. The move
//! applier lives here as well, since it is a pure function from one board to the next.
use std::fmt;

use crate::moves::Move;
use crate::types::{Color, Piece, PieceId, PieceKind, Square};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

lazy_static! {
    static ref STARTING_BOARD: Board = Board::build_starting();
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub const fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// The standard starting layout. White occupies rows 0 and 1, Black rows 6 and 7. Pieces are
    /// numbered 0..16 for White and 16..32 for Black, back rank first.
    pub fn starting() -> Board {
        *STARTING_BOARD
    }

    fn build_starting() -> Board {
        let mut board = Board::empty();
        let mut next_id = 0;
        for &color in &[Color::White, Color::Black] {
            for (col, &kind) in BACK_RANK.iter().enumerate() {
                let sq = Square::new(color.back_rank(), col as i8);
                board.squares[sq.row as usize][sq.col as usize] =
                    Some(Piece::new(PieceId(next_id), kind, color));
                next_id += 1;
            }

            for col in 0..8 {
                let sq = Square::new(color.pawn_rank(), col);
                board.squares[sq.row as usize][sq.col as usize] =
                    Some(Piece::new(PieceId(next_id), PieceKind::Pawn, color));
                next_id += 1;
            }
        }

        board
    }

    /// Returns the piece on the given square, or None if the square is empty or off the board.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        if !sq.is_on_board() {
            return None;
        }

        self.squares[sq.row as usize][sq.col as usize]
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Returns a copy of this board with the given square set to `piece`.
    pub fn with(&self, sq: Square, piece: Option<Piece>) -> Board {
        debug_assert!(sq.is_on_board(), "square {:?} is off the board", sq);
        let mut next = *self;
        next.squares[sq.row as usize][sq.col as usize] = piece;
        next
    }

    /// Iterates over every occupied square and its piece, row by row.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares.iter().enumerate().flat_map(|(row, rank)| {
            rank.iter().enumerate().filter_map(move |(col, slot)| {
                slot.map(|piece| (Square::new(row as i8, col as i8), piece))
            })
        })
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Produces the board that results from playing `mov` on this board. The input is never
    /// modified. Turn, castling rights and the en-passant target are not tracked by the board and
    /// are left to the caller.
    pub fn apply_move(&self, mov: &Move) -> Board {
        let mut next = *self;

        // En-passant captures the pawn beside the mover, not anything on the destination square
        // (which is always empty for an en-passant move).
        if mov.en_passant {
            next.clear(Square::new(mov.from.row, mov.to.col));
        }

        // Castles are encoded as the king's move; the rook is relocated here.
        if let Some(side) = mov.castle {
            let rook_square = Square::new(mov.from.row, side.rook_col());
            let rook_target = Square::new(mov.from.row, side.rook_target_col());
            let rook = next.take(rook_square);
            next.put(rook_target, rook);
        }

        let piece_to_add = if mov.is_promotion() {
            mov.piece.promoted(PieceKind::Queen)
        } else {
            mov.piece
        };

        next.clear(mov.from);
        next.put(mov.to, Some(piece_to_add));
        next
    }

    fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.row as usize][sq.col as usize].take()
    }

    fn clear(&mut self, sq: Square) {
        self.squares[sq.row as usize][sq.col as usize] = None;
    }

    fn put(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.row as usize][sq.col as usize] = piece;
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::starting()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in (0..8).rev() {
            for col in 0..8 {
                if let Some(piece) = self.piece_at(Square::new(row, col)) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", row)?;
        }

        for _ in 0..8 {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for col in 0..8 {
            write!(f, " {} ", Square::new(0, col).file_char())?;
        }

        writeln!(f)?;
        Ok(())
    }
}
