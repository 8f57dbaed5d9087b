// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pseudo-legal move generation for a single piece.
//!
//! The generator runs in one of two modes. `Pseudolegal` produces the moves a piece could make
//! given occupancy, castling rights and the en-passant target, without regard to whether the
//! mover's king is left attacked. `AttackOnly` answers "which squares does this piece
//! threaten": it never castles, pawns report both diagonals whether or not anything stands
//! there, and other pieces report the empty squares they reach.
use arrayvec::ArrayVec;

use crate::attacks;
use crate::board::Board;
use crate::moves::Move;
use crate::types::{CastleSide, CastleStatus, Piece, PieceKind, Square, CASTLE_SIDES};

/// Enough room for a queen in the middle of an empty board (27) plus two castles.
pub type MoveVec = ArrayVec<[Move; 32]>;

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GenerationMode {
    Pseudolegal {
        en_passant: Option<Square>,
        castling: CastleStatus,
    },
    AttackOnly,
}

impl GenerationMode {
    fn is_attack_only(self) -> bool {
        self == GenerationMode::AttackOnly
    }
}

/// Generates moves for the piece on `from`. Returns an empty list if the square is empty.
pub fn generate(board: &Board, from: Square, mode: GenerationMode) -> MoveVec {
    let mut moves = MoveVec::new();
    let piece = match board.piece_at(from) {
        Some(piece) => piece,
        None => return moves,
    };

    match piece.kind {
        PieceKind::Pawn => add_pawn_moves(board, from, piece, mode, &mut moves),
        PieceKind::Knight => add_steps(board, from, piece, &KNIGHT_JUMPS, &mut moves),
        PieceKind::Bishop => add_rays(board, from, piece, &BISHOP_DIRECTIONS, &mut moves),
        PieceKind::Rook => add_rays(board, from, piece, &ROOK_DIRECTIONS, &mut moves),
        PieceKind::Queen => {
            add_rays(board, from, piece, &ROOK_DIRECTIONS, &mut moves);
            add_rays(board, from, piece, &BISHOP_DIRECTIONS, &mut moves);
        }
        PieceKind::King => {
            add_steps(board, from, piece, &KING_STEPS, &mut moves);
            if let GenerationMode::Pseudolegal { castling, .. } = mode {
                add_castles(board, from, piece, castling, &mut moves);
            }
        }
    }

    moves
}

/// Adds a move to `to` unless it is occupied by a friendly piece. Returns whether the square
/// was empty, i.e. whether a ray may continue past it.
fn add_target(board: &Board, from: Square, to: Square, piece: Piece, moves: &mut MoveVec) -> bool {
    match board.piece_at(to) {
        Some(target) => {
            if target.color != piece.color {
                moves.push(Move::capture(from, to, piece, target));
            }
            false
        }
        None => {
            moves.push(Move::quiet(from, to, piece));
            true
        }
    }
}

fn add_steps(
    board: &Board,
    from: Square,
    piece: Piece,
    offsets: &[(i8, i8)],
    moves: &mut MoveVec,
) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc) {
            add_target(board, from, to, piece, moves);
        }
    }
}

fn add_rays(
    board: &Board,
    from: Square,
    piece: Piece,
    directions: &[(i8, i8)],
    moves: &mut MoveVec,
) {
    for &(dr, dc) in directions {
        let mut cursor = from;
        while let Some(to) = cursor.offset(dr, dc) {
            if !add_target(board, from, to, piece, moves) {
                break;
            }
            cursor = to;
        }
    }
}

fn add_pawn_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    mode: GenerationMode,
    moves: &mut MoveVec,
) {
    let dir = piece.color.forward();
    let en_passant = match mode {
        GenerationMode::Pseudolegal { en_passant, .. } => en_passant,
        GenerationMode::AttackOnly => None,
    };

    // Forward pushes are not attacks and are skipped entirely when only asking about threats.
    if !mode.is_attack_only() {
        if let Some(one) = from.offset(dir, 0) {
            if board.is_empty(one) {
                moves.push(Move::quiet(from, one, piece));
                if from.row == piece.color.pawn_rank() {
                    if let Some(two) = one.offset(dir, 0) {
                        if board.is_empty(two) {
                            moves.push(Move::quiet(from, two, piece));
                        }
                    }
                }
            }
        }
    }

    for &dc in &[-1, 1] {
        let to = match from.offset(dir, dc) {
            Some(to) => to,
            None => continue,
        };

        if mode.is_attack_only() {
            moves.push(Move::quiet(from, to, piece));
            continue;
        }

        match board.piece_at(to) {
            Some(target) if target.color != piece.color => {
                moves.push(Move::capture(from, to, piece, target));
            }
            Some(_) => {}
            None if en_passant == Some(to) => {
                // The pawn that double-stepped sits beside the mover, on the mover's row.
                let passed = Square::new(from.row, to.col);
                if let Some(victim) = board.piece_at(passed) {
                    if victim.kind == PieceKind::Pawn && victim.color != piece.color {
                        moves.push(Move::en_passant(from, to, piece, victim));
                    }
                }
            }
            None => {}
        }
    }
}

fn add_castles(
    board: &Board,
    from: Square,
    king: Piece,
    castling: CastleStatus,
    moves: &mut MoveVec,
) {
    let enemy = king.color.toggle();
    for &side in &CASTLE_SIDES {
        if !castling.can_castle(king.color, side) {
            continue;
        }

        let rook_square = Square::new(from.row, side.rook_col());
        match board.piece_at(rook_square) {
            Some(rook) if rook.kind == PieceKind::Rook && rook.color == king.color => {}
            _ => continue,
        }

        if !between_is_empty(board, from, side) {
            continue;
        }

        // The king may not castle out of or through an attacked square. Whether the destination
        // is attacked is left to the legality filter.
        let transit = Square::new(from.row, side.rook_target_col());
        if attacks::is_square_attacked(board, from, enemy)
            || attacks::is_square_attacked(board, transit, enemy)
        {
            continue;
        }

        moves.push(Move::castle(from, side, king));
    }
}

fn between_is_empty(board: &Board, king: Square, side: CastleSide) -> bool {
    let (lo, hi) = match side {
        CastleSide::King => (king.col + 1, side.rook_col()),
        CastleSide::Queen => (side.rook_col() + 1, king.col),
    };

    (lo..hi).all(|col| board.is_empty(Square::new(king.row, col)))
}
