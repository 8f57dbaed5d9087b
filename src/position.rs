// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::fmt;

use crate::board::Board;
use crate::legality;
use crate::moves::Move;
use crate::status::{self, Outcome, Status};
use crate::types::{CastleSide, CastleStatus, Color, Piece, PieceId, PieceKind, Square};

/// Possible errors that can arise when parsing a FEN string into a `GameState`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedChar(char),
    UnexpectedEnd,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece,
    TooManyPieces,
    InvalidSideToMove,
    InvalidCastle,
    InvalidEnPassant,
    MissingKing,
    TooManyKings,
}

/// A complete, immutable game state: the board, whose turn it is, castling rights, the
/// en-passant target, the committed history and the check/checkmate/stalemate flags for the
/// side to move.
///
/// States are never modified once built. Every committed move produces a new `GameState`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    turn: Color,
    last_move: Option<Move>,
    status: Status,
    history: Vec<Move>,
    castle_status: CastleStatus,
    en_passant: Option<Square>,
}

//
// Game state getters
//

impl GameState {
    /// The standard starting position with White to move.
    pub fn new() -> GameState {
        GameState {
            board: Board::starting(),
            turn: Color::White,
            last_move: None,
            status: Status::default(),
            history: Vec::new(),
            castle_status: CastleStatus::all(),
            en_passant: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn castle_status(&self) -> CastleStatus {
        self.castle_status
    }

    pub fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        self.castle_status.can_castle(color, side)
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_check(&self) -> bool {
        self.status.check
    }

    pub fn is_checkmate(&self) -> bool {
        self.status.checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.status.stalemate
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.status.outcome(self.turn)
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome().is_some()
    }
}

//
// Committed transitions
//

impl GameState {
    /// Attempts to play the move from `from` to `to`. Returns the resulting state, or None if no
    /// legal move of the side to move matches; in that case nothing changes.
    pub fn submit_move(&self, from: Square, to: Square) -> Option<GameState> {
        let mov = legality::legal_moves(self, from)
            .into_iter()
            .find(|mov| mov.to == to)?;
        Some(self.commit(&mov))
    }

    /// Produces the state after `mov`, which must be legal in this state.
    pub(crate) fn commit(&self, mov: &Move) -> GameState {
        let board = self.board.apply_move(mov);
        let mover = self.turn;

        // Castling rights only ever go away. Moving the king gives up both sides; moving a rook
        // off its corner gives up that side.
        let mut castle_status = self.castle_status;
        match mov.piece.kind {
            PieceKind::King => castle_status &= !CastleStatus::color_mask(mover),
            PieceKind::Rook => {
                if let Some(side) = corner_side(mover, mov.from) {
                    castle_status &= !CastleStatus::mask(mover, side);
                }
            }
            _ => {}
        }

        // A rook captured on its corner takes the opponent's right with it. A rook can only be
        // captured there by the opponent, so this never affects the mover's own rights.
        if let Some(captured) = mov.captured {
            if captured.kind == PieceKind::Rook {
                if let Some(side) = corner_side(captured.color, mov.to) {
                    castle_status &= !CastleStatus::mask(captured.color, side);
                }
            }
        }

        let en_passant = if mov.is_double_pawn_push() {
            Some(Square::new((mov.from.row + mov.to.row) / 2, mov.from.col))
        } else {
            None
        };

        let mut history = self.history.clone();
        history.push(*mov);

        let mut next = GameState {
            board,
            turn: mover.toggle(),
            last_move: Some(*mov),
            status: Status::default(),
            history,
            castle_status,
            en_passant,
        };
        next.status = status::evaluate(&next);
        next
    }
}

fn corner_side(color: Color, sq: Square) -> Option<CastleSide> {
    if sq.row != color.back_rank() {
        return None;
    }

    match sq.col {
        0 => Some(CastleSide::Queen),
        7 => Some(CastleSide::King),
        _ => None,
    }
}

//
// FEN parsing.
//
// Positions set up from FEN have an empty history. They are useful for constructing specific
// positions in tests and for the perft command; games played through a session always start
// from the standard layout.
//

impl GameState {
    /// Constructs a state from a FEN string. The halfmove and fullmove clocks, if present, are
    /// ignored. Pieces are numbered in the order they appear.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<GameState, FenParseError> {
        use std::iter::Peekable;
        use std::str::Chars;

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat(iter: &mut Stream, expected: char) -> Result<(), FenParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn peek(iter: &mut Stream) -> Result<char, FenParseError> {
            iter.peek().copied().ok_or(FenParseError::UnexpectedEnd)
        }

        fn side_to_move(iter: &mut Stream) -> Result<Color, FenParseError> {
            match iter.next() {
                Some('w') => Ok(Color::White),
                Some('b') => Ok(Color::Black),
                Some(_) => Err(FenParseError::InvalidSideToMove),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn castle_rights(iter: &mut Stream) -> Result<CastleStatus, FenParseError> {
            let mut rights = CastleStatus::NONE;
            if peek(iter)? == '-' {
                iter.next();
                return Ok(rights);
            }

            while let Some(&c) = iter.peek() {
                let right = match c {
                    'K' => CastleStatus::WHITE_KINGSIDE,
                    'Q' => CastleStatus::WHITE_QUEENSIDE,
                    'k' => CastleStatus::BLACK_KINGSIDE,
                    'q' => CastleStatus::BLACK_QUEENSIDE,
                    ' ' => break,
                    _ => return Err(FenParseError::InvalidCastle),
                };

                // each right may be named once
                if rights.contains(right) {
                    return Err(FenParseError::InvalidCastle);
                }

                rights |= right;
                iter.next();
            }

            Ok(rights)
        }

        // FEN writes en-passant squares with one-based ranks ("e3" is row 2).
        fn en_passant_target(iter: &mut Stream) -> Result<Option<Square>, FenParseError> {
            let file = match iter.next() {
                Some('-') => return Ok(None),
                Some(f @ 'a'..='h') => (f as u8 - b'a') as i8,
                Some(_) => return Err(FenParseError::InvalidEnPassant),
                None => return Err(FenParseError::UnexpectedEnd),
            };
            let rank = match iter.next() {
                Some(r @ '1'..='8') => (r as u8 - b'1') as i8,
                _ => return Err(FenParseError::InvalidEnPassant),
            };

            Ok(Some(Square::new(rank, file)))
        }

        let mut board = Board::empty();
        let mut next_id: u8 = 0;
        let iter = &mut fen.as_ref().chars().peekable();
        for row in (0..8).rev() {
            let mut col = 0;
            while col < 8 {
                let c = peek(iter)?;
                iter.next();

                // a digit is a run of empty squares.
                if let Some(run) = c.to_digit(10) {
                    if run == 0 || run > 8 {
                        return Err(FenParseError::InvalidDigit);
                    }

                    col += run as i8;
                    if col > 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    continue;
                }

                let kind = PieceKind::try_from(c).map_err(|_| FenParseError::UnknownPiece)?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };

                if next_id == u8::max_value() {
                    return Err(FenParseError::TooManyPieces);
                }

                let piece = Piece::new(PieceId(next_id), kind, color);
                next_id += 1;
                board = board.with(Square::new(row, col), Some(piece));
                col += 1;
            }

            if row != 0 {
                eat(iter, '/')?;
            }
        }

        eat(iter, ' ')?;
        let turn = side_to_move(iter)?;
        eat(iter, ' ')?;
        let castle_status = castle_rights(iter)?;
        let en_passant = if iter.peek().is_some() {
            eat(iter, ' ')?;
            en_passant_target(iter)?
        } else {
            None
        };

        // check detection needs exactly one king per side.
        for &color in &[Color::White, Color::Black] {
            let kings = board
                .pieces_of(color)
                .filter(|(_, piece)| piece.kind == PieceKind::King)
                .count();
            match kings {
                0 => return Err(FenParseError::MissingKing),
                1 => {}
                _ => return Err(FenParseError::TooManyKings),
            }
        }

        let mut state = GameState {
            board,
            turn,
            last_move: None,
            status: Status::default(),
            history: Vec::new(),
            castle_status,
            en_passant,
        };
        state.status = status::evaluate(&state);
        Ok(state)
    }
}

//
// Trait implementations
//

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.board)?;
        write!(f, "{} to move", self.turn.name())?;
        if let Some(outcome) = self.outcome() {
            write!(f, " ({})", outcome)?;
        } else if self.status.check {
            write!(f, " (check)")?;
        }

        writeln!(f)
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}
