// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::fmt::{self, Display, Write};

/// A square on the board, addressed by row and column. Row 0 is White's back rank and row 7 is
/// Black's; column 0 is the a-file.
///
/// Squares are plain values and may be constructed off the board (for example while walking a
/// ray), so anything that indexes a board must check `is_on_board` first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    pub const fn new(row: i8, col: i8) -> Square {
        Square { row, col }
    }

    pub fn is_on_board(self) -> bool {
        self.row >= 0 && self.row < 8 && self.col >= 0 && self.col < 8
    }

    /// Returns the square `(dr, dc)` away from this one, or None if that square lies off the
    /// board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Square> {
        let sq = Square::new(self.row + dr, self.col + dc);
        if sq.is_on_board() {
            Some(sq)
        } else {
            None
        }
    }

    pub fn file_char(self) -> char {
        (b'a' + self.col as u8) as char
    }

    pub fn rank_char(self) -> char {
        (b'0' + self.row as u8) as char
    }
}

// Squares are written as a file letter followed by the zero-based row digit, so the square at
// (1, 4) is "e1". This is the notation used by share links and the console.
impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.file_char())?;
        f.write_char(self.rank_char())
    }
}

impl TryFrom<&str> for Square {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        let file = match chars.next() {
            Some(c @ 'a'..='h') => (c as u8 - b'a') as i8,
            _ => return Err(()),
        };
        let row = match chars.next() {
            Some(c @ '0'..='7') => (c as u8 - b'0') as i8,
            _ => return Err(()),
        };
        if chars.next().is_some() {
            return Err(());
        }

        Ok(Square::new(row, file))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row direction in which this color's pawns advance.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn back_rank(self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub fn pawn_rank(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    pub fn promotion_rank(self) -> i8 {
        self.toggle().back_rank()
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            Color::White => 'w',
            Color::Black => 'b',
        };
        f.write_char(chr)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        f.write_char(chr)
    }
}

impl TryFrom<char> for PieceKind {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let res = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(()),
        };
        Ok(res)
    }
}

/// Opaque identity of a piece. A piece keeps its id for as long as it stays on the board,
/// including through promotion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u8);

impl Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(id: PieceId, kind: PieceKind, color: Color) -> Piece {
        Piece { id, kind, color }
    }

    /// Returns this piece with a different kind but the same identity.
    pub fn promoted(self, kind: PieceKind) -> Piece {
        Piece { kind, ..self }
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = self.kind.to_string().chars().next().unwrap_or('?');
        match self.color {
            Color::White => f.write_char(chr.to_ascii_uppercase()),
            Color::Black => f.write_char(chr),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    /// Column of the rook that takes part in a castle on this side.
    pub fn rook_col(self) -> i8 {
        match self {
            CastleSide::King => 7,
            CastleSide::Queen => 0,
        }
    }

    /// Column the rook lands on after castling.
    pub fn rook_target_col(self) -> i8 {
        match self {
            CastleSide::King => 5,
            CastleSide::Queen => 3,
        }
    }

    /// Column the king lands on after castling.
    pub fn king_target_col(self) -> i8 {
        match self {
            CastleSide::King => 6,
            CastleSide::Queen => 2,
        }
    }
}

pub static CASTLE_SIDES: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

bitflags! {
    pub struct CastleStatus: u8 {
        const NONE = 0;
        const WHITE_KINGSIDE = 0b0000_0001;
        const WHITE_QUEENSIDE =0b0000_0010;
        const WHITE = Self::WHITE_KINGSIDE.bits | Self::WHITE_QUEENSIDE.bits;
        const BLACK_KINGSIDE = 0b0000_0100;
        const BLACK_QUEENSIDE = 0b0000_1000;
        const BLACK = Self::BLACK_KINGSIDE.bits | Self::BLACK_QUEENSIDE.bits;
    }
}

impl CastleStatus {
    pub fn mask(color: Color, side: CastleSide) -> CastleStatus {
        match (color, side) {
            (Color::White, CastleSide::King) => CastleStatus::WHITE_KINGSIDE,
            (Color::White, CastleSide::Queen) => CastleStatus::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::King) => CastleStatus::BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queen) => CastleStatus::BLACK_QUEENSIDE,
        }
    }

    pub fn color_mask(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE,
            Color::Black => CastleStatus::BLACK,
        }
    }

    pub fn can_castle(self, color: Color, side: CastleSide) -> bool {
        self.contains(CastleStatus::mask(color, side))
    }
}

impl Default for CastleStatus {
    fn default() -> CastleStatus {
        CastleStatus::all()
    }
}
