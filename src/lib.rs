// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A chess rules engine and game session. Boards are immutable snapshots, every committed move
//! produces a new `GameState`, and a `Session` layers undo, redo, share links and progress
//! tracking on top.
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate pest_derive;

pub mod attacks;
pub mod board;
pub mod console;
pub mod legality;
pub mod movegen;
mod moves;
pub mod perft;
mod position;
pub mod progress;
pub mod session;
pub mod share;
pub mod status;
mod types;

pub use board::Board;
pub use console::ConsoleServer;
pub use legality::{all_legal_moves, legal_moves};
pub use movegen::{GenerationMode, MoveVec};
pub use moves::Move;
pub use perft::perft;
pub use position::{FenParseError, GameState};
pub use progress::{KeyValueStore, PlayerProgress};
pub use session::{Phase, Session, SessionEvent};
pub use status::{Outcome, Status};
pub use types::{CastleSide, CastleStatus, Color, Piece, PieceId, PieceKind, Square};
