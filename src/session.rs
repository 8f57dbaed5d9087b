// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The session controller, which owns the authoritative game state for one game.
//!
//! A session holds the current `GameState` and a redo stack. Every accepted request replaces
//! the state wholesale. Callers that need to react to changes (a renderer, the progress
//! tracker) subscribe to a channel of `SessionEvent`s instead of polling.
use std::sync::mpsc::{self, Receiver, Sender};

use crate::legality;
use crate::movegen::MoveVec;
use crate::moves::Move;
use crate::position::GameState;
use crate::share;
use crate::status::Outcome;
use crate::types::{Color, Square};

/// Lifecycle of a game. A concluded game accepts no moves, undo or redo until it is reset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Concluded(Outcome),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    MoveCommitted(Move),
    Undone(Move),
    Redone(Move),
    Reset,
    Concluded(Outcome),
}

pub struct Session {
    state: GameState,
    redo_stack: Vec<Move>,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl Session {
    pub fn new() -> Session {
        Session {
            state: GameState::new(),
            redo_stack: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Starts a session from a share-link payload. Tokens that don't decode to a legal move are
    /// skipped.
    pub fn from_shared(payload: &str) -> Session {
        Session {
            state: share::decode(payload),
            ..Session::new()
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        match self.state.outcome() {
            Some(outcome) => Phase::Concluded(outcome),
            None => Phase::InProgress,
        }
    }

    pub fn redo_stack(&self) -> &[Move] {
        &self.redo_stack
    }

    pub fn can_undo(&self) -> bool {
        self.phase() == Phase::InProgress && !self.state.history().is_empty()
    }

    pub fn can_redo(&self) -> bool {
        self.phase() == Phase::InProgress && !self.redo_stack.is_empty()
    }

    pub fn legal_moves(&self, from: Square) -> MoveVec {
        legality::legal_moves(&self.state, from)
    }

    /// Returns a receiver that is sent every subsequent event of this session.
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Requests the move from `from` to `to`. Returns whether the move was played. A rejected
    /// move leaves the session untouched. An accepted move clears the redo stack.
    pub fn submit_move(&mut self, from: Square, to: Square) -> bool {
        if let Phase::Concluded(outcome) = self.phase() {
            debug!("rejecting {}-{}: game is over ({})", from, to, outcome);
            return false;
        }

        let mov = match self.legal_moves(from).into_iter().find(|mov| mov.to == to) {
            Some(mov) => mov,
            None => {
                debug!("rejecting {}-{}: not a legal move", from, to);
                return false;
            }
        };

        self.redo_stack.clear();
        let next = self.state.commit(&mov);
        self.replace_state(next);
        self.emit(SessionEvent::MoveCommitted(mov));
        self.emit_conclusion();
        true
    }

    /// Takes back the last move, pushing it onto the redo stack. The previous state is rebuilt by
    /// replaying the remaining history from the starting position. A concluded game can't be
    /// taken back; only `reset` leaves it.
    pub fn undo(&mut self) -> bool {
        if let Phase::Concluded(outcome) = self.phase() {
            debug!("refusing undo: game is over ({})", outcome);
            return false;
        }

        let (last, rest) = match self.state.history().split_last() {
            Some((last, rest)) => (*last, rest),
            None => return false,
        };

        let rebuilt = replay(rest);
        self.redo_stack.push(last);
        self.replace_state(rebuilt);
        self.emit(SessionEvent::Undone(last));
        true
    }

    /// Replays the most recently undone move.
    pub fn redo(&mut self) -> bool {
        if let Phase::Concluded(outcome) = self.phase() {
            debug!("refusing redo: game is over ({})", outcome);
            return false;
        }

        let mov = match self.redo_stack.pop() {
            Some(mov) => mov,
            None => return false,
        };

        match self.state.submit_move(mov.from, mov.to) {
            Some(next) => {
                self.replace_state(next);
                self.emit(SessionEvent::Redone(mov));
                self.emit_conclusion();
                true
            }
            None => {
                warn!("dropping redo of {}: no longer legal", mov);
                false
            }
        }
    }

    /// Discards the current game and starts a fresh one.
    pub fn reset(&mut self) {
        self.redo_stack.clear();
        self.replace_state(GameState::new());
        self.emit(SessionEvent::Reset);
    }

    /// Replaces the current game with the one described by a share payload.
    pub fn load_shared(&mut self, payload: &str) {
        self.redo_stack.clear();
        self.replace_state(share::decode(payload));
        self.emit(SessionEvent::Reset);
    }

    /// Encodes the current history as a share payload.
    pub fn share(&self) -> String {
        share::encode(self.state.history())
    }

    fn replace_state(&mut self, state: GameState) {
        debug_assert_eq!(
            state.history().len() % 2 == 1,
            state.turn() == Color::Black,
            "turn out of step with history"
        );
        self.state = state;
    }

    fn emit(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    fn emit_conclusion(&mut self) {
        if let Phase::Concluded(outcome) = self.phase() {
            info!("game concluded: {}", outcome);
            self.emit(SessionEvent::Concluded(outcome));
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

/// Rebuilds a state by submitting `moves` in order from the starting position.
pub fn replay(moves: &[Move]) -> GameState {
    let mut state = GameState::new();
    for mov in moves {
        match state.submit_move(mov.from, mov.to) {
            Some(next) => state = next,
            None => warn!("replay skipped {}: not legal", mov),
        }
    }

    state
}
