// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::Receiver;

use crate::progress::{self, KeyValueStore, PlayerProgress};
use crate::session::{Phase, Session, SessionEvent};
use crate::share;
use crate::status::Outcome;
use crate::types::Square;

/// A line-oriented front end over a `Session`. Reads one command per line and writes responses,
/// and keeps the player's progress record up to date as games conclude.
pub struct ConsoleServer<S: KeyValueStore> {
    session: Session,
    events: Receiver<SessionEvent>,
    store: S,
    progress: PlayerProgress,
}

impl<S: KeyValueStore> ConsoleServer<S> {
    pub fn new(store: S) -> ConsoleServer<S> {
        ConsoleServer::with_session(Session::new(), store)
    }

    pub fn with_session(mut session: Session, store: S) -> ConsoleServer<S> {
        let events = session.subscribe();
        let progress = progress::load_progress(&store);
        ConsoleServer {
            session,
            events,
            store,
            progress,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn run<R, W>(&mut self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        for maybe_line in reader.lines() {
            let line = maybe_line?;
            trace!("console: {}", line);
            let components: Vec<_> = line.split_whitespace().collect();
            match components.split_first() {
                None => continue,
                Some((&"quit", [])) => break,
                Some((&"show", [])) => write!(&mut writer, "{}", self.session.state())?,
                Some((&"moves", [square])) => self.handle_moves(&mut writer, square)?,
                Some((&"move", [from, to])) => self.handle_move(&mut writer, from, to)?,
                Some((&"undo", [])) => {
                    let undone = self.session.undo();
                    self.acknowledge(&mut writer, undone, "nothing to undo")?
                }
                Some((&"redo", [])) => {
                    let redone = self.session.redo();
                    self.acknowledge(&mut writer, redone, "nothing to redo")?
                }
                Some((&"reset", [])) => {
                    self.session.reset();
                    writeln!(&mut writer, "ok")?
                }
                Some((&"status", [])) => self.handle_status(&mut writer)?,
                Some((&"history", [])) => {
                    let tokens = share::to_tokens(self.session.state().history());
                    if tokens.is_empty() {
                        writeln!(&mut writer, "(no moves)")?
                    } else {
                        writeln!(&mut writer, "{}", tokens)?
                    }
                }
                Some((&"share", [])) => writeln!(&mut writer, "{}", self.session.share())?,
                Some((&"load", [payload])) => {
                    self.session.load_shared(payload);
                    writeln!(
                        &mut writer,
                        "loaded {} moves",
                        self.session.state().history().len()
                    )?
                }
                Some((&"progress", [])) => writeln!(&mut writer, "{}", self.progress)?,
                Some((token, [])) if token.contains('-') => self.handle_token(&mut writer, token)?,
                _ => writeln!(&mut writer, "unrecognized command")?,
            }

            self.drain_events();
        }

        Ok(())
    }

    fn handle_moves<W: Write>(&mut self, w: &mut W, square: &str) -> io::Result<()> {
        let from = match Square::try_from(square) {
            Ok(from) => from,
            Err(()) => return writeln!(w, "invalid square"),
        };

        let moves = self.session.legal_moves(from);
        if moves.is_empty() {
            return writeln!(w, "no legal moves");
        }

        let targets: Vec<_> = moves.iter().map(|mov| mov.to.to_string()).collect();
        writeln!(w, "{}: {}", from, targets.join(" "))
    }

    fn handle_move<W: Write>(&mut self, w: &mut W, from: &str, to: &str) -> io::Result<()> {
        match (Square::try_from(from), Square::try_from(to)) {
            (Ok(from), Ok(to)) => self.submit(w, from, to),
            _ => writeln!(w, "invalid square"),
        }
    }

    fn handle_token<W: Write>(&mut self, w: &mut W, token: &str) -> io::Result<()> {
        match share::parse_token(token) {
            Ok((from, to)) => self.submit(w, from, to),
            Err(_) => writeln!(w, "unrecognized command"),
        }
    }

    fn submit<W: Write>(&mut self, w: &mut W, from: Square, to: Square) -> io::Result<()> {
        if !self.session.submit_move(from, to) {
            return writeln!(w, "illegal move");
        }

        writeln!(w, "ok {}-{}", from, to)?;
        if let Phase::Concluded(outcome) = self.session.phase() {
            writeln!(w, "{}", outcome)?;
        }

        Ok(())
    }

    fn handle_status<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        let state = self.session.state();
        match self.session.phase() {
            Phase::Concluded(outcome) => writeln!(w, "{}", outcome),
            Phase::InProgress if state.is_check() => {
                writeln!(w, "{} to move, check", state.turn().name())
            }
            Phase::InProgress => writeln!(w, "{} to move", state.turn().name()),
        }
    }

    fn acknowledge<W: Write>(&mut self, w: &mut W, done: bool, otherwise: &str) -> io::Result<()> {
        if done {
            writeln!(w, "ok")
        } else {
            writeln!(w, "{}", otherwise)
        }
    }

    /// Applies pending session events to the progress record.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                SessionEvent::Concluded(outcome) => self.record(outcome),
                event => debug!("session event: {:?}", event),
            }
        }
    }

    fn record(&mut self, outcome: Outcome) {
        self.progress.record_outcome(outcome);
        info!("recorded {}: {}", outcome, self.progress);
        if let Err(err) = progress::save_progress(&mut self.store, &self.progress) {
            warn!("could not save progress: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::ConsoleServer;
    use crate::progress::{self, KeyValueStore, MemoryStore, PlayerProgress, SAVE_KEY};
    use crate::session::Phase;

    fn run(console: &mut ConsoleServer<MemoryStore>, input: &str) -> String {
        let mut output = Vec::new();
        console.run(Cursor::new(input), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn move_commands() {
        let mut console = ConsoleServer::new(MemoryStore::new());
        let out = run(&mut console, "move e1 e3\ne6-e4\ne4 e3\nhistory\n");
        assert_eq!(
            "ok e1-e3\nok e6-e4\nunrecognized command\ne1-e3|e6-e4\n",
            out
        );
    }

    #[test]
    fn illegal_move_is_reported() {
        let mut console = ConsoleServer::new(MemoryStore::new());
        let out = run(&mut console, "move e1 e4\nmove z9 e4\nstatus\n");
        assert_eq!("illegal move\ninvalid square\nwhite to move\n", out);
    }

    #[test]
    fn lists_legal_targets() {
        let mut console = ConsoleServer::new(MemoryStore::new());
        let out = run(&mut console, "moves e1\nmoves e6\n");
        assert_eq!("e1: e2 e3\nno legal moves\n", out);
    }

    #[test]
    fn undo_redo_and_quit() {
        let mut console = ConsoleServer::new(MemoryStore::new());
        let out = run(&mut console, "undo\ne1-e3\nundo\nredo\nredo\nquit\nreset\n");
        assert_eq!(
            "nothing to undo\nok e1-e3\nok\nok\nnothing to redo\n",
            out
        );
        assert_eq!(1, console.session().state().history().len());
    }

    #[test]
    fn share_and_load() {
        let mut console = ConsoleServer::new(MemoryStore::new());
        let out = run(&mut console, "e1-e3\nshare\nreset\nload ZTEtZTM=\n");
        assert_eq!("ok e1-e3\nZTEtZTM=\nok\nloaded 1 moves\n", out);
    }

    #[test]
    fn checkmate_is_scored_once() {
        let mut console = ConsoleServer::new(MemoryStore::new());
        let out = run(
            &mut console,
            "f1-f3\ne6-e5\ng1-g3\nd7-h3\nstatus\nundo\nd7-h3\nredo\nprogress\n",
        );
        assert!(out.contains("ok d7-h3\ncheckmate, black wins\n"));
        assert!(out.contains(
            "checkmate, black wins\nnothing to undo\nillegal move\nnothing to redo\n"
        ));
        assert!(matches!(console.session().phase(), Phase::Concluded(_)));

        let expected = PlayerProgress {
            losses: 1,
            coins: 250,
            ..PlayerProgress::default()
        };
        assert_eq!(&expected, console.progress());
        assert!(out.ends_with("wins 0 losses 1 draws 0 coins 250\n"));
        assert_eq!(expected, progress::load_progress(console.store()));
    }

    #[test]
    fn starts_from_stored_progress() {
        let mut store = MemoryStore::new();
        store
            .set(SAVE_KEY, r#"{"wins":2,"losses":0,"draws":1,"coins":450}"#)
            .unwrap();
        let mut console = ConsoleServer::new(store);
        let out = run(&mut console, "progress\n");
        assert_eq!("wins 2 losses 0 draws 1 coins 450\n", out);
    }
}
