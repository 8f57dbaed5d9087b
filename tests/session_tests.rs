// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;

use chess_clash::{share, Color, GameState, Phase, Session, SessionEvent, Square};

fn sq(s: &str) -> Square {
    Square::try_from(s).unwrap()
}

const OPENING: [(&str, &str); 6] = [
    ("e1", "e3"),
    ("e6", "e4"),
    ("g0", "f2"),
    ("b7", "c5"),
    ("f0", "c3"),
    ("g7", "f5"),
];

fn played(n: usize) -> Session {
    let mut session = Session::new();
    for &(from, to) in &OPENING[..n] {
        assert!(session.submit_move(sq(from), sq(to)));
    }

    session
}

#[test]
fn turns_alternate() {
    let mut session = Session::new();
    for (i, &(from, to)) in OPENING.iter().enumerate() {
        let expected = if i % 2 == 0 { Color::White } else { Color::Black };
        assert_eq!(expected, session.state().turn());
        assert!(session.submit_move(sq(from), sq(to)));
    }
}

#[test]
fn undo_every_move_restores_start() {
    let mut session = played(OPENING.len());
    for _ in 0..OPENING.len() {
        assert!(session.undo());
    }

    assert_eq!(&GameState::new(), session.state());
    assert!(!session.undo());
}

#[test]
fn undo_then_redo_reproduces_state() {
    let mut session = played(OPENING.len());
    let full = session.state().clone();
    for _ in 0..3 {
        assert!(session.undo());
    }

    let three = played(3);
    assert_eq!(three.state(), session.state());
    for _ in 0..3 {
        assert!(session.redo());
    }

    assert_eq!(&full, session.state());
}

#[test]
fn events_follow_requests() {
    let mut session = Session::new();
    let events = session.subscribe();
    assert!(session.submit_move(sq("e1"), sq("e3")));
    assert!(!session.submit_move(sq("e1"), sq("e3")));
    assert!(session.undo());
    assert!(session.redo());
    session.reset();

    let received: Vec<_> = events.try_iter().collect();
    assert_eq!(4, received.len());
    match received.as_slice() {
        [SessionEvent::MoveCommitted(a), SessionEvent::Undone(b), SessionEvent::Redone(c), SessionEvent::Reset] =>
        {
            assert_eq!(a, b);
            assert_eq!(b, c);
        }
        other => panic!("unexpected events: {:?}", other),
    }
}

#[test]
fn share_round_trip() {
    let session = played(OPENING.len());
    let payload = session.share();
    let restored = Session::from_shared(&payload);
    assert_eq!(session.state(), restored.state());
    assert_eq!(
        "e1-e3|e6-e4|g0-f2|b7-c5|f0-c3|g7-f5",
        share::to_tokens(restored.state().history())
    );
}

#[test]
fn two_move_payload_matches_direct_play() {
    let direct = played(2);
    let payload = share::encode(direct.state().history());
    let decoded = share::decode(&payload);
    assert_eq!(direct.state(), &decoded);
    assert_eq!(direct.state().board(), decoded.board());
    assert_eq!(Color::White, decoded.turn());
    assert_eq!(Some(sq("e5")), decoded.en_passant_square());
}

#[test]
fn load_shared_replaces_game_and_clears_redo() {
    let mut session = played(2);
    assert!(session.undo());
    session.load_shared("https://example.com/play#ZTEtZTM=");
    assert!(!session.can_redo());
    assert_eq!(1, session.state().history().len());
    assert_eq!(Phase::InProgress, session.phase());
}

#[test]
fn shared_mate_is_concluded() {
    let payload = share::encode(played_mate().state().history());
    let session = Session::from_shared(&payload);
    assert!(matches!(session.phase(), Phase::Concluded(_)));
    assert!(session.state().is_checkmate());
}

fn played_mate() -> Session {
    let mut session = Session::new();
    for &(from, to) in &[("f1", "f3"), ("e6", "e5"), ("g1", "g3"), ("d7", "h3")] {
        assert!(session.submit_move(sq(from), sq(to)));
    }

    session
}
