// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Share links. A game is shared as its move history, one `from-to` token per move joined with
//! `|`, base64-encoded so it can ride in a URL fragment.
//!
//! Decoding is forgiving. Anything up to a `#` is ignored, a payload cut off mid-character still
//! yields its readable prefix, and tokens that are malformed or not legal at their point in the
//! replay are skipped.
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use pest::Parser;

use crate::moves::Move;
use crate::position::GameState;
use crate::types::Square;

const TOKEN_SEPARATOR: &str = "|";

const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Parser)]
#[grammar = "share.pest"]
struct TokenParser;

/// A share token that could not be turned into a move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareTokenError {
    /// The token isn't of the form `<file><rank>-<file><rank>`.
    Malformed(String),
    /// The token is well-formed but no legal move matches it.
    NoLegalMove(String),
}

impl fmt::Display for ShareTokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShareTokenError::Malformed(token) => write!(f, "malformed share token `{}`", token),
            ShareTokenError::NoLegalMove(token) => {
                write!(f, "share token `{}` is not a legal move", token)
            }
        }
    }
}

impl Error for ShareTokenError {}

/// Encodes a move history as a share payload.
pub fn encode(history: &[Move]) -> String {
    PAYLOAD_ENGINE.encode(to_tokens(history))
}

/// Renders a move history as the plain token list carried inside a share payload.
pub fn to_tokens(history: &[Move]) -> String {
    history
        .iter()
        .map(|mov| format!("{}-{}", mov.from, mov.to))
        .collect::<Vec<_>>()
        .join(TOKEN_SEPARATOR)
}

/// Parses a single `from-to` token.
pub fn parse_token(token: &str) -> Result<(Square, Square), ShareTokenError> {
    let malformed = || ShareTokenError::Malformed(token.to_owned());
    let pairs = TokenParser::parse(Rule::token, token).map_err(|_| malformed())?;
    let squares: Vec<Square> = pairs
        .flatten()
        .filter(|pair| pair.as_rule() == Rule::square)
        .filter_map(|pair| Square::try_from(pair.as_str()).ok())
        .collect();

    match squares.as_slice() {
        &[from, to] => Ok((from, to)),
        _ => Err(malformed()),
    }
}

/// Plays a single token against `state`.
pub fn resolve_token(state: &GameState, token: &str) -> Result<GameState, ShareTokenError> {
    let (from, to) = parse_token(token)?;
    state
        .submit_move(from, to)
        .ok_or_else(|| ShareTokenError::NoLegalMove(token.to_owned()))
}

/// Replays a plain token list from the starting position, skipping tokens that don't resolve.
pub fn replay_tokens(tokens: &str) -> GameState {
    let mut state = GameState::new();
    for token in tokens.split(TOKEN_SEPARATOR).filter(|t| !t.is_empty()) {
        match resolve_token(&state, token) {
            Ok(next) => state = next,
            Err(err) => debug!("skipping share token: {}", err),
        }
    }

    state
}

/// Rebuilds a game from a share payload, or from a full link whose fragment is the payload.
/// This never fails; a payload that can't be read at all gives the starting position.
pub fn decode(payload: &str) -> GameState {
    let bytes = decode_payload(payload);
    replay_tokens(&String::from_utf8_lossy(&bytes))
}

fn decode_payload(payload: &str) -> Vec<u8> {
    let fragment = match payload.rfind('#') {
        Some(idx) => &payload[idx + 1..],
        None => payload,
    };

    let fragment = fragment.trim();
    let readable = fragment
        .find(|c: char| !is_payload_char(c))
        .map_or(fragment, |end| &fragment[..end]);

    // A single dangling character carries fewer than eight bits and can't be decoded.
    let usable = if readable.len() % 4 == 1 {
        &readable[..readable.len() - 1]
    } else {
        readable
    };

    if usable.len() < fragment.trim_end_matches('=').len() {
        debug!(
            "share payload truncated to {} of {} characters",
            usable.len(),
            fragment.len()
        );
    }

    match PAYLOAD_ENGINE.decode(usable) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!("unreadable share payload: {}", err);
            Vec::new()
        }
    }
}

fn is_payload_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '/'
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use super::{decode, encode, parse_token, replay_tokens, ShareTokenError};
    use crate::position::GameState;
    use crate::types::{Color, PieceKind, Square};

    fn sq(s: &str) -> Square {
        Square::try_from(s).unwrap()
    }

    fn played(moves: &[(&str, &str)]) -> GameState {
        moves.iter().fold(GameState::new(), |state, &(from, to)| {
            state.submit_move(sq(from), sq(to)).unwrap()
        })
    }

    #[test]
    fn single_move_payload() {
        let state = played(&[("e1", "e3")]);
        assert_eq!("ZTEtZTM=", encode(state.history()));
    }

    #[test]
    fn empty_history() {
        assert_eq!("", encode(&[]));
        assert_eq!(GameState::new(), decode(""));
    }

    #[test]
    fn round_trip() {
        let state = played(&[("e1", "e3"), ("e6", "e4"), ("g0", "f2"), ("b7", "c5")]);
        let decoded = decode(&encode(state.history()));
        assert_eq!(state, decoded);
    }

    #[test]
    fn accepts_full_link_and_missing_padding() {
        let state = decode("https://example.com/chess#ZTEtZTN8ZTYtZTQ");
        assert_eq!(2, state.history().len());
        assert_eq!(Color::White, state.turn());
    }

    #[test]
    fn parses_tokens() {
        assert_eq!(Ok((sq("e1"), sq("e3"))), parse_token("e1-e3"));
        assert_eq!(
            Err(ShareTokenError::Malformed("e1e3".to_owned())),
            parse_token("e1e3")
        );
        assert!(parse_token("e8-e3").is_err());
        assert!(parse_token("i1-e3").is_err());
        assert!(parse_token("e1-e3 ").is_err());
    }

    #[test]
    fn garbage_tokens_are_skipped() {
        // "e1-e3|zz-q9|e6-e4"
        let state = decode("ZTEtZTN8enotcTl8ZTYtZTQ=");
        assert_eq!(2, state.history().len());
        assert_eq!(
            Some(PieceKind::Pawn),
            state.board().piece_at(sq("e4")).map(|p| p.kind)
        );
    }

    #[test]
    fn illegal_tokens_are_skipped() {
        // The second token moves white again and is dropped; the third is then black's reply.
        let state = replay_tokens("e1-e3|d1-d3|e6-e4");
        let history: Vec<String> = state.history().iter().map(|m| m.to_string()).collect();
        assert_eq!(vec!["e1-e3", "e6-e4"], history);
    }

    #[test]
    fn truncated_payload_keeps_valid_prefix() {
        // "e1-e3|e6-e4|g0-f2" cut off partway through the third token.
        let state = decode("ZTEtZTN8ZTYtZTR8Zz");
        assert_eq!(2, state.history().len());

        let state = decode("ZTEtZTN8ZTYtZTR8Z");
        assert_eq!(2, state.history().len());
    }

    #[test]
    fn unreadable_payload_is_starting_position() {
        assert_eq!(GameState::new(), decode("!!!"));
    }
}
