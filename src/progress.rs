// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The player's persisted progress and the key-value store it lives in.
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use hashbrown::HashMap;
use serde_json::{Map, Value};

use crate::status::Outcome;
use crate::types::Color;

/// Key the progress record is stored under.
pub const SAVE_KEY: &str = "chess_clash_elemental_save";

pub const STARTING_COINS: u64 = 100;
pub const CHECKMATE_REWARD: u64 = 150;
pub const STALEMATE_REWARD: u64 = 50;

/// Results accumulated across games. White is the local player.
///
/// The record shares its key with other parts of the game, so fields this crate doesn't know
/// about are kept in `extra` and written back untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProgress {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub coins: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        PlayerProgress {
            wins: 0,
            losses: 0,
            draws: 0,
            coins: STARTING_COINS,
            extra: Map::new(),
        }
    }
}

impl PlayerProgress {
    pub fn record_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Checkmate {
                winner: Color::White,
            } => {
                self.wins += 1;
                self.coins += CHECKMATE_REWARD;
            }
            Outcome::Checkmate {
                winner: Color::Black,
            } => {
                self.losses += 1;
                self.coins += CHECKMATE_REWARD;
            }
            Outcome::Stalemate => {
                self.draws += 1;
                self.coins += STALEMATE_REWARD;
            }
        }
    }
}

impl fmt::Display for PlayerProgress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "wins {} losses {} draws {} coins {}",
            self.wins, self.losses, self.draws, self.coins
        )
    }
}

#[derive(Debug)]
pub enum ProgressError {
    Io(io::Error),
    Corrupted(serde_json::Error),
}

impl fmt::Display for ProgressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProgressError::Io(err) => write!(f, "progress store failed: {}", err),
            ProgressError::Corrupted(err) => write!(f, "progress record is corrupted: {}", err),
        }
    }
}

impl Error for ProgressError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProgressError::Io(err) => Some(err),
            ProgressError::Corrupted(err) => Some(err),
        }
    }
}

impl From<io::Error> for ProgressError {
    fn from(err: io::Error) -> ProgressError {
        ProgressError::Io(err)
    }
}

impl From<serde_json::Error> for ProgressError {
    fn from(err: serde_json::Error) -> ProgressError {
        ProgressError::Corrupted(err)
    }
}

/// A synchronous string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Stores each key as a file of the same name in a directory, which is created on first write.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> FileStore {
        FileStore { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(ref err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(key), value)
    }
}

/// Reads the stored progress record, reporting why it couldn't be read.
pub fn try_load_progress<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<Option<PlayerProgress>, ProgressError> {
    match store.get(SAVE_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Reads the stored progress record. A missing, unreadable or corrupted record gives the
/// defaults.
pub fn load_progress<S: KeyValueStore + ?Sized>(store: &S) -> PlayerProgress {
    match try_load_progress(store) {
        Ok(Some(progress)) => progress,
        Ok(None) => PlayerProgress::default(),
        Err(err) => {
            warn!("{}; starting from defaults", err);
            PlayerProgress::default()
        }
    }
}

pub fn save_progress<S: KeyValueStore + ?Sized>(
    store: &mut S,
    progress: &PlayerProgress,
) -> Result<(), ProgressError> {
    let raw = serde_json::to_string(progress)?;
    store.set(SAVE_KEY, &raw)?;
    debug!("saved progress: {}", progress);
    Ok(())
}
