//! Where the best score lives between sessions.
//!
//! The engine only ever sees a [`ScoreStore`]. Reads never fail (a missing or garbled value is a best score of 0)
//! and writes are fire-and-forget: if one goes wrong it gets logged and the game carries on.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

/// The one key the best score is kept under.
pub const BEST_SCORE_KEY: &str = "bestScore";

pub trait ScoreStore {
    /// The persisted best score, or 0 if there isn't a readable one.
    fn best_score(&self) -> u32;

    /// Persist a new best score. Best effort; nothing is reported back.
    fn set_best_score(&mut self, value: u32);
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not access the score file")]
    Io(#[from] io::Error),
    #[error("score file is not valid RON")]
    Ron(#[from] ron::Error),
}

/// Reads a stored value the lenient way: leading digits count, anything else is 0.
pub fn parse_score(raw: &str) -> u32 {
    let raw = raw.trim_start();
    let digits = raw.len() - raw.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    raw[..digits].parse().unwrap_or(0)
}

type Entries = BTreeMap<String, String>;

/// Keeps the best score in memory only. Counts writes so tests can check when the engine persisted.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Entries,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts out holding `raw` under [`BEST_SCORE_KEY`], exactly as written.
    pub fn with_raw(raw: &str) -> Self {
        let mut entries = Entries::new();
        entries.insert(BEST_SCORE_KEY.to_string(), raw.to_string());
        MemoryStore { entries, writes: 0 }
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn raw(&self) -> Option<&str> {
        self.entries.get(BEST_SCORE_KEY).map(String::as_str)
    }
}

impl ScoreStore for MemoryStore {
    fn best_score(&self) -> u32 {
        self.raw().map(parse_score).unwrap_or(0)
    }

    fn set_best_score(&mut self, value: u32) {
        self.entries
            .insert(BEST_SCORE_KEY.to_string(), value.to_string());
        self.writes += 1;
    }
}

/// A RON file of string keys and values, like a little local storage.
///
/// Other keys in the file are left alone when the best score is written.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Entries, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(ron::de::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, value: u32) -> Result<(), StoreError> {
        // a garbled file gets replaced rather than blocking the write
        let mut entries = self.load().unwrap_or_default();
        entries.insert(BEST_SCORE_KEY.to_string(), value.to_string());
        let text = ron::ser::to_string_pretty(&entries, ron::ser::PrettyConfig::default())?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl ScoreStore for FileStore {
    fn best_score(&self) -> u32 {
        match self.load() {
            Ok(entries) => entries.get(BEST_SCORE_KEY).map(|raw| parse_score(raw)).unwrap_or(0),
            Err(e) => {
                warn!("reading best score from {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn set_best_score(&mut self, value: u32) {
        match self.store(value) {
            Ok(()) => debug!("saved best score {} to {}", value, self.path.display()),
            Err(e) => warn!("saving best score to {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("kolor-{}-{}.ron", name, std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn lenient_parsing() {
        assert_eq!(parse_score("40"), 40);
        assert_eq!(parse_score(" 40"), 40);
        assert_eq!(parse_score("42abc"), 42);
        assert_eq!(parse_score("12.5"), 12);
        assert_eq!(parse_score("abc"), 0);
        assert_eq!(parse_score("-5"), 0);
        assert_eq!(parse_score(""), 0);
        assert_eq!(parse_score("99999999999999999999"), 0);
    }

    #[test]
    fn memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.best_score(), 0);
        store.set_best_score(30);
        assert_eq!(store.best_score(), 30);
        assert_eq!(store.raw(), Some("30"));
        assert_eq!(store.writes(), 1);
        assert_eq!(MemoryStore::with_raw("nope").best_score(), 0);
    }

    #[test]
    fn missing_file_is_zero() {
        let store = FileStore::new(temp_path("missing"));
        assert_eq!(store.best_score(), 0);
    }

    #[test]
    fn file_round_trip_keeps_other_keys() {
        let path = temp_path("roundtrip");
        fs::write(&path, r#"{"theme": "dark", "bestScore": "20"}"#).unwrap();
        let mut store = FileStore::new(&path);
        assert_eq!(store.best_score(), 20);
        store.set_best_score(50);
        assert_eq!(FileStore::new(&path).best_score(), 50);
        let entries: Entries = ron::de::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(entries.get("theme").map(String::as_str), Some("dark"));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn garbled_file_reads_zero_and_is_overwritten() {
        let path = temp_path("garbled");
        fs::write(&path, "this is not ron {").unwrap();
        let mut store = FileStore::new(&path);
        assert_eq!(store.best_score(), 0);
        store.set_best_score(10);
        assert_eq!(store.best_score(), 10);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unwritable_path_is_swallowed() {
        let dir = temp_path("dir");
        fs::create_dir_all(&dir).unwrap();
        // writing to a directory fails; the store just logs it
        let mut store = FileStore::new(&dir);
        store.set_best_score(10);
        assert_eq!(store.best_score(), 0);
        fs::remove_dir(&dir).unwrap();
    }
}
