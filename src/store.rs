//! Best-score persistence. The store is a capability handed in by the caller;
//! failures are logged and play carries on.

use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub trait ScoreStore {
    fn load(&mut self) -> Result<u64, StoreError>;
    fn save(&mut self, best: u64) -> Result<(), StoreError>;
}

/// Keeps the value in memory only.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    value: u64,
}

impl MemoryStore {
    pub fn new(value: u64) -> Self { Self { value } }
    pub fn value(&self) -> u64 { self.value }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u64, StoreError> { Ok(self.value) }
    fn save(&mut self, best: u64) -> Result<(), StoreError> {
        self.value = best;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct BestScoreFile {
    best_score: u64,
}

/// `{"best_score": N}` in a JSON file. A missing file reads as 0.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self { Self { path: path.as_ref().to_path_buf() } }
}

impl ScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<u64, StoreError> {
        let f = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let rec: BestScoreFile = serde_json::from_reader(BufReader::new(f))?;
        Ok(rec.best_score)
    }

    fn save(&mut self, best: u64) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() { fs::create_dir_all(dir)?; }
        }
        let body = serde_json::to_string(&BestScoreFile { best_score: best })?;
        fs::write(&self.path, body)?;
        Ok(())
    }
}

impl<T: ScoreStore + ?Sized> ScoreStore for Box<T> {
    fn load(&mut self) -> Result<u64, StoreError> { (**self).load() }
    fn save(&mut self, best: u64) -> Result<(), StoreError> { (**self).save(best) }
}

/// Process-wide best score: read once at startup, written whenever it is beaten.
pub struct BestScore<P: ScoreStore> {
    best: u64,
    store: P,
}

impl<P: ScoreStore> BestScore<P> {
    pub fn load(mut store: P) -> Self {
        let best = store.load().unwrap_or_else(|e| {
            warn!("could not load best score, starting from 0: {e}");
            0
        });
        Self { best, store }
    }

    pub fn get(&self) -> u64 { self.best }

    /// Set and persist. The in-memory value changes even if persisting fails.
    pub fn set(&mut self, best: u64) {
        self.best = best;
        if let Err(e) = self.store.save(best) {
            warn!("could not persist best score {best}: {e}");
        }
    }

    /// Raise the best score if `score` beats it. Returns true when it changed.
    pub fn observe(&mut self, score: u64) -> bool {
        if score <= self.best { return false; }
        debug!("new best score {score}");
        self.set(score);
        true
    }

    pub fn store(&self) -> &P { &self.store }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load(&mut self) -> Result<u64, StoreError> {
            Err(std::io::Error::new(ErrorKind::PermissionDenied, "denied").into())
        }
        fn save(&mut self, _best: u64) -> Result<(), StoreError> {
            Err(std::io::Error::new(ErrorKind::PermissionDenied, "denied").into())
        }
    }

    #[test]
    fn observe_only_raises() {
        let mut best = BestScore::load(MemoryStore::new(100));
        assert_eq!(best.get(), 100);
        assert!(!best.observe(40));
        assert!(!best.observe(100));
        assert!(best.observe(140));
        assert_eq!(best.get(), 140);
        assert_eq!(best.store().value(), 140);
    }

    #[test]
    fn broken_store_degrades_gracefully() {
        let mut best = BestScore::load(BrokenStore);
        assert_eq!(best.get(), 0);
        assert!(best.observe(8));
        assert_eq!(best.get(), 8);
    }

    #[test]
    fn json_store_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("onetile_store_{}", std::process::id()));
        let path = dir.join("best.json");
        let _ = fs::remove_file(&path);
        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load().unwrap(), 0);
        store.save(2048).unwrap();
        assert_eq!(JsonFileStore::new(&path).load().unwrap(), 2048);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn json_store_rejects_garbage() {
        let dir = std::env::temp_dir().join(format!("onetile_garbage_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("best.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(JsonFileStore::new(&path).load(), Err(StoreError::Json(_))));
        let _ = fs::remove_dir_all(&dir);
    }
}
