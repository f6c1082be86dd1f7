use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Move the selection onto every freshly spawned tile. Overrides whatever the player had selected.
    pub auto_select_spawned: bool,
    /// Where the best score is kept; `None` keeps it in memory only.
    pub best_score_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self { Self { auto_select_spawned: true, best_score_path: None } }
}

impl GameConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let f = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(f)?)
    }
}
