use thiserror::Error;

/// Caller/integration bugs. Routine bad moves are no-ops, not errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("cell index {index} out of range (board has 16 cells)")]
    IndexOutOfRange { index: usize },
    #[error("unrecognized direction: {0:?}")]
    InvalidDirection(String),
    #[error("cell {index} holds {value}, which is not a tile value")]
    InvalidTile { index: usize, value: u32 },
    #[error("selected cell {index} is empty")]
    EmptySelection { index: usize },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}
