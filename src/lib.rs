// Single-tile 2048: select one tile, slide it until it stops or merges
pub mod board;
pub mod config;
pub mod direction;
pub mod engine;
pub mod error;
pub mod selfplay;
pub mod session;
pub mod spawn;
pub mod store;

pub use board::{Board, CELLS, SIDE, TARGET_TILE};
pub use direction::Direction;
pub use engine::{Engine, GameState, MoveResult};
pub use error::{EngineError, StoreError};
