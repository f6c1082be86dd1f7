use std::fmt;

use crate::direction::Direction;
use crate::engine::{Engine, GameState, MoveResult};
use crate::error::EngineError;
use crate::spawn::TileSource;
use crate::store::{BestScore, ScoreStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Playing,
    Won,
    GameOver,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Playing => Ok(()),
            Status::Won => f.write_str("You reached 2048!"),
            Status::GameOver => f.write_str("Game over!"),
        }
    }
}

/// One player's game plus the best score, driven one command at a time.
pub struct Session<S: TileSource, P: ScoreStore> {
    engine: Engine<S>,
    state: GameState,
    best: BestScore<P>,
}

impl<S: TileSource, P: ScoreStore> Session<S, P> {
    pub fn new(mut engine: Engine<S>, best: BestScore<P>) -> Self {
        let state = engine.new_game();
        Self { engine, state, best }
    }

    pub fn restart(&mut self) { self.engine.reset(&mut self.state); }

    pub fn select(&mut self, index: usize) -> Result<bool, EngineError> {
        self.engine.select_tile(&mut self.state, index)
    }

    pub fn play(&mut self, dir: Direction) -> MoveResult {
        let result = self.engine.move_selected(&mut self.state, dir);
        self.best.observe(self.state.score());
        result
    }

    /// Game over wins over the 2048 message.
    pub fn status(&self) -> Status {
        if self.state.is_game_over() {
            Status::GameOver
        } else if self.state.won() {
            Status::Won
        } else {
            Status::Playing
        }
    }

    pub fn state(&self) -> &GameState { &self.state }
    pub fn best_score(&self) -> u64 { self.best.get() }
}
