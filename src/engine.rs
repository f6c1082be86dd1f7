use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::board::{Board, MAX_TILE, TARGET_TILE};
use crate::config::GameConfig;
use crate::direction::Direction;
use crate::error::EngineError;
use crate::spawn::TileSource;

/// Everything one game needs: board, score, selection and the win flag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SavedState")]
pub struct GameState {
    board: Board,
    score: u64,
    selected: Option<usize>,
    won: bool,
}

#[derive(Deserialize)]
struct SavedState {
    board: Board,
    score: u64,
    selected: Option<usize>,
    won: bool,
}

impl TryFrom<SavedState> for GameState {
    type Error = EngineError;

    /// The selection must point at a tile on the board.
    fn try_from(s: SavedState) -> Result<Self, EngineError> {
        if let Some(index) = s.selected {
            match s.board.get(index) {
                None => return Err(EngineError::IndexOutOfRange { index }),
                Some(0) => return Err(EngineError::EmptySelection { index }),
                Some(_) => {}
            }
        }
        Ok(GameState { board: s.board, score: s.score, selected: s.selected, won: s.won })
    }
}

impl GameState {
    /// A state around an existing board: no score, no selection, not won.
    pub fn from_board(board: Board) -> Self { Self { board, ..Self::default() } }

    pub fn board(&self) -> &Board { &self.board }
    pub fn score(&self) -> u64 { self.score }
    pub fn selected(&self) -> Option<usize> { self.selected }
    pub fn won(&self) -> bool { self.won }

    pub fn is_game_over(&self) -> bool { self.board.is_game_over() }

    /// Select the tile at `index`. Returns false (and keeps the old selection) on an empty cell.
    pub fn select(&mut self, index: usize) -> Result<bool, EngineError> {
        match self.board.get(index) {
            None => Err(EngineError::IndexOutOfRange { index }),
            Some(0) => Ok(false),
            Some(_) => {
                self.selected = Some(index);
                Ok(true)
            }
        }
    }
}

/// Outcome of one move command, enough for a front-end to pick sounds and messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// The tile slid or merged (and a new tile was spawned).
    pub moved: bool,
    pub merged: bool,
    /// Value of the tile produced by the merge.
    pub merged_value: Option<u32>,
    /// First 2048 of this game.
    pub reached_target: bool,
    pub game_over: bool,
    /// Board index of the tile spawned after the move.
    pub spawned: Option<usize>,
}

impl MoveResult {
    pub const NO_OP: MoveResult = MoveResult {
        moved: false,
        merged: false,
        merged_value: None,
        reached_target: false,
        game_over: false,
        spawned: None,
    };
}

/// Rule engine. Owns the spawn randomness; game state is passed in.
pub struct Engine<S: TileSource> {
    source: S,
    auto_select_spawned: bool,
}

impl<S: TileSource> Engine<S> {
    pub fn new(source: S) -> Self { Self { source, auto_select_spawned: true } }

    pub fn with_config(source: S, config: &GameConfig) -> Self {
        Self { source, auto_select_spawned: config.auto_select_spawned }
    }

    pub fn set_auto_select_spawned(&mut self, on: bool) { self.auto_select_spawned = on; }
    pub fn auto_select_spawned(&self) -> bool { self.auto_select_spawned }

    /// Empty board with two spawned tiles.
    pub fn new_game(&mut self) -> GameState {
        let mut state = GameState::default();
        self.reset(&mut state);
        state
    }

    /// Reinitialise `state` in place, as on restart.
    pub fn reset(&mut self, state: &mut GameState) {
        state.board.clear();
        state.score = 0;
        state.selected = None;
        state.won = false;
        self.spawn_tile(state);
        self.spawn_tile(state);
        info!("new game: {:?}", state.board);
    }

    /// Place a 2 or 4 on a random empty cell. No-op on a full board.
    pub fn spawn_tile(&mut self, state: &mut GameState) -> Option<usize> {
        let empty = state.board.empty_cells();
        if empty.is_empty() { return None; }
        let index = empty[self.source.pick_index(empty.len())];
        let value = self.source.pick_value();
        state.board.set(index, value);
        if self.auto_select_spawned { state.selected = Some(index); }
        debug!("spawned {} at {}", value, index);
        Some(index)
    }

    pub fn select_tile(&self, state: &mut GameState, index: usize) -> Result<bool, EngineError> {
        state.select(index)
    }

    /// Slide the selected tile in `dir` until it hits a wall, a different tile,
    /// or merges into an equal one (at most one merge).
    pub fn move_selected(&mut self, state: &mut GameState, dir: Direction) -> MoveResult {
        let Some(start) = state.selected else { return MoveResult::NO_OP };
        if state.board.get(start).unwrap_or(0) == 0 { return MoveResult::NO_OP; }
        let mut result = MoveResult::NO_OP;
        let mut current = start;

        while let Some(next) = Board::neighbor(current, dir) {
            let value = state.board[current];
            let target = state.board[next];
            if target == 0 {
                state.board.set(next, value);
                state.board.set(current, 0);
                state.selected = Some(next);
                current = next;
                result.moved = true;
            } else if target == value && target < MAX_TILE {
                let merged = target * 2;
                state.board.set(next, merged);
                state.board.set(current, 0);
                state.score += u64::from(merged);
                state.selected = None;
                result.moved = true;
                result.merged = true;
                result.merged_value = Some(merged);
                if merged == TARGET_TILE && !state.won {
                    state.won = true;
                    result.reached_target = true;
                    info!("reached {} with score {}", TARGET_TILE, state.score);
                }
                break;
            } else {
                break;
            }
        }

        if result.moved {
            result.spawned = self.spawn_tile(state);
            result.game_over = state.board.is_game_over();
        }
        debug!("move {} from {}: {:?}", dir, start, result);
        result
    }

    pub fn is_game_over(&self, state: &GameState) -> bool { state.board.is_game_over() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CELLS;
    use crate::spawn::ScriptedSource;

    fn state_with(cells: [u32; CELLS]) -> GameState {
        GameState::from_board(Board::from_cells(cells).unwrap())
    }

    #[test]
    fn new_game_spawns_two_tiles_and_selects_last() {
        let mut src = ScriptedSource::new();
        src.push(0, 2).push(14, 4);
        let mut engine = Engine::new(src);
        let state = engine.new_game();
        assert_eq!(state.board().tile_count(), 2);
        assert_eq!(state.board()[0], 2);
        // slot 14 among the 15 remaining empties is board index 15
        assert_eq!(state.board()[15], 4);
        assert_eq!(state.selected(), Some(15));
        assert_eq!(state.score(), 0);
        assert!(!state.won());
    }

    #[test]
    fn spawn_without_auto_select_keeps_selection() {
        let mut engine = Engine::new(ScriptedSource::new());
        engine.set_auto_select_spawned(false);
        let mut state = state_with([8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        state.select(0).unwrap();
        assert_eq!(engine.spawn_tile(&mut state), Some(1));
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn spawn_on_full_board_is_noop() {
        let mut engine = Engine::new(ScriptedSource::new());
        let mut state = state_with([2; CELLS]);
        assert_eq!(engine.spawn_tile(&mut state), None);
        assert_eq!(state.board().cells(), &[2; CELLS]);
    }

    #[test]
    fn select_out_of_range_errors() {
        let engine = Engine::new(ScriptedSource::new());
        let mut state = state_with([2; CELLS]);
        assert_eq!(engine.select_tile(&mut state, 16), Err(EngineError::IndexOutOfRange { index: 16 }));
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn blocked_by_different_value_is_noop() {
        let mut engine = Engine::new(ScriptedSource::new());
        let mut state = state_with([2, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        state.select(0).unwrap();
        let before = state.clone();
        assert_eq!(engine.move_selected(&mut state, Direction::Right), MoveResult::NO_OP);
        assert_eq!(state, before);
    }

    #[test]
    fn slide_stops_before_different_tile() {
        let mut engine = Engine::new(ScriptedSource::new());
        engine.set_auto_select_spawned(false);
        let mut state = state_with([2, 0, 0, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        state.select(0).unwrap();
        let r = engine.move_selected(&mut state, Direction::Right);
        assert!(r.moved && !r.merged);
        assert_eq!(state.board()[2], 2);
        assert_eq!(state.board()[3], 8);
        assert_eq!(state.selected(), Some(2));
        // spawn took the first empty cell
        assert_eq!(r.spawned, Some(0));
    }

    #[test]
    fn slide_then_merge_at_end_of_path() {
        let mut engine = Engine::new(ScriptedSource::new());
        let mut state = state_with([16, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 16, 0, 0, 0]);
        state.select(0).unwrap();
        let r = engine.move_selected(&mut state, Direction::Down);
        assert!(r.merged);
        assert_eq!(r.merged_value, Some(32));
        assert_eq!(state.board()[12], 32);
        assert_eq!(state.board()[0], 2, "spawn fills first empty cell");
        assert_eq!(state.score(), 32);
    }

    #[test]
    fn largest_tiles_do_not_merge() {
        let mut engine = Engine::new(ScriptedSource::new());
        let mut state = state_with([MAX_TILE, MAX_TILE, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        state.select(0).unwrap();
        let before = state.clone();
        assert_eq!(engine.move_selected(&mut state, Direction::Right), MoveResult::NO_OP);
        assert_eq!(state, before);

        let half = MAX_TILE / 2;
        let mut state = state_with([half, half, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        state.select(0).unwrap();
        let r = engine.move_selected(&mut state, Direction::Right);
        assert_eq!(r.merged_value, Some(MAX_TILE));
        assert_eq!(state.score(), u64::from(MAX_TILE));
    }

    #[test]
    fn saved_state_round_trips() {
        let mut state = state_with([2, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 8]);
        state.select(15).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(serde_json::from_str::<GameState>(&json).unwrap(), state);
    }

    #[test]
    fn saved_state_rejects_bad_cells_and_selection() {
        let board = |cell0: u32| {
            let mut cells = [0u32; CELLS];
            cells[0] = cell0;
            cells[1] = 2;
            serde_json::to_string(&cells).unwrap()
        };
        let saved = |cells: String, selected: &str| {
            format!(r#"{{"board":{cells},"score":0,"selected":{selected},"won":false}}"#)
        };
        assert!(serde_json::from_str::<GameState>(&saved(board(3), "0")).is_err());
        assert!(serde_json::from_str::<GameState>(&saved(board(2), "16")).is_err());
        assert!(serde_json::from_str::<GameState>(&saved(board(0), "0")).is_err());
        let ok: GameState = serde_json::from_str(&saved(board(0), "1")).unwrap();
        assert_eq!(ok.selected(), Some(1));
        let none: GameState = serde_json::from_str(&saved(board(4), "null")).unwrap();
        assert_eq!(none.selected(), None);
    }

    #[test]
    fn merge_happens_at_most_once() {
        let mut engine = Engine::new(ScriptedSource::new());
        engine.set_auto_select_spawned(false);
        let mut state = state_with([4, 4, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        state.select(0).unwrap();
        let r = engine.move_selected(&mut state, Direction::Right);
        assert_eq!(r.merged_value, Some(8));
        assert_eq!(state.board()[1], 8);
        assert_eq!(state.board()[2], 8);
        assert_eq!(state.selected(), None);
    }
}
