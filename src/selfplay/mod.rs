use log::warn;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{File, create_dir_all};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::board::CELLS;
use crate::direction::Direction;
use crate::engine::{Engine, GameState};
use crate::error::StoreError;
use crate::spawn::RngSource;

#[derive(Clone, Debug)]
pub struct SelfPlayParams {
    pub games: usize,
    pub max_moves: usize,
    pub threads: usize,
    pub seed: u64,
    pub auto_select_spawned: bool,
}

impl Default for SelfPlayParams {
    fn default() -> Self { Self { games: 100, max_moves: 2_000, threads: 1, seed: 42, auto_select_spawned: true } }
}

/// One command issued by the random player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMove {
    pub index: usize,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub seed: u64,
    pub moves: Vec<PlayedMove>,
    pub score: u64,
    pub highest_tile: u32,
    pub won: bool,
    pub game_over: bool,
}

pub fn generate_games(params: &SelfPlayParams) -> Vec<GameRecord> {
    generate_games_with(params, &|_| {})
}

/// Play `params.games` random games in parallel. `on_game` runs as each game finishes.
/// Output order and contents depend only on `params.seed`.
pub fn generate_games_with(params: &SelfPlayParams, on_game: &(dyn Fn(&GameRecord) + Sync)) -> Vec<GameRecord> {
    let run = || -> Vec<GameRecord> {
        (0..params.games)
            .into_par_iter()
            .map(|gi| {
                let rec = play_random_game(game_seed(params.seed, gi as u64), params);
                on_game(&rec);
                rec
            })
            .collect()
    };
    match rayon::ThreadPoolBuilder::new().num_threads(params.threads.max(1)).build() {
        Ok(pool) => pool.install(run),
        Err(e) => {
            warn!("could not build self-play thread pool, using global pool: {e}");
            run()
        }
    }
}

/// Uniformly random player: pick any tile, pick any direction.
pub fn play_random_game(seed: u64, params: &SelfPlayParams) -> GameRecord {
    let mut engine = Engine::new(RngSource::new(SmallRng::seed_from_u64(seed)));
    engine.set_auto_select_spawned(params.auto_select_spawned);
    let mut player = SmallRng::seed_from_u64(seed.rotate_left(17) ^ 0x5EED);
    let mut state: GameState = engine.new_game();
    let mut moves = Vec::new();
    while moves.len() < params.max_moves && !state.is_game_over() {
        let tiles: Vec<usize> = (0..CELLS).filter(|&i| state.board()[i] != 0).collect();
        if tiles.is_empty() { break; }
        let index = tiles[player.gen_range(0..tiles.len())];
        let direction = Direction::ALL[player.gen_range(0..4)];
        // index comes from the board, so selection always succeeds
        let _ = state.select(index);
        engine.move_selected(&mut state, direction);
        moves.push(PlayedMove { index, direction });
    }
    GameRecord {
        seed,
        moves,
        score: state.score(),
        highest_tile: state.board().highest_tile(),
        won: state.won(),
        game_over: state.is_game_over(),
    }
}

fn game_seed(seed: u64, game_index: u64) -> u64 { splitmix64(seed ^ game_index.wrapping_mul(0x9E3779B97F4A7C15)) }

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

pub fn write_jsonl<P: AsRef<Path>>(games: &[GameRecord], path: P) -> Result<(), StoreError> {
    if let Some(dir) = path.as_ref().parent() {
        if !dir.as_os_str().is_empty() { create_dir_all(dir)?; }
    }
    let mut w = BufWriter::new(File::create(path)?);
    for g in games {
        serde_json::to_writer(&mut w, g)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<GameRecord>, StoreError> {
    let rdr = BufReader::new(File::open(path)?);
    let mut out = Vec::new();
    for line in rdr.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        out.push(serde_json::from_str(&line)?);
    }
    Ok(out)
}

/// Aggregate numbers for a batch of games.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub games: usize,
    pub mean_score: f64,
    pub best_score: u64,
    pub highest_tile: u32,
    pub wins: usize,
    pub terminal: usize,
}

pub fn summarize(games: &[GameRecord]) -> Summary {
    if games.is_empty() { return Summary::default(); }
    let total: u64 = games.iter().map(|g| g.score).sum();
    Summary {
        games: games.len(),
        mean_score: total as f64 / games.len() as f64,
        best_score: games.iter().map(|g| g.score).max().unwrap_or(0),
        highest_tile: games.iter().map(|g| g.highest_tile).max().unwrap_or(0),
        wins: games.iter().filter(|g| g.won).count(),
        terminal: games.iter().filter(|g| g.game_over).count(),
    }
}
