//! Randomness for tile spawning, kept behind a trait so move resolution can be
//! replayed with a fixed source.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Probability that a spawned tile is a 2 (otherwise 4).
pub const TWO_PROBABILITY: f64 = 0.9;

pub trait TileSource {
    /// Uniform index in `0..len`. `len` is never 0.
    fn pick_index(&mut self, len: usize) -> usize;
    /// 2 with probability 0.9, 4 otherwise.
    fn pick_value(&mut self) -> u32;
}

/// Any `rand` generator.
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self { Self { rng } }
}

impl RngSource<SmallRng> {
    pub fn seeded(seed: u64) -> Self { Self::new(SmallRng::seed_from_u64(seed)) }
    pub fn from_entropy() -> Self { Self::new(SmallRng::from_entropy()) }
}

impl<R: Rng> TileSource for RngSource<R> {
    fn pick_index(&mut self, len: usize) -> usize { self.rng.gen_range(0..len) }
    fn pick_value(&mut self) -> u32 { if self.rng.gen_bool(TWO_PROBABILITY) { 2 } else { 4 } }
}

/// Replays queued choices; once a queue runs dry it falls back to the first
/// empty cell and a 2.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    indices: VecDeque<usize>,
    values: VecDeque<u32>,
}

impl ScriptedSource {
    pub fn new() -> Self { Self::default() }

    /// Queue one spawn: `slot` is the position among the empty cells, not the board index.
    pub fn push(&mut self, slot: usize, value: u32) -> &mut Self {
        self.indices.push_back(slot);
        self.values.push_back(value);
        self
    }
}

impl TileSource for ScriptedSource {
    fn pick_index(&mut self, len: usize) -> usize {
        self.indices.pop_front().map(|i| i.min(len - 1)).unwrap_or(0)
    }
    fn pick_value(&mut self) -> u32 { self.values.pop_front().unwrap_or(2) }
}
