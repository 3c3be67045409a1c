//! Reel counters, the visible window and spin animation frames.

use crate::rng::RandomSource;
use crate::symbols::{Symbol, SYMBOL_COUNT};

pub const REEL_COUNT: usize = 3;
/// Rows shown per reel; the middle one is the payline.
pub const WINDOW_HEIGHT: usize = 7;
pub const PAYLINE_ROW: usize = WINDOW_HEIGHT / 2;
/// Tick on which each reel stops before jitter.
pub const BASE_STOP_TICKS: [u32; REEL_COUNT] = [20, 45, 75];
/// Largest base stop tick accepted from configuration.
pub const MAX_STOP_TICK: u32 = 10_000;
/// Base stops must be at least this far apart so jitter cannot reorder them.
pub const MIN_STOP_GAP: u32 = SYMBOL_COUNT as u32;
/// Highest starting counter drawn at startup.
pub const MAX_START_POSITION: u32 = 100;

/// Ever-increasing position of each reel. The resting symbol is the counter
/// modulo the strip length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReelState {
    pub counters: [u64; REEL_COUNT],
}

impl ReelState {
    pub fn new(counters: [u64; REEL_COUNT]) -> Self {
        Self { counters }
    }

    /// Random start positions in `0..=MAX_START_POSITION`.
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let mut counters = [0u64; REEL_COUNT];
        for c in counters.iter_mut() {
            *c = u64::from(rng.range_inclusive(0, MAX_START_POSITION));
        }
        Self { counters }
    }

    pub fn symbol_at(&self, reel: usize, offset: i64) -> Symbol {
        let strip = SYMBOL_COUNT as i64;
        let base = (self.counters[reel] % SYMBOL_COUNT as u64) as i64;
        Symbol::from_index((base + offset).rem_euclid(strip) as usize)
    }

    pub fn payline(&self) -> [Symbol; REEL_COUNT] {
        [self.symbol_at(0, 0), self.symbol_at(1, 0), self.symbol_at(2, 0)]
    }

    /// Rows top to bottom, each row holding one symbol per reel.
    pub fn window(&self) -> [[Symbol; REEL_COUNT]; WINDOW_HEIGHT] {
        let mut rows = [[Symbol::Cherry; REEL_COUNT]; WINDOW_HEIGHT];
        for (row_idx, row) in rows.iter_mut().enumerate() {
            let offset = row_idx as i64 - PAYLINE_ROW as i64;
            for (reel, cell) in row.iter_mut().enumerate() {
                *cell = self.symbol_at(reel, offset);
            }
        }
        rows
    }
}

/// Stop tick of every reel for one spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinPlan {
    pub stops: [u32; REEL_COUNT],
}

impl SpinPlan {
    pub fn fixed(stops: [u32; REEL_COUNT]) -> Self {
        Self { stops }
    }

    /// Adds a jitter in `0..SYMBOL_COUNT` to each base stop so every final
    /// symbol is reachable.
    pub fn draw<R: RandomSource + ?Sized>(base: [u32; REEL_COUNT], rng: &mut R) -> Self {
        let mut stops = base;
        for s in stops.iter_mut() {
            *s = s.saturating_add(rng.next_below(SYMBOL_COUNT as u32));
        }
        Self { stops }
    }

    pub fn total_ticks(&self) -> u32 {
        self.stops.iter().copied().max().unwrap_or(0).saturating_add(1)
    }

    /// Counters once every reel has stopped.
    pub fn landing(&self, start: ReelState) -> ReelState {
        let mut end = start;
        for (c, stop) in end.counters.iter_mut().zip(self.stops) {
            *c += u64::from(stop);
        }
        end
    }

    pub fn animate(&self, start: ReelState) -> SpinAnimation {
        SpinAnimation {
            plan: *self,
            state: start,
            tick: 0,
            done: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub tick: u32,
    pub reels: ReelState,
    pub spinning: [bool; REEL_COUNT],
}

/// Yields one frame per animation tick. A reel moves one stop per tick
/// until its stop tick passes; the last frame is the first tick on which no
/// reel moved.
#[derive(Debug, Clone)]
pub struct SpinAnimation {
    plan: SpinPlan,
    state: ReelState,
    tick: u32,
    done: bool,
}

impl Iterator for SpinAnimation {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.done {
            return None;
        }
        self.tick += 1;
        let mut spinning = [false; REEL_COUNT];
        for (i, stop) in self.plan.stops.iter().enumerate() {
            if self.tick <= *stop {
                spinning[i] = true;
                self.state.counters[i] += 1;
            }
        }
        if !spinning.iter().any(|s| *s) {
            self.done = true;
        }
        Some(Frame {
            tick: self.tick,
            reels: self.state,
            spinning,
        })
    }
}
