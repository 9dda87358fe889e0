//! Stateless "broken monitor" distortion.
//!
//! Every value is derived from a cheap sine hash of the row and the time
//! counter, so the same `(row, time)` always yields the same distortion.

/// Burst windows per unit of time.
const BURST_RATE: f64 = 0.35;
/// Fraction of burst windows that glitch.
const BURST_THRESHOLD: f64 = 0.18;
const ROW_SEED_STRIDE: f64 = 100.0;
const MEDIUM_SHIFT_CUTOFF: f64 = 0.8;
const MEDIUM_SHIFT_SPAN: f64 = 20.0;
const SMALL_SHIFT_CUTOFF: f64 = 0.65;
const SMALL_SHIFT_SPAN: f64 = 10.0;
const FLICKER_CUTOFF: f64 = 0.95;
const JITTER_ROW_STRIDE: f64 = 7.0;
const JITTER_RATE: f64 = 1.2;
const JITTER_CUTOFF: f64 = 0.96;
const JITTER_PHASE: f64 = 2.5;
const JITTER_SPAN: f64 = 5.0;

/// Glitch contribution for a single cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glitch {
    pub offset_x: f64,
    /// Either `0.0` (row flickered out) or `1.0`.
    pub alpha: f64,
}

impl Glitch {
    pub const NONE: Glitch = Glitch { offset_x: 0.0, alpha: 1.0 };
}

/// Maps a seed to `[0, 1)` with the classic `fract(sin(seed * 12.9898) * 43758.5453)` hash.
pub fn glitch_random(seed: f64) -> f64 {
    let x = (seed * 12.9898).sin() * 43758.5453;
    x - x.floor()
}

/// Index of the burst window `time` falls into.
pub fn burst_index(time: f64) -> f64 {
    (time * BURST_RATE).floor()
}

pub fn is_burst_active(burst: f64) -> bool {
    glitch_random(burst) < BURST_THRESHOLD
}

/// Distortion for the cell at `(x, y)`.
///
/// The column is accepted for symmetry with the renderer, but every cell of a
/// row shares the same distortion.
pub fn glitch(_x: u16, y: u16, time: f64) -> Glitch {
    let row = f64::from(y);
    let burst = burst_index(time);
    let mut result = Glitch::NONE;

    if is_burst_active(burst) {
        let row_seed = burst * ROW_SEED_STRIDE + row;
        let tier = glitch_random(row_seed);

        if tier > MEDIUM_SHIFT_CUTOFF {
            result.offset_x = (glitch_random(row_seed + 1.0) - 0.5) * MEDIUM_SHIFT_SPAN;
        } else if tier > SMALL_SHIFT_CUTOFF {
            result.offset_x = (glitch_random(row_seed + 2.0) - 0.5) * SMALL_SHIFT_SPAN;
        }

        if glitch_random(row_seed + 3.0) > FLICKER_CUTOFF {
            result.alpha = 0.0;
        }
    }

    let jitter = glitch_random(row * JITTER_ROW_STRIDE + (time * JITTER_RATE).floor());
    if jitter > JITTER_CUTOFF {
        result.offset_x += (glitch_random(row + time * JITTER_PHASE) - 0.5) * JITTER_SPAN;
    }

    result
}
