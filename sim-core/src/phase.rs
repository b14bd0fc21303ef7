//! Operating phases
//!
//! The phase governs nothing except the throttle sampling range; every other
//! sensor value follows from throttle and severity.

use once_cell::sync::Lazy;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Engine operating regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    Idle,
    Takeoff,
    Cruise,
    Descent,
}

/// All phases, in table order.
pub const PHASES: [Phase; 4] = [Phase::Idle, Phase::Takeoff, Phase::Cruise, Phase::Descent];

/// Categorical weights for [`PHASES`].
pub const PHASE_WEIGHTS: [f64; 4] = [0.25, 0.15, 0.45, 0.15];

static PHASE_DIST: Lazy<WeightedIndex<f64>> =
    Lazy::new(|| WeightedIndex::new(PHASE_WEIGHTS).expect("phase weights are positive"));

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "IDLE",
            Phase::Takeoff => "TAKEOFF",
            Phase::Cruise => "CRUISE",
            Phase::Descent => "DESCENT",
        }
    }

    /// Uniform throttle sampling range for this phase.
    pub fn throttle_range(&self) -> (f64, f64) {
        match self {
            Phase::Idle => (0.25, 0.35),
            Phase::Takeoff => (0.9, 1.0),
            Phase::Cruise => (0.65, 0.75),
            Phase::Descent => (0.4, 0.5),
        }
    }

    /// Draw a phase from the fixed categorical distribution.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Phase {
        PHASES[PHASE_DIST.sample(rng)]
    }

    /// Draw a throttle setting inside this phase's range.
    pub fn sample_throttle<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let (lo, hi) = self.throttle_range();
        rng.gen_range(lo..hi)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
