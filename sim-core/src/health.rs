//! Latent health state and generation mode
//!
//! `Health` is the ground-truth label used for classifier training; the live
//! prediction path discards it before a sample leaves the process. The two
//! health tables diverge deliberately: live streaming reduces anomalies to
//! reflect normal operation while still producing the occasional event,
//! whereas batch generation keeps the class balance the trainers expect.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::SimError;

/// Latent engine health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Health {
    Normal,
    Warning,
    Critical,
}

/// All health states, in table order.
pub const HEALTH_STATES: [Health; 3] = [Health::Normal, Health::Warning, Health::Critical];

impl Health {
    pub fn as_str(&self) -> &'static str {
        match self {
            Health::Normal => "NORMAL",
            Health::Warning => "WARNING",
            Health::Critical => "CRITICAL",
        }
    }

    /// Severity sub-range `[lo, hi)` dictated by this health state.
    pub fn severity_range(&self) -> (f64, f64) {
        match self {
            Health::Normal => (0.0, 0.3),
            Health::Warning => (0.3, 0.7),
            Health::Critical => (0.7, 1.0),
        }
    }

    /// Draw a health state from the table selected by `mode`.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, mode: GenerationMode) -> Health {
        let dist = WeightedIndex::new(mode.health_weights()).expect("health weights are positive");
        HEALTH_STATES[dist.sample(rng)]
    }

    /// Draw a severity value conditionally on this health state.
    pub fn sample_severity<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let (lo, hi) = self.severity_range();
        rng.gen_range(lo..hi)
    }
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which health-distribution table a generation call uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Live streaming: anomalies are rare.
    Live,
    /// Batch dataset generation: class balance matches training expectations.
    Batch,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Live => "live",
            GenerationMode::Batch => "batch",
        }
    }

    /// Categorical weights for [`HEALTH_STATES`] under this mode.
    pub fn health_weights(&self) -> [f64; 3] {
        match self {
            GenerationMode::Live => [0.80, 0.15, 0.05],
            GenerationMode::Batch => [0.48, 0.32, 0.20],
        }
    }
}

impl FromStr for GenerationMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "live" => Ok(GenerationMode::Live),
            "batch" => Ok(GenerationMode::Batch),
            _ => Err(SimError::InvalidMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_severity_stays_in_health_subrange() {
        let mut rng = StdRng::seed_from_u64(3);
        for health in HEALTH_STATES {
            let (lo, hi) = health.severity_range();
            for _ in 0..500 {
                let severity = health.sample_severity(&mut rng);
                assert!(severity >= lo && severity < hi);
            }
        }
    }

    #[test]
    fn test_health_frequencies_converge_batch() {
        assert_health_convergence(GenerationMode::Batch);
    }

    #[test]
    fn test_health_frequencies_converge_live() {
        assert_health_convergence(GenerationMode::Live);
    }

    fn assert_health_convergence(mode: GenerationMode) {
        let mut rng = StdRng::seed_from_u64(17);
        let mut counts = [0usize; 3];
        let n = 20_000;
        for _ in 0..n {
            let health = Health::sample(&mut rng, mode);
            let idx = HEALTH_STATES.iter().position(|h| *h == health).unwrap();
            counts[idx] += 1;
        }
        for (count, weight) in counts.iter().zip(mode.health_weights().iter()) {
            let freq = *count as f64 / n as f64;
            assert!((freq - weight).abs() < 0.02, "{mode:?}: freq {freq} vs weight {weight}");
        }
    }

    #[test]
    fn test_mode_parses_case_insensitive() {
        assert_eq!("live".parse::<GenerationMode>().unwrap(), GenerationMode::Live);
        assert_eq!("BATCH".parse::<GenerationMode>().unwrap(), GenerationMode::Batch);
    }

    #[test]
    fn test_mode_rejects_unknown_string() {
        let err = "replay".parse::<GenerationMode>().unwrap_err();
        assert_eq!(err, SimError::InvalidMode("replay".to_string()));
    }
}
