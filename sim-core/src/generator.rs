//! Sample generator
//!
//! One `generate` call draws phase, throttle, latent health and severity,
//! evaluates the closed-form sensor relations against a baseline, then
//! perturbs each sensor with zero-mean Gaussian noise whose standard
//! deviation is a fixed percentage of the signal magnitude.
//!
//! The random source is injected explicitly so callers control seeding and
//! concurrency: the generator itself is synchronous and keeps no state
//! besides its RNG.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::baseline::EngineBaseline;
use crate::health::{GenerationMode, Health};
use crate::phase::Phase;
use crate::sample::{round_to, LabeledSample, SensorReading};
use crate::ENGINE_MODEL;

/// Relative noise levels per sensor (sd = |value| * pct).
pub const NOISE_PCT_RPM: f64 = 0.01;
pub const NOISE_PCT_EGT: f64 = 0.02;
pub const NOISE_PCT_FUEL_FLOW: f64 = 0.02;
pub const NOISE_PCT_OIL_TEMP: f64 = 0.02;
pub const NOISE_PCT_OIL_PRESSURE: f64 = 0.02;
pub const NOISE_PCT_VIBRATION: f64 = 0.12;

/// Synthetic telemetry generator over an injected random source.
pub struct SampleGenerator<R = StdRng> {
    rng: R,
}

impl SampleGenerator<StdRng> {
    /// Generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Deterministic generator; two instances with the same seed produce
    /// identical sample sequences.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl<R: Rng> SampleGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Access the underlying random source, for callers that interleave
    /// their own draws (the dataset builder's sampling-gap choice).
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Draw a baseline set to reuse across samples of one aircraft.
    pub fn draw_baseline(&mut self) -> EngineBaseline {
        EngineBaseline::draw(&mut self.rng)
    }

    /// Generate one sample with a fresh baseline (the live path).
    pub fn generate(&mut self, aircraft_id: &str, mode: GenerationMode) -> LabeledSample {
        let baseline = self.draw_baseline();
        self.generate_with_baseline(&baseline, aircraft_id, mode)
    }

    /// Generate one sample against a caller-held baseline (the batch path).
    pub fn generate_with_baseline(
        &mut self,
        baseline: &EngineBaseline,
        aircraft_id: &str,
        mode: GenerationMode,
    ) -> LabeledSample {
        self.generate_at(baseline, aircraft_id, mode, Utc::now())
    }

    /// Generate one sample with a pinned timestamp. The dataset builder uses
    /// this to emit monotonically spaced synthetic histories.
    pub fn generate_at(
        &mut self,
        baseline: &EngineBaseline,
        aircraft_id: &str,
        mode: GenerationMode,
        timestamp: DateTime<Utc>,
    ) -> LabeledSample {
        let phase = Phase::sample(&mut self.rng);
        let throttle = phase.sample_throttle(&mut self.rng);

        // Health first, so the label distribution stays exactly the table.
        let health = Health::sample(&mut self.rng, mode);
        let severity = health.sample_severity(&mut self.rng);

        let raw = baseline.sensors_at(throttle, severity);
        let rpm = self.add_noise(raw.rpm, NOISE_PCT_RPM);
        let egt = self.add_noise(raw.egt, NOISE_PCT_EGT);
        let fuel_flow = self.add_noise(raw.fuel_flow, NOISE_PCT_FUEL_FLOW);
        let oil_temp = self.add_noise(raw.oil_temp, NOISE_PCT_OIL_TEMP);
        let oil_pressure = self.add_noise(raw.oil_pressure, NOISE_PCT_OIL_PRESSURE);
        let vibration = self.add_noise(raw.vibration, NOISE_PCT_VIBRATION);

        LabeledSample {
            reading: SensorReading {
                timestamp,
                aircraft_id: aircraft_id.to_string(),
                engine_model: ENGINE_MODEL.to_string(),
                phase,
                throttle: round_to(throttle, 2),
                rpm: round_to(rpm, 1),
                fuel_flow: round_to(fuel_flow, 1),
                egt: round_to(egt, 1),
                oil_temp: round_to(oil_temp, 1),
                oil_pressure: round_to(oil_pressure, 2),
                vibration: round_to(vibration, 2),
            },
            health,
            severity: round_to(severity, 2),
        }
    }

    fn add_noise(&mut self, value: f64, pct: f64) -> f64 {
        let normal = Normal::new(0.0, value.abs() * pct).expect("noise sd is non-negative");
        value + normal.sample(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HEALTH_STATES;
    use crate::DEFAULT_AIRCRAFT_ID;

    #[test]
    fn test_generated_sample_respects_phase_and_health_tables() {
        let mut generator = SampleGenerator::seeded(42);
        for _ in 0..2000 {
            let sample = generator.generate(DEFAULT_AIRCRAFT_ID, GenerationMode::Batch);
            let (lo, hi) = sample.reading.phase.throttle_range();
            assert!(sample.reading.throttle >= round_to(lo, 2));
            assert!(sample.reading.throttle <= round_to(hi, 2));

            let (slo, shi) = sample.health.severity_range();
            assert!(sample.severity >= round_to(slo, 2));
            assert!(sample.severity <= round_to(shi, 2));
        }
    }

    #[test]
    fn test_health_distribution_converges_per_mode() {
        for mode in [GenerationMode::Batch, GenerationMode::Live] {
            let mut generator = SampleGenerator::seeded(99);
            let mut counts = [0usize; 3];
            let n = 10_000;
            for _ in 0..n {
                let sample = generator.generate(DEFAULT_AIRCRAFT_ID, mode);
                let idx = HEALTH_STATES.iter().position(|h| *h == sample.health).unwrap();
                counts[idx] += 1;
            }
            for (count, weight) in counts.iter().zip(mode.health_weights().iter()) {
                let freq = *count as f64 / n as f64;
                assert!((freq - weight).abs() < 0.02, "{mode:?}: {freq} vs {weight}");
            }
        }
    }

    #[test]
    fn test_identical_seeds_produce_identical_sequences() {
        let mut a = SampleGenerator::seeded(1234);
        let mut b = SampleGenerator::seeded(1234);
        let ts = Utc::now();
        for _ in 0..100 {
            let base_a = a.draw_baseline();
            let base_b = b.draw_baseline();
            assert_eq!(base_a, base_b);
            let sa = a.generate_at(&base_a, "HAL-HJT-03", GenerationMode::Live, ts);
            let sb = b.generate_at(&base_b, "HAL-HJT-03", GenerationMode::Live, ts);
            assert_eq!(sa, sb);
        }
    }

    #[test]
    fn test_live_sample_end_to_end() {
        let mut generator = SampleGenerator::seeded(7);
        let sample = generator.generate(DEFAULT_AIRCRAFT_ID, GenerationMode::Live);
        let reading = &sample.reading;

        assert_eq!(reading.aircraft_id, "HAL-HJT-01");
        assert_eq!(reading.engine_model, ENGINE_MODEL);
        assert!(crate::phase::PHASES.contains(&reading.phase));
        let (lo, hi) = reading.phase.throttle_range();
        assert!(reading.throttle >= round_to(lo, 2) && reading.throttle <= round_to(hi, 2));
        assert!(reading.is_finite());

        // Rounding precision: re-rounding must be the identity.
        assert_eq!(reading.throttle, round_to(reading.throttle, 2));
        assert_eq!(reading.rpm, round_to(reading.rpm, 1));
        assert_eq!(reading.fuel_flow, round_to(reading.fuel_flow, 1));
        assert_eq!(reading.egt, round_to(reading.egt, 1));
        assert_eq!(reading.oil_temp, round_to(reading.oil_temp, 1));
        assert_eq!(reading.oil_pressure, round_to(reading.oil_pressure, 2));
        assert_eq!(reading.vibration, round_to(reading.vibration, 2));
        assert_eq!(sample.severity, round_to(sample.severity, 2));
    }

    #[test]
    fn test_noise_perturbs_but_stays_near_closed_form() {
        // With pct <= 0.12 the noisy value should stay within 8 sigma of the
        // closed form for every draw in a long run.
        let baseline = EngineBaseline {
            rpm: 3100.0,
            egt: 510.0,
            oil_temp: 60.0,
            oil_pressure: 55.0,
            vibration: 1.2,
            fuel: 500.0,
        };
        let mut generator = SampleGenerator::seeded(55);
        let ts = Utc::now();
        for _ in 0..500 {
            let sample = generator.generate_at(&baseline, "HAL-HJT-02", GenerationMode::Batch, ts);
            let raw = baseline.sensors_at(sample.reading.throttle, sample.severity);
            // throttle/severity are rounded in the record, so allow the
            // rounding slack on top of the noise band.
            let tol = raw.rpm.abs() * NOISE_PCT_RPM * 8.0 + 40.0;
            assert!((sample.reading.rpm - raw.rpm).abs() < tol);
            let tol = raw.vibration.abs() * NOISE_PCT_VIBRATION * 8.0 + 0.1;
            assert!((sample.reading.vibration - raw.vibration).abs() < tol);
        }
    }
}
