//! Training dataset generator
//!
//! Writes the labeled engine-telemetry CSV consumed by the offline model
//! trainers. Configuration comes from environment variables:
//!
//! - `DATASET_OUT`     output path (default `adour_engine_stable_ml_dataset.csv`)
//! - `DATASET_SEED`    u64 seed for reproducible datasets (default: entropy)
//! - `DATASET_SAMPLES` samples per aircraft (default 600)
//! - `DATASET_MODE`    health table, `batch` or `live` (default `batch`)

use aeropulse_sim::dataset::{self, DatasetBuilder, TOTAL_SAMPLES_PER_AIRCRAFT};
use aeropulse_sim::{GenerationMode, SampleGenerator};

fn main() {
    env_logger::init();

    let out = std::env::var("DATASET_OUT")
        .unwrap_or_else(|_| "adour_engine_stable_ml_dataset.csv".to_string());
    let seed: Option<u64> = std::env::var("DATASET_SEED").ok().and_then(|s| s.parse().ok());
    let samples: usize = std::env::var("DATASET_SAMPLES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(TOTAL_SAMPLES_PER_AIRCRAFT);
    let mode: GenerationMode = match std::env::var("DATASET_MODE") {
        Ok(raw) => match raw.parse() {
            Ok(mode) => mode,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(2);
            }
        },
        Err(_) => GenerationMode::Batch,
    };

    let mut generator = match seed {
        Some(seed) => {
            log::info!("Seeding generator with {seed}");
            SampleGenerator::seeded(seed)
        }
        None => SampleGenerator::from_entropy(),
    };

    let records = DatasetBuilder::new()
        .with_samples_per_aircraft(samples)
        .with_mode(mode)
        .build(&mut generator);

    for (health, freq) in dataset::health_distribution(&records) {
        log::info!("{health}: {:.1}%", freq * 100.0);
    }

    if let Err(e) = dataset::write_csv(&out, &records) {
        log::error!("Failed to write {out}: {e}");
        std::process::exit(1);
    }
    log::info!("Wrote {} records to {out}", records.len());
}
