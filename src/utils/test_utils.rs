use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::{constants::MAX_SCORE, structures::record::Record};

pub fn generate_record(title: &str, diff: &str, constant: f64, score: i32) -> Record {
    generate_lamped_record(title, diff, constant, score, false, false)
}

pub fn generate_lamped_record(
    title: &str,
    diff: &str,
    constant: f64,
    score: i32,
    is_full_combo: bool,
    is_all_justice: bool
) -> Record {
    Record {
        title: title.to_string(),
        diff: diff.to_string(),
        constant,
        score,
        is_full_combo,
        is_all_justice
    }
}

/// Records lying exactly on the dropout curve for the given parameters,
/// one per difficulty constant. Titles are unique so no record loses its
/// slot to deduplication.
pub fn generate_records_on_curve(scale: f64, rate: f64, reference: f64, constants: &[f64]) -> Vec<Record> {
    constants
        .iter()
        .enumerate()
        .map(|(i, &constant)| {
            let dropout = scale * (rate * (constant - reference)).exp();
            let score = (MAX_SCORE as f64 - dropout).max(0.0).round() as i32;

            generate_record(&format!("curve song {i}"), "MAS", constant, score)
        })
        .collect()
}

/// A reproducible record set scattered around the dropout curve.
/// Seeded RNG so test runs are deterministic.
pub fn generate_noisy_records(scale: f64, rate: f64, reference: f64, count: usize) -> Vec<Record> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    (0..count)
        .map(|i| {
            let constant = 11.0 + rng.random_range(0.0..4.5);
            let dropout = scale * (rate * (constant - reference)).exp();
            let jitter = rng.random_range(-300..=300);
            let score = ((MAX_SCORE as f64 - dropout).max(0.0).round() as i32 + jitter).clamp(0, MAX_SCORE);

            generate_record(&format!("noisy song {i}"), "MAS", constant, score)
        })
        .collect()
}
