// Score domain
pub const MAX_SCORE: i32 = 1_010_000;
pub const MIN_RATED_SCORE: i32 = 975_000;
pub const SSS_PLUS_SCORE: i32 = 1_007_500;
pub const OP_MULTIPLIER: f64 = 5.0;
pub const SSS_PLUS_OP_SLOPE: f64 = 0.0015;
// Lamp assumptions for predicted scores
pub const INFER_ALL_JUSTICE_SCORE: i32 = 1_009_000;
pub const INFER_FULL_COMBO_SCORE: i32 = 1_005_000;
// Default trend fit constants
pub const REFERENCE_DIFFICULTY: f64 = 12.0;
pub const MIN_FIT_SAMPLES: usize = 5;
pub const UNDERDETERMINED_FALLBACK_SCORE: i32 = 1_000_000;
pub const DIVERGED_FALLBACK_SCORE: i32 = 1_005_000;
pub const INITIAL_DROPOUT_SCALE: f64 = 1000.0;
pub const INITIAL_DROPOUT_RATE: f64 = 0.5;
pub const MAX_FIT_ITERATIONS: usize = 200;
// Ranking
pub const DEFAULT_RESULT_LIMIT: usize = 30;
