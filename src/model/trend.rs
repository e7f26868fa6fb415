use thiserror::Error;

use crate::model::{
    constants::{
        DIVERGED_FALLBACK_SCORE, INITIAL_DROPOUT_RATE, INITIAL_DROPOUT_SCALE, MAX_FIT_ITERATIONS, MAX_SCORE,
        MIN_FIT_SAMPLES, MIN_RATED_SCORE, REFERENCE_DIFFICULTY, UNDERDETERMINED_FALLBACK_SCORE
    },
    structures::{fit_report::FitReport, record::Record}
};

/// Tuning for the trend fit. Every knob a caller may want to vary is a
/// field here; the defaults mirror `model::constants`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitConfig {
    /// Minimum number of qualifying records required to attempt a fit.
    pub min_samples: usize,
    /// Constant prediction used when there are too few samples.
    pub underdetermined_score: i32,
    /// Constant prediction used when the optimizer fails.
    pub diverged_score: i32,
    /// Starting dropout scale for the optimizer.
    pub initial_scale: f64,
    /// Starting dropout growth rate for the optimizer.
    pub initial_rate: f64,
    /// Difficulty at which the dropout scale is anchored. Not fitted.
    pub reference_difficulty: f64,
    /// Hard cap on optimizer iterations.
    pub max_iterations: usize
}

impl Default for FitConfig {
    fn default() -> Self {
        FitConfig {
            min_samples: MIN_FIT_SAMPLES,
            underdetermined_score: UNDERDETERMINED_FALLBACK_SCORE,
            diverged_score: DIVERGED_FALLBACK_SCORE,
            initial_scale: INITIAL_DROPOUT_SCALE,
            initial_rate: INITIAL_DROPOUT_RATE,
            reference_difficulty: REFERENCE_DIFFICULTY,
            max_iterations: MAX_FIT_ITERATIONS
        }
    }
}

/// A fitted (or fallback) predictor mapping difficulty to expected score.
/// Pure once built; evaluating it never re-fits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScorePredictor {
    Curve {
        scale: f64,
        rate: f64,
        reference_difficulty: f64
    },
    Constant {
        score: i32
    }
}

impl ScorePredictor {
    pub fn predict(&self, difficulty: f64) -> f64 {
        match *self {
            ScorePredictor::Curve {
                scale,
                rate,
                reference_difficulty
            } => dropout_model(scale, rate, reference_difficulty, difficulty),
            ScorePredictor::Constant { score } => score as f64
        }
    }
}

/// Predictor plus the report describing how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendFit {
    pub predictor: ScorePredictor,
    pub report: FitReport
}

#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    #[error("normal equations are singular")]
    Singular,

    #[error("objective became non-finite")]
    NonFinite,

    #[error("no convergence after {0} iterations")]
    NoConvergence(usize)
}

/// Expected score under the dropout model: losses from the perfect score
/// grow exponentially with difficulty.
fn dropout_model(scale: f64, rate: f64, reference: f64, difficulty: f64) -> f64 {
    let dropout = scale * (rate * (difficulty - reference)).exp();
    (MAX_SCORE as f64 - dropout).max(0.0)
}

/// Fits the skill trend over a player's records. Only clean plays
/// (score at or above the S rank floor) carry a stable skill signal and
/// take part in the fit.
///
/// Never fails: underdetermined or diverging fits degrade to a constant
/// predictor and say so in the report.
pub fn fit_trend(records: &[Record], config: &FitConfig) -> TrendFit {
    let qualifying: Vec<&Record> = records.iter().filter(|r| r.score >= MIN_RATED_SCORE).collect();

    if qualifying.len() < config.min_samples {
        tracing::warn!(
            samples = qualifying.len(),
            required = config.min_samples,
            fallback_score = config.underdetermined_score,
            "too few qualifying records to fit a trend, using a fixed predictor"
        );

        return TrendFit {
            predictor: ScorePredictor::Constant {
                score: config.underdetermined_score
            },
            report: FitReport::Underdetermined {
                fallback_score: config.underdetermined_score
            }
        };
    }

    let difficulties: Vec<f64> = qualifying.iter().map(|r| r.constant).collect();
    let scores: Vec<f64> = qualifying.iter().map(|r| r.score as f64).collect();

    match levenberg_marquardt(&difficulties, &scores, config) {
        Ok((scale, rate)) => {
            tracing::info!(scale, rate, samples = qualifying.len(), "fitted skill trend");

            TrendFit {
                predictor: ScorePredictor::Curve {
                    scale,
                    rate,
                    reference_difficulty: config.reference_difficulty
                },
                report: FitReport::Fitted { scale, rate }
            }
        }
        Err(error) => {
            tracing::warn!(
                %error,
                fallback_score = config.diverged_score,
                "curve fit failed, using a fixed predictor"
            );

            TrendFit {
                predictor: ScorePredictor::Constant {
                    score: config.diverged_score
                },
                report: FitReport::Diverged {
                    fallback_score: config.diverged_score
                }
            }
        }
    }
}

/// Damped least squares over the two dropout parameters, with an analytic
/// Jacobian. The scale parameter is clamped non-negative.
fn levenberg_marquardt(difficulties: &[f64], scores: &[f64], config: &FitConfig) -> Result<(f64, f64), FitError> {
    let reference = config.reference_difficulty;
    let mut scale = config.initial_scale;
    let mut rate = config.initial_rate;
    let mut damping = 1e-3;
    let mut ssr = sum_of_squares(difficulties, scores, scale, rate, reference);

    if !ssr.is_finite() {
        return Err(FitError::NonFinite);
    }

    for _ in 0..config.max_iterations {
        // Normal equations for the two parameters: J^T J (symmetric) and
        // J^T r, where r is the residual and J the model Jacobian.
        let mut jtj = [0.0f64; 3];
        let mut jtr = [0.0f64; 2];
        for (&difficulty, &score) in difficulties.iter().zip(scores) {
            let growth = (rate * (difficulty - reference)).exp();
            let predicted = (MAX_SCORE as f64 - scale * growth).max(0.0);

            // The clamped region contributes no gradient.
            let (d_scale, d_rate) = if predicted > 0.0 {
                (-growth, -scale * (difficulty - reference) * growth)
            } else {
                (0.0, 0.0)
            };

            let residual = score - predicted;
            jtj[0] += d_scale * d_scale;
            jtj[1] += d_scale * d_rate;
            jtj[2] += d_rate * d_rate;
            jtr[0] += d_scale * residual;
            jtr[1] += d_rate * residual;
        }

        // Solve (J^T J + damping * diag(J^T J)) step = J^T r in closed form.
        let a00 = jtj[0] * (1.0 + damping);
        let a11 = jtj[2] * (1.0 + damping);
        let a01 = jtj[1];
        let det = a00 * a11 - a01 * a01;

        if !det.is_finite() || det.abs() < f64::EPSILON {
            return Err(FitError::Singular);
        }

        let step_scale = (a11 * jtr[0] - a01 * jtr[1]) / det;
        let step_rate = (a00 * jtr[1] - a01 * jtr[0]) / det;

        // A negligible step means the gradient has vanished; the current
        // parameters are the minimum.
        if step_scale.abs() <= 1e-8 * (scale.abs() + 1.0) && step_rate.abs() <= 1e-8 * (rate.abs() + 1.0) {
            return Ok((scale, rate));
        }

        let next_scale = (scale + step_scale).max(0.0);
        let next_rate = rate + step_rate;
        let next_ssr = sum_of_squares(difficulties, scores, next_scale, next_rate, reference);

        if !next_ssr.is_finite() {
            return Err(FitError::NonFinite);
        }

        if next_ssr <= ssr {
            let improvement = ssr - next_ssr;
            scale = next_scale;
            rate = next_rate;
            ssr = next_ssr;
            damping = (damping * 0.5).max(1e-12);

            if improvement <= 1e-10 * ssr.max(1e-9) {
                return Ok((scale, rate));
            }
        } else {
            damping *= 4.0;

            if damping > 1e12 {
                return Err(FitError::NoConvergence(config.max_iterations));
            }
        }
    }

    Err(FitError::NoConvergence(config.max_iterations))
}

fn sum_of_squares(difficulties: &[f64], scores: &[f64], scale: f64, rate: f64, reference: f64) -> f64 {
    difficulties
        .iter()
        .zip(scores)
        .map(|(&difficulty, &score)| {
            let residual = score - dropout_model(scale, rate, reference, difficulty);
            residual * residual
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::utils::test_utils::{generate_record, generate_records_on_curve};

    #[test]
    fn too_few_samples_falls_back_to_conservative_constant() {
        let records = vec![
            generate_record("A", "MAS", 13.0, 1_001_000),
            generate_record("B", "MAS", 13.5, 998_000),
        ];

        let fit = fit_trend(&records, &FitConfig::default());

        assert_eq!(
            fit.report,
            FitReport::Underdetermined {
                fallback_score: 1_000_000
            }
        );
        // Constant regardless of difficulty.
        assert_eq!(fit.predictor.predict(11.0), 1_000_000.0);
        assert_eq!(fit.predictor.predict(15.4), 1_000_000.0);
    }

    #[test]
    fn dirty_plays_do_not_count_toward_the_sample_minimum() {
        // Six records, but only four at or above the S rank floor.
        let mut records = generate_records_on_curve(1200.0, 0.45, 12.0, &[12.0, 12.5, 13.0, 13.5]);
        records.push(generate_record("fail 1", "MAS", 14.0, 870_000));
        records.push(generate_record("fail 2", "MAS", 14.5, 640_000));

        let fit = fit_trend(&records, &FitConfig::default());

        assert!(matches!(fit.report, FitReport::Underdetermined { .. }));
    }

    #[test]
    fn fit_recovers_a_synthetic_trend() {
        let (scale, rate) = (1200.0, 0.45);
        let difficulties = [11.0, 11.5, 12.0, 12.5, 13.0, 13.5, 14.0, 14.5, 15.0];
        let records = generate_records_on_curve(scale, rate, 12.0, &difficulties);

        let fit = fit_trend(&records, &FitConfig::default());

        let FitReport::Fitted {
            scale: fitted_scale,
            rate: fitted_rate
        } = fit.report
        else {
            panic!("expected a successful fit, got {:?}", fit.report);
        };

        // Scores were rounded to integers, so allow a little slack.
        assert_abs_diff_eq!(fitted_scale, scale, epsilon = 25.0);
        assert_abs_diff_eq!(fitted_rate, rate, epsilon = 0.02);

        for &difficulty in &difficulties {
            let truth = 1_010_000.0 - scale * (rate * (difficulty - 12.0)).exp();
            assert_abs_diff_eq!(fit.predictor.predict(difficulty), truth, epsilon = 5.0);
        }
    }

    #[test]
    fn fitted_predictor_decreases_with_difficulty() {
        let records = generate_records_on_curve(1000.0, 0.5, 12.0, &[11.0, 12.0, 12.5, 13.0, 14.0, 15.0]);

        let fit = fit_trend(&records, &FitConfig::default());

        let low = fit.predictor.predict(11.0);
        let high = fit.predictor.predict(15.0);
        assert!(low > high, "expected {low} > {high}");
    }

    #[test]
    fn predictor_floors_at_zero_far_beyond_the_data() {
        let records = generate_records_on_curve(1500.0, 0.6, 12.0, &[11.0, 12.0, 13.0, 14.0, 15.0]);

        let fit = fit_trend(&records, &FitConfig::default());

        assert_eq!(fit.predictor.predict(40.0), 0.0);
    }

    #[test]
    fn unidentifiable_data_degrades_to_optimistic_constant() {
        // Every record sits exactly at the reference difficulty, so the
        // growth rate has no effect on the residuals and the normal
        // equations collapse.
        let records: Vec<_> = (0..6)
            .map(|i| generate_record(&format!("song {i}"), "MAS", 12.0, 1_000_000 + i * 500))
            .collect();

        let fit = fit_trend(&records, &FitConfig::default());

        assert_eq!(
            fit.report,
            FitReport::Diverged {
                fallback_score: 1_005_000
            }
        );
        assert_eq!(fit.predictor.predict(14.0), 1_005_000.0);
    }

    #[test]
    fn config_overrides_fallback_scores() {
        let config = FitConfig {
            min_samples: 10,
            underdetermined_score: 995_000,
            ..FitConfig::default()
        };
        let records = generate_records_on_curve(1000.0, 0.5, 12.0, &[12.0, 13.0, 14.0]);

        let fit = fit_trend(&records, &config);

        assert_eq!(
            fit.report,
            FitReport::Underdetermined {
                fallback_score: 995_000
            }
        );
    }
}
