use crate::model::constants::{
    INFER_ALL_JUSTICE_SCORE, INFER_FULL_COMBO_SCORE, MAX_SCORE, MIN_RATED_SCORE, OP_MULTIPLIER, SSS_PLUS_OP_SLOPE,
    SSS_PLUS_SCORE
};

/// Rating value of a single chart from its difficulty constant and an
/// achieved score. Piecewise linear in score, continuous at every
/// breakpoint, zero below the S rank floor.
pub fn rating_from_score(constant: f64, score: i32) -> f64 {
    if score >= 1_009_000 {
        return constant + 2.15;
    }
    if score >= SSS_PLUS_SCORE {
        return constant + 2.0 + (score - SSS_PLUS_SCORE) as f64 * 0.0001;
    }
    if score >= 1_005_000 {
        return constant + 1.5 + (score - 1_005_000) as f64 * 0.0002;
    }
    if score >= 1_000_000 {
        return constant + 1.0 + (score - 1_000_000) as f64 * 0.0001;
    }
    if score >= 990_000 {
        return constant + 0.6 + (score - 990_000) as f64 * 0.00004;
    }
    if score >= MIN_RATED_SCORE {
        return constant + (score - MIN_RATED_SCORE) as f64 * 0.00002;
    }
    0.0
}

/// Bonus for the lamp earned on a play. A perfect score outranks both
/// flags regardless of what they claim.
pub fn lamp_bonus(score: i32, is_full_combo: bool, is_all_justice: bool) -> f64 {
    if score >= MAX_SCORE {
        return 1.25;
    }
    if is_all_justice {
        return 1.0;
    }
    if is_full_combo {
        return 0.5;
    }
    0.0
}

/// OverPower value of a single play.
///
/// The perfect-score band does not add the lamp bonus: a perfect score
/// always carries the best lamp, and the flat `(const + 3) * 5` base
/// already accounts for it, matching the in-game OverPower total.
pub fn op_value(constant: f64, score: i32, is_full_combo: bool, is_all_justice: bool) -> f64 {
    if score >= MAX_SCORE {
        return (constant + 3.0) * OP_MULTIPLIER;
    }

    let bonus = lamp_bonus(score, is_full_combo, is_all_justice);
    if score > SSS_PLUS_SCORE {
        return (constant + 2.0) * OP_MULTIPLIER + bonus + (score - SSS_PLUS_SCORE) as f64 * SSS_PLUS_OP_SLOPE;
    }
    if score >= MIN_RATED_SCORE {
        return rating_from_score(constant, score) * OP_MULTIPLIER + bonus;
    }
    0.0
}

/// Lamp flags assumed for a predicted score, where no lamp was observed.
/// Returns `(is_full_combo, is_all_justice)`.
pub fn inferred_lamps(score: i32) -> (bool, bool) {
    (score >= INFER_FULL_COMBO_SCORE, score >= INFER_ALL_JUSTICE_SCORE)
}

/// OverPower value of a predicted score, with lamps inferred from the
/// score itself.
pub fn expected_op_value(constant: f64, score: i32) -> f64 {
    let (is_full_combo, is_all_justice) = inferred_lamps(score);
    op_value(constant, score, is_full_combo, is_all_justice)
}
