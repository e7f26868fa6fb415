use itertools::Itertools;

use crate::model::{
    constants::{DEFAULT_RESULT_LIMIT, MAX_SCORE},
    score_value::{expected_op_value, op_value},
    structures::{
        fit_report::FitReport,
        record::{DerivedRecord, Record}
    },
    trend::{fit_trend, FitConfig, TrendFit}
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    pub fit: FitConfig,

    /// Number of entries to keep in the ranked output.
    pub limit: usize
}

impl Default for RankingConfig {
    fn default() -> Self {
        RankingConfig {
            fit: FitConfig::default(),
            limit: DEFAULT_RESULT_LIMIT
        }
    }
}

/// The ranked output of one analysis run. An empty input is not a fault;
/// it produces an empty entry list with a `NoData` report.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingResult {
    /// At most one entry per song, ordered by descending OP gap.
    pub entries: Vec<DerivedRecord>,
    pub report: FitReport
}

/// # OverPower gap analysis
///
/// Takes one immutable snapshot of a player's records and produces the
/// charts whose OP would grow the most if the player's fitted skill trend
/// were realized.
///
/// Steps:
/// 1. Drop ungraded charts (non-positive difficulty constant).
/// 2. Fit the score-over-difficulty trend.
/// 3. Project an expected score and expected OP for every chart, with
///    lamps inferred from the projected score.
/// 4. Keep only the highest-current-OP chart per song.
/// 5. Rank by the gap between expected and current OP, largest first.
pub fn rank_improvements(records: &[Record], config: &RankingConfig) -> RankingResult {
    let graded: Vec<Record> = records.iter().filter(|r| r.constant > 0.0).cloned().collect();

    if graded.is_empty() {
        tracing::warn!("no graded records to analyze");

        return RankingResult {
            entries: Vec::new(),
            report: FitReport::NoData
        };
    }

    tracing::debug!(total = records.len(), graded = graded.len(), "analyzing records");

    let TrendFit { predictor, report } = fit_trend(&graded, &config.fit);

    let derived = graded.into_iter().map(|record| {
        let expected_score = (predictor.predict(record.constant).round() as i32).clamp(0, MAX_SCORE);
        let current_op = op_value(record.constant, record.score, record.is_full_combo, record.is_all_justice);
        let expected_op = expected_op_value(record.constant, expected_score);

        DerivedRecord {
            record,
            expected_score,
            current_op,
            expected_op,
            // A chart is never scored as having negative upside.
            op_gap: (expected_op - current_op).max(0.0)
        }
    });

    // Only the best chart of each song counts toward OP. After a stable
    // sort by current OP, the first record seen for a title is that best
    // chart; ties keep their encounter order.
    let mut entries: Vec<DerivedRecord> = derived
        .sorted_by(|a, b| b.current_op.total_cmp(&a.current_op))
        .unique_by(|d| d.record.title.clone())
        .collect();

    entries.sort_by(|a, b| b.op_gap.total_cmp(&a.op_gap));
    entries.truncate(config.limit);

    RankingResult { entries, report }
}
