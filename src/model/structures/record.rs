use serde::{Deserialize, Serialize};

/// One scored attempt on one chart, as decoded from the records payload.
/// Charts sharing a `title` belong to the same song and compete for a
/// single slot in the ranked output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,

    /// Chart variant within the song (difficulty tier label).
    #[serde(default)]
    pub diff: String,

    /// Fixed difficulty constant assigned to the chart. Non-positive or
    /// absent marks an ungraded chart, which is excluded from analysis.
    #[serde(rename = "const", default)]
    pub constant: f64,

    pub score: i32,

    #[serde(rename = "is_fullcombo", default)]
    pub is_full_combo: bool,

    #[serde(rename = "is_alljustice", default)]
    pub is_all_justice: bool
}

/// A record plus the projections computed during one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRecord {
    #[serde(flatten)]
    pub record: Record,

    /// Score projected by the fitted trend, clipped to the score domain.
    pub expected_score: i32,

    /// OverPower earned by the achieved score and its real lamps.
    pub current_op: f64,

    /// OverPower the expected score would earn, with lamps inferred
    /// from the score itself.
    pub expected_op: f64,

    /// How much OverPower realizing the trend would add. Never negative.
    pub op_gap: f64
}
