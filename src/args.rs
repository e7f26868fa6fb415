use std::path::PathBuf;

use clap::Parser;

use crate::model::constants::DEFAULT_RESULT_LIMIT;

#[derive(Parser, Clone)]
#[command(
    display_name = "OverPower Advisor",
    about = "Ranks the charts that would most improve a player's OverPower rating",
    long_about = "Fits a score-over-difficulty trend to a player's existing results and \
    ranks the charts where realizing that trend would add the most OverPower."
)]
pub struct Args {
    /// Path to the exported records payload, a JSON object with a
    /// top-level "records" array
    #[arg(short, long, default_value = "data.json")]
    pub records: PathBuf,

    /// Number of charts to include in the ranked list
    #[arg(short, long, default_value_t = DEFAULT_RESULT_LIMIT)]
    pub limit: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}
