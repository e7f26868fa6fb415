use clap::Parser;
use op_advisor::{
    args::Args,
    model::{
        ranking::{rank_improvements, RankingConfig},
        structures::{fit_report::FitReport, record::DerivedRecord}
    },
    source::load_records
};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    let records = match load_records(&args.records) {
        Ok(records) => records,
        Err(error) => {
            tracing::error!(%error, path = %args.records.display(), "could not load records");
            std::process::exit(1);
        }
    };

    tracing::info!(count = records.len(), "loaded records");

    let config = RankingConfig {
        limit: args.limit,
        ..RankingConfig::default()
    };
    let result = rank_improvements(&records, &config);

    if result.report == FitReport::NoData {
        println!("No graded records to analyze.");
        return;
    }

    if result.report.is_degraded() {
        println!("Note: projections use a fixed fallback score; accuracy is degraded.");
    }

    print_ranked_table(&result.entries);
}

fn print_ranked_table(entries: &[DerivedRecord]) {
    println!(
        "{:<36} {:<5} {:>5} {:>9} {:>9} {:>8} {:>8} {:>7}",
        "Title", "Diff", "Const", "Score", "Expect", "Cur.OP", "Exp.OP", "GAP"
    );

    for entry in entries {
        println!(
            "{:<36} {:<5} {:>5.1} {:>9} {:>9} {:>8.2} {:>8.2} {:>+7.2}",
            entry.record.title,
            entry.record.diff,
            entry.record.constant,
            entry.record.score,
            entry.expected_score,
            entry.current_op,
            entry.expected_op,
            entry.op_gap
        );
    }
}
