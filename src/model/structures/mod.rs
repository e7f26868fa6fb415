pub mod fit_report;
pub mod record;
