use serde::Serialize;
use studyquest_core::WeeklyReport;

use crate::context::{open_engine, print_json, CliResult};

#[derive(Serialize)]
struct ReportOutput {
    #[serde(flatten)]
    report: WeeklyReport,
    message: &'static str,
}

pub fn run(user: Option<String>) -> CliResult {
    let (mut engine, _config) = open_engine(user)?;
    let report = engine.weekly_report()?;
    let message = report.productivity.message();
    print_json(&ReportOutput { report, message })
}
