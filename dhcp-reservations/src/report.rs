use colored::Colorize;
use dhcpd_conf::Outcome;

use crate::pipeline::{BatchReport, RecordReport};

/// Plain text for one record result, without color.
pub fn describe_record(record: &RecordReport) -> String {
    let location = if record.line > 0 {
        format!("line {}: ", record.line)
    } else {
        String::new()
    };
    let detail = match &record.outcome {
        Outcome::Unchanged => "already present, no change".to_string(),
        Outcome::Added => "reservation added".to_string(),
        Outcome::Updated {
            preserved_directives: 0,
        } => "reservation updated".to_string(),
        Outcome::Updated {
            preserved_directives,
        } => format!("reservation updated ({preserved_directives} extra directives kept)"),
        Outcome::Removed => "reservation removed".to_string(),
        Outcome::NotFound => "no reservation found, nothing to remove".to_string(),
        Outcome::Skipped { reason } => format!("skipped: {reason}"),
        Outcome::Failed(err) => format!("failed: {err}"),
    };
    format!("{location}{}: {detail}", record.host)
}

/// Render per-record lines for terminal output.
pub fn render_records(report: &BatchReport) -> String {
    let mut out = Vec::new();
    for record in &report.records {
        let line = describe_record(record);
        let colored = match record.outcome {
            Outcome::Added | Outcome::Updated { .. } | Outcome::Removed => line.green().to_string(),
            Outcome::Unchanged | Outcome::NotFound => line.dimmed().to_string(),
            Outcome::Skipped { .. } => line.yellow().to_string(),
            Outcome::Failed(_) => line.red().to_string(),
        };
        out.push(colored);
    }
    out.join("\n")
}

/// Plain summary line.
pub fn summary_line(report: &BatchReport) -> String {
    format!(
        "Summary: {} successful, {} failed ({} skipped), total {}",
        report.succeeded(),
        report.failed(),
        report.skipped(),
        report.total()
    )
}

/// Render the summary, red when any record failed.
pub fn render_summary(report: &BatchReport) -> String {
    let line = summary_line(report);
    if report.is_success() {
        line.cyan().to_string()
    } else {
        line.red().to_string()
    }
}
