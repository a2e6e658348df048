//! Batch report output

use coder_order::Outcome;
use coder_php::{BatchReport, JobReport};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct JobJson<'a> {
    index: usize,
    file: &'a Path,
    target: &'a str,
    outcome: Option<&'static str>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportJson<'a> {
    success: bool,
    dry_run: bool,
    modified: usize,
    failed: usize,
    files_written: &'a [std::path::PathBuf],
    jobs: Vec<JobJson<'a>>,
}

fn outcome_name(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Modified => "modified",
        Outcome::Unchanged => "unchanged",
    }
}

/// Report as a JSON document
///
/// # Errors
/// Returns the serializer error
pub fn render_json(report: &BatchReport, dry_run: bool) -> serde_json::Result<String> {
    let jobs = report
        .jobs
        .iter()
        .map(|job: &JobReport| JobJson {
            index: job.index,
            file: &job.file,
            target: &job.target,
            outcome: job.result.as_ref().ok().map(|o| outcome_name(*o)),
            error: job.result.as_ref().err().map(ToString::to_string),
        })
        .collect();
    serde_json::to_string_pretty(&ReportJson {
        success: report.is_success(),
        dry_run,
        modified: report.modified_count(),
        failed: report.failed().count(),
        files_written: &report.files_written,
        jobs,
    })
}

/// Report as lines of text, one per job plus a summary
#[must_use]
pub fn render_text(report: &BatchReport, dry_run: bool) -> String {
    let mut out = String::new();
    for job in &report.jobs {
        match &job.result {
            Ok(outcome) => {
                let _ = writeln!(
                    out,
                    "{:<9} {} {}",
                    outcome_name(*outcome),
                    job.file.display(),
                    job.target
                );
            }
            Err(error) => {
                let _ = writeln!(out, "{:<9} {error}", "error");
            }
        }
    }

    let failed = report.failed().count();
    let _ = write!(
        out,
        "{} modified, {} unchanged, {} failed",
        report.modified_count(),
        report.jobs.len() - report.modified_count() - failed,
        failed
    );
    if dry_run {
        out.push_str(" (dry run, no files written)\n");
    } else {
        let _ = writeln!(out, "; {} files written", report.files_written.len());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use coder_order::CoderError;
    use coder_php::RunError;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn report() -> BatchReport {
        BatchReport {
            jobs: vec![
                JobReport {
                    index: 0,
                    file: PathBuf::from("a.php"),
                    target: "property '$rules'".into(),
                    result: Ok(Outcome::Modified),
                },
                JobReport {
                    index: 1,
                    file: PathBuf::from("a.php"),
                    target: "property '$items'".into(),
                    result: Err(RunError::apply("a.php", CoderError::property_not_found("items"))),
                },
                JobReport {
                    index: 2,
                    file: PathBuf::from("b.php"),
                    target: "property '$ids'".into(),
                    result: Ok(Outcome::Unchanged),
                },
            ],
            files_written: vec![PathBuf::from("a.php")],
        }
    }

    #[test]
    fn text_report() {
        assert_eq!(
            render_text(&report(), false),
            "modified  a.php property '$rules'\n\
             error     cannot apply to a.php: target not found: property '$items'\n\
             unchanged b.php property '$ids'\n\
             1 modified, 1 unchanged, 1 failed; 1 files written\n"
        );
    }

    #[test]
    fn json_report() {
        let json: serde_json::Value = serde_json::from_str(&render_json(&report(), true).unwrap()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["modified"], 1);
        assert_eq!(json["jobs"][0]["outcome"], "modified");
        assert_eq!(json["jobs"][1]["outcome"], serde_json::Value::Null);
        assert_eq!(
            json["jobs"][1]["error"],
            "cannot apply to a.php: target not found: property '$items'"
        );
        assert_eq!(json["files_written"][0], "a.php");
    }
}
