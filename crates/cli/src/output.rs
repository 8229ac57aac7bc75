use std::fmt::Write as _;

use coverkit_core::{CoverChange, JobOutcome, RunReport};

pub fn render_json(report: &RunReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Human-readable summary: changed files, failures, then the totals.
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    let prefix = if report.dry_run { "would " } else { "" };

    for result in report.modified_files() {
        let JobOutcome::Success(changes) = &result.outcome else {
            continue;
        };
        let mut actions = Vec::new();
        match changes.cover {
            CoverChange::Replaced => actions.push(format!("{}replace cover", prefix)),
            CoverChange::Embedded => actions.push(format!("{}embed cover", prefix)),
            _ => {}
        }
        if let Some(to) = &changes.renamed_to {
            actions.push(format!("{}rename to {}", prefix, to.display()));
        }
        let _ = writeln!(out, "  {}: {}", result.path.display(), actions.join(", "));
    }

    for folder in &report.folders {
        if let JobOutcome::Success(changes) = &folder.outcome {
            if let Some(to) = &changes.renamed_to {
                let _ = writeln!(
                    out,
                    "  {}/: {}rename to {}",
                    folder.path.display(),
                    prefix,
                    to.display()
                );
            }
        }
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out, "Failures:");
        for failure in &report.failures {
            let _ = writeln!(
                out,
                "  {} [{}] {}",
                failure.path.display(),
                failure.kind,
                failure.message
            );
        }
    }

    let _ = writeln!(
        out,
        "{}{} processed: {} succeeded, {} skipped, {} failed ({} ms)",
        if report.dry_run { "[dry run] " } else { "" },
        report.total,
        report.succeeded,
        report.skipped,
        report.failed,
        report.duration_ms()
    );
    out
}
