//! Markdown rendering of a `MatchReport` for callers that display text directly.

use serde::{Deserialize, Serialize};

use crate::analysis::engine::{DetailedReport, MatchReport};
use crate::analysis::feedback::{Feedback, MAX_RATING};

/// Pre-rendered markdown blocks returned alongside the structured report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedReport {
    pub summary: String,
    pub feedback: String,
    pub detailed_report: String,
}

impl RenderedReport {
    pub fn from_report(report: &MatchReport) -> Self {
        Self {
            summary: render_summary(&report.summary),
            feedback: render_feedback(&report.feedback),
            detailed_report: render_detailed_report(&report.detailed_report),
        }
    }
}

/// One `•` bullet per summary line.
pub fn render_summary(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("• {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rating header followed by `-` bullets.
pub fn render_feedback(feedback: &Feedback) -> String {
    let mut out = format!("Rating: {}/{MAX_RATING}", feedback.rating);
    for bullet in &feedback.bullets {
        out.push_str("\n- ");
        out.push_str(bullet);
    }
    out
}

/// Strengths, weaknesses and suggestions as bold-labelled lists. Empty groups
/// are omitted.
pub fn render_detailed_report(report: &DetailedReport) -> String {
    let mut out = String::from("### Detailed Analysis\n");
    for (label, items) in [
        ("Strengths", &report.strengths),
        ("Weaknesses", &report.weaknesses),
        ("Suggestions", &report.suggestions),
    ] {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("\n**{label}:**\n"));
        for item in items {
            out.push_str(&format!("- {item}\n"));
        }
    }
    out
}
