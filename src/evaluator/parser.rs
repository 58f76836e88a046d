// src/evaluator/parser.rs — Parse LLM verdict text into a Report

use crate::report::{Criterion, Report};
use crate::util::truncate_chars;

/// How much of an unparseable verdict is kept for display.
pub const RAW_EXCERPT_CHARS: usize = 500;

/// Summary carried by a degraded Report.
pub const DEGRADED_SUMMARY: &str = "Analysis completed but with parsing limitations.";

/// Outcome of parsing a verdict. Parsing never fails outright; a verdict
/// that is not valid JSON still yields a displayable Report.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Parsed(Report),
    Degraded { report: Report, raw: String },
}

impl Verdict {
    pub fn report(&self) -> &Report {
        match self {
            Verdict::Parsed(r) => r,
            Verdict::Degraded { report, .. } => report,
        }
    }

    pub fn into_report(self) -> Report {
        match self {
            Verdict::Parsed(r) => r,
            Verdict::Degraded { report, .. } => report,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Verdict::Degraded { .. })
    }
}

/// Strict JSON parse into a Report; anything else becomes a degraded Report.
pub fn parse_verdict(raw: &str) -> Verdict {
    match serde_json::from_str::<Report>(raw) {
        Ok(report) => Verdict::Parsed(report),
        Err(e) => {
            tracing::warn!(
                error = %e,
                len = raw.len(),
                "Verdict is not valid report JSON, using degraded report"
            );
            Verdict::Degraded {
                report: degraded_report(raw),
                raw: raw.to_string(),
            }
        }
    }
}

/// Single-criterion placeholder report with the head of the raw text attached.
pub fn degraded_report(raw: &str) -> Report {
    Report {
        overall_score: 75,
        overall_grade: "C".into(),
        criteria: vec![Criterion {
            criterion: "Content".into(),
            score_percentage: 70,
            weight: 30.0,
            strengths: vec!["Basic content covered".into()],
            deficiencies: vec!["Analysis needed".into()],
            recommendations: vec!["Improve depth".into()],
            needs_improvement: true,
        }],
        summary: DEGRADED_SUMMARY.into(),
        raw_response: Some(truncate_chars(raw, RAW_EXCERPT_CHARS).to_string()),
        ..Default::default()
    }
}
