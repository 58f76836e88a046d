// src/report/layout.rs — The one section plan both renderers draw from
//
// Section order (each conditional unless noted):
//   1. Title block             (always)
//      Notice                  (simulated verdict only)
//   2. Executive summary       (always)
//   3. Grade justification
//   4. Critical deficiencies
//   5. Criteria breakdown
//   6. Strengths to build upon
//   7. Structural analysis
//   8. Revision action plan
//   9. Readiness assessment
//      Raw model response      (unparseable verdict only)
//  10. Report notes / footer   (always)
//
// Band and tone are derived here on every build and never stored on the
// Report, so HTML and PDF cannot disagree about them.

use chrono::{DateTime, Local};
use serde::Serialize;

use super::types::{Report, TIMESTAMP_FORMAT};

pub const REPORT_TITLE: &str = "RUBRIX Assignment Analysis Report";
pub const REPORT_SUBTITLE: &str = "AI-Powered Academic Evaluation";
pub const NO_SUMMARY: &str = "No summary available.";
pub const ATTRIBUTION: &str =
    "This report was generated by RUBRIX AI-Powered Assignment Analysis System.";
pub const ADVISOR_NOTE: &str =
    "For questions or additional support, please contact your instructor or academic advisor.";

/// Caller-supplied facts that are not part of the verdict itself.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub assignment_name: String,
    pub rubric_name: String,
    pub generated_at: DateTime<Local>,
}

impl RenderContext {
    pub fn new(assignment_name: impl Into<String>, rubric_name: impl Into<String>) -> Self {
        Self {
            assignment_name: assignment_name.into(),
            rubric_name: rubric_name.into(),
            generated_at: Local::now(),
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new("N/A", "N/A")
    }
}

/// Visual severity shared by criterion bands and readiness status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Caution,
    Critical,
}

impl Tone {
    /// Readiness status: "Ready" wins over "Minor"; anything else is critical.
    pub fn from_status(status: &str) -> Self {
        if status.contains("Ready") {
            Tone::Positive
        } else if status.contains("Minor") {
            Tone::Caution
        } else {
            Tone::Critical
        }
    }

    /// Hex color used by both targets.
    pub fn hex(&self) -> &'static str {
        match self {
            Tone::Positive => "#008000",
            Tone::Caution => "#FFA500",
            Tone::Critical => "#FF0000",
        }
    }
}

/// Qualitative performance band of a criterion score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Good,
    NeedsWork,
    Poor,
}

impl Band {
    pub fn from_score(score_percentage: i64) -> Self {
        if score_percentage >= 70 {
            Band::Good
        } else if score_percentage >= 50 {
            Band::NeedsWork
        } else {
            Band::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Band::Good => "Good",
            Band::NeedsWork => "Needs Work",
            Band::Poor => "Poor",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Band::Good => Tone::Positive,
            Band::NeedsWork => Tone::Caution,
            Band::Poor => Tone::Critical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Title,
    Notice,
    ExecutiveSummary,
    GradeJustification,
    CriticalDeficiencies,
    CriteriaBreakdown,
    StrengthsToBuild,
    StructuralAnalysis,
    RevisionPlan,
    Readiness,
    Diagnostics,
    Footer,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Title => "title",
            SectionKind::Notice => "notice",
            SectionKind::ExecutiveSummary => "executive_summary",
            SectionKind::GradeJustification => "grade_justification",
            SectionKind::CriticalDeficiencies => "critical_deficiencies",
            SectionKind::CriteriaBreakdown => "criteria_breakdown",
            SectionKind::StrengthsToBuild => "strengths_to_build",
            SectionKind::StructuralAnalysis => "structural_analysis",
            SectionKind::RevisionPlan => "revision_plan",
            SectionKind::Readiness => "readiness",
            SectionKind::Diagnostics => "diagnostics",
            SectionKind::Footer => "footer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Title { text: String, subtitle: String },
    Fields { rows: Vec<Field> },
    Subheading { text: String },
    Paragraph { text: String },
    Labeled { label: String, text: String },
    Bullets { label: Option<String>, items: Vec<String> },
    Indicator { label: String, text: String, tone: Tone },
    /// Verbatim text, line breaks kept.
    Preformatted { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub heading: Option<String>,
    /// PDF starts this section on a fresh page. HTML ignores it.
    pub page_break_before: bool,
    pub blocks: Vec<Block>,
}

impl Section {
    fn new(kind: SectionKind, heading: Option<&str>, page_break_before: bool) -> Self {
        Self {
            kind,
            heading: heading.map(str::to_string),
            page_break_before,
            blocks: Vec::new(),
        }
    }

    fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    fn paragraph(&mut self, text: impl Into<String>) {
        self.push(Block::Paragraph { text: text.into() });
    }

    fn subheading(&mut self, text: impl Into<String>) {
        self.push(Block::Subheading { text: text.into() });
    }

    fn labeled(&mut self, label: &str, text: impl Into<String>) {
        self.push(Block::Labeled {
            label: label.to_string(),
            text: text.into(),
        });
    }

    fn bullets_if_any(&mut self, label: &str, items: &[String]) {
        if !items.is_empty() {
            self.push(Block::Bullets {
                label: Some(label.to_string()),
                items: items.to_vec(),
            });
        }
    }
}

/// The ordered, already-filtered list of sections for one Report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLayout {
    pub sections: Vec<Section>,
}

impl ReportLayout {
    pub fn build(report: &Report, ctx: &RenderContext) -> Self {
        let mut sections = vec![title_section(report, ctx)];
        sections.extend(notice_section(report));
        sections.push(summary_section(report));

        let optional = [
            grade_justification_section(report),
            deficiencies_section(report),
            criteria_section(report),
            strengths_section(report),
            structural_section(report),
            revision_section(report),
            readiness_section(report),
            diagnostics_section(report),
        ];
        sections.extend(optional.into_iter().flatten());

        sections.push(footer_section(report, ctx));
        Self { sections }
    }

    pub fn kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }

    pub fn contains(&self, kind: SectionKind) -> bool {
        self.sections.iter().any(|s| s.kind == kind)
    }

    /// Flatten every visible string, in drawing order. Used by the CLI's
    /// terminal output and by tests.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            if let Some(h) = &section.heading {
                out.push_str(h);
                out.push('\n');
            }
            for block in &section.blocks {
                match block {
                    Block::Title { text, subtitle } => {
                        out.push_str(&format!("{text}\n{subtitle}\n"));
                    }
                    Block::Fields { rows } => {
                        for row in rows {
                            out.push_str(&format!("{} {}\n", row.label, row.value));
                        }
                    }
                    Block::Subheading { text }
                    | Block::Paragraph { text }
                    | Block::Preformatted { text } => {
                        out.push_str(text);
                        out.push('\n');
                    }
                    Block::Labeled { label, text } | Block::Indicator { label, text, .. } => {
                        out.push_str(&format!("{label}: {text}\n"));
                    }
                    Block::Bullets { label, items } => {
                        if let Some(l) = label {
                            out.push_str(&format!("{l}:\n"));
                        }
                        for item in items {
                            out.push_str(&format!("  - {item}\n"));
                        }
                    }
                }
            }
            out.push('\n');
        }
        out
    }
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() {
        "N/A"
    } else {
        s
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|v| !v.trim().is_empty())
}

// ─── Section builders ───────────────────────────────────────────────────────

fn title_section(report: &Report, ctx: &RenderContext) -> Section {
    let mut s = Section::new(SectionKind::Title, None, false);
    s.push(Block::Title {
        text: REPORT_TITLE.into(),
        subtitle: REPORT_SUBTITLE.into(),
    });

    let timestamp = report
        .timestamp
        .clone()
        .unwrap_or_else(|| ctx.generated_at.format(TIMESTAMP_FORMAT).to_string());
    let row = |label: &str, value: String| Field {
        label: label.to_string(),
        value,
    };
    s.push(Block::Fields {
        rows: vec![
            row("Assignment:", or_na(&ctx.assignment_name).to_string()),
            row("Rubric:", or_na(&ctx.rubric_name).to_string()),
            row("Overall Score:", format!("{}/100", report.overall_score)),
            row("Overall Grade:", or_na(&report.overall_grade).to_string()),
            row("Report Generated:", timestamp),
        ],
    });
    s
}

fn notice_section(report: &Report) -> Option<Section> {
    let note = non_empty(&report.note)?;
    let mut s = Section::new(SectionKind::Notice, None, false);
    s.paragraph(note);
    Some(s)
}

fn summary_section(report: &Report) -> Section {
    let mut s = Section::new(SectionKind::ExecutiveSummary, Some("Executive Summary"), false);
    if report.summary.trim().is_empty() {
        s.paragraph(NO_SUMMARY);
    } else {
        s.paragraph(report.summary.clone());
    }
    s
}

fn grade_justification_section(report: &Report) -> Option<Section> {
    let text = non_empty(&report.grade_justification)?;
    let mut s = Section::new(
        SectionKind::GradeJustification,
        Some("Grade Justification"),
        false,
    );
    s.paragraph(text);
    Some(s)
}

fn deficiencies_section(report: &Report) -> Option<Section> {
    if report.critical_deficiencies.is_empty() {
        return None;
    }
    let mut s = Section::new(
        SectionKind::CriticalDeficiencies,
        Some("Critical Deficiencies"),
        true,
    );
    s.subheading("These issues require immediate attention:");

    for (i, d) in report.critical_deficiencies.iter().enumerate() {
        s.subheading(format!("{}. {}", i + 1, or_na(&d.issue)));
        if let Some(priority) = &d.priority {
            s.paragraph(format!("Priority: {}", priority.as_str().to_uppercase()));
        }
        if !d.evidence.trim().is_empty() {
            s.labeled("Evidence", format!("\"{}\"", d.evidence));
        }
        if !d.remediation.trim().is_empty() {
            s.labeled("How to Fix", d.remediation.clone());
        }
    }
    Some(s)
}

fn criteria_section(report: &Report) -> Option<Section> {
    if report.criteria.is_empty() {
        return None;
    }
    let mut s = Section::new(
        SectionKind::CriteriaBreakdown,
        Some("Detailed Criteria Analysis"),
        true,
    );

    for c in &report.criteria {
        s.subheading(format!(
            "{} - Score: {}% (Weight: {}%)",
            or_na(&c.criterion),
            c.score_percentage,
            c.weight
        ));
        let band = Band::from_score(c.score_percentage);
        s.push(Block::Indicator {
            label: "Performance Level".into(),
            text: band.label().into(),
            tone: band.tone(),
        });
        s.bullets_if_any("Strengths", &c.strengths);
        s.bullets_if_any("Areas Needing Improvement", &c.deficiencies);
        s.bullets_if_any("Specific Recommendations", &c.recommendations);
    }
    Some(s)
}

fn strengths_section(report: &Report) -> Option<Section> {
    if report.strengths_to_build.is_empty() {
        return None;
    }
    let mut s = Section::new(
        SectionKind::StrengthsToBuild,
        Some("Key Strengths to Build Upon"),
        true,
    );

    for (i, st) in report.strengths_to_build.iter().enumerate() {
        s.subheading(format!("{}. {}", i + 1, or_na(&st.strength)));
        if !st.evidence.trim().is_empty() {
            s.labeled("Evidence", format!("\"{}\"", st.evidence));
        }
        if !st.reinforcement.trim().is_empty() {
            s.labeled("How to build on this", st.reinforcement.clone());
        }
    }
    Some(s)
}

fn structural_section(report: &Report) -> Option<Section> {
    let sa = report.structural_analysis.as_ref()?;
    let parts = [
        ("Organization:", non_empty(&sa.organization)),
        ("Argument Development:", non_empty(&sa.argument_development)),
        ("Technical Compliance:", non_empty(&sa.technical_compliance)),
    ];
    if parts.iter().all(|(_, v)| v.is_none()) {
        return None;
    }

    let mut s = Section::new(
        SectionKind::StructuralAnalysis,
        Some("Structural Analysis"),
        true,
    );
    for (label, value) in parts {
        if let Some(text) = value {
            s.subheading(label);
            s.paragraph(text);
        }
    }
    Some(s)
}

fn revision_section(report: &Report) -> Option<Section> {
    let recs = report.revision_recommendations.as_ref()?;
    let buckets = [
        ("High Priority (Do First)", &recs.high_priority),
        ("Content Improvements", &recs.content_improvements),
        ("Structural Changes", &recs.structural_changes),
        ("Technical Fixes", &recs.technical_fixes),
    ];
    if buckets.iter().all(|(_, items)| items.is_empty()) {
        return None;
    }

    let mut s = Section::new(SectionKind::RevisionPlan, Some("Revision Action Plan"), true);
    for (label, items) in buckets {
        s.bullets_if_any(label, items);
    }
    Some(s)
}

fn readiness_section(report: &Report) -> Option<Section> {
    let ra = report.readiness_assessment.as_ref()?;
    let mut s = Section::new(SectionKind::Readiness, Some("Readiness Assessment"), false);

    let status = non_empty(&ra.status).unwrap_or("Not Assessed");
    s.push(Block::Indicator {
        label: "Status".into(),
        text: status.to_string(),
        tone: Tone::from_status(status),
    });

    if let Some(hours) = ra.estimated_revision_hours.filter(|h| *h != 0.0) {
        s.labeled("Estimated Revision Time", format!("{hours} hours"));
    }
    s.bullets_if_any("Key Barriers to Higher Score", &ra.key_barriers);
    Some(s)
}

fn diagnostics_section(report: &Report) -> Option<Section> {
    let raw = non_empty(&report.raw_response)?;
    let mut s = Section::new(SectionKind::Diagnostics, Some("Raw Model Response"), false);
    s.push(Block::Preformatted {
        text: raw.to_string(),
    });
    Some(s)
}

fn footer_section(report: &Report, ctx: &RenderContext) -> Section {
    let mut s = Section::new(SectionKind::Footer, Some("Report Notes"), true);
    s.paragraph(ATTRIBUTION);
    s.paragraph(ADVISOR_NOTE);

    let id = report
        .analysis_id
        .clone()
        .unwrap_or_else(super::types::short_id);
    s.paragraph(format!("Report ID: {id}"));
    s.paragraph(format!(
        "Generated on: {}",
        ctx.generated_at.format("%Y-%m-%d at %H:%M:%S")
    ));
    s
}
