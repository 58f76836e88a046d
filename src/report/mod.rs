// src/report/mod.rs — Report schema and rendering

pub mod html;
pub mod layout;
pub mod pdf;
pub mod types;

pub use layout::{Band, RenderContext, ReportLayout, SectionKind, Tone};
pub use types::*;

use crate::infra::errors::RubrixError;
use crate::util::sanitize_filename;
use html::HtmlRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Pdf,
}

/// A rendered report, ready to hand to a response or write to disk.
#[derive(Debug)]
pub enum Document {
    Html(String),
    Pdf(pdf::RenderedPdf),
}

impl Document {
    pub fn content_type(&self) -> &'static str {
        match self {
            Document::Html(_) => "text/html; charset=utf-8",
            Document::Pdf(_) => "application/pdf",
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Document::Html(s) => s.into_bytes(),
            Document::Pdf(p) => p.bytes,
        }
    }
}

/// Renders Reports to either target through the same `ReportLayout`.
pub struct ReportRenderer {
    html: HtmlRenderer,
}

impl ReportRenderer {
    pub fn new() -> Result<Self, RubrixError> {
        Ok(Self {
            html: HtmlRenderer::new()?,
        })
    }

    pub fn html(&self) -> &HtmlRenderer {
        &self.html
    }

    pub fn render(
        &self,
        report: &Report,
        ctx: &RenderContext,
        format: Format,
    ) -> Result<Document, RubrixError> {
        let layout = ReportLayout::build(report, ctx);
        match format {
            Format::Html => Ok(Document::Html(self.html.render_layout(report, &layout, ctx)?)),
            Format::Pdf => Ok(Document::Pdf(pdf::render_pdf(&layout)?)),
        }
    }
}

/// `RUBRIX_Report_<assignment>_<score>.pdf`
pub fn pdf_filename(assignment_name: &str, overall_score: i64) -> String {
    let mut name = sanitize_filename(assignment_name);
    if name.is_empty() {
        name = "analysis".into();
    }
    format!("RUBRIX_Report_{name}_{overall_score}.pdf")
}
