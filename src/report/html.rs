// src/report/html.rs — HTML view model and minijinja rendering

use minijinja::{context, Environment};
use serde::Serialize;

use super::layout::{RenderContext, ReportLayout, Section};
use super::types::Report;
use crate::infra::errors::RubrixError;

const REPORT_TEMPLATE: &str = include_str!("../../templates/report.html");
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Everything the result page needs. All report content reaches the page
/// through `sections`, the same plan the PDF is drawn from.
#[derive(Debug, Serialize)]
pub struct HtmlView<'a> {
    pub assignment_name: &'a str,
    pub sections: &'a [Section],
    /// Request body for the PDF download button.
    pub report_json: String,
}

impl<'a> HtmlView<'a> {
    pub fn new(report: &Report, layout: &'a ReportLayout, ctx: &'a RenderContext) -> Self {
        let mut body = serde_json::to_value(report).unwrap_or_default();
        if let Some(obj) = body.as_object_mut() {
            obj.insert("assignment".into(), ctx.assignment_name.clone().into());
            obj.insert("rubric".into(), ctx.rubric_name.clone().into());
        }
        Self {
            assignment_name: &ctx.assignment_name,
            sections: &layout.sections,
            report_json: body.to_string(),
        }
    }
}

/// Holds the compiled templates; build once and share.
pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self, RubrixError> {
        let mut env = Environment::new();
        env.add_template("report.html", REPORT_TEMPLATE)?;
        env.add_template("index.html", INDEX_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render_layout(
        &self,
        report: &Report,
        layout: &ReportLayout,
        ctx: &RenderContext,
    ) -> Result<String, RubrixError> {
        let view = HtmlView::new(report, layout, ctx);
        let tmpl = self.env.get_template("report.html")?;
        Ok(tmpl.render(context! { view => view })?)
    }

    pub fn render_report(&self, report: &Report, ctx: &RenderContext) -> Result<String, RubrixError> {
        let layout = ReportLayout::build(report, ctx);
        self.render_layout(report, &layout, ctx)
    }

    /// The upload form, optionally with an error banner.
    pub fn render_index(
        &self,
        error: Option<&str>,
        allowed_extensions: &[String],
    ) -> Result<String, RubrixError> {
        let tmpl = self.env.get_template("index.html")?;
        Ok(tmpl.render(context! {
            error => error,
            allowed_extensions => allowed_extensions,
            current_year => chrono::Local::now().format("%Y").to_string(),
        })?)
    }
}
