// src/cli/evaluate.rs — `rubrix evaluate`: one-shot evaluation from files

use std::path::{Path, PathBuf};

use crate::evaluator::{AnalysisOptions, Evaluator};
use crate::infra::config::Config;
use crate::report::{Format, RenderContext, ReportLayout, ReportRenderer};

pub struct EvaluateArgs {
    pub assignment: PathBuf,
    pub rubric: PathBuf,
    pub pdf: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub json: bool,
}

fn read_lossy(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub async fn run_evaluate(config: &Config, args: EvaluateArgs) -> anyhow::Result<()> {
    let assignment_text = read_lossy(&args.assignment)?;
    let rubric_text = read_lossy(&args.rubric)?;

    let evaluator = Evaluator::from_config(&config.provider)?;
    let verdict = evaluator
        .analyze(&assignment_text, &rubric_text, &AnalysisOptions::default())
        .await?;
    if verdict.is_degraded() {
        eprintln!("warning: the model reply was not valid JSON; showing a placeholder report");
    }

    let ctx = RenderContext::new(display_name(&args.assignment), display_name(&args.rubric));
    let mut report = verdict.into_report();
    report.stamp(ctx.generated_at);

    if let Some(note) = &report.note {
        eprintln!("note: {note}");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", ReportLayout::build(&report, &ctx).plain_text());
    }

    if args.pdf.is_some() || args.html.is_some() {
        let renderer = ReportRenderer::new()?;
        if let Some(path) = &args.pdf {
            let doc = renderer.render(&report, &ctx, Format::Pdf)?;
            std::fs::write(path, doc.into_bytes())?;
            eprintln!("PDF report written to {}", path.display());
        }
        if let Some(path) = &args.html {
            let doc = renderer.render(&report, &ctx, Format::Html)?;
            std::fs::write(path, doc.into_bytes())?;
            eprintln!("HTML report written to {}", path.display());
        }
    }

    Ok(())
}
