// src/cli/check.rs — `rubrix check`: configuration and provider diagnostics

use crate::evaluator::{AnalysisOptions, Evaluator, SAMPLE_ASSIGNMENT, SAMPLE_RUBRIC};
use crate::infra::config::{Config, API_KEY_ENV};
use crate::infra::paths;

pub async fn run_check(config: &Config, config_override: Option<&str>) -> anyhow::Result<()> {
    let config_path = config_override
        .map(std::path::PathBuf::from)
        .unwrap_or_else(paths::config_file_path);

    println!("rubrix v{}", env!("CARGO_PKG_VERSION"));
    println!();

    if config_path.exists() {
        println!("  Config:     {} (loaded)", config_path.display());
    } else {
        println!("  Config:     (using defaults)");
    }

    let p = &config.provider;
    println!("  Provider:   {} ({})", p.name, p.base_url);
    println!("  Model:      {} ({} allowed)", p.model, p.models.len());
    if p.has_api_key() {
        println!("  API key:    configured");
    } else {
        println!("  API key:    missing (set {API_KEY_ENV})");
    }
    println!(
        "  Uploads:    {}{}",
        config.server.upload_dir.display(),
        if config.server.upload_dir.is_dir() { "" } else { " (will be created)" }
    );
    println!("  Timeout:    {}s", p.timeout_seconds);
    println!();

    let evaluator = Evaluator::from_config(p)?;
    let verdict = evaluator
        .analyze(SAMPLE_ASSIGNMENT, SAMPLE_RUBRIC, &AnalysisOptions::default())
        .await?;
    let report = verdict.report();

    let outcome = if verdict.is_degraded() {
        "reply was not valid JSON"
    } else if report.note.is_some() {
        "provider unavailable, simulated verdict"
    } else {
        "ok"
    };
    println!(
        "  Sample:     {outcome} (score {}, grade {})",
        report.overall_score,
        if report.overall_grade.is_empty() { "N/A" } else { report.overall_grade.as_str() }
    );

    Ok(())
}
