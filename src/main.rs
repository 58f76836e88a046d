// src/main.rs — Rubrix entry point

use clap::Parser;

use rubrix::cli::evaluate::EvaluateArgs;
use rubrix::cli::{Cli, Commands};
use rubrix::infra::logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Respects RUST_LOG
    logger::init_logging(cli.log_level());

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Falls back to defaults if no config.toml
    let config = cli.load_config()?;

    match cli.command {
        Commands::Serve { host, port } => rubrix::cli::serve::run_serve(config, host, port).await,
        Commands::Evaluate {
            assignment,
            rubric,
            pdf,
            html,
            json,
        } => {
            rubrix::cli::evaluate::run_evaluate(
                &config,
                EvaluateArgs {
                    assignment,
                    rubric,
                    pdf,
                    html,
                    json,
                },
            )
            .await
        }
        Commands::Check => rubrix::cli::check::run_check(&config, cli.config.as_deref()).await,
    }
}
