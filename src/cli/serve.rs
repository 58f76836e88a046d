// src/cli/serve.rs — `rubrix serve`

use crate::api::{self, ApiState};
use crate::infra::config::Config;

pub async fn run_serve(mut config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    if !config.provider.has_api_key() {
        tracing::warn!(
            "No API key configured (set {} or provider.api_key); every evaluation will be simulated",
            crate::infra::config::API_KEY_ENV
        );
    }
    tracing::info!(
        provider = %config.provider.name,
        model = %config.provider.model,
        upload_dir = %config.server.upload_dir.display(),
        "Starting Rubrix"
    );

    let host = config.server.host.clone();
    let port = config.server.port;
    let state = ApiState::from_config(config)?;
    api::start_server(&host, port, state).await
}
