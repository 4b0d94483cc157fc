use std::sync::Arc;

use anyhow::{Context, Result};
use tdk_core::mask_secret;
use tdk_relay::{GeminiClient, RelayConfig, RelayEndpoint};
use tracing::{info, warn};

pub(crate) async fn handle_relay(bind: Option<String>, port: Option<u16>) -> Result<()> {
    let cfg = RelayConfig::load(bind, port)?;
    match cfg.api_key.as_deref() {
        Some(key) => info!(key = %mask_secret(key), "Model API key loaded"),
        None => warn!(
            var = %cfg.api_key_env,
            "Model API key missing; chat requests will fail until it is set"
        ),
    }

    let model = Arc::new(GeminiClient::from_config(&cfg));
    let endpoint = RelayEndpoint::start(&cfg, model).await?;
    println!("Relay running on http://{}", endpoint.addr);

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    info!("Shutting down relay");
    endpoint.shutdown().await;
    Ok(())
}
