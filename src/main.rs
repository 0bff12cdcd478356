use std::{io, sync::Arc};

use anyhow::Context;
use feed::document::TerminalDocument;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config_name = match std::env::var("CONFIG") {
        Ok(config) => format!("Config{}.toml", config),
        Err(_) => "Config.toml".to_string(),
    };

    let config = util::load_config(&config_name)?;
    let config =
        feed::init_config(&config).context("failed to load feed config")?;

    let document =
        Arc::new(TerminalDocument::new(&config.container_id, io::stdout()));
    let state = feed::State::new(config, document)
        .context("failed to build feed poller")?;

    info!(
        task = "start feed polling",
        base_url = %state.config().base_url,
        pause_secs = state.config().pause.as_secs(),
    );
    let handle = feed::start(state);

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    handle.stop().await;

    Ok(())
}
