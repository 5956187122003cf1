use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scout_common::search::{PerplexityClient, SearchProvider};

use scout_api::config::Config;
use scout_api::rate_limit::RateLimiter;
use scout_api::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting rental scout API server");

    let config = Config::from_env()?;
    info!(
        listen_addr = %config.listen_addr,
        provider_base_url = %config.provider.base_url,
        provider_model = %config.provider.model,
        rate_limit = config.rate_limit,
        rate_limit_window_secs = config.rate_limit_window.as_secs(),
        "configuration loaded"
    );

    let provider: Arc<dyn SearchProvider> =
        Arc::new(PerplexityClient::new(config.provider.clone())?);
    let limiter = RateLimiter::new(config.rate_limit, config.rate_limit_window);

    let app = server::router(AppState { provider, limiter });

    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!(listen_addr = %config.listen_addr, "HTTP server ready");
    axum::serve(listener, app).await?;
    Ok(())
}
