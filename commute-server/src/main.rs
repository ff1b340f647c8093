use commute_server::config::ServerConfig;
use commute_server::normalize::RouteAssembler;
use commute_server::upstream::{MockUpstreamClient, RouteSource, UpstreamClient};
use commute_server::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "commute_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Mock fixtures take precedence over the live backend
    let source = match &config.mock_dir {
        Some(dir) => {
            let client = MockUpstreamClient::new(dir)?;
            warn!(dir = %dir.display(), fixtures = client.len(), "serving mock route responses");
            RouteSource::Mock(client)
        }
        None => {
            info!(url = %config.upstream.base_url, "using live routing backend");
            RouteSource::Live(UpstreamClient::new(config.upstream.clone())?)
        }
    };

    let state = AppState::new(RouteAssembler::new(config.pipeline.clone()), source);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "commute server listening");
    info!("  GET  /health            - Health check");
    info!("  POST /routes/normalize  - Normalize a raw route response");
    info!("  POST /routes/preview    - Normalize and project onto map views");
    info!("  GET  /routes/plan       - Plan a route via the backend");

    axum::serve(listener, app).await?;
    Ok(())
}
