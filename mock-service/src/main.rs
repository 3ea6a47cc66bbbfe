use mock_service::{run, MockConfig};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_service=debug,tower_http=debug".into()),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;

    let api_key = std::env::var("API_KEY").ok().filter(|key| !key.is_empty());
    let config = MockConfig { api_key };

    info!("Starting mock service on {addr}");
    run(addr, config).await;
    Ok(())
}
