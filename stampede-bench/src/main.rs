use metrics_exporter_prometheus::PrometheusBuilder;
use stampede::prelude::*;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stampede=info,stampede_bench=info".into()),
        )
        .init();

    let metrics_addr: SocketAddr = std::env::var("METRICS_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8002".to_string())
        .parse()?;
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()?;

    let config = RunConfig::from_env()?;
    info!("Targeting {}", config.endpoint());

    let summary = stampede::run_http(config).await?;
    info!("{summary}");

    Ok(())
}
