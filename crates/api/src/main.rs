use anyhow::Context;

use medierp_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    medierp_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let app = medierp_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        decision_cache = config.decision_cache,
        "listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;
    Ok(())
}
