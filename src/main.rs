use admin_records::config::AppConfig;
use admin_records::server::ServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        backend = ?config.storage.backend,
        auth = ?config.auth.mode,
        "starting admin-records"
    );

    ServerBuilder::new()
        .with_config(config)
        .with_configured_storage()
        .await?
        .serve()
        .await
}
