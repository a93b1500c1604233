use art_catalog::build_app;
use art_catalog::config::AppConfig;
use art_catalog::store::PostgresStore;
use axum::serve;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .parse_default_env()
        .init();

    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={}:{}, max_page_size={}",
        config.server.host,
        config.server.port,
        config.query.max_page_size
    );

    log::info!("Connecting to PostgreSQL...");
    let database_url = config.database_url()?;
    let postgres_store = PostgresStore::new(&database_url, config.max_connections()).await?;

    if config.database.run_migrations {
        log::info!("Running database migrations...");
        postgres_store.migrate().await?;
    }

    let app = build_app(Arc::new(postgres_store), config.query.clone());
    run_server(app, &config).await?;

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Art catalog server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
