use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tv_guide::{
    config::Config,
    db::JsonStore,
    models::{AliasTable, CatalogFile, ServiceCatalog},
    routes::{create_router, AppState},
    services::{hub::HomeAssistant, providers::TmdbProvider, SonarrClient},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tv_guide=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let (catalog, aliases) = match &config.catalog_file {
        Some(path) => CatalogFile::load(path)?,
        None => (ServiceCatalog::builtin(), AliasTable::builtin()),
    };

    tracing::info!(
        services = catalog.iter().count(),
        aliases = aliases.len(),
        sonarr = config.sonarr_configured(),
        tmdb = config.tmdb_configured(),
        ha_token = config.ha_configured(),
        "Configuration loaded"
    );

    let store = JsonStore::open(config.data_file.clone()).await;

    let http_client = reqwest::Client::new();
    let library = Arc::new(SonarrClient::new(
        http_client.clone(),
        config.sonarr_url.clone(),
        config.sonarr_key.clone(),
    ));
    let provider = Arc::new(TmdbProvider::new(
        http_client.clone(),
        config.tmdb_key.clone(),
        config.tmdb_url.clone(),
    ));
    let hub = Arc::new(HomeAssistant::new(
        http_client,
        config.ha_url.clone(),
        config.ha_token.clone(),
    ));

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::assemble(config, catalog, aliases, store, library, provider, hub);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
