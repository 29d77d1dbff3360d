use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    config::Config,
    db::JsonStore,
    error::{AppError, AppResult},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    models::{AliasTable, ServiceCatalog},
    services::{
        hub::AutomationHub, providers::MetadataProvider, LaunchSequencer, LibrarySource,
        ProviderResolver, RemoteDispatcher, SpeakerController, SpeakerEntities,
    },
};

pub mod firetv;
pub mod library;
pub mod services;
pub mod sonos;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<ServiceCatalog>,
    pub store: Arc<JsonStore>,
    pub library: Arc<dyn LibrarySource>,
    pub resolver: Arc<ProviderResolver>,
    pub launcher: Arc<LaunchSequencer>,
    pub remote: Arc<RemoteDispatcher>,
    pub speaker: Arc<SpeakerController>,
}

impl AppState {
    /// Wires the components around the given external collaborators
    pub fn assemble(
        config: Config,
        catalog: ServiceCatalog,
        aliases: AliasTable,
        store: JsonStore,
        library: Arc<dyn LibrarySource>,
        provider: Arc<dyn MetadataProvider>,
        hub: Arc<dyn AutomationHub>,
    ) -> Self {
        let catalog = Arc::new(catalog);

        let resolver =
            ProviderResolver::new(provider, Arc::new(aliases), config.watch_region.clone());
        let launcher =
            LaunchSequencer::new(hub.clone(), catalog.clone(), config.firetv_entity.clone());
        let remote = RemoteDispatcher::new(hub.clone(), config.firetv_entity.clone());
        let speaker = SpeakerController::new(
            hub,
            SpeakerEntities {
                speaker: config.sonos_entity.clone(),
                speech_enhancement: config.speech_enhancement_entity.clone(),
                night_mode: config.night_mode_entity.clone(),
            },
        );

        Self {
            config: Arc::new(config),
            catalog,
            store: Arc::new(store),
            library,
            resolver: Arc::new(resolver),
            launcher: Arc::new(launcher),
            remote: Arc::new(remote),
            speaker: Arc::new(speaker),
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(index))
        .route("/ingress", get(index))
        .nest("/api", api_routes())
        .nest_service("/static", static_dir)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(status))
        .route("/data", get(library::get_data).post(library::set_data))
        // Library
        .route("/shows", get(library::list_shows))
        .route("/shows/:show_id/episodes", get(library::list_episodes))
        .route(
            "/shows/:show_id/watched/:episode_id",
            post(library::mark_watched).delete(library::mark_unwatched),
        )
        .route("/shows/:show_id/progress", post(library::set_progress))
        // Service assignment
        .route("/shows/:show_id/service", post(services::set_service))
        .route("/shows/:show_id/scan-service", get(services::scan_service))
        .route("/scan-all", post(services::scan_all))
        // Fire TV
        .route("/firetv/launch", post(firetv::launch))
        .route("/firetv/command", post(firetv::command))
        // Sonos
        .route("/sonos/state", get(sonos::state))
        .route("/sonos/command", post(sonos::command))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Serves the single-page frontend
async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let path = state.config.static_dir.join("index.html");
    tokio::fs::read_to_string(&path)
        .await
        .map(Html)
        .map_err(|_| AppError::NotFound(format!("{} is missing", path.display())))
}

/// Integration status and static tables for the frontend
async fn status(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "sonarr": config.sonarr_configured(),
        "tmdb": config.tmdb_configured(),
        "ha_token": config.ha_configured(),
        "firetv_entity": config.firetv_entity,
        "sonos_entity": config.sonos_entity,
        "profiles": state.catalog.profiles(),
        "services": state.catalog.display_names(),
        "ingress_path": config.ingress_path,
    }))
}
