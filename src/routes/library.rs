use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Map, Value};

use crate::{
    db::StoreData,
    error::AppResult,
    models::{EpisodeView, ShowView},
    routes::AppState,
    services::library::{episode_views, show_views},
};

/// Handler for the raw data document
pub async fn get_data(State(state): State<AppState>) -> Json<StoreData> {
    Json(state.store.snapshot().await)
}

/// Shallow-merges the posted keys into the data document
pub async fn set_data(
    State(state): State<AppState>,
    Json(partial): Json<Map<String, Value>>,
) -> AppResult<Json<Value>> {
    let keys: Vec<&String> = partial.keys().collect();
    tracing::info!(keys = ?keys, "Merging data document");
    state.store.merge(partial).await?;
    Ok(Json(json!({ "ok": true })))
}

/// Handler for the library listing
pub async fn list_shows(State(state): State<AppState>) -> AppResult<Json<Vec<ShowView>>> {
    let series = state.library.list_series().await?;
    let data = state.store.snapshot().await;
    let shows = show_views(state.library.as_ref(), series, &data);

    tracing::info!(shows = shows.len(), "Library listed");

    Ok(Json(shows))
}

/// Handler for a show's episode listing
pub async fn list_episodes(
    State(state): State<AppState>,
    Path(show_id): Path<i64>,
) -> AppResult<Json<Vec<EpisodeView>>> {
    let episodes = state.library.list_episodes(show_id).await?;
    let data = state.store.snapshot().await;
    Ok(Json(episode_views(show_id, episodes, &data)))
}

pub async fn mark_watched(
    State(state): State<AppState>,
    Path((show_id, episode_id)): Path<(i64, i64)>,
) -> AppResult<Json<Value>> {
    state.store.mark_watched(show_id, episode_id).await?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn mark_unwatched(
    State(state): State<AppState>,
    Path((show_id, episode_id)): Path<(i64, i64)>,
) -> AppResult<Json<Value>> {
    state.store.mark_unwatched(show_id, episode_id).await?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn set_progress(
    State(state): State<AppState>,
    Path(show_id): Path<i64>,
    Json(progress): Json<Value>,
) -> AppResult<Json<Value>> {
    state.store.set_progress(show_id, progress).await?;
    Ok(Json(json!({ "ok": true })))
}
