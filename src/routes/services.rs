use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{BatchOutcome, ScanTarget, ServiceId},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SetServiceRequest {
    #[serde(default)]
    pub service: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    pub tvdb_id: String,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub service: Option<ServiceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScanAllRequest {
    #[serde(default)]
    pub shows: Vec<ScanTarget>,
}

/// Manual service override; `null` clears the assignment
pub async fn set_service(
    State(state): State<AppState>,
    Path(show_id): Path<i64>,
    Json(request): Json<SetServiceRequest>,
) -> AppResult<Json<Value>> {
    let service = request
        .service
        .as_deref()
        .map(str::parse::<ServiceId>)
        .transpose()?;

    state.store.assign_service(show_id, service).await?;

    tracing::info!(show_id = show_id, service = ?service, "Service assigned");

    Ok(Json(json!({ "ok": true })))
}

/// Resolves one show's service and persists it on a match
pub async fn scan_service(
    State(state): State<AppState>,
    Path(show_id): Path<i64>,
    Query(query): Query<ScanQuery>,
) -> AppResult<Json<ScanResponse>> {
    let Some(resolution) = state.resolver.resolve(&query.tvdb_id).await? else {
        return Ok(Json(ScanResponse {
            service: None,
            provider: None,
        }));
    };

    state
        .store
        .assign_service(show_id, Some(resolution.service))
        .await?;

    Ok(Json(ScanResponse {
        service: Some(resolution.service),
        provider: Some(resolution.provider),
    }))
}

/// Resolves many shows, then stores every match in one write
pub async fn scan_all(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ScanAllRequest>,
) -> AppResult<Json<BatchOutcome>> {
    tracing::info!(
        request_id = %request_id,
        shows = request.shows.len(),
        "Processing batch service scan"
    );

    let outcome = state.resolver.resolve_all(&request.shows).await;
    state.store.assign_services(&outcome.results).await?;

    Ok(Json(outcome))
}
