use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::ServiceId,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    pub service: String,
    #[serde(default)]
    pub profile_index: usize,
}

#[derive(Debug, Serialize)]
pub struct LaunchResponse {
    pub ok: bool,
    pub service: ServiceId,
    pub package: String,
    pub profile: String,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub command: String,
}

/// Handler for launching a streaming app with a profile
pub async fn launch(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<LaunchRequest>,
) -> AppResult<Json<LaunchResponse>> {
    let service: ServiceId = request.service.parse()?;

    tracing::info!(
        request_id = %request_id,
        service = %service,
        profile_index = request.profile_index,
        "Processing launch request"
    );

    let outcome = state.launcher.launch(service, request.profile_index).await?;

    Ok(Json(LaunchResponse {
        ok: true,
        service: outcome.service,
        package: outcome.package,
        profile: outcome.profile,
    }))
}

/// Handler for single remote button presses
pub async fn command(
    State(state): State<AppState>,
    Json(request): Json<CommandRequest>,
) -> AppResult<Json<Value>> {
    state.remote.send(&request.command).await?;
    Ok(Json(json!({ "ok": true })))
}
