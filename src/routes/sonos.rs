use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    routes::AppState,
    services::{speaker::SpeakerState, SpeakerCommand},
};

pub async fn state(State(state): State<AppState>) -> AppResult<Json<SpeakerState>> {
    Ok(Json(state.speaker.state().await?))
}

pub async fn command(
    State(state): State<AppState>,
    Json(command): Json<SpeakerCommand>,
) -> AppResult<Json<Value>> {
    state.speaker.send(command).await?;
    Ok(Json(json!({ "ok": true })))
}
