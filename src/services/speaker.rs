use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::{error::AppResult, services::hub::AutomationHub};

const VOLUME_STEP: f64 = 0.05;
const DEFAULT_VOLUME: f64 = 0.3;

fn default_volume() -> f64 {
    DEFAULT_VOLUME
}

/// Speaker commands. Toggles carry the state the frontend currently shows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SpeakerCommand {
    VolumeUp {
        #[serde(default = "default_volume")]
        current: f64,
    },
    VolumeDown {
        #[serde(default = "default_volume")]
        current: f64,
    },
    Mute {
        #[serde(default)]
        muted: bool,
    },
    SpeechEnhancement {
        #[serde(default)]
        state: bool,
    },
    NightMode {
        #[serde(default)]
        state: bool,
    },
}

/// Snapshot of the speaker as shown by the remote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakerState {
    pub state: String,
    pub volume: f64,
    pub muted: bool,
    pub speech_enhancement: bool,
    pub night_mode: bool,
}

/// Entities controlled by the speaker panel
#[derive(Debug, Clone)]
pub struct SpeakerEntities {
    pub speaker: String,
    pub speech_enhancement: String,
    pub night_mode: String,
}

/// Single-call passthroughs to the speaker's hub entities
pub struct SpeakerController {
    hub: Arc<dyn AutomationHub>,
    entities: SpeakerEntities,
}

/// Steps the volume and keeps it within [0, 1], rounded to two decimals
pub fn step_volume(current: f64, delta: f64) -> f64 {
    let next = (current + delta).clamp(0.0, 1.0);
    (next * 100.0).round() / 100.0
}

impl SpeakerController {
    pub fn new(hub: Arc<dyn AutomationHub>, entities: SpeakerEntities) -> Self {
        Self { hub, entities }
    }

    pub async fn state(&self) -> AppResult<SpeakerState> {
        let speaker = self.hub.entity_state(&self.entities.speaker).await?;
        let speech = self
            .hub
            .entity_state(&self.entities.speech_enhancement)
            .await?;
        let night = self.hub.entity_state(&self.entities.night_mode).await?;

        Ok(SpeakerState {
            volume: speaker
                .attributes
                .get("volume_level")
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0),
            muted: speaker
                .attributes
                .get("is_volume_muted")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            state: speaker.state,
            speech_enhancement: speech.is_on(),
            night_mode: night.is_on(),
        })
    }

    pub async fn send(&self, command: SpeakerCommand) -> AppResult<()> {
        tracing::debug!(command = ?command, "Speaker command");

        let speaker = &self.entities.speaker;
        match command {
            SpeakerCommand::VolumeUp { current } => {
                self.set_volume(speaker, step_volume(current, VOLUME_STEP))
                    .await
            }
            SpeakerCommand::VolumeDown { current } => {
                self.set_volume(speaker, step_volume(current, -VOLUME_STEP))
                    .await
            }
            SpeakerCommand::Mute { muted } => {
                self.hub
                    .invoke(
                        "media_player",
                        "volume_mute",
                        json!({ "entity_id": speaker, "is_volume_muted": !muted }),
                    )
                    .await
            }
            SpeakerCommand::SpeechEnhancement { state } => {
                self.toggle(&self.entities.speech_enhancement, state).await
            }
            SpeakerCommand::NightMode { state } => {
                self.toggle(&self.entities.night_mode, state).await
            }
        }
    }

    async fn set_volume(&self, entity_id: &str, level: f64) -> AppResult<()> {
        self.hub
            .invoke(
                "media_player",
                "volume_set",
                json!({ "entity_id": entity_id, "volume_level": level }),
            )
            .await
    }

    /// Flips a switch away from its current state
    async fn toggle(&self, entity_id: &str, currently_on: bool) -> AppResult<()> {
        let action = if currently_on { "turn_off" } else { "turn_on" };
        self.hub
            .invoke("switch", action, json!({ "entity_id": entity_id }))
            .await
    }
}
