use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    services::hub::{self, AutomationHub},
};

/// Symbolic remote buttons and their Android key codes
const KEY_MAP: &[(&str, &str)] = &[
    ("play_pause", "KEYCODE_MEDIA_PLAY_PAUSE"),
    ("back", "KEYCODE_BACK"),
    ("home", "KEYCODE_HOME"),
    ("up", "KEYCODE_DPAD_UP"),
    ("down", "KEYCODE_DPAD_DOWN"),
    ("left", "KEYCODE_DPAD_LEFT"),
    ("right", "KEYCODE_DPAD_RIGHT"),
    ("select", "KEYCODE_DPAD_CENTER"),
    ("rewind", "KEYCODE_MEDIA_REWIND"),
    ("forward", "KEYCODE_MEDIA_FAST_FORWARD"),
    ("vol_up", "KEYCODE_VOLUME_UP"),
    ("vol_down", "KEYCODE_VOLUME_DOWN"),
];

pub fn keycode_for(command: &str) -> Option<&'static str> {
    KEY_MAP
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, code)| *code)
}

/// Forwards single remote-control commands to the TV
pub struct RemoteDispatcher {
    hub: Arc<dyn AutomationHub>,
    entity_id: String,
}

impl RemoteDispatcher {
    pub fn new(hub: Arc<dyn AutomationHub>, entity_id: String) -> Self {
        Self { hub, entity_id }
    }

    /// Known buttons become key events; anything else is sent as a raw ADB command
    pub async fn send(&self, command: &str) -> AppResult<()> {
        if command.trim().is_empty() {
            return Err(AppError::InvalidInput("command required".to_string()));
        }

        match keycode_for(command) {
            Some(keycode) => hub::key_event(self.hub.as_ref(), &self.entity_id, keycode).await,
            None => {
                tracing::info!(command = %command, "Forwarding unmapped remote command");
                hub::adb_command(self.hub.as_ref(), &self.entity_id, command).await
            }
        }
    }
}
