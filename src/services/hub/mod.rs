/// Home automation hub abstraction
///
/// Device control goes through a hub that exposes service calls (`domain.action` with a JSON
/// payload) and entity state reads. Home Assistant is the only implementation.
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::AppResult;

pub mod home_assistant;

pub use home_assistant::HomeAssistant;

/// Current state of a hub entity
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntityState {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    pub fn is_on(&self) -> bool {
        self.state == "on"
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AutomationHub: Send + Sync {
    /// Call a hub service. Only success or failure is reported back.
    async fn invoke(&self, domain: &str, action: &str, payload: Value) -> AppResult<()>;

    /// Read an entity's current state
    async fn entity_state(&self, entity_id: &str) -> AppResult<EntityState>;
}

/// Runs a shell command on an Android TV entity through the `androidtv` integration
pub async fn adb_command(hub: &dyn AutomationHub, entity_id: &str, command: &str) -> AppResult<()> {
    tracing::debug!(entity_id = %entity_id, command = %command, "Sending ADB command");
    hub.invoke(
        "androidtv",
        "adb_command",
        json!({ "entity_id": entity_id, "command": command }),
    )
    .await
}

/// Sends an Android key event, e.g. `KEYCODE_HOME`
pub async fn key_event(hub: &dyn AutomationHub, entity_id: &str, keycode: &str) -> AppResult<()> {
    adb_command(hub, entity_id, &format!("input keyevent {}", keycode)).await
}
