use serde::Serialize;
use serde_json::json;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::{ServiceCatalog, ServiceId},
    services::hub::{self, AutomationHub},
};

/// Wait after power-on before the device accepts further commands
pub const WAKE_SETTLE: Duration = Duration::from_millis(2000);
/// Wait after HOME for the foreground app to stop
pub const HOME_SETTLE: Duration = Duration::from_millis(1500);
/// Wait after launching for the app to render its profile picker
pub const PROFILE_PICKER_SETTLE: Duration = Duration::from_millis(5000);
/// Wait after each cursor move in the profile picker
pub const NAVIGATE_PACING: Duration = Duration::from_millis(300);

const KEY_HOME: &str = "KEYCODE_HOME";
const KEY_RIGHT: &str = "KEYCODE_DPAD_RIGHT";
const KEY_SELECT: &str = "KEYCODE_DPAD_CENTER";

/// One hub call in the launch choreography
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchStep {
    Wake,
    Home,
    Launch,
    NavigateRight,
    SelectProfile,
}

impl Display for LaunchStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LaunchStep::Wake => "wake",
            LaunchStep::Home => "home",
            LaunchStep::Launch => "launch",
            LaunchStep::NavigateRight => "navigate_right",
            LaunchStep::SelectProfile => "select_profile",
        };
        f.write_str(name)
    }
}

/// Result of a completed launch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchOutcome {
    pub service: ServiceId,
    pub package: String,
    /// Profile that was navigated to; empty when out of range or there is no picker
    pub profile: String,
}

/// Drives the TV through wake, home, app launch and profile selection.
///
/// Every step waits for the previous hub call to be acknowledged. A failed call aborts the
/// sequence with the failing step; steps already issued are not undone.
pub struct LaunchSequencer {
    hub: Arc<dyn AutomationHub>,
    catalog: Arc<ServiceCatalog>,
    entity_id: String,
}

impl LaunchSequencer {
    pub fn new(hub: Arc<dyn AutomationHub>, catalog: Arc<ServiceCatalog>, entity_id: String) -> Self {
        Self {
            hub,
            catalog,
            entity_id,
        }
    }

    pub async fn launch(&self, service: ServiceId, profile_index: usize) -> AppResult<LaunchOutcome> {
        let descriptor = self
            .catalog
            .get(service)
            .ok_or_else(|| AppError::UnknownService(service.to_string()))?;

        // An out-of-range index still moves the cursor `profile_index` times.
        let profile = if descriptor.has_profile_picker() {
            descriptor.profile_name(profile_index).to_string()
        } else {
            String::new()
        };

        tracing::info!(
            service = %service,
            profile_index = profile_index,
            profile = %profile,
            "Starting launch sequence"
        );

        self.run_step(LaunchStep::Wake, async {
            self.hub
                .invoke("media_player", "turn_on", json!({ "entity_id": self.entity_id }))
                .await
        })
        .await?;
        tokio::time::sleep(WAKE_SETTLE).await;

        self.key(LaunchStep::Home, KEY_HOME).await?;
        tokio::time::sleep(HOME_SETTLE).await;

        let launch_command = match &descriptor.component {
            Some(component) => format!("am start -n {}", component),
            None => format!("monkey -p {} 1", descriptor.package),
        };
        self.run_step(
            LaunchStep::Launch,
            hub::adb_command(self.hub.as_ref(), &self.entity_id, &launch_command),
        )
        .await?;

        if descriptor.has_profile_picker() {
            tokio::time::sleep(PROFILE_PICKER_SETTLE).await;
            for _ in 0..profile_index {
                self.key(LaunchStep::NavigateRight, KEY_RIGHT).await?;
                tokio::time::sleep(NAVIGATE_PACING).await;
            }
            self.key(LaunchStep::SelectProfile, KEY_SELECT).await?;
        }

        tracing::info!(service = %service, profile = %profile, "Launch sequence completed");

        Ok(LaunchOutcome {
            service,
            package: descriptor.package.clone(),
            profile,
        })
    }

    async fn key(&self, step: LaunchStep, keycode: &str) -> AppResult<()> {
        self.run_step(step, hub::key_event(self.hub.as_ref(), &self.entity_id, keycode))
            .await
    }

    async fn run_step<F>(&self, step: LaunchStep, call: F) -> AppResult<()>
    where
        F: std::future::Future<Output = AppResult<()>>,
    {
        call.await.map_err(|e| {
            tracing::error!(step = %step, error = %e, "Launch step failed");
            AppError::device(step, e)
        })
    }
}
