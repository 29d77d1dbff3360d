/// Home Assistant REST client
///
/// Service calls: POST /api/services/{domain}/{service}
/// State reads:   GET  /api/states/{entity_id}
use crate::{
    error::{AppError, AppResult},
    services::hub::{AutomationHub, EntityState},
};
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct HomeAssistant {
    http_client: HttpClient,
    base_url: String,
    token: String,
}

impl HomeAssistant {
    pub fn new(http_client: HttpClient, base_url: String, token: String) -> Self {
        Self {
            http_client,
            base_url,
            token,
        }
    }

    async fn check(response: reqwest::Response, what: &str) -> AppResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = %status, body = %body, request = %what, "Home Assistant request failed");
        Err(AppError::Upstream(format!(
            "Home Assistant returned status {} for {}: {}",
            status, what, body
        )))
    }
}

#[async_trait::async_trait]
impl AutomationHub for HomeAssistant {
    async fn invoke(&self, domain: &str, action: &str, payload: Value) -> AppResult<()> {
        let url = format!("{}/api/services/{}/{}", self.base_url, domain, action);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        Self::check(response, &format!("{}.{}", domain, action)).await?;
        Ok(())
    }

    async fn entity_state(&self, entity_id: &str) -> AppResult<EntityState> {
        let url = format!("{}/api/states/{}", self.base_url, entity_id);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let response = Self::check(response, entity_id).await?;
        Ok(response.json().await?)
    }
}
