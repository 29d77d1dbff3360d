/// TMDB metadata provider
///
/// API Flow:
/// 1. Find: /find/{tvdb_id}?external_source=tvdb_id → `tv_results[].id`
/// 2. Providers: /tv/{tmdb_id}/watch/providers → `results[REGION]`
use crate::{
    error::{AppError, AppResult},
    models::{CatalogMatch, WatchProviders},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const EXTERNAL_SOURCE: &str = "tvdb_id";

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    tv_results: Vec<CatalogMatch>,
}

#[derive(Debug, Deserialize)]
struct WatchProvidersResponse {
    #[serde(default)]
    results: HashMap<String, WatchProviders>,
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
        }
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> AppResult<reqwest::Response> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "TMDB returned status {} for {}: {}",
                status, path, body
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Vec<CatalogMatch>> {
        // TVDB ids are numeric; anything else would alter the request path.
        if external_id.is_empty() || !external_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::InvalidInput(format!(
                "Invalid TVDB id: {:?}",
                external_id
            )));
        }

        let response = self
            .get(
                &format!("/find/{}", external_id),
                &[("external_source", EXTERNAL_SOURCE)],
            )
            .await?;

        let found: FindResponse = response.json().await?;

        tracing::debug!(
            external_id = %external_id,
            matches = found.tv_results.len(),
            provider = "tmdb",
            "Find by external id completed"
        );

        Ok(found.tv_results)
    }

    async fn watch_providers(&self, catalog_id: u64, region: &str) -> AppResult<WatchProviders> {
        let response = self
            .get(&format!("/tv/{}/watch/providers", catalog_id), &[])
            .await?;

        let mut listing: WatchProvidersResponse = response.json().await?;
        let providers = listing.results.remove(region).unwrap_or_default();

        tracing::debug!(
            catalog_id = catalog_id,
            region = %region,
            candidates = providers.candidates().count(),
            provider = "tmdb",
            "Watch providers fetched"
        );

        Ok(providers)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
