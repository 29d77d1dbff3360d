/// TV library backed by Sonarr
///
/// Series and episodes come from Sonarr; service assignments, progress and watched flags
/// are joined in from the local store.
use crate::{
    db::StoreData,
    error::{AppError, AppResult},
    models::{Episode, EpisodeView, Series, ShowView},
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait::async_trait]
pub trait LibrarySource: Send + Sync {
    async fn list_series(&self) -> AppResult<Vec<Series>>;

    async fn list_episodes(&self, series_id: i64) -> AppResult<Vec<Episode>>;

    /// Public URL of a series cover image (`poster` or `banner`)
    fn cover_url(&self, series_id: i64, kind: &str) -> String;
}

#[derive(Clone)]
pub struct SonarrClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl SonarrClient {
    pub fn new(http_client: HttpClient, base_url: String, api_key: String) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
        }
    }

    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(status = %status, path = %path, "Sonarr request failed");
            return Err(AppError::Upstream(format!("Sonarr returned status {}", status)));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl LibrarySource for SonarrClient {
    async fn list_series(&self) -> AppResult<Vec<Series>> {
        self.get("/api/v3/series", &[]).await
    }

    async fn list_episodes(&self, series_id: i64) -> AppResult<Vec<Episode>> {
        self.get("/api/v3/episode", &[("seriesId", series_id.to_string())])
            .await
    }

    fn cover_url(&self, series_id: i64, kind: &str) -> String {
        format!(
            "{}/api/v3/mediacover/{}/{}.jpg?apikey={}",
            self.base_url, series_id, kind, self.api_key
        )
    }
}

/// Joins series with stored assignments and progress, sorted by title
pub fn show_views(source: &dyn LibrarySource, series: Vec<Series>, data: &StoreData) -> Vec<ShowView> {
    let mut shows: Vec<ShowView> = series
        .into_iter()
        .map(|s| ShowView {
            id: s.id,
            poster: source.cover_url(s.id, "poster"),
            banner: source.cover_url(s.id, "banner"),
            season_count: s.season_count(),
            episode_count: s.episode_count(),
            episode_file_count: s.episode_file_count(),
            service: data.service_for(s.id),
            progress: data.progress_for(s.id),
            title: s.title,
            status: s.status,
            year: s.year,
            network: s.network,
            tvdb_id: s.tvdb_id,
        })
        .collect();

    shows.sort_by(|a, b| a.title.cmp(&b.title));
    shows
}

/// Marks watched episodes, sorted by season then episode number
pub fn episode_views(series_id: i64, episodes: Vec<Episode>, data: &StoreData) -> Vec<EpisodeView> {
    let watched = data.watched_for(series_id);
    let mut views: Vec<EpisodeView> = episodes
        .into_iter()
        .map(|e| {
            let seen = watched.contains(&e.id);
            EpisodeView::new(e, seen)
        })
        .collect();

    views.sort_by_key(|e| (e.season_number, e.episode_number));
    views
}
