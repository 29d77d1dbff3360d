use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ServiceId;

/// Series as returned by Sonarr's `/api/v3/series`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub tvdb_id: Option<i64>,
    #[serde(default)]
    pub statistics: Option<SeriesStatistics>,
    #[serde(default)]
    pub season_count: Option<u32>,
    #[serde(default)]
    pub episode_count: Option<u32>,
    #[serde(default)]
    pub episode_file_count: Option<u32>,
}

/// Sonarr v3 nests counts under `statistics`; older builds put them at the top level
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStatistics {
    #[serde(default)]
    pub season_count: u32,
    #[serde(default)]
    pub episode_count: u32,
    #[serde(default)]
    pub episode_file_count: u32,
}

impl Series {
    pub fn season_count(&self) -> u32 {
        self.season_count
            .or_else(|| self.statistics.as_ref().map(|s| s.season_count))
            .unwrap_or(0)
    }

    pub fn episode_count(&self) -> u32 {
        self.episode_count
            .or_else(|| self.statistics.as_ref().map(|s| s.episode_count))
            .unwrap_or(0)
    }

    pub fn episode_file_count(&self) -> u32 {
        self.episode_file_count
            .or_else(|| self.statistics.as_ref().map(|s| s.episode_file_count))
            .unwrap_or(0)
    }
}

/// Episode as returned by Sonarr's `/api/v3/episode`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub season_number: i32,
    #[serde(default)]
    pub episode_number: i32,
    #[serde(default)]
    pub air_date_utc: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub has_file: bool,
}

/// Show listing entry returned to the frontend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowView {
    pub id: i64,
    pub title: String,
    pub status: Option<String>,
    pub year: Option<i32>,
    pub network: Option<String>,
    pub poster: String,
    pub banner: String,
    pub season_count: u32,
    pub episode_count: u32,
    pub episode_file_count: u32,
    pub tvdb_id: Option<i64>,
    pub service: Option<ServiceId>,
    pub progress: Value,
}

/// Episode listing entry returned to the frontend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeView {
    pub id: i64,
    pub title: Option<String>,
    pub season_number: i32,
    pub episode_number: i32,
    pub air_date: Option<String>,
    pub overview: Option<String>,
    pub has_file: bool,
    pub watched: bool,
}

impl EpisodeView {
    pub fn new(episode: Episode, watched: bool) -> Self {
        Self {
            id: episode.id,
            title: episode.title,
            season_number: episode.season_number,
            episode_number: episode.episode_number,
            air_date: episode.air_date_utc,
            overview: episode.overview,
            has_file: episode.has_file,
            watched,
        }
    }
}
