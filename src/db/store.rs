use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::ServiceId;

/// The persisted document. Keys are show ids rendered as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    /// Watched episode ids per show
    #[serde(default)]
    pub watched: HashMap<String, Vec<i64>>,
    /// Assigned streaming service per show; `null` clears an assignment
    #[serde(default, deserialize_with = "lenient_services")]
    pub services: HashMap<String, Option<ServiceId>>,
    /// Per-show deep links, stored for the frontend and never interpreted
    #[serde(default)]
    pub deep_links: HashMap<String, Value>,
    /// Free-form viewing progress per show
    #[serde(default)]
    pub progress: HashMap<String, Value>,
    /// Top-level keys written by other clients, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reads assignments without failing the document on a value outside the service set
fn lenient_services<'de, D>(deserializer: D) -> Result<HashMap<String, Option<ServiceId>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: HashMap<String, Value> = HashMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(show_id, value)| {
            let service = match &value {
                Value::Null => None,
                Value::String(name) => name.parse::<ServiceId>().ok(),
                _ => None,
            };
            if service.is_none() && !value.is_null() {
                tracing::warn!(show_id = %show_id, value = %value, "Dropping unknown service assignment");
            }
            (show_id, service)
        })
        .collect())
}

impl StoreData {
    pub fn service_for(&self, show_id: i64) -> Option<ServiceId> {
        self.services.get(&show_id.to_string()).copied().flatten()
    }

    pub fn progress_for(&self, show_id: i64) -> Value {
        self.progress
            .get(&show_id.to_string())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    pub fn watched_for(&self, show_id: i64) -> &[i64] {
        self.watched
            .get(&show_id.to_string())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// JSON-file backed store for watched, service and progress records.
///
/// The document is held in memory and written through on every mutation.
/// Mutations are serialized by the lock; last writer wins.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    data: RwLock<StoreData>,
}

impl JsonStore {
    /// Opens the store, starting empty when the file is missing or unreadable
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = Self::load(&path).await;
        Self {
            path,
            data: RwLock::new(data),
        }
    }

    async fn load(path: &Path) -> StoreData {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return StoreData::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read data file");
                return StoreData::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                let backup = path.with_extension("json.bak");
                match tokio::fs::rename(path, &backup).await {
                    Ok(()) => tracing::warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        error = %e,
                        "Data file is not valid, moved aside and starting empty"
                    ),
                    Err(rename_err) => tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        rename_error = %rename_err,
                        "Data file is not valid and could not be moved aside, starting empty"
                    ),
                }
                StoreData::default()
            }
        }
    }

    /// Writes the document next to its destination and renames it into place
    async fn persist(&self, data: &StoreData) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| AppError::Store(format!("Serialization error: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), "Data file written");
        Ok(())
    }

    /// Applies `change` to the document and persists the result
    async fn update<F>(&self, change: F) -> AppResult<()>
    where
        F: FnOnce(&mut StoreData) -> AppResult<()>,
    {
        let mut data = self.data.write().await;
        let mut next = data.clone();
        change(&mut next)?;
        self.persist(&next).await?;
        *data = next;
        Ok(())
    }

    pub async fn snapshot(&self) -> StoreData {
        self.data.read().await.clone()
    }

    /// Shallow merge: top-level keys in `partial` replace the stored ones, others are kept
    pub async fn merge(&self, partial: Map<String, Value>) -> AppResult<()> {
        // Incoming assignments must name known services; only legacy files are read leniently.
        if let Some(services) = partial.get("services") {
            serde_json::from_value::<HashMap<String, Option<ServiceId>>>(services.clone())
                .map_err(|e| AppError::InvalidInput(format!("Invalid services: {}", e)))?;
        }

        self.update(|data| {
            let mut doc = match serde_json::to_value(&*data) {
                Ok(Value::Object(doc)) => doc,
                _ => return Err(AppError::Internal("Store document is not an object".to_string())),
            };
            doc.extend(partial);
            *data = serde_json::from_value(Value::Object(doc))
                .map_err(|e| AppError::InvalidInput(format!("Invalid data document: {}", e)))?;
            Ok(())
        })
        .await
    }

    pub async fn assign_service(&self, show_id: i64, service: Option<ServiceId>) -> AppResult<()> {
        self.update(|data| {
            data.services.insert(show_id.to_string(), service);
            Ok(())
        })
        .await
    }

    /// Merges a batch of assignments in a single write
    pub async fn assign_services(&self, assignments: &BTreeMap<String, ServiceId>) -> AppResult<()> {
        self.update(|data| {
            for (show_id, service) in assignments {
                data.services.insert(show_id.clone(), Some(*service));
            }
            Ok(())
        })
        .await
    }

    pub async fn mark_watched(&self, show_id: i64, episode_id: i64) -> AppResult<()> {
        self.update(|data| {
            let watched = data.watched.entry(show_id.to_string()).or_default();
            if !watched.contains(&episode_id) {
                watched.push(episode_id);
            }
            Ok(())
        })
        .await
    }

    pub async fn mark_unwatched(&self, show_id: i64, episode_id: i64) -> AppResult<()> {
        self.update(|data| {
            if let Some(watched) = data.watched.get_mut(&show_id.to_string()) {
                watched.retain(|id| *id != episode_id);
            }
            Ok(())
        })
        .await
    }

    pub async fn set_progress(&self, show_id: i64, progress: Value) -> AppResult<()> {
        self.update(|data| {
            data.progress.insert(show_id.to_string(), progress);
            Ok(())
        })
        .await
    }
}
