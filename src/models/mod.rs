use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::{AppError, AppResult};

pub mod alias;
pub mod library;
pub mod service;

pub use alias::{AliasEntry, AliasTable};
pub use library::{Episode, EpisodeView, Series, ShowView};
pub use service::{ServiceCatalog, ServiceDescriptor, ServiceId};

// ============================================================================
// Metadata provider types
// ============================================================================

/// A catalog entry returned by a find-by-external-id lookup
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogMatch {
    pub id: u64,
    #[serde(default, alias = "name")]
    pub title: Option<String>,
}

/// One streaming offer in a watch-provider listing
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderOffer {
    #[serde(default, rename = "provider_name")]
    pub name: String,
}

impl ProviderOffer {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Regional watch-provider listing, grouped by monetization type
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WatchProviders {
    /// Included with a subscription
    #[serde(default)]
    pub flatrate: Vec<ProviderOffer>,
    /// Free without ads
    #[serde(default)]
    pub free: Vec<ProviderOffer>,
    /// Free with ads
    #[serde(default)]
    pub ads: Vec<ProviderOffer>,
}

impl WatchProviders {
    /// Candidate offers in precedence order: subscription, free, ad-supported
    pub fn candidates(&self) -> impl Iterator<Item = &ProviderOffer> {
        self.flatrate.iter().chain(&self.free).chain(&self.ads)
    }
}

// ============================================================================
// Resolution types
// ============================================================================

/// Outcome of a successful provider resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub service: ServiceId,
    /// Provider display name that matched the alias table
    pub provider: String,
}

/// A show submitted for batch resolution
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanTarget {
    pub id: i64,
    #[serde(
        default,
        rename = "tvdbId",
        alias = "externalId",
        deserialize_with = "external_id"
    )]
    pub external_id: Option<String>,
}

impl ScanTarget {
    pub fn new(id: i64, external_id: Option<&str>) -> Self {
        Self {
            id,
            external_id: external_id.map(str::to_string),
        }
    }
}

/// External ids arrive as either numbers (Sonarr's `tvdbId`) or strings.
/// Zero and empty values mean "no id".
fn external_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(0)) | None => None,
        Some(Raw::Number(n)) => Some(n.to_string()),
        Some(Raw::Text(s)) if s.trim().is_empty() => None,
        Some(Raw::Text(s)) => Some(s),
    })
}

/// Aggregate result of a batch resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    /// Show id (as string) to resolved service
    pub results: std::collections::BTreeMap<String, ServiceId>,
    /// Number of shows submitted
    pub scanned: usize,
    /// Number of shows resolved
    pub found: usize,
}

// ============================================================================
// Catalog file
// ============================================================================

/// Replacement service catalog and alias table read from `CATALOG_FILE`
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub services: ServiceCatalog,
    pub aliases: Vec<AliasEntry>,
}

impl CatalogFile {
    /// Reads the file once at startup. Alias patterns are lower-cased on load.
    pub fn load(path: &Path) -> AppResult<(ServiceCatalog, AliasTable)> {
        let text = std::fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&text).map_err(|e| {
            AppError::InvalidInput(format!("Invalid catalog file {}: {}", path.display(), e))
        })?;
        let aliases = file
            .aliases
            .iter()
            .map(|entry| AliasEntry::new(&entry.pattern, entry.service))
            .collect();
        Ok((file.services, AliasTable::new(aliases)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_providers_candidate_order() {
        let providers: WatchProviders = serde_json::from_str(
            r#"{
                "ads": [{"provider_name": "Pluto TV"}],
                "free": [{"provider_name": "Tubi TV"}],
                "flatrate": [{"provider_name": "Hulu"}, {"provider_name": "Netflix"}],
                "rent": [{"provider_name": "Apple TV"}]
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = providers.candidates().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Hulu", "Netflix", "Tubi TV", "Pluto TV"]);
    }

    #[test]
    fn test_watch_providers_missing_groups_default_empty() {
        let providers: WatchProviders = serde_json::from_str(r#"{"link": "x"}"#).unwrap();
        assert_eq!(providers.candidates().count(), 0);
    }

    #[test]
    fn test_scan_target_accepts_numeric_tvdb_id() {
        let target: ScanTarget = serde_json::from_str(r#"{"id": 7, "tvdbId": 81189}"#).unwrap();
        assert_eq!(target, ScanTarget::new(7, Some("81189")));
    }

    #[test]
    fn test_scan_target_accepts_string_external_id() {
        let target: ScanTarget =
            serde_json::from_str(r#"{"id": 1, "externalId": "x"}"#).unwrap();
        assert_eq!(target.external_id.as_deref(), Some("x"));
    }

    #[test]
    fn test_scan_target_missing_ids() {
        for json in [
            r#"{"id": 2}"#,
            r#"{"id": 2, "tvdbId": null}"#,
            r#"{"id": 2, "tvdbId": 0}"#,
            r#"{"id": 2, "tvdbId": ""}"#,
        ] {
            let target: ScanTarget = serde_json::from_str(json).unwrap();
            assert_eq!(target.external_id, None, "{}", json);
        }
    }

    #[test]
    fn test_catalog_file_lowercases_aliases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{
                "services": {"plex": {"display_name": "Plex", "package": "com.plexapp.android"}},
                "aliases": [{"pattern": "Plex", "service": "plex"}]
            }"#,
        )
        .unwrap();

        let (catalog, aliases) = CatalogFile::load(&path).unwrap();
        assert!(catalog.get(ServiceId::Plex).is_some());
        assert_eq!(aliases.match_name("PLEX Channels"), Some(ServiceId::Plex));
    }
}
