use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::AppResult,
    models::{AliasTable, BatchOutcome, Resolution, ScanTarget, WatchProviders},
    services::providers::MetadataProvider,
};

/// Pause after every attempted batch item, to stay under the metadata provider's rate limit
pub const BATCH_PACING: Duration = Duration::from_millis(150);

/// Infers the streaming service hosting a show from its watch-provider listing
pub struct ProviderResolver {
    provider: Arc<dyn MetadataProvider>,
    aliases: Arc<AliasTable>,
    region: String,
}

impl ProviderResolver {
    pub fn new(provider: Arc<dyn MetadataProvider>, aliases: Arc<AliasTable>, region: String) -> Self {
        Self {
            provider,
            aliases,
            region,
        }
    }

    /// Resolves a single show by external id.
    ///
    /// Only a failed find call is an error. No catalog match, a failed watch-provider
    /// call, or no alias match all resolve to `None`.
    pub async fn resolve(&self, external_id: &str) -> AppResult<Option<Resolution>> {
        let matches = self.provider.find_by_external_id(external_id).await?;

        let Some(first) = matches.first() else {
            tracing::debug!(external_id = %external_id, "No catalog match");
            return Ok(None);
        };

        let providers = match self.provider.watch_providers(first.id, &self.region).await {
            Ok(providers) => providers,
            Err(e) => {
                tracing::warn!(
                    external_id = %external_id,
                    catalog_id = first.id,
                    error = %e,
                    provider = self.provider.name(),
                    "Watch provider lookup failed"
                );
                return Ok(None);
            }
        };

        let resolution = self.match_providers(&providers);

        tracing::info!(
            external_id = %external_id,
            catalog_id = first.id,
            service = ?resolution.as_ref().map(|r| r.service),
            "Service resolution completed"
        );

        Ok(resolution)
    }

    /// Provider order is outer and alias order inner, so the first listed provider with any
    /// alias match wins even when a later provider matches an earlier alias.
    pub fn match_providers(&self, providers: &WatchProviders) -> Option<Resolution> {
        providers.candidates().find_map(|offer| {
            self.aliases.match_name(&offer.name).map(|service| Resolution {
                service,
                provider: offer.name.clone(),
            })
        })
    }

    /// Resolves shows one at a time with fixed pacing between items.
    ///
    /// Items without an external id are skipped. Failures on an item are logged and the
    /// item skipped; the batch always completes.
    pub async fn resolve_all(&self, shows: &[ScanTarget]) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            scanned: shows.len(),
            ..Default::default()
        };

        for show in shows {
            let Some(external_id) = show.external_id.as_deref() else {
                continue;
            };

            match self.resolve(external_id).await {
                Ok(Some(resolution)) => {
                    outcome
                        .results
                        .insert(show.id.to_string(), resolution.service);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        show_id = show.id,
                        external_id = %external_id,
                        error = %e,
                        "Skipping show after resolution failure"
                    );
                }
            }

            tokio::time::sleep(BATCH_PACING).await;
        }

        outcome.found = outcome.results.len();

        tracing::info!(
            scanned = outcome.scanned,
            found = outcome.found,
            "Batch resolution completed"
        );

        outcome
    }
}
