/// Metadata provider abstraction
///
/// The resolver only needs two read-only lookups from a metadata source: translating an
/// external (TVDB) id into catalog entries, and listing where a catalog entry can be watched
/// in a region. TMDB is the only implementation; tests substitute mocks.
use crate::{
    error::AppResult,
    models::{CatalogMatch, WatchProviders},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Find catalog entries by external id
    ///
    /// A non-success response is an error. An empty list is a valid answer.
    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Vec<CatalogMatch>>;

    /// Fetch the watch-provider listing for a catalog entry in `region`
    ///
    /// Regions missing from the upstream response yield an empty listing.
    async fn watch_providers(&self, catalog_id: u64, region: &str) -> AppResult<WatchProviders>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
