// src/lib.rs
pub mod aggregate;
pub mod config;
pub mod connectors;
pub mod detail;
pub mod error;
pub mod identity;
pub mod registry;
pub mod utils;

use async_trait::async_trait;

pub use crate::aggregate::{
    AggregatedResults, CatalogDetail, CatalogItem, CatalogSearch, Category, Episode, PlaySource,
    SearchQuery, SourceProgress, SourceStatus,
};
pub use crate::config::{AccessScope, CatalogConfig, SourceConfig, SourceKind};
pub use crate::detail::DetailResolver;
pub use crate::error::CatalogError;
pub use crate::identity::CompositeId;
pub use crate::registry::{
    ClientFactory, HttpClientFactory, SourceProvider, SourceRegistry, StaticSourceProvider,
};

/// One upstream catalog API.
///
/// Implementations issue exactly one outbound request per call and never
/// retry. Transport failures, non-2xx statuses and undecodable payloads are
/// all reported as errors; deciding what that means for the caller is up to
/// the dispatcher.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Configured key of the source this client talks to.
    fn key(&self) -> &str;

    /// Human-readable source name.
    fn name(&self) -> &str;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Fetch one entry. Receives the whole composite id (`"<key>-<native>"`)
    /// and strips the prefix itself. `Ok(None)` means the upstream has no
    /// such entry.
    async fn get_detail(&self, composite_id: &str) -> Result<Option<CatalogDetail>, CatalogError>;
}

/// Crate version, reported by the binaries.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
