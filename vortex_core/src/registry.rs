//! Source registry and access filter.
//!
//! Every path that needs "which sources may this caller use" goes through
//! [`SourceRegistry::resolve_available_sources`]; nothing else filters by
//! scope.

use crate::config::{CatalogConfig, SourceConfig, SourceKind};
use crate::error::CatalogError;
use crate::SourceClient;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Supplies source configurations for a caller.
///
/// Implementations may pre-filter by identity; the registry applies the
/// enabled/scope filter regardless.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    async fn load_sources(&self, identity: Option<&str>)
        -> Result<Vec<SourceConfig>, CatalogError>;
}

/// Serves a fixed source list, typically the one from the config file.
#[derive(Debug, Clone, Default)]
pub struct StaticSourceProvider {
    sources: Vec<SourceConfig>,
}

impl StaticSourceProvider {
    pub fn new(sources: Vec<SourceConfig>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl SourceProvider for StaticSourceProvider {
    async fn load_sources(
        &self,
        _identity: Option<&str>,
    ) -> Result<Vec<SourceConfig>, CatalogError> {
        Ok(self.sources.clone())
    }
}

/// Builds a client for one source. Called once per source per request.
pub trait ClientFactory: Send + Sync {
    fn create(&self, source: &SourceConfig) -> Result<Box<dyn SourceClient>, CatalogError>;
}

/// Produces the concrete HTTP clients compiled into this build.
///
/// All clients share one `reqwest::Client`, so connection pooling survives
/// across requests even though client values do not.
#[derive(Clone)]
pub struct HttpClientFactory {
    http: reqwest::Client,
}

impl HttpClientFactory {
    pub fn new(user_agent: &str) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;
        Ok(Self { http })
    }

    /// Use an existing transport (tests, custom TLS setups).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl ClientFactory for HttpClientFactory {
    fn create(&self, source: &SourceConfig) -> Result<Box<dyn SourceClient>, CatalogError> {
        match source.kind {
            #[cfg(feature = "apple-cms")]
            SourceKind::AppleCms => Ok(Box::new(
                crate::connectors::apple_cms::AppleCmsClient::new(source, self.http.clone()),
            )),
            #[cfg(feature = "bangumi")]
            SourceKind::Bangumi => Ok(Box::new(crate::connectors::bangumi::BangumiClient::new(
                source,
                self.http.clone(),
            ))),
            #[allow(unreachable_patterns)]
            other => Err(CatalogError::Config(format!(
                "source '{}' needs the {:?} client, which is not compiled in",
                source.key, other
            ))),
        }
    }
}

/// Access-filtered view over the configured sources.
#[derive(Clone)]
pub struct SourceRegistry {
    provider: Arc<dyn SourceProvider>,
    factory: Arc<dyn ClientFactory>,
}

impl SourceRegistry {
    pub fn new(provider: Arc<dyn SourceProvider>, factory: Arc<dyn ClientFactory>) -> Self {
        Self { provider, factory }
    }

    /// Registry over the config file's sources with real HTTP clients.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let factory = HttpClientFactory::new(&config.search.user_agent)?;
        Ok(Self::new(
            Arc::new(StaticSourceProvider::new(config.sources.clone())),
            Arc::new(factory),
        ))
    }

    /// Sources the caller may use: enabled, admitted by scope, ordered by
    /// ascending priority. Ties keep configuration order.
    pub async fn resolve_available_sources(
        &self,
        identity: Option<&str>,
    ) -> Result<Vec<SourceConfig>, CatalogError> {
        let mut sources: Vec<SourceConfig> = self
            .provider
            .load_sources(identity)
            .await?
            .into_iter()
            .filter(|s| s.enabled && s.scope.admits(identity))
            .collect();
        sources.sort_by_key(|s| s.priority);

        debug!(
            identity = identity.unwrap_or("<anonymous>"),
            count = sources.len(),
            "resolved available sources"
        );
        Ok(sources)
    }

    /// Look up a source among those available to the caller. A key that
    /// exists but is disabled or out of scope is reported the same as an
    /// unknown one.
    pub async fn find_source(
        &self,
        key: &str,
        identity: Option<&str>,
    ) -> Result<Option<SourceConfig>, CatalogError> {
        Ok(self
            .resolve_available_sources(identity)
            .await?
            .into_iter()
            .find(|s| s.key == key))
    }

    /// Fresh client for `source`.
    pub fn client_for(&self, source: &SourceConfig) -> Result<Box<dyn SourceClient>, CatalogError> {
        self.factory.create(source)
    }
}
