//! Single-entry detail lookup addressed by composite id.

use crate::aggregate::CatalogDetail;
use crate::config::{SearchSettings, DEFAULT_DETAIL_TIMEOUT_MS};
use crate::error::CatalogError;
use crate::identity::CompositeId;
use crate::registry::SourceRegistry;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct DetailResolver {
    registry: SourceRegistry,
    timeout_ms: u64,
}

impl DetailResolver {
    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            registry,
            timeout_ms: DEFAULT_DETAIL_TIMEOUT_MS,
        }
    }

    pub fn with_settings(registry: SourceRegistry, settings: &SearchSettings) -> Self {
        Self {
            registry,
            timeout_ms: settings.detail_timeout_ms,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Resolve `composite_id` for `identity`.
    ///
    /// Errors:
    /// - `InvalidInput` for a malformed id, before any lookup
    /// - `NotFound` when the source is unknown, disabled or out of the
    ///   caller's scope (no upstream call is made), or when the upstream has
    ///   no such entry
    /// - `LookupFailed` for any upstream failure, including timeout
    pub async fn get_detail(
        &self,
        composite_id: &str,
        identity: Option<&str>,
    ) -> Result<CatalogDetail, CatalogError> {
        let id = CompositeId::parse(composite_id)?;

        let Some(source) = self.registry.find_source(id.source_key, identity).await? else {
            debug!(source = id.source_key, "detail requested for unavailable source");
            return Err(CatalogError::NotFound);
        };

        let client = self.registry.client_for(&source).map_err(|e| {
            warn!(source = %source.key, error = %e, "could not build client");
            CatalogError::LookupFailed
        })?;

        let owned_id = composite_id.to_string();
        let task = tokio::spawn(async move { client.get_detail(&owned_id).await });
        let abort = task.abort_handle();
        match timeout(Duration::from_millis(self.timeout_ms), task).await {
            Ok(Ok(Ok(Some(detail)))) => Ok(detail),
            Ok(Ok(Ok(None))) => Err(CatalogError::NotFound),
            Ok(Ok(Err(e))) => {
                warn!(
                    source = %source.key,
                    id = composite_id,
                    code = e.code_str(),
                    error = %e,
                    "detail lookup failed"
                );
                Err(CatalogError::LookupFailed)
            }
            Ok(Err(join_err)) => {
                warn!(
                    source = %source.key,
                    id = composite_id,
                    error = %join_err,
                    "detail task aborted"
                );
                Err(CatalogError::LookupFailed)
            }
            Err(_) => {
                abort.abort();
                warn!(
                    source = %source.key,
                    id = composite_id,
                    timeout_ms = self.timeout_ms,
                    "detail lookup timed out"
                );
                Err(CatalogError::LookupFailed)
            }
        }
    }
}
