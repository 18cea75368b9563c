//! Aggregated search execution.
//!
//! Fans one query out to every source the caller may use, bounds each call
//! with its own timeout, waits for all of them to settle and merges the
//! survivors in priority order.

use super::types::{AggregatedResults, CallOutcome, SearchQuery, SourceProgress};
use crate::config::{SearchSettings, SourceConfig, DEFAULT_SEARCH_TIMEOUT_MS};
use crate::error::CatalogError;
use crate::registry::SourceRegistry;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Engine for aggregated searches across the caller's sources.
#[derive(Clone)]
pub struct CatalogSearch {
    registry: SourceRegistry,
    timeout_ms: u64,
}

impl CatalogSearch {
    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            registry,
            timeout_ms: DEFAULT_SEARCH_TIMEOUT_MS,
        }
    }

    pub fn with_settings(registry: SourceRegistry, settings: &SearchSettings) -> Self {
        Self {
            registry,
            timeout_ms: settings.timeout_ms,
        }
    }

    /// Per-source timeout used when a source has no override.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Search every source available to `identity` and merge the results.
    ///
    /// Returns only after all sources have succeeded, failed or timed out.
    /// Failing sources contribute nothing and are only visible through
    /// `partial`; their errors are logged.
    pub async fn search_all(
        &self,
        query: &SearchQuery,
        identity: Option<&str>,
    ) -> Result<AggregatedResults, CatalogError> {
        self.execute(query, identity, None).await
    }

    /// Same as [`search_all`](Self::search_all), additionally reporting each
    /// source on `progress` as it settles. A dropped receiver is ignored.
    pub async fn search_all_with_progress(
        &self,
        query: &SearchQuery,
        identity: Option<&str>,
        progress: UnboundedSender<SourceProgress>,
    ) -> Result<AggregatedResults, CatalogError> {
        self.execute(query, identity, Some(progress)).await
    }

    async fn execute(
        &self,
        query: &SearchQuery,
        identity: Option<&str>,
        progress: Option<UnboundedSender<SourceProgress>>,
    ) -> Result<AggregatedResults, CatalogError> {
        let start = Instant::now();
        let mut result = AggregatedResults::empty(query.keyword());

        let sources = self.registry.resolve_available_sources(identity).await?;
        if sources.is_empty() {
            debug!(keyword = query.keyword(), "no sources available");
            result.duration_ms = Some(start.elapsed().as_millis() as u64);
            return Ok(result);
        }

        // One future per source; join_all keeps source order, which is
        // already priority order. A timed-out call has its task aborted.
        let futures: Vec<_> = sources
            .iter()
            .map(|source| {
                let source = source.clone();
                let query = query.clone();
                let progress = progress.clone();
                let timeout_ms = source.timeout_ms.unwrap_or(self.timeout_ms);
                let client = self.registry.client_for(&source);

                async move {
                    let call_start = Instant::now();
                    let outcome = match client {
                        Ok(client) => {
                            // Own task per source so a panicking client only
                            // fails itself.
                            let task = tokio::spawn(async move { client.search(&query).await });
                            let abort = task.abort_handle();
                            match timeout(Duration::from_millis(timeout_ms), task).await {
                                Ok(Ok(Ok(items))) => CallOutcome::Succeeded(items),
                                Ok(Ok(Err(e))) => CallOutcome::Failed(e),
                                Ok(Err(join_err)) => CallOutcome::Failed(CatalogError::Internal(
                                    format!("source task aborted: {}", join_err),
                                )),
                                Err(_) => {
                                    abort.abort();
                                    CallOutcome::TimedOut
                                }
                            }
                        }
                        Err(e) => CallOutcome::Failed(e),
                    };

                    log_outcome(&source, &outcome, timeout_ms, call_start);

                    if let Some(tx) = progress {
                        let _ = tx.send(SourceProgress {
                            source: source.key.clone(),
                            name: source.name.clone(),
                            status: outcome.status(),
                            count: outcome.item_count(),
                        });
                    }

                    (source.key, outcome)
                }
            })
            .collect();

        let outcomes = futures::future::join_all(futures).await;

        for (key, outcome) in outcomes {
            result.add_outcome(&key, outcome);
        }

        result.duration_ms = Some(start.elapsed().as_millis() as u64);
        info!(
            keyword = query.keyword(),
            sources = sources.len(),
            completed = result.completed.len(),
            total = result.total,
            duration_ms = result.duration_ms,
            "aggregated search finished"
        );
        Ok(result)
    }
}

fn log_outcome(source: &SourceConfig, outcome: &CallOutcome, timeout_ms: u64, start: Instant) {
    let elapsed_ms = start.elapsed().as_millis() as u64;
    match outcome {
        CallOutcome::Succeeded(items) => debug!(
            source = %source.key,
            count = items.len(),
            elapsed_ms,
            "source search succeeded"
        ),
        CallOutcome::Failed(e) => warn!(
            source = %source.key,
            code = e.code_str(),
            error = %e,
            elapsed_ms,
            "source search failed"
        ),
        CallOutcome::TimedOut => warn!(
            source = %source.key,
            timeout_ms,
            "source search timed out"
        ),
    }
}
