#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vortex_core::{
    CatalogDetail, CatalogError, CatalogItem, ClientFactory, SearchQuery, SourceClient,
    SourceConfig, SourceRegistry, StaticSourceProvider,
};

/// Scripted behaviour of one fake source.
#[derive(Clone, Debug)]
pub enum Script {
    /// Return `n` items after `delay`
    Items { n: usize, delay: Duration },
    /// Fail after `delay`
    Fail { delay: Duration },
    /// Panic inside the call
    Panic,
}

impl Script {
    pub fn items(n: usize, delay_ms: u64) -> Self {
        Script::Items {
            n,
            delay: Duration::from_millis(delay_ms),
        }
    }

    pub fn fail(delay_ms: u64) -> Self {
        Script::Fail {
            delay: Duration::from_millis(delay_ms),
        }
    }
}

pub struct FakeClient {
    key: String,
    name: String,
    script: Script,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl SourceClient for FakeClient {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogItem>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Items { n, delay } => {
                tokio::time::sleep(*delay).await;
                Ok((0..*n)
                    .map(|i| {
                        CatalogItem::new(
                            &self.key,
                            &self.name,
                            format!("{}-{}", query.keyword(), i),
                            format!("{} #{}", self.name, i),
                        )
                    })
                    .collect())
            }
            Script::Fail { delay } => {
                tokio::time::sleep(*delay).await;
                Err(CatalogError::Upstream(format!(
                    "connection refused by {}.internal:9000",
                    self.key
                )))
            }
            Script::Panic => panic!("{} blew up", self.key),
        }
    }

    async fn get_detail(&self, composite_id: &str) -> Result<Option<CatalogDetail>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Items { n: 0, .. } => Ok(None),
            Script::Items { delay, .. } => {
                tokio::time::sleep(*delay).await;
                Ok(Some(CatalogDetail {
                    id: composite_id.to_string(),
                    source: self.key.clone(),
                    source_name: self.name.clone(),
                    title: format!("detail of {}", composite_id),
                    category: None,
                    year: None,
                    poster: None,
                    description: None,
                    actors: Vec::new(),
                    directors: Vec::new(),
                    area: None,
                    language: None,
                    remarks: None,
                    play_sources: Vec::new(),
                }))
            }
            Script::Fail { .. } => Err(CatalogError::Upstream("502 from upstream".into())),
            Script::Panic => panic!("{} blew up", self.key),
        }
    }
}

/// Builds fake clients from per-key scripts and counts calls per key.
#[derive(Default)]
pub struct FakeFactory {
    scripts: HashMap<String, Script>,
    pub calls: HashMap<String, Arc<AtomicUsize>>,
}

impl FakeFactory {
    pub fn with(mut self, key: &str, script: Script) -> Self {
        self.scripts.insert(key.to_string(), script);
        self.calls
            .insert(key.to_string(), Arc::new(AtomicUsize::new(0)));
        self
    }

    pub fn total_calls(&self) -> usize {
        self.calls.values().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    pub fn calls_for(&self, key: &str) -> usize {
        self.calls
            .get(key)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

impl ClientFactory for FakeFactory {
    fn create(&self, source: &SourceConfig) -> Result<Box<dyn SourceClient>, CatalogError> {
        let script = self
            .scripts
            .get(&source.key)
            .cloned()
            .ok_or_else(|| CatalogError::Config(format!("no script for {}", source.key)))?;
        let calls = self
            .calls
            .get(&source.key)
            .cloned()
            .unwrap_or_default();
        Ok(Box::new(FakeClient {
            key: source.key.clone(),
            name: source.name.clone(),
            script,
            calls,
        }))
    }
}

pub fn registry(sources: Vec<SourceConfig>, factory: Arc<FakeFactory>) -> SourceRegistry {
    SourceRegistry::new(Arc::new(StaticSourceProvider::new(sources)), factory)
}

pub fn source(key: &str, priority: i32) -> SourceConfig {
    SourceConfig::new(key, format!("Source {}", key), format!("https://{}.example", key.to_lowercase()))
        .with_priority(priority)
}
