//! Catalog configuration.
//!
//! Holds the server settings, search timeouts and the list of upstream
//! sources. Everything has sensible defaults; a missing config file yields an
//! empty source list rather than an error.

use crate::error::CatalogError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ============================================================================
// Default Values
// ============================================================================

/// Default per-source search timeout in milliseconds
pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 8000;

/// Default detail lookup timeout in milliseconds
pub const DEFAULT_DETAIL_TIMEOUT_MS: u64 = 10000;

/// Default listen address for the HTTP server
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "VORTEX_CONFIG";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

static SOURCE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid source key regex"));

// ============================================================================
// Source configuration
// ============================================================================

/// Which client family talks to a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Apple CMS v10 JSON API (`?ac=videolist`)
    #[default]
    #[serde(alias = "applev10")]
    AppleCms,
    /// bgm.tv subject search API
    Bangumi,
}

/// Which callers may query a source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessScope {
    /// Anyone, including anonymous callers
    #[default]
    Public,
    /// Any identified caller
    Authenticated,
    /// Only the listed identities
    Users(Vec<String>),
}

impl AccessScope {
    pub fn admits(&self, identity: Option<&str>) -> bool {
        match (self, identity) {
            (AccessScope::Public, _) => true,
            (AccessScope::Authenticated, Some(_)) => true,
            (AccessScope::Users(users), Some(who)) => users.iter().any(|u| u == who),
            (_, None) => false,
        }
    }
}

/// Identity and settings of one upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Short unique key, also the composite-id prefix
    pub key: String,

    /// Human-readable name
    pub name: String,

    /// Base endpoint
    pub api: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Lower values are queried and merged first
    #[serde(default)]
    pub priority: i32,

    #[serde(default)]
    pub scope: AccessScope,

    #[serde(default)]
    pub kind: SourceKind,

    /// Overrides the global per-source search timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

fn default_enabled() -> bool {
    true
}

impl SourceConfig {
    pub fn new(key: impl Into<String>, name: impl Into<String>, api: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            api: api.into(),
            enabled: true,
            priority: 0,
            scope: AccessScope::Public,
            kind: SourceKind::AppleCms,
            timeout_ms: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_scope(mut self, scope: AccessScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if !SOURCE_KEY_RE.is_match(&self.key) {
            return Err(CatalogError::Config(format!(
                "source key '{}' must be non-empty and use only letters, digits and '_'",
                self.key
            )));
        }

        let url = url::Url::parse(&self.api).map_err(|e| {
            CatalogError::Config(format!("source '{}' has invalid api url: {}", self.key, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CatalogError::Config(format!(
                "source '{}' api must be http or https",
                self.key
            )));
        }

        if self.timeout_ms == Some(0) {
            return Err(CatalogError::Config(format!(
                "source '{}' timeout_ms must be positive",
                self.key
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Server / search settings
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Per-source search timeout (ms)
    #[serde(default = "default_search_timeout_ms")]
    pub timeout_ms: u64,

    /// Detail lookup timeout (ms)
    #[serde(default = "default_detail_timeout_ms")]
    pub detail_timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_search_timeout_ms() -> u64 {
    DEFAULT_SEARCH_TIMEOUT_MS
}

fn default_detail_timeout_ms() -> u64 {
    DEFAULT_DETAIL_TIMEOUT_MS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_SEARCH_TIMEOUT_MS,
            detail_timeout_ms: DEFAULT_DETAIL_TIMEOUT_MS,
            user_agent: default_user_agent(),
        }
    }
}

// ============================================================================
// CatalogConfig
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

impl CatalogConfig {
    /// Default config path: `~/.config/vortex/config.toml`.
    pub fn default_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("vortex").join("config.toml")
    }

    /// Resolve and load the active configuration.
    ///
    /// Resolution order:
    /// 1. `explicit` path (must exist)
    /// 2. `$VORTEX_CONFIG` (must exist)
    /// 3. default path (optional)
    pub fn discover(explicit: Option<&Path>) -> Result<Self, CatalogError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Self::load(Path::new(&path));
            }
        }

        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using built-in defaults");
            Ok(Self::default())
        }
    }

    /// Load from a TOML or YAML file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            _ => Self::from_toml_str(&content)?,
        };
        tracing::info!(
            path = %path.display(),
            sources = config.sources.len(),
            "loaded catalog config"
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CatalogError::Config(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| CatalogError::Config(format!("invalid YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.search.timeout_ms == 0 || self.search.detail_timeout_ms == 0 {
            return Err(CatalogError::Config(
                "search timeouts must be positive".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            source.validate()?;
            if !seen.insert(source.key.as_str()) {
                return Err(CatalogError::Config(format!(
                    "duplicate source key '{}'",
                    source.key
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[server]
bind_addr = "127.0.0.1:8080"

[search]
timeout_ms = 5000

[[sources]]
key = "ffzy"
name = "Fei Fan"
api = "https://cj.ffzyapi.com/api.php/provide/vod"
priority = 2

[[sources]]
key = "bgm"
name = "Bangumi"
api = "https://api.bgm.tv"
kind = "bangumi"
priority = 1
scope = { users = ["alice"] }
timeout_ms = 12000
"#;

    #[test]
    fn test_parse_toml() {
        let config = CatalogConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.search.timeout_ms, 5000);
        assert_eq!(config.search.detail_timeout_ms, DEFAULT_DETAIL_TIMEOUT_MS);
        assert_eq!(config.sources.len(), 2);

        let ffzy = &config.sources[0];
        assert!(ffzy.enabled);
        assert_eq!(ffzy.kind, SourceKind::AppleCms);
        assert_eq!(ffzy.scope, AccessScope::Public);

        let bgm = &config.sources[1];
        assert_eq!(bgm.kind, SourceKind::Bangumi);
        assert_eq!(bgm.scope, AccessScope::Users(vec!["alice".to_string()]));
        assert_eq!(bgm.timeout_ms, Some(12000));
    }

    #[test]
    fn test_parse_yaml_with_legacy_kind() {
        let yaml = r#"
sources:
  - key: example1
    name: Example
    api: https://example.com/api
    kind: applev10
    scope: authenticated
"#;
        let config = CatalogConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.sources[0].kind, SourceKind::AppleCms);
        assert_eq!(config.sources[0].scope, AccessScope::Authenticated);
        assert_eq!(config.server.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn test_rejects_hyphenated_key() {
        let toml = r#"
[[sources]]
key = "my-source"
name = "Bad"
api = "https://example.com"
"#;
        let err = CatalogConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn test_rejects_duplicate_keys_and_bad_urls() {
        let mut config = CatalogConfig::default();
        config.sources.push(SourceConfig::new("a", "A", "https://a.example"));
        config.sources.push(SourceConfig::new("a", "A2", "https://b.example"));
        assert!(config.validate().is_err());

        let mut config = CatalogConfig::default();
        config.sources.push(SourceConfig::new("a", "A", "ftp://a.example"));
        assert!(config.validate().is_err());

        let mut config = CatalogConfig::default();
        config.sources.push(SourceConfig::new("a", "A", "not a url"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scope_admission() {
        assert!(AccessScope::Public.admits(None));
        assert!(AccessScope::Public.admits(Some("bob")));
        assert!(!AccessScope::Authenticated.admits(None));
        assert!(AccessScope::Authenticated.admits(Some("bob")));

        let users = AccessScope::Users(vec!["alice".to_string()]);
        assert!(users.admits(Some("alice")));
        assert!(!users.admits(Some("bob")));
        assert!(!users.admits(None));
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("vortex-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = CatalogConfig::discover(Some(&path)).unwrap();
        assert_eq!(config.sources.len(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }
}
