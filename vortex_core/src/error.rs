// src/error.rs
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Lookup failed")]
    LookupFailed,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Upstream returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn code_str(&self) -> &'static str {
        match self {
            CatalogError::InvalidInput(_) => "invalid_input",
            CatalogError::NotFound => "not_found",
            CatalogError::LookupFailed => "lookup_failed",
            CatalogError::Upstream(_) => "upstream_error",
            CatalogError::UpstreamStatus(_) => "upstream_error",
            CatalogError::HttpRequest(_) => "upstream_error",
            CatalogError::SerdeJson(_) => "parse_error",
            CatalogError::Config(_) => "config_error",
            CatalogError::Io(_) => "internal_error",
            CatalogError::Internal(_) => "internal_error",
        }
    }

    /// True for errors caused by the caller's input rather than by an upstream
    /// or by this process.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CatalogError::InvalidInput(_) | CatalogError::NotFound)
    }

    /// Body suitable for returning to a caller.
    ///
    /// Upstream-derived variants collapse to a generic message so that no
    /// upstream detail crosses the boundary.
    pub fn to_public_json(&self) -> serde_json::Value {
        let message = match self {
            CatalogError::InvalidInput(msg) => msg.clone(),
            CatalogError::NotFound => "Not found".to_string(),
            CatalogError::LookupFailed
            | CatalogError::Upstream(_)
            | CatalogError::UpstreamStatus(_)
            | CatalogError::HttpRequest(_)
            | CatalogError::SerdeJson(_) => "Failed to fetch detail".to_string(),
            _ => "Internal server error".to_string(),
        };

        json!({
            "code": self.code_str(),
            "error": message,
        })
    }
}
