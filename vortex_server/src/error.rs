use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{debug, error};
use vortex_core::CatalogError;

/// Startup and serving failures of the binary.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Handler error. Wraps a [`CatalogError`] and renders it without upstream
/// detail.
#[derive(Debug)]
pub struct ApiError(pub CatalogError);

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CatalogError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CatalogError::NotFound => StatusCode::NOT_FOUND,
            CatalogError::LookupFailed
            | CatalogError::Upstream(_)
            | CatalogError::UpstreamStatus(_)
            | CatalogError::HttpRequest(_)
            | CatalogError::SerdeJson(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            debug!(code = self.0.code_str(), "request rejected");
        } else {
            error!(code = self.0.code_str(), error = %self.0, "request failed");
        }
        (status, Json(self.0.to_public_json())).into_response()
    }
}
