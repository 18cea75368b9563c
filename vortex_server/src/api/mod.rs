//! HTTP API
//!
//! - `GET /api/search` streaming aggregated search
//! - `GET /api/detail` single entry by composite id
//! - `GET /api/sources` sources available to the caller
//! - `GET /health`

pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{create_router, run, AppState};
