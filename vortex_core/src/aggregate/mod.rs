//! Aggregated catalog search across many sources.

mod engine;
mod types;

pub use engine::CatalogSearch;
pub use types::{
    AggregatedResults, CatalogDetail, CatalogItem, Category, Episode, PlaySource, SearchQuery,
    SourceProgress, SourceStatus,
};
