//! Core types for aggregated catalog search.

use crate::error::CatalogError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Broad category of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Movie,
    Tv,
    Anime,
    Variety,
    Documentary,
}

impl Category {
    /// Map an Apple CMS `type_id` onto a category. Unknown ids are movies.
    pub fn from_type_id(type_id: i64) -> Self {
        match type_id {
            2 => Category::Tv,
            3 => Category::Anime,
            4 => Category::Variety,
            5 => Category::Documentary,
            _ => Category::Movie,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Movie => "movie",
            Category::Tv => "tv",
            Category::Anime => "anime",
            Category::Variety => "variety",
            Category::Documentary => "documentary",
        }
    }
}

/// A normalized search query.
///
/// Only constructible through [`SearchQuery::new`], so a value of this type
/// always carries a non-empty keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    keyword: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<String>,
}

impl SearchQuery {
    /// Build a query, trimming the keyword and rejecting an empty one.
    pub fn new(keyword: impl AsRef<str>) -> Result<Self, CatalogError> {
        let keyword = keyword.as_ref().trim();
        if keyword.is_empty() {
            return Err(CatalogError::InvalidInput(
                "Keyword is required".to_string(),
            ));
        }
        Ok(Self {
            keyword: keyword.to_string(),
            category: None,
            year: None,
        })
    }

    /// Restrict to an upstream category id. Blank values are ignored.
    pub fn with_type(mut self, category: Option<String>) -> Self {
        self.category = category.filter(|s| !s.trim().is_empty());
        self
    }

    /// Restrict to a release year. Blank values are ignored.
    pub fn with_year(mut self, year: Option<String>) -> Self {
        self.year = year.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }
}

/// A normalized search result from any source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Composite identity, `"<source>-<native_id>"`.
    pub id: String,

    /// Key of the source that produced this item
    pub source: String,

    /// Human-readable source name
    pub source_name: String,

    /// Identifier within the source
    pub native_id: String,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,

    /// Poster/cover image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,

    /// Source-specific fields carried through untouched.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub extra: Value,
}

impl CatalogItem {
    pub fn new(
        source: impl Into<String>,
        source_name: impl Into<String>,
        native_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let source = source.into();
        let native_id = native_id.into();
        Self {
            id: crate::identity::CompositeId::format(&source, &native_id),
            source,
            source_name: source_name.into(),
            native_id,
            title: title.into(),
            category: None,
            year: None,
            poster: None,
            extra: Value::Null,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_year(mut self, year: Option<String>) -> Self {
        self.year = year;
        self
    }

    pub fn with_poster(mut self, poster: Option<String>) -> Self {
        self.poster = poster.filter(|p| !p.is_empty());
        self
    }

    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = extra;
        self
    }
}

/// One playable episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub name: String,
    pub url: String,
}

/// A named group of episodes (one upstream "line").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaySource {
    pub name: String,
    pub episodes: Vec<Episode>,
}

/// Full detail payload for one catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDetail {
    pub id: String,
    pub source: String,
    pub source_name: String,
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actors: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directors: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,

    #[serde(default)]
    pub play_sources: Vec<PlaySource>,
}

/// Terminal state of one source's call within an aggregated request.
#[derive(Debug)]
pub(crate) enum CallOutcome {
    Succeeded(Vec<CatalogItem>),
    Failed(CatalogError),
    TimedOut,
}

impl CallOutcome {
    pub(crate) fn status(&self) -> SourceStatus {
        match self {
            CallOutcome::Succeeded(_) => SourceStatus::Ok,
            CallOutcome::Failed(_) => SourceStatus::Failed,
            CallOutcome::TimedOut => SourceStatus::Timeout,
        }
    }

    pub(crate) fn item_count(&self) -> usize {
        match self {
            CallOutcome::Succeeded(items) => items.len(),
            _ => 0,
        }
    }
}

/// Caller-visible settlement status of a source, without error detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Ok,
    Failed,
    Timeout,
}

/// Emitted once per source as it settles when progress reporting is on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceProgress {
    pub source: String,
    pub name: String,
    pub status: SourceStatus,
    pub count: usize,
}

/// Merged result of one aggregated search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResults {
    /// The keyword searched for
    pub query: String,

    /// Items ordered by source priority, then upstream order
    pub items: Vec<CatalogItem>,

    pub total: usize,

    /// Keys of the sources that settled successfully, in priority order
    pub completed: Vec<String>,

    /// Whether any permitted source failed or timed out
    #[serde(default)]
    pub partial: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    pub generated_at: DateTime<Utc>,
}

impl AggregatedResults {
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            items: Vec::new(),
            total: 0,
            completed: Vec::new(),
            partial: false,
            duration_ms: None,
            generated_at: Utc::now(),
        }
    }

    /// Append one settled source. Items are only merged for successes.
    pub(crate) fn add_outcome(&mut self, source: &str, outcome: CallOutcome) {
        match outcome {
            CallOutcome::Succeeded(items) => {
                self.total += items.len();
                self.items.extend(items);
                self.completed.push(source.to_string());
            }
            CallOutcome::Failed(_) | CallOutcome::TimedOut => {
                self.partial = true;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_rejects_blank_keyword() {
        assert!(matches!(
            SearchQuery::new(""),
            Err(CatalogError::InvalidInput(_))
        ));
        assert!(matches!(
            SearchQuery::new("   \t"),
            Err(CatalogError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_query_trims_and_drops_blank_filters() {
        let q = SearchQuery::new("  spirited away ")
            .unwrap()
            .with_type(Some(" ".to_string()))
            .with_year(Some("2001".to_string()));
        assert_eq!(q.keyword(), "spirited away");
        assert_eq!(q.category(), None);
        assert_eq!(q.year(), Some("2001"));
    }

    #[test]
    fn test_item_builder_sets_composite_id() {
        let item = CatalogItem::new("src1", "Source One", "abc-123", "Title")
            .with_category(Category::Tv)
            .with_poster(Some(String::new()))
            .with_extra(json!({"remarks": "HD"}));

        assert_eq!(item.id, "src1-abc-123");
        assert_eq!(item.native_id, "abc-123");
        assert_eq!(item.category, Some(Category::Tv));
        assert_eq!(item.poster, None);
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(Category::from_type_id(1), Category::Movie);
        assert_eq!(Category::from_type_id(3), Category::Anime);
        assert_eq!(Category::from_type_id(42), Category::Movie);
        assert_eq!(Category::Documentary.as_str(), "documentary");
    }

    #[test]
    fn test_add_outcome_skips_failed_sources() {
        let mut results = AggregatedResults::empty("q");
        results.add_outcome(
            "a",
            CallOutcome::Succeeded(vec![CatalogItem::new("a", "A", "1", "One")]),
        );
        results.add_outcome("b", CallOutcome::TimedOut);
        results.add_outcome(
            "c",
            CallOutcome::Failed(CatalogError::Upstream("boom".into())),
        );

        assert_eq!(results.total, 1);
        assert_eq!(results.completed, vec!["a".to_string()]);
        assert!(results.partial);
    }

    #[test]
    fn test_serialization_omits_error_detail() {
        let mut results = AggregatedResults::empty("q");
        results.add_outcome(
            "b",
            CallOutcome::Failed(CatalogError::Upstream("secret-host:9000".into())),
        );
        let json = serde_json::to_string(&results).unwrap();
        assert!(!json.contains("secret-host"));
        assert!(json.contains("\"partial\":true"));
    }
}
