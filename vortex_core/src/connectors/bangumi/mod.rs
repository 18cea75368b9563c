//! Bangumi (bgm.tv) anime database client.
//!
//! Metadata only: subjects carry titles, air dates and artwork but no
//! playable streams, so details from this source have no play sources.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::json;
use tracing::debug;

use crate::aggregate::{CatalogDetail, CatalogItem, Category, SearchQuery};
use crate::config::SourceConfig;
use crate::error::CatalogError;
use crate::identity::strip_source_prefix;
use crate::utils::{html_to_text, json_headers, non_empty, read_json};
use crate::SourceClient;

mod types;
pub use types::{SearchResponse, SearchSubject, Subject, SubjectImages};
use types::{display_title, year_of};

/// Subject type 2 is anime on bgm.tv.
const ANIME_SUBJECT_TYPE: &str = "2";

/// Whether a query's type filter can match anything here. Every subject is
/// anime, so any other category excludes this source.
fn admits_type(type_filter: Option<&str>) -> bool {
    match type_filter.map(str::trim) {
        None => true,
        Some(t) => {
            t.eq_ignore_ascii_case(Category::Anime.as_str())
                || t.parse::<i64>().map(Category::from_type_id) == Ok(Category::Anime)
        }
    }
}

/// The search API has no year parameter, so the year is checked against the
/// subject's air date.
fn matches_year(item: &CatalogItem, year: Option<&str>) -> bool {
    match year.map(str::trim) {
        None => true,
        Some(y) => item.year.as_deref() == Some(y),
    }
}

#[derive(Clone)]
pub struct BangumiClient {
    key: String,
    name: String,
    base_url: String,
    client: reqwest::Client,
    headers: HeaderMap,
}

impl BangumiClient {
    pub fn new(source: &SourceConfig, client: reqwest::Client) -> Self {
        Self {
            key: source.key.clone(),
            name: source.name.clone(),
            base_url: source.api.trim_end_matches('/').to_string(),
            client,
            headers: json_headers(),
        }
    }

    fn search_url(&self, keyword: &str) -> String {
        format!(
            "{}/search/subject/{}",
            self.base_url,
            urlencoding::encode(keyword)
        )
    }

    fn subject_url(&self, native_id: &str) -> String {
        format!(
            "{}/v0/subjects/{}",
            self.base_url,
            urlencoding::encode(native_id)
        )
    }

    fn to_item(&self, subject: &SearchSubject) -> Option<CatalogItem> {
        let title = display_title(subject.name_cn.as_deref(), subject.name.as_deref())?;
        let item = CatalogItem::new(&self.key, &self.name, subject.id.to_string(), title)
            .with_category(Category::Anime)
            .with_year(year_of(subject.air_date.as_deref()))
            .with_poster(subject.images.as_ref().and_then(SubjectImages::best))
            .with_extra(json!({
                "original_title": non_empty(subject.name.as_deref()),
                "summary": non_empty(subject.summary.as_deref()),
                "score": subject.rating.as_ref().and_then(|r| r.score),
            }));
        Some(item)
    }

    fn to_detail(&self, composite_id: &str, subject: &Subject) -> Option<CatalogDetail> {
        let title = display_title(subject.name_cn.as_deref(), subject.name.as_deref())?;
        Some(CatalogDetail {
            id: composite_id.to_string(),
            source: self.key.clone(),
            source_name: self.name.clone(),
            title,
            category: Some(Category::Anime),
            year: year_of(subject.date.as_deref()),
            poster: subject.images.as_ref().and_then(SubjectImages::best),
            description: subject
                .summary
                .as_deref()
                .map(html_to_text)
                .filter(|s| !s.is_empty()),
            actors: Vec::new(),
            directors: Vec::new(),
            area: None,
            language: None,
            remarks: subject
                .total_episodes
                .filter(|n| *n > 0)
                .map(|n| format!("{} episodes", n)),
            play_sources: Vec::new(),
        })
    }
}

#[async_trait]
impl SourceClient for BangumiClient {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogItem>, CatalogError> {
        if !admits_type(query.category()) {
            debug!(source = %self.key, category = query.category(), "type filter excludes bangumi");
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(self.search_url(query.keyword()))
            .headers(self.headers.clone())
            .query(&[("type", ANIME_SUBJECT_TYPE), ("responseGroup", "small")])
            .send()
            .await?;

        // A miss is reported as 404 by some mirrors
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let data = read_json::<SearchResponse>(response).await?;

        let items: Vec<CatalogItem> = data
            .list
            .unwrap_or_default()
            .iter()
            .filter_map(|s| self.to_item(s))
            .filter(|item| matches_year(item, query.year()))
            .collect();

        debug!(source = %self.key, keyword = query.keyword(), count = items.len(), "bangumi search");
        Ok(items)
    }

    async fn get_detail(&self, composite_id: &str) -> Result<Option<CatalogDetail>, CatalogError> {
        let native_id = strip_source_prefix(composite_id, &self.key);
        let response = self
            .client
            .get(self.subject_url(native_id))
            .headers(self.headers.clone())
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let subject = read_json::<Subject>(response).await?;
        Ok(self.to_detail(composite_id, &subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceKind;

    fn client() -> BangumiClient {
        let source = SourceConfig::new("bgm", "Bangumi", "https://api.bgm.tv/")
            .with_kind(SourceKind::Bangumi);
        BangumiClient::new(&source, reqwest::Client::new())
    }

    #[test]
    fn test_urls_encode_keyword() {
        let c = client();
        assert_eq!(
            c.search_url("cowboy bebop"),
            "https://api.bgm.tv/search/subject/cowboy%20bebop"
        );
        assert_eq!(c.subject_url("253"), "https://api.bgm.tv/v0/subjects/253");
    }

    #[test]
    fn test_search_subject_mapping() {
        let subject: SearchSubject = serde_json::from_value(json!({
            "id": 253,
            "name": "カウボーイビバップ",
            "name_cn": "星际牛仔",
            "air_date": "1998-10-23",
            "images": {"large": "https://lain.bgm.tv/l/253.jpg"},
            "rating": {"score": 9.1}
        }))
        .unwrap();

        let item = client().to_item(&subject).unwrap();
        assert_eq!(item.id, "bgm-253");
        assert_eq!(item.title, "星际牛仔");
        assert_eq!(item.year.as_deref(), Some("1998"));
        assert_eq!(item.category, Some(Category::Anime));
        assert_eq!(item.poster.as_deref(), Some("https://lain.bgm.tv/l/253.jpg"));
        assert_eq!(item.extra["score"], 9.1);
    }

    #[test]
    fn test_type_filter() {
        assert!(admits_type(None));
        assert!(admits_type(Some("3")));
        assert!(admits_type(Some(" anime ")));
        assert!(!admits_type(Some("1")));
        assert!(!admits_type(Some("2")));
        assert!(!admits_type(Some("movie")));
    }

    #[test]
    fn test_year_filter() {
        let item = CatalogItem::new("bgm", "Bangumi", "253", "Cowboy Bebop")
            .with_year(Some("1998".into()));
        assert!(matches_year(&item, None));
        assert!(matches_year(&item, Some("1998")));
        assert!(!matches_year(&item, Some("2021")));

        let undated = CatalogItem::new("bgm", "Bangumi", "1", "Untitled");
        assert!(!matches_year(&undated, Some("1998")));
    }

    #[test]
    fn test_detail_mapping() {
        let subject: Subject = serde_json::from_value(json!({
            "id": 253,
            "name": "Cowboy Bebop",
            "summary": "Bounty hunters<br>in space.",
            "date": "1998-04-03",
            "total_episodes": 26
        }))
        .unwrap();

        let detail = client().to_detail("bgm-253", &subject).unwrap();
        assert_eq!(detail.title, "Cowboy Bebop");
        assert_eq!(detail.description.as_deref(), Some("Bounty hunters\nin space."));
        assert_eq!(detail.remarks.as_deref(), Some("26 episodes"));
        assert!(detail.play_sources.is_empty());
    }
}
