//! Apple CMS v10 client.
//!
//! The most common catalog API among community video sites. Search and detail
//! both go through `?ac=videolist`, with `wd` for keyword search and `ids`
//! for a direct lookup.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::json;
use tracing::debug;

use crate::aggregate::{CatalogDetail, CatalogItem, Category, Episode, PlaySource, SearchQuery};
use crate::config::SourceConfig;
use crate::error::CatalogError;
use crate::identity::strip_source_prefix;
use crate::utils::{html_to_text, json_headers, non_empty, read_json, split_list};
use crate::SourceClient;

mod types;
pub use types::{VodItem, VodListResponse};

const GROUP_SEPARATOR: &str = "$$$";
const EPISODE_SEPARATOR: char = '#';
const NAME_URL_SEPARATOR: char = '$';

#[derive(Clone)]
pub struct AppleCmsClient {
    key: String,
    name: String,
    base_url: String,
    client: reqwest::Client,
    headers: HeaderMap,
}

impl AppleCmsClient {
    pub fn new(source: &SourceConfig, client: reqwest::Client) -> Self {
        Self {
            key: source.key.clone(),
            name: source.name.clone(),
            base_url: source.api.trim_end_matches('/').to_string(),
            client,
            headers: json_headers(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/", self.base_url)
    }

    async fn fetch_list(&self, params: &[(&str, &str)]) -> Result<VodListResponse, CatalogError> {
        let response = self
            .client
            .get(self.endpoint())
            .headers(self.headers.clone())
            .query(params)
            .send()
            .await?;

        read_json::<VodListResponse>(response).await
    }

    fn to_item(&self, vod: &VodItem) -> Option<CatalogItem> {
        let native_id = vod.vod_id.as_deref()?;
        let title = non_empty(vod.vod_name.as_deref())?;
        let play_sources = parse_play_sources(vod.vod_play_from.as_deref(), vod.vod_play_url.as_deref());

        let item = CatalogItem::new(&self.key, &self.name, native_id, title)
            .with_category(Category::from_type_id(vod.type_id.unwrap_or(0)))
            .with_year(vod.vod_year.clone())
            .with_poster(non_empty(vod.vod_pic.as_deref()))
            .with_extra(json!({
                "remarks": non_empty(vod.vod_remarks.as_deref()),
                "area": non_empty(vod.vod_area.as_deref()),
                "language": non_empty(vod.vod_lang.as_deref()),
                "actors": split_list(vod.vod_actor.as_deref()),
                "directors": split_list(vod.vod_director.as_deref()),
                "play_sources": play_sources,
            }));
        Some(item)
    }

    fn to_detail(&self, composite_id: &str, vod: &VodItem) -> Option<CatalogDetail> {
        let title = non_empty(vod.vod_name.as_deref())?;
        Some(CatalogDetail {
            id: composite_id.to_string(),
            source: self.key.clone(),
            source_name: self.name.clone(),
            title,
            category: Some(Category::from_type_id(vod.type_id.unwrap_or(0))),
            year: vod.vod_year.clone(),
            poster: non_empty(vod.vod_pic.as_deref()),
            description: vod
                .vod_content
                .as_deref()
                .map(html_to_text)
                .filter(|s| !s.is_empty()),
            actors: split_list(vod.vod_actor.as_deref()),
            directors: split_list(vod.vod_director.as_deref()),
            area: non_empty(vod.vod_area.as_deref()),
            language: non_empty(vod.vod_lang.as_deref()),
            remarks: non_empty(vod.vod_remarks.as_deref()),
            play_sources: parse_play_sources(
                vod.vod_play_from.as_deref(),
                vod.vod_play_url.as_deref(),
            ),
        })
    }
}

#[async_trait]
impl SourceClient for AppleCmsClient {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogItem>, CatalogError> {
        let mut params = vec![("ac", "videolist"), ("wd", query.keyword())];
        if let Some(category) = query.category() {
            params.push(("type", category));
        }
        if let Some(year) = query.year() {
            params.push(("year", year));
        }

        let data = self.fetch_list(&params).await?;
        let list = data.list.unwrap_or_default();
        let returned = list.len();

        // Entries without a playable episode are useless to callers
        let items: Vec<CatalogItem> = list
            .iter()
            .filter_map(|vod| self.to_item(vod))
            .filter(has_playable_episode)
            .collect();

        debug!(
            source = %self.key,
            keyword = query.keyword(),
            returned,
            kept = items.len(),
            "apple cms search"
        );
        Ok(items)
    }

    async fn get_detail(&self, composite_id: &str) -> Result<Option<CatalogDetail>, CatalogError> {
        let native_id = strip_source_prefix(composite_id, &self.key);
        let result = self
            .fetch_list(&[("ac", "videolist"), ("ids", native_id)])
            .await;

        let data = match result {
            Ok(data) => data,
            Err(CatalogError::UpstreamStatus(code)) if code == StatusCode::NOT_FOUND.as_u16() => {
                return Ok(None)
            }
            Err(e) => return Err(e),
        };

        Ok(data
            .list
            .unwrap_or_default()
            .first()
            .and_then(|vod| self.to_detail(composite_id, vod)))
    }
}

fn has_playable_episode(item: &CatalogItem) -> bool {
    item.extra
        .get("play_sources")
        .and_then(|v| v.as_array())
        .map(|sources| {
            sources.iter().any(|s| {
                s.get("episodes")
                    .and_then(|e| e.as_array())
                    .map(|e| !e.is_empty())
                    .unwrap_or(false)
            })
        })
        .unwrap_or(false)
}

/// Parse `vod_play_url` into play sources.
///
/// Grammar: lines separated by `$$$`, episodes by `#`, and an episode is
/// either `name$url` or a bare url. Line names come from the matching
/// `vod_play_from` segment. Only HLS (`.m3u8`) episodes are kept and lines
/// left without episodes are dropped.
pub fn parse_play_sources(play_from: Option<&str>, play_url: Option<&str>) -> Vec<PlaySource> {
    let Some(play_url) = play_url.filter(|s| !s.trim().is_empty()) else {
        return Vec::new();
    };
    let names: Vec<&str> = play_from
        .map(|f| f.split(GROUP_SEPARATOR).collect())
        .unwrap_or_default();

    play_url
        .split(GROUP_SEPARATOR)
        .enumerate()
        .filter_map(|(idx, group)| {
            let episodes = parse_episodes(group);
            if episodes.is_empty() {
                return None;
            }
            let name = names
                .get(idx)
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Line {}", idx + 1));
            Some(PlaySource { name, episodes })
        })
        .collect()
}

fn parse_episodes(group: &str) -> Vec<Episode> {
    let mut episodes = Vec::new();
    for raw in group.split(EPISODE_SEPARATOR) {
        let raw = raw.trim();
        if raw.is_empty() || !raw.contains(".m3u8") {
            continue;
        }

        let (name, url) = match raw.rfind(NAME_URL_SEPARATOR) {
            Some(idx) if idx > 0 => (raw[..idx].trim(), raw[idx + 1..].trim()),
            _ => ("", raw),
        };
        if url.is_empty() {
            continue;
        }

        let name = if name.is_empty() {
            format!("Episode {}", episodes.len() + 1)
        } else {
            name.to_string()
        };
        episodes.push(Episode {
            name,
            url: url.to_string(),
        });
    }
    episodes
}
