use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectImages {
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub common: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
}

impl SubjectImages {
    pub fn best(&self) -> Option<String> {
        [&self.large, &self.common, &self.medium]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Entry of the legacy `/search/subject` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSubject {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_cn: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub images: Option<SubjectImages>,
    #[serde(default)]
    pub rating: Option<Rating>,
}

/// The search endpoint answers a miss with `{"code":404,...}` and no `list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Option<u64>,
    #[serde(default)]
    pub list: Option<Vec<SearchSubject>>,
}

/// `/v0/subjects/{id}` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_cn: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub images: Option<SubjectImages>,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub total_episodes: Option<u64>,
}

/// Prefer the Chinese title, falling back to the original one.
pub fn display_title(name_cn: Option<&str>, name: Option<&str>) -> Option<String> {
    [name_cn, name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Year prefix of a `YYYY-MM-DD` date.
pub fn year_of(date: Option<&str>) -> Option<String> {
    let year = date?.trim().get(..4)?;
    year.chars()
        .all(|c| c.is_ascii_digit())
        .then(|| year.to_string())
}
