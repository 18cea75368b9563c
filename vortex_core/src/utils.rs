use crate::error::CatalogError;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|</p>").expect("valid break regex"));

pub fn clean_html_entities(text: &str) -> String {
    let mut cleaned = text.to_string();
    // Upstreams occasionally double-encode
    for _ in 0..2 {
        let decoded = html_escape::decode_html_entities(&cleaned).into_owned();
        if decoded == cleaned {
            break;
        }
        cleaned = decoded;
    }
    cleaned
}

/// Reduce an HTML fragment to plain text, keeping paragraph breaks.
pub fn html_to_text(html: &str) -> String {
    let with_breaks = BREAK_RE.replace_all(html, "\n");
    let stripped = TAG_RE.replace_all(&with_breaks, "");
    let decoded = clean_html_entities(&stripped);

    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split a comma separated people list (`"A,B, C"`), dropping blanks.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split([',', '，'])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Trimmed, non-empty copy of an optional upstream string.
pub fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Decode a successful upstream response, turning non-2xx statuses and
/// malformed bodies into errors.
pub async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, CatalogError> {
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::UpstreamStatus(status.as_u16()));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| {
        CatalogError::Upstream(format!("malformed payload ({} bytes): {}", body.len(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text() {
        let html = "<p>First &amp; best</p><p>Second<br/>line</p>";
        assert_eq!(html_to_text(html), "First & best\nSecond\nline");
    }

    #[test]
    fn test_html_to_text_mixed_case_breaks() {
        let html = "Line one<BR />Line two<Br >Line three</P>";
        assert_eq!(html_to_text(html), "Line one\nLine two\nLine three");
        // Repeated calls keep working
        assert_eq!(html_to_text("a<br>b"), "a\nb");
    }

    #[test]
    fn test_double_encoded_entities() {
        assert_eq!(clean_html_entities("Tom &amp;amp; Jerry"), "Tom & Jerry");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(Some("Alice, Bob,,Carol")),
            vec!["Alice", "Bob", "Carol"]
        );
        assert_eq!(split_list(Some("张三，李四")), vec!["张三", "李四"]);
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  x ")), Some("x".to_string()));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }
}
