use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Envelope returned by `?ac=videolist`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VodListResponse {
    /// 1 on success for most deployments
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub total: Option<i64>,
    #[serde(default)]
    pub list: Option<Vec<VodItem>>,
}

/// One `list` entry. Deployments disagree on whether numeric fields are
/// strings or numbers, so those go through the lenient deserializers below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VodItem {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub vod_id: Option<String>,
    #[serde(default)]
    pub vod_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub type_id: Option<i64>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub vod_pic: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub vod_year: Option<String>,
    #[serde(default)]
    pub vod_actor: Option<String>,
    #[serde(default)]
    pub vod_director: Option<String>,
    #[serde(default)]
    pub vod_area: Option<String>,
    #[serde(default)]
    pub vod_lang: Option<String>,
    #[serde(default)]
    pub vod_remarks: Option<String>,
    #[serde(default)]
    pub vod_content: Option<String>,
    #[serde(default)]
    pub vod_play_from: Option<String>,
    #[serde(default)]
    pub vod_play_url: Option<String>,
}

fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn de_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_numeric_fields() {
        let raw = json!({
            "code": 1,
            "total": "2",
            "list": [
                {"vod_id": 42, "vod_name": "A", "type_id": "2", "vod_year": 2019},
                {"vod_id": "x-9", "vod_name": "B", "type_id": 1, "vod_year": ""}
            ]
        });
        let parsed: VodListResponse = serde_json::from_value(raw).unwrap();
        let list = parsed.list.unwrap();
        assert_eq!(parsed.total, Some(2));
        assert_eq!(list[0].vod_id.as_deref(), Some("42"));
        assert_eq!(list[0].type_id, Some(2));
        assert_eq!(list[0].vod_year.as_deref(), Some("2019"));
        assert_eq!(list[1].vod_id.as_deref(), Some("x-9"));
        assert_eq!(list[1].vod_year, None);
    }

    #[test]
    fn test_missing_list_is_none() {
        let parsed: VodListResponse = serde_json::from_value(json!({"code": 0})).unwrap();
        assert!(parsed.list.is_none());
    }
}
