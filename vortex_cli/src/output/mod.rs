use crate::cli::OutputFormat;
use crate::commands::Result;
use serde_json::Value;
use vortex_core::{AggregatedResults, CatalogDetail, SourceConfig};

mod pretty;

#[derive(Debug, Clone)]
pub enum OutputData {
    SearchResults {
        results: AggregatedResults,
        limit: usize,
    },
    Detail(CatalogDetail),
    Sources(Vec<SourceConfig>),
    ConfigInfo(Value),
}

pub fn format_output(data: &OutputData, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&payload(data)?)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&payload(data)?)?);
        }
        OutputFormat::Text => format_text_output(data)?,
        OutputFormat::Pretty => pretty::format_pretty_output(data)?,
    }
    Ok(())
}

/// Machine-readable payload. Source endpoints are left out of listings.
fn payload(data: &OutputData) -> Result<Value> {
    Ok(match data {
        OutputData::SearchResults { results, .. } => serde_json::to_value(results)?,
        OutputData::Detail(detail) => serde_json::to_value(detail)?,
        OutputData::Sources(sources) => Value::Array(
            sources
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "key": s.key,
                        "name": s.name,
                        "priority": s.priority,
                    })
                })
                .collect(),
        ),
        OutputData::ConfigInfo(value) => value.clone(),
    })
}

fn format_text_output(data: &OutputData) -> Result<()> {
    match data {
        OutputData::SearchResults { results, .. } => {
            for item in &results.items {
                let year = item.year.as_deref().unwrap_or("-");
                println!("{}\t{}\t{}\t{}", item.id, item.source_name, year, item.title);
            }
        }
        OutputData::Detail(detail) => {
            println!("{}\t{}", detail.id, detail.title);
            for source in &detail.play_sources {
                for episode in &source.episodes {
                    println!("{}\t{}\t{}", source.name, episode.name, episode.url);
                }
            }
        }
        OutputData::Sources(sources) => {
            for source in sources {
                println!("{}\t{}\t{}", source.priority, source.key, source.name);
            }
        }
        OutputData::ConfigInfo(value) => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_payload_omits_endpoints() {
        let data = OutputData::Sources(vec![SourceConfig::new(
            "ffzy",
            "Fei Fan",
            "https://secret.example/api",
        )]);
        let value = payload(&data).unwrap();
        assert_eq!(value[0]["key"], "ffzy");
        assert!(!value.to_string().contains("secret.example"));
    }
}
