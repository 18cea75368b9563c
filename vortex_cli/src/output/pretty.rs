//! Pretty formatter for terminal output.
//!
//! Search results print as numbered cards grouped under a header per
//! source, details as a short profile followed by the episode lists, and
//! source listings as a table.

use super::OutputData;
use crate::commands::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use vortex_core::{AggregatedResults, CatalogDetail, CatalogItem, SourceConfig};

/// Terminal width for formatting (default fallback)
const DEFAULT_WIDTH: usize = 80;

/// Indent for card content (after number)
const CARD_INDENT: usize = 6;

/// Episodes shown per line before eliding
const MAX_EPISODES_SHOWN: usize = 12;

pub fn format_pretty_output(data: &OutputData) -> Result<()> {
    match data {
        OutputData::SearchResults { results, limit } => print_search_results(results, *limit),
        OutputData::Detail(detail) => print_detail(detail),
        OutputData::Sources(sources) => print_sources(sources),
        OutputData::ConfigInfo(value) => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }
    Ok(())
}

fn print_search_results(results: &AggregatedResults, limit: usize) {
    let width = terminal_width();

    println!();
    println!("{} {}", "Search:".bold().cyan(), results.query.yellow());
    println!();

    if results.items.is_empty() {
        println!("   {}", "No results".dimmed());
        println!();
        return;
    }

    let visible = &results.items[..results.items.len().min(limit)];
    let mut shown = 0;
    let mut current_source: Option<&str> = None;
    for item in visible {
        if current_source != Some(item.source.as_str()) {
            if current_source.is_some() {
                println!();
            }
            let count = shown_for_source(visible, &item.source);
            println!("{}", format_section_header(&item.source_name, Some(count), width));
            println!();
            current_source = Some(item.source.as_str());
        }
        shown += 1;
        print!("{}", format_card(item, shown, width));
    }

    println!();
    let mut footer = format!(
        "{} of {} results from {} sources",
        shown,
        results.total,
        results.completed.len()
    );
    if let Some(ms) = results.duration_ms {
        footer.push_str(&format!(" in {}ms", ms));
    }
    println!("{}", footer.dimmed());
    println!();
}

/// Cards printed for `source`, after the limit has been applied.
fn shown_for_source(visible: &[CatalogItem], source: &str) -> usize {
    visible.iter().filter(|i| i.source == source).count()
}

fn format_card(item: &CatalogItem, index: usize, width: usize) -> String {
    let mut output = String::new();
    let content_width = width.saturating_sub(CARD_INDENT + 2).max(20);

    output.push_str(&format!(
        " {:>3}. {}\n",
        index.to_string().cyan().bold(),
        truncate_str(&item.title, content_width).bold()
    ));

    let mut meta = Vec::new();
    if let Some(category) = item.category {
        meta.push(category.as_str().to_string());
    }
    if let Some(year) = &item.year {
        meta.push(year.clone());
    }
    if let Some(remarks) = item.extra.get("remarks").and_then(|v| v.as_str()) {
        meta.push(remarks.to_string());
    }
    meta.push(item.id.clone());
    output.push_str(&format!(
        "{}{}\n",
        " ".repeat(CARD_INDENT),
        meta.join(" · ").dimmed()
    ));

    output
}

fn print_detail(detail: &CatalogDetail) {
    let width = terminal_width();

    println!();
    println!("{}", detail.title.bold().cyan());

    let mut meta = vec![detail.source_name.clone()];
    if let Some(category) = detail.category {
        meta.push(category.as_str().to_string());
    }
    meta.extend(detail.year.iter().cloned());
    meta.extend(detail.area.iter().cloned());
    meta.extend(detail.language.iter().cloned());
    meta.extend(detail.remarks.iter().cloned());
    println!("{}", meta.join(" · ").dimmed());
    println!();

    if !detail.directors.is_empty() {
        println!("{} {}", "Directors:".bold(), detail.directors.join(", "));
    }
    if !detail.actors.is_empty() {
        println!("{} {}", "Cast:".bold(), detail.actors.join(", "));
    }
    if let Some(poster) = &detail.poster {
        println!("{} {}", "Poster:".bold(), poster.blue());
    }

    if let Some(description) = &detail.description {
        println!();
        let wrap_width = width.saturating_sub(4).clamp(20, 100);
        for line in textwrap::wrap(description, wrap_width) {
            println!("  {}", line);
        }
    }

    println!();
    if detail.play_sources.is_empty() {
        println!("   {}", "No playable episodes".dimmed());
    }
    for source in &detail.play_sources {
        println!(
            "{}",
            format_section_header(&source.name, Some(source.episodes.len()), width)
        );
        for episode in source.episodes.iter().take(MAX_EPISODES_SHOWN) {
            println!("  {:<12} {}", episode.name, episode.url.dimmed());
        }
        if source.episodes.len() > MAX_EPISODES_SHOWN {
            println!(
                "  {}",
                format!("... {} more", source.episodes.len() - MAX_EPISODES_SHOWN).dimmed()
            );
        }
        println!();
    }
}

fn print_sources(sources: &[SourceConfig]) {
    if sources.is_empty() {
        println!("{}", "No sources available.".yellow());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Priority".cyan().bold().to_string()),
        Cell::new("Key".cyan().bold().to_string()),
        Cell::new("Name".cyan().bold().to_string()),
        Cell::new("Kind".cyan().bold().to_string()),
    ]);

    for source in sources {
        table.add_row(vec![
            Cell::new(source.priority),
            Cell::new(&source.key),
            Cell::new(&source.name),
            Cell::new(format!("{:?}", source.kind)),
        ]);
    }
    println!("{table}");
}

fn format_section_header(label: &str, count: Option<usize>, width: usize) -> String {
    let count_str = match count {
        Some(n) => format!(" ({})", n),
        None => String::new(),
    };

    let header_text = format!("{}{}", label, count_str);
    let line_len = (width.saturating_sub(header_text.chars().count() + 4)).min(60);
    let line = "─".repeat(line_len);

    format!(
        "{} {} {}",
        "──".cyan(),
        header_text.green().bold(),
        line.cyan()
    )
}

fn truncate_str(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or(s);

    if first_line.chars().count() <= max_len {
        first_line.to_string()
    } else {
        let truncated: String = first_line.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_WIDTH)
}
