//! Human-oriented output with color

use colored::Colorize;
use trendscope::{ExploreSections, TrendRecord};

pub fn trends(records: &[TrendRecord]) -> String {
    if records.is_empty() {
        return "No trending topics found.".to_string();
    }

    let mut out = Vec::new();
    for (i, record) in records.iter().enumerate() {
        out.push(format!(
            "{:>3}. {}  {}",
            i + 1,
            record.topic.bold(),
            record.traffic.green()
        ));

        if let Some(image) = &record.image {
            let credit = if image.source.is_empty() {
                String::new()
            } else {
                format!(" ({})", image.source)
            };
            out.push(format!("     {} {}{}", "image:".dimmed(), image.url, credit));
        }

        for article in record.articles.iter().flatten() {
            let source = if article.source.is_empty() {
                String::new()
            } else {
                format!(" [{}]", article.source).dimmed().to_string()
            };
            out.push(format!("     - {}{}", article.headline, source));
            out.push(format!("       {}", article.url.cyan()));
        }
    }

    out.join("\n")
}

pub fn sections(sections: &ExploreSections) -> String {
    if sections.is_empty() {
        return "No sections found.".to_string();
    }

    let mut out = Vec::new();
    for section in sections.sections.values() {
        out.push(format!(
            "{} ({} rows)",
            section.name.to_string().bold(),
            section.rows.len()
        ));
        out.push(format!("  {}", section.columns.join(" | ").dimmed()));
        for row in &section.rows {
            let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            out.push(format!("  {}", cells.join(" | ")));
        }
        out.push(String::new());
    }

    if !sections.warnings.is_empty() {
        out.push(format!(
            "{} {} rows skipped",
            "warning:".yellow(),
            sections.warnings.len()
        ));
    }

    out.join("\n").trim_end().to_string()
}
