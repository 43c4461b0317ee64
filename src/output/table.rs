//! Table output formatting

use tabled::{
    Table, Tabled,
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};
use trendscope::{ExploreSection, ExploreSections, TrendRecord};

/// One feed record as a table row
#[derive(Debug, Tabled)]
pub struct TrendRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    #[tabled(rename = "TOPIC")]
    pub topic: String,
    #[tabled(rename = "TRAFFIC")]
    pub traffic: String,
    #[tabled(rename = "PUBLISHED")]
    pub published: String,
    #[tabled(rename = "ARTICLES")]
    pub articles: String,
}

pub fn trend_rows(records: &[TrendRecord]) -> Vec<TrendRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| TrendRow {
            rank: i + 1,
            topic: r.topic.clone(),
            traffic: r.traffic.clone(),
            published: r
                .published
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| r.published_raw.clone()),
            articles: r
                .articles
                .as_ref()
                .map(|a| a.len().to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// One table per section, each under its name
pub fn format_sections(sections: &ExploreSections) -> String {
    if sections.is_empty() {
        return "No sections found.".to_string();
    }

    sections
        .sections
        .values()
        .map(|section| format!("{}\n{}", section.name, section_table(section)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn section_table(section: &ExploreSection) -> String {
    let mut builder = Builder::default();
    builder.push_record(section.columns.iter().cloned());
    for row in &section.rows {
        builder.push_record(row.iter().map(|cell| cell.to_string()));
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscope::parse_sections;

    fn record(topic: &str, articles: Option<usize>) -> TrendRecord {
        TrendRecord {
            topic: topic.to_string(),
            traffic: "200+".to_string(),
            published: None,
            published_raw: "yesterday".to_string(),
            image: None,
            articles: articles.map(|n| {
                (0..n)
                    .map(|i| trendscope::NewsArticle {
                        headline: format!("story {}", i),
                        url: format!("https://news.example.com/{}", i),
                        source: String::new(),
                        image: None,
                    })
                    .collect()
            }),
        }
    }

    #[test]
    fn test_format_table_empty() {
        let rows: Vec<TrendRow> = vec![];
        assert_eq!(format_table(&rows), "No results found.");
    }

    #[test]
    fn test_trend_rows() {
        let rows = trend_rows(&[record("first", Some(2)), record("second", None)]);

        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].articles, "2");
        assert_eq!(rows[1].articles, "-");
        assert_eq!(rows[1].published, "yesterday");

        let result = format_table(&rows);
        assert!(result.contains("TOPIC"));
        assert!(result.contains("second"));
        // Rounded style uses ╭ for top-left corner
        assert!(result.contains("╭"));
    }

    #[test]
    fn test_format_sections() {
        let sections = parse_sections(
            "Interest over time\nWeek,rust\n2024-01-07,42\n",
            None,
        );
        let result = format_sections(&sections);

        assert!(result.starts_with("interest_over_time"));
        assert!(result.contains("Week"));
        assert!(result.contains("42"));
    }
}
