//! Multi-section explore export parser
//!
//! An export is a single text payload holding several comma-separated tables:
//!
//! ```text
//! Category: All categories
//!
//! Interest over time
//! Week,bitcoin
//! 2024-01-07,42
//!
//! Related queries
//! TOP
//! query,value
//! bitcoin price,100
//! RISING
//! query,value
//! bitcoin etf,Breakout
//! ```
//!
//! Each recognized header line opens a section that runs until the next
//! header. Inside a section the first non-blank line is the column header and
//! the rest are data rows. A row whose field count differs from the header is
//! skipped with a warning; the rest of the section is kept.

use std::collections::BTreeMap;

use crate::client::models::{Cell, ExploreSection, ExploreSections, SectionName};

/// Which related-* block a `TOP`/`RISING` sub-label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelatedKind {
    Topics,
    Queries,
}

impl RelatedKind {
    fn section(self, rising: bool) -> SectionName {
        match (self, rising) {
            (RelatedKind::Topics, false) => SectionName::RelatedTopicsTop,
            (RelatedKind::Topics, true) => SectionName::RelatedTopicsRising,
            (RelatedKind::Queries, false) => SectionName::RelatedQueriesTop,
            (RelatedKind::Queries, true) => SectionName::RelatedQueriesRising,
        }
    }
}

/// What a header line announces
#[derive(Clone, Copy)]
enum Header {
    Section(SectionName),
    Related(RelatedKind),
    Top,
    Rising,
}

fn classify_header(label: &str) -> Option<Header> {
    match label {
        "Interest over time" => Some(Header::Section(SectionName::InterestOverTime)),
        "Interest by region" | "Interest by subregion" | "Interest by metro"
        | "Interest by city" => Some(Header::Section(SectionName::InterestByRegion)),
        "Related topics" => Some(Header::Related(RelatedKind::Topics)),
        "Related queries" => Some(Header::Related(RelatedKind::Queries)),
        "TOP" => Some(Header::Top),
        "RISING" => Some(Header::Rising),
        _ => None,
    }
}

const TIME_LABELS: &[&str] = &["Week", "Day", "Month", "Time", "Date"];
const REGION_LABELS: &[&str] = &["Region", "Country", "Subregion", "Metro", "City", "DMA"];

/// Section implied by a bare column-header line in a headerless export
fn implicit_section(first_cell: &str) -> Option<SectionName> {
    if TIME_LABELS.contains(&first_cell) {
        Some(SectionName::InterestOverTime)
    } else if REGION_LABELS.contains(&first_cell) {
        Some(SectionName::InterestByRegion)
    } else {
        None
    }
}

/// Table being filled
struct OpenSection {
    name: SectionName,
    columns: Option<Vec<String>>,
    rows: Vec<Vec<Cell>>,
}

enum State {
    /// Before the first header, or after a header that carries no table
    Idle,
    /// Inside a section we are collecting
    Open(OpenSection),
    /// Inside a section we don't want or have already seen
    Skipping,
}

struct SectionParser<'a> {
    wanted: Option<&'a [SectionName]>,
    related: Option<RelatedKind>,
    state: State,
    sections: BTreeMap<SectionName, ExploreSection>,
    seen: Vec<SectionName>,
    warnings: Vec<String>,
}

impl<'a> SectionParser<'a> {
    fn new(wanted: Option<&'a [SectionName]>) -> Self {
        Self {
            wanted,
            related: None,
            state: State::Idle,
            sections: BTreeMap::new(),
            seen: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.warnings.push(message);
    }

    fn close(&mut self) {
        if let State::Open(open) = std::mem::replace(&mut self.state, State::Idle) {
            match open.columns {
                Some(columns) => {
                    self.sections.insert(
                        open.name,
                        ExploreSection {
                            name: open.name,
                            columns,
                            rows: open.rows,
                        },
                    );
                }
                None => {
                    log::debug!("Section {} had no header row, dropping it", open.name);
                }
            }
        }
    }

    fn open(&mut self, name: SectionName, line_no: usize) {
        self.close();

        if self.seen.contains(&name) {
            self.warn(format!(
                "line {}: duplicate {} section ignored",
                line_no, name
            ));
            self.state = State::Skipping;
            return;
        }
        self.seen.push(name);

        let wanted = self.wanted.is_none_or(|w| w.contains(&name));
        self.state = if wanted {
            State::Open(OpenSection {
                name,
                columns: None,
                rows: Vec::new(),
            })
        } else {
            State::Skipping
        };
    }

    fn feed_line(&mut self, line_no: usize, raw: &str) {
        let line = raw.trim_end_matches('\r');
        let label = line.trim().trim_end_matches(',').trim();
        if label.is_empty() {
            return;
        }

        if let Some(header) = classify_header(label) {
            match header {
                Header::Section(name) => {
                    self.related = None;
                    self.open(name, line_no);
                }
                Header::Related(kind) => {
                    self.close();
                    self.related = Some(kind);
                }
                Header::Top | Header::Rising => match self.related {
                    Some(kind) => {
                        let rising = matches!(header, Header::Rising);
                        self.open(kind.section(rising), line_no);
                    }
                    None => {
                        self.close();
                        self.warn(format!(
                            "line {}: '{}' without a preceding related topics/queries header",
                            line_no, label
                        ));
                        self.state = State::Skipping;
                    }
                },
            }
            return;
        }

        let fields = match split_record(line) {
            Ok(fields) => fields,
            Err(e) => {
                self.warn(format!("line {}: unreadable row: {}", line_no, e));
                return;
            }
        };

        if matches!(self.state, State::Idle) {
            match fields.first().and_then(|first| implicit_section(first)) {
                Some(name) => self.open(name, line_no),
                None => return,
            }
        }

        let mut row_error = None;
        if let State::Open(open) = &mut self.state {
            match open.columns.take() {
                None => open.columns = Some(fields),
                Some(columns) => {
                    if columns.len() == fields.len() {
                        let row = fields
                            .into_iter()
                            .zip(columns.iter())
                            .enumerate()
                            .map(|(idx, (text, column))| coerce(idx, column, text))
                            .collect();
                        open.rows.push(row);
                    } else {
                        row_error = Some(format!(
                            "{} line {}: expected {} fields, found {}; row skipped",
                            open.name,
                            line_no,
                            columns.len(),
                            fields.len()
                        ));
                    }
                    open.columns = Some(columns);
                }
            }
        }
        if let Some(message) = row_error {
            self.warn(message);
        }
    }

    fn finish(mut self) -> ExploreSections {
        self.close();
        ExploreSections {
            sections: self.sections,
            warnings: self.warnings,
        }
    }
}

/// Split one line into trimmed fields, honouring CSV quoting.
fn split_record(line: &str) -> Result<Vec<String>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(|f| f.trim().to_string()).collect()),
        None => Ok(Vec::new()),
    }
}

/// The label column stays text; score columns become integers when purely digits.
fn coerce(idx: usize, column: &str, text: String) -> Cell {
    let is_label = idx == 0 || TIME_LABELS.contains(&column);
    if !is_label && !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = text.parse::<i64>() {
            return Cell::Int(n);
        }
    }
    Cell::Text(text)
}

/// Split an export payload into its sections.
///
/// `wanted` restricts the result to the named sections; `None` keeps all.
/// A payload without any recognizable section yields an empty result; whether
/// that is an error is up to the caller.
pub fn parse_sections(payload: &str, wanted: Option<&[SectionName]>) -> ExploreSections {
    let payload = payload.strip_prefix('\u{feff}').unwrap_or(payload);
    let mut parser = SectionParser::new(wanted);

    for (idx, line) in payload.lines().enumerate() {
        parser.feed_line(idx + 1, line);
    }

    let parsed = parser.finish();
    log::debug!(
        "Parsed {} sections ({} warnings)",
        parsed.len(),
        parsed.warnings.len()
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = "Category: All categories

Interest over time
Week,topicA
2024-01-07,42
2024-01-14,57
2024-01-21,100

Related queries
TOP
query,value
topicA price,100
topicA news,35
RISING
query,value
topicA etf,Breakout
topicA halving,+4850%
";

    #[test]
    fn test_parses_expected_sections() {
        let parsed = parse_sections(PAYLOAD, None);

        assert_eq!(parsed.len(), 3);
        assert!(parsed.warnings.is_empty());

        let iot = parsed.get(SectionName::InterestOverTime).unwrap();
        assert_eq!(iot.columns, vec!["Week", "topicA"]);
        assert_eq!(iot.rows.len(), 3);
        assert_eq!(iot.rows[0][0], Cell::Text("2024-01-07".to_string()));
        assert_eq!(iot.rows[2][1], Cell::Int(100));

        let top = parsed.get(SectionName::RelatedQueriesTop).unwrap();
        assert_eq!(top.rows.len(), 2);
        assert_eq!(top.rows[1][1], Cell::Int(35));

        let rising = parsed.get(SectionName::RelatedQueriesRising).unwrap();
        assert_eq!(rising.rows.len(), 2);
        assert_eq!(rising.rows[0][1], Cell::Text("Breakout".to_string()));
        assert_eq!(rising.rows[1][1], Cell::Text("+4850%".to_string()));
    }

    #[test]
    fn test_absent_sections_are_absent() {
        let parsed = parse_sections(PAYLOAD, None);

        assert!(!parsed.contains(SectionName::InterestByRegion));
        assert!(!parsed.contains(SectionName::RelatedTopicsTop));
        assert!(!parsed.contains(SectionName::RelatedTopicsRising));
    }

    #[test]
    fn test_mismatched_row_skipped() {
        let payload = "Interest over time
Week,topicA
2024-01-07,42
2024-01-14,57,extra
2024-01-21,100
";
        let parsed = parse_sections(payload, None);
        let iot = parsed.get(SectionName::InterestOverTime).unwrap();

        assert_eq!(iot.rows.len(), 2);
        assert_eq!(iot.rows[1][0], Cell::Text("2024-01-21".to_string()));
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].contains("expected 2 fields, found 3"));
    }

    #[test]
    fn test_no_headers_yields_empty() {
        let parsed = parse_sections("just some text\nanother line\n", None);
        assert!(parsed.is_empty());

        let parsed = parse_sections("", None);
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_wanted_filter() {
        let parsed = parse_sections(PAYLOAD, Some(&[SectionName::RelatedQueriesRising]));

        assert_eq!(parsed.len(), 1);
        assert!(parsed.contains(SectionName::RelatedQueriesRising));
    }

    #[test]
    fn test_related_topics_and_queries_kept_apart() {
        let payload = "Related topics
TOP
topic,value
Bitcoin - Currency,100
RISING
topic,value
Ordinals - Topic,Breakout

Related queries
TOP
query,value
btc,80
";
        let parsed = parse_sections(payload, None);

        assert_eq!(parsed.len(), 3);
        assert_eq!(
            parsed.get(SectionName::RelatedTopicsTop).unwrap().rows[0][0],
            Cell::Text("Bitcoin - Currency".to_string())
        );
        assert!(parsed.contains(SectionName::RelatedTopicsRising));
        assert_eq!(
            parsed.get(SectionName::RelatedQueriesTop).unwrap().rows[0][1],
            Cell::Int(80)
        );
    }

    #[test]
    fn test_quoted_fields_and_region_scores() {
        let payload = "Interest by region
Region,topicA
\"Washington, D.C.\",100
Texas,<1
";
        let parsed = parse_sections(payload, None);
        let region = parsed.get(SectionName::InterestByRegion).unwrap();

        assert_eq!(region.rows.len(), 2);
        assert_eq!(region.rows[0][0], Cell::Text("Washington, D.C.".to_string()));
        assert_eq!(region.rows[0][1], Cell::Int(100));
        assert_eq!(region.rows[1][1], Cell::Text("<1".to_string()));
    }

    #[test]
    fn test_headerless_export_detected() {
        let payload = "Category: All categories\r\n\r\nWeek,bitcoin: (United States)\r\n2024-01-07,42\r\n";
        let parsed = parse_sections(payload, None);
        let iot = parsed.get(SectionName::InterestOverTime).unwrap();

        assert_eq!(iot.columns[1], "bitcoin: (United States)");
        assert_eq!(iot.rows.len(), 1);
    }

    #[test]
    fn test_headerless_region_table_detected() {
        let payload = "Category: All categories\n\nRegion,bitcoin: (12/1/23 - 12/1/24)\nTexas,100\nOhio,57\n";
        let parsed = parse_sections(payload, None);
        let region = parsed.get(SectionName::InterestByRegion).unwrap();

        assert_eq!(region.columns[0], "Region");
        assert_eq!(region.rows.len(), 2);
        assert_eq!(region.rows[1][0], Cell::Text("Ohio".to_string()));
        assert_eq!(region.rows[1][1], Cell::Int(57));
        assert!(!parsed.contains(SectionName::InterestOverTime));
    }

    #[test]
    fn test_headerless_city_table_detected() {
        let parsed = parse_sections("City,rust\nAustin,100\n", None);
        let region = parsed.get(SectionName::InterestByRegion).unwrap();

        assert_eq!(region.columns, vec!["City".to_string(), "rust".to_string()]);
        assert_eq!(region.rows[0][1], Cell::Int(100));
    }

    #[test]
    fn test_sub_label_without_related_header_ignored() {
        let payload = "TOP
query,value
orphan,10
";
        let parsed = parse_sections(payload, None);

        assert!(parsed.is_empty());
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn test_duplicate_section_ignored() {
        let payload = "Interest over time
Week,a
2024-01-07,1

Interest over time
Week,a
2024-01-07,2
2024-01-14,3
";
        let parsed = parse_sections(payload, None);
        let iot = parsed.get(SectionName::InterestOverTime).unwrap();

        assert_eq!(iot.rows.len(), 1);
        assert_eq!(iot.rows[0][1], Cell::Int(1));
        assert!(parsed.warnings[0].contains("duplicate"));
    }

    #[test]
    fn test_header_with_trailing_commas() {
        let payload = "Interest over time,,\nDay,a\n2024-01-07,5\n";
        let parsed = parse_sections(payload, None);
        assert!(parsed.contains(SectionName::InterestOverTime));
    }

    #[test]
    fn test_header_is_case_sensitive() {
        let payload = "interest over time\nfoo,a\n2024-01-07,5\n";
        let parsed = parse_sections(payload, None);
        assert!(parsed.is_empty());
    }
}
