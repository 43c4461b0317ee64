//! Explore export models
//!
//! An explore export is one CSV-like payload holding several tables, each
//! introduced by a header line. The parser splits it into [`ExploreSection`]s.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Names of the tables an explore export can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    InterestOverTime,
    InterestByRegion,
    RelatedTopicsTop,
    RelatedTopicsRising,
    RelatedQueriesTop,
    RelatedQueriesRising,
}

impl SectionName {
    pub const ALL: [SectionName; 6] = [
        SectionName::InterestOverTime,
        SectionName::InterestByRegion,
        SectionName::RelatedTopicsTop,
        SectionName::RelatedTopicsRising,
        SectionName::RelatedQueriesTop,
        SectionName::RelatedQueriesRising,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::InterestOverTime => "interest_over_time",
            SectionName::InterestByRegion => "interest_by_region",
            SectionName::RelatedTopicsTop => "related_topics_top",
            SectionName::RelatedTopicsRising => "related_topics_rising",
            SectionName::RelatedQueriesTop => "related_queries_top",
            SectionName::RelatedQueriesRising => "related_queries_rising",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        SectionName::ALL
            .into_iter()
            .find(|name| name.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = SectionName::ALL.iter().map(|n| n.as_str()).collect();
                format!("Unknown section '{}'. Expected one of: {}", s, names.join(", "))
            })
    }
}

/// One table cell: an integer score where the column holds scores, text otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Text(String),
}

impl Cell {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Int(n) => Some(*n),
            Cell::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Int(_) => None,
            Cell::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// One named table from an explore export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreSection {
    pub name: SectionName,

    /// Column labels from the section's header row
    pub columns: Vec<String>,

    /// Data rows, each with exactly `columns.len()` cells
    pub rows: Vec<Vec<Cell>>,
}

impl ExploreSection {
    /// Cells of the column labelled `label`
    pub fn column(&self, label: &str) -> Option<Vec<&Cell>> {
        let idx = self.columns.iter().position(|c| c == label)?;
        Some(self.rows.iter().filter_map(|row| row.get(idx)).collect())
    }
}

/// All sections found in one export payload.
///
/// A section missing from the payload is missing here too; there are no
/// empty placeholder tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExploreSections {
    pub sections: BTreeMap<SectionName, ExploreSection>,

    /// Rows that were skipped while parsing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ExploreSections {
    pub fn get(&self, name: SectionName) -> Option<&ExploreSection> {
        self.sections.get(&name)
    }

    pub fn contains(&self, name: SectionName) -> bool {
        self.sections.contains_key(&name)
    }

    pub fn names(&self) -> impl Iterator<Item = SectionName> + '_ {
        self.sections.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
