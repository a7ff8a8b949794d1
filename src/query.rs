//! Filtering, sorting and facet derivation over the roster.
//!
//! Everything here is a pure function of the records and a [`QuerySpec`]
//! snapshot. Callers build a new one on every change and recompute.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::StudentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    MatchScore,
    Proactivity,
    Communication,
    PresentationSkills,
    RecommendationRate,
    GraduationYear,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Name,
        SortField::MatchScore,
        SortField::Proactivity,
        SortField::Communication,
        SortField::PresentationSkills,
        SortField::RecommendationRate,
        SortField::GraduationYear,
    ];

    /// Accepts the camelCase identifiers plus kebab/snake spellings.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "name" => Some(SortField::Name),
            "matchscore" => Some(SortField::MatchScore),
            "proactivity" => Some(SortField::Proactivity),
            "communication" => Some(SortField::Communication),
            "presentationskills" | "presentation" => Some(SortField::PresentationSkills),
            "recommendationrate" => Some(SortField::RecommendationRate),
            "graduationyear" => Some(SortField::GraduationYear),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::MatchScore => "matchScore",
            SortField::Proactivity => "proactivity",
            SortField::Communication => "communication",
            SortField::PresentationSkills => "presentationSkills",
            SortField::RecommendationRate => "recommendationRate",
            SortField::GraduationYear => "graduationYear",
        }
    }

    fn key(self) -> SortKey {
        match self {
            SortField::Name => SortKey::Text(student_name),
            SortField::MatchScore => SortKey::Numeric(|r| r.match_score),
            SortField::Proactivity => SortKey::Numeric(|r| r.soft_skills.proactivity.score),
            SortField::Communication => SortKey::Numeric(|r| r.soft_skills.communication.score),
            SortField::PresentationSkills => {
                SortKey::Numeric(|r| r.soft_skills.presentation_skills.score)
            }
            SortField::RecommendationRate => {
                SortKey::Numeric(|r| r.instructor_feedback.recommendation_rate)
            }
            SortField::GraduationYear => SortKey::Numeric(|r| f64::from(r.graduation_year)),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Accessor resolved once per query.
#[derive(Clone, Copy)]
enum SortKey {
    Text(fn(&StudentRecord) -> &str),
    Numeric(fn(&StudentRecord) -> f64),
}

impl SortKey {
    fn compare(self, a: &StudentRecord, b: &StudentRecord) -> Ordering {
        match self {
            SortKey::Text(get) => compare_names(get(a), get(b)),
            SortKey::Numeric(get) => get(a).total_cmp(&get(b)),
        }
    }
}

fn student_name(record: &StudentRecord) -> &str {
    &record.name
}

/// Base letters with diacritics stripped, case-folded.
fn primary_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Collation order: base letters, then accents, then case, then raw bytes.
fn compare_names(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| {
            let a_accented: String = a.nfd().collect::<String>().to_lowercase();
            let b_accented: String = b.nfd().collect::<String>().to_lowercase();
            a_accented.cmp(&b_accented)
        })
        .then_with(|| b.chars().map(char::is_lowercase).cmp(a.chars().map(char::is_lowercase)))
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl YearFilter {
    /// `all` or an integer year. Anything else disables the year axis.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("all") || value.is_empty() {
            return YearFilter::All;
        }
        match value.parse::<i32>() {
            Ok(year) => YearFilter::Year(year),
            Err(_) => {
                warn!(year = value, "unrecognized year filter, ignoring");
                YearFilter::All
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub search_text: String,
    /// `None` means all majors.
    pub major_filter: Option<String>,
    pub year_filter: YearFilter,
    pub min_match_score: i64,
    /// `None` leaves records in load order.
    pub sort_field: Option<SortField>,
    pub sort_direction: SortDirection,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            major_filter: None,
            year_filter: YearFilter::All,
            min_match_score: 0,
            sort_field: Some(SortField::MatchScore),
            sort_direction: SortDirection::Descending,
        }
    }
}

impl QuerySpec {
    /// Maps the `all` sentinel to no major filter.
    pub fn major(value: &str) -> Option<String> {
        if value == "all" {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// Column-header behaviour: the active field flips direction, a new
    /// field starts descending.
    pub fn toggle_sort(&self, field: SortField) -> QuerySpec {
        let sort_direction = if self.sort_field == Some(field) {
            self.sort_direction.flipped()
        } else {
            SortDirection::Descending
        };
        QuerySpec {
            sort_field: Some(field),
            sort_direction,
            ..self.clone()
        }
    }

    pub fn matches(&self, record: &StudentRecord) -> bool {
        self.passes(record, &self.search_text.trim().to_lowercase())
    }

    fn passes(&self, record: &StudentRecord, needle: &str) -> bool {
        let major_ok = self
            .major_filter
            .as_ref()
            .map_or(true, |major| record.major == *major);
        let year_ok = match self.year_filter {
            YearFilter::All => true,
            YearFilter::Year(year) => record.graduation_year == year,
        };

        matches_search(record, needle)
            && major_ok
            && year_ok
            && record.match_score >= self.min_match_score as f64
    }
}

fn matches_search(record: &StudentRecord, needle: &str) -> bool {
    needle.is_empty()
        || record.name.to_lowercase().contains(needle)
        || record.email.to_lowercase().contains(needle)
        || record
            .skills
            .iter()
            .any(|skill| skill.to_lowercase().contains(needle))
}

/// Filter then stable-sort. Records with equal keys keep their input order
/// in either direction.
pub fn filter_and_sort<'a>(records: &'a [StudentRecord], spec: &QuerySpec) -> Vec<&'a StudentRecord> {
    let needle = spec.search_text.trim().to_lowercase();
    let mut result: Vec<&StudentRecord> = records
        .iter()
        .filter(|record| spec.passes(record, &needle))
        .collect();

    if let Some(field) = spec.sort_field {
        let key = field.key();
        match spec.sort_direction {
            SortDirection::Ascending => result.sort_by(|a, b| key.compare(a, b)),
            SortDirection::Descending => result.sort_by(|a, b| key.compare(b, a)),
        }
    }

    debug!(
        matched = result.len(),
        total = records.len(),
        sort = spec.sort_field.map_or("none", |f| f.as_str()),
        direction = spec.sort_direction.as_str(),
        "query recomputed"
    );
    result
}

pub fn distinct_majors(records: &[StudentRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.major.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn distinct_years(records: &[StudentRecord]) -> Vec<i32> {
    records
        .iter()
        .map(|record| record.graduation_year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// "Showing N of M students".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultSummary {
    pub shown: usize,
    pub total: usize,
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} of {} students", self.shown, self.total)
    }
}
