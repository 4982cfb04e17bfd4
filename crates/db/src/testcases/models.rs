use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A test case record (table `cas_de_test`).
///
/// Column names keep the French vocabulary of the source system; `score` is
/// the satisfaction score attached to the case (nullable — absent scores are
/// excluded from numeric aggregates, never counted as zero).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub id: i64,
    pub projet: Option<String>,
    pub marco_scenario: Option<String>,
    pub test_perimeter: Option<String>,
    pub pre_requisites: Option<String>,
    pub profile: Option<String>,
    pub test_cases: Option<String>,
    pub prio: Option<String>,
    pub criticality: Option<String>,
    pub test_state: Option<String>,
    pub step_test: Option<String>,
    pub expected_result: Option<String>,
    pub score: Option<i32>,
    pub date_creation: Option<DateTime<Utc>>,
}

/// The categorical attributes a query can group or filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupField {
    TestState,
    Projet,
    Perimetre,
    Profil,
    Priorite,
    Criticite,
}

impl GroupField {
    /// The backing column name. Static, so it is safe to splice into SQL.
    pub fn column(self) -> &'static str {
        match self {
            GroupField::TestState => "test_state",
            GroupField::Projet => "projet",
            GroupField::Perimetre => "test_perimeter",
            GroupField::Profil => "profile",
            GroupField::Priorite => "prio",
            GroupField::Criticite => "criticality",
        }
    }
}

/// Attribute-equality filter on a grouping field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: GroupField,
    pub value: String,
}

/// `[start, end]` bounds on `date_creation`. `start = None` means unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: DateTime<Utc>,
}

/// One group produced by a grouped count query. Unordered at this layer;
/// the engine owns result ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub label: String,
    pub count: i64,
}

/// Numeric aggregate over the `score` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreMetric {
    Average,
    Sum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreValue {
    pub label: String,
    pub value: f64,
}

/// One cell of the priority × criticality cross-tabulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixCount {
    pub prio: String,
    pub criticality: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_field_columns_match_schema() {
        assert_eq!(GroupField::TestState.column(), "test_state");
        assert_eq!(GroupField::Perimetre.column(), "test_perimeter");
        assert_eq!(GroupField::Profil.column(), "profile");
        assert_eq!(GroupField::Priorite.column(), "prio");
        assert_eq!(GroupField::Criticite.column(), "criticality");
    }
}
