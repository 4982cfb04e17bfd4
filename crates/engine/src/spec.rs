use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use chartbot_common::error::ChartbotError;
use chartbot_db::testcases::models::{FieldFilter, GroupField};

use crate::timeframe::TimePeriod;

/// Renderer-facing chart family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Doughnut,
    Radar,
    Heatmap,
}

impl ChartKind {
    fn from_token(token: &str) -> ChartKind {
        match token.trim().to_lowercase().as_str() {
            "line" => ChartKind::Line,
            "pie" => ChartKind::Pie,
            "doughnut" => ChartKind::Doughnut,
            "radar" => ChartKind::Radar,
            "heatmap" => ChartKind::Heatmap,
            // Unknown kinds degrade to a bar chart rather than failing.
            _ => ChartKind::Bar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Count,
    Average,
    Sum,
}

impl Metric {
    fn from_token(token: &str) -> Metric {
        match token.trim().to_lowercase().as_str() {
            "average" | "avg" | "moyenne" => Metric::Average,
            "sum" | "somme" => Metric::Sum,
            _ => Metric::Count,
        }
    }
}

/// The dataset a question is about. All five read the test-case store;
/// they differ in default grouping, ordering, and whether the time window
/// applies (see the source profiles in the aggregation module).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Demandes,
    Applications,
    Audits,
    Satisfaction,
    Transferts,
}

impl FromStr for DataSource {
    type Err = ChartbotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "demandes" => Ok(DataSource::Demandes),
            "applications" => Ok(DataSource::Applications),
            "audits" => Ok(DataSource::Audits),
            "satisfaction" => Ok(DataSource::Satisfaction),
            "transferts" => Ok(DataSource::Transferts),
            other => Err(ChartbotError::UnsupportedSource(format!(
                "source de données inconnue: {other}"
            ))),
        }
    }
}

/// Map a user- or model-provided attribute token to a grouping field.
/// Accepts both accented French and the raw column spellings.
pub fn group_field_from_token(token: &str) -> Option<GroupField> {
    match token.trim().to_lowercase().as_str() {
        "statut" | "état" | "etat" | "test_state" => Some(GroupField::TestState),
        "projet" | "projets" => Some(GroupField::Projet),
        "périmètre" | "perimetre" | "test_perimeter" => Some(GroupField::Perimetre),
        "profil" | "profils" | "profile" => Some(GroupField::Profil),
        "priorité" | "priorite" | "prio" => Some(GroupField::Priorite),
        "criticité" | "criticite" | "criticality" => Some(GroupField::Criticite),
        _ => None,
    }
}

fn group_label(field: GroupField) -> &'static str {
    match field {
        GroupField::TestState => "État des tests",
        GroupField::Projet => "Projets",
        GroupField::Perimetre => "Périmètre des tests",
        GroupField::Profil => "Profils utilisateurs",
        GroupField::Priorite => "Priorité des tests",
        GroupField::Criticite => "Criticité des tests",
    }
}

/// Short title form used by keyword-resolved specs ("Répartition par
/// Priorité"). The fallback path derives its titles from [`group_label`]
/// instead.
fn keyword_label(field: GroupField) -> &'static str {
    match field {
        GroupField::TestState => "Statut",
        GroupField::Projet => "Projet",
        GroupField::Perimetre => "Périmètre",
        GroupField::Profil => "Profil",
        GroupField::Priorite => "Priorité",
        GroupField::Criticite => "Criticité",
    }
}

fn short_label(field: GroupField) -> &'static str {
    match field {
        GroupField::TestState => "statut",
        GroupField::Projet => "projet",
        GroupField::Perimetre => "périmètre",
        GroupField::Profil => "profil",
        GroupField::Priorite => "priorité",
        GroupField::Criticite => "criticité",
    }
}

pub fn derive_title(groupby: Option<GroupField>) -> String {
    match groupby {
        Some(f) => format!("Répartition par {}", group_label(f)),
        None => "Évolution mensuelle des cas de test".to_string(),
    }
}

pub fn derive_description(groupby: Option<GroupField>) -> String {
    match groupby {
        Some(f) => format!("Répartition des cas de test par {}", short_label(f)),
        None => "Nombre de cas de test créés par mois".to_string(),
    }
}

/// A fully resolved chart request, ready for aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub chart_type: ChartKind,
    pub data_source: DataSource,
    pub groupby: Option<GroupField>,
    pub metric: Metric,
    pub time_period: TimePeriod,
    pub title: String,
    pub description: String,
    pub filters: Vec<FieldFilter>,
}

impl ChartSpec {
    /// Spec for a recognized-keyword question: known grouping field and
    /// chart kind, everything else at its defaults.
    pub fn grouped(field: GroupField, kind: ChartKind) -> ChartSpec {
        ChartSpec {
            chart_type: kind,
            data_source: DataSource::Demandes,
            groupby: Some(field),
            metric: Metric::Count,
            time_period: TimePeriod::default(),
            title: format!("Répartition par {}", keyword_label(field)),
            description: derive_description(Some(field)),
            filters: Vec::new(),
        }
    }

    /// Validate and coerce a model-extracted spec. Unknown tokens fall back
    /// to defaults for every field, the data source included, so the rest of
    /// the pipeline only ever sees supported combinations.
    pub fn from_raw(raw: RawChartSpec) -> ChartSpec {
        let chart_type = raw
            .chart_type
            .as_deref()
            .map(ChartKind::from_token)
            .unwrap_or(ChartKind::Bar);
        let data_source = raw
            .data_source
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DataSource::Demandes);
        // An absent groupby defaults to the status breakdown; an explicit
        // null or unrecognized token means "no categorical axis" and falls
        // through to the source default (monthly for demandes).
        let groupby = match raw.groupby {
            None => Some(GroupField::TestState),
            Some(ref token) => token.as_deref().and_then(group_field_from_token),
        };
        let metric = raw
            .metric
            .as_deref()
            .map(Metric::from_token)
            .unwrap_or(Metric::Count);
        let time_period = raw
            .time_period
            .as_deref()
            .map(TimePeriod::from_token)
            .unwrap_or_default();

        let mut filters = Vec::new();
        if let Some(map) = raw.filters {
            for (key, value) in map {
                let Some(field) = group_field_from_token(&key) else {
                    continue;
                };
                let value = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                filters.push(FieldFilter { field, value });
            }
        }

        let title = raw.title.unwrap_or_else(|| derive_title(groupby));
        let description = raw
            .description
            .unwrap_or_else(|| derive_description(groupby));

        ChartSpec {
            chart_type,
            data_source,
            groupby,
            metric,
            time_period,
            title,
            description,
            filters,
        }
    }
}

/// The JSON shape the language model is asked to emit. Everything is
/// optional; validation happens in [`ChartSpec::from_raw`]. `groupby`
/// distinguishes a missing key (`None`) from an explicit `null`
/// (`Some(None)`), because the two default differently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChartSpec {
    pub chart_type: Option<String>,
    pub data_source: Option<String>,
    #[serde(default, deserialize_with = "present_field")]
    pub groupby: Option<Option<String>>,
    pub metric: Option<String>,
    pub time_period: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub filters: Option<HashMap<String, serde_json::Value>>,
}

/// Wraps a present field (null or not) in `Some` so a missing key stays
/// distinguishable from an explicit `null`.
fn present_field<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_chart_kind_degrades_to_bar() {
        let raw = RawChartSpec {
            chart_type: Some("histogramme".into()),
            ..Default::default()
        };
        let spec = ChartSpec::from_raw(raw);
        assert_eq!(spec.chart_type, ChartKind::Bar);
    }

    #[test]
    fn source_parsing_rejects_unknown_tokens() {
        let err = "incidents".parse::<DataSource>().unwrap_err();
        assert!(matches!(err, ChartbotError::UnsupportedSource(_)));
        assert_eq!(
            "satisfaction".parse::<DataSource>().unwrap(),
            DataSource::Satisfaction
        );
    }

    #[test]
    fn unknown_source_in_a_raw_spec_defaults_to_demandes() {
        let raw = RawChartSpec {
            data_source: Some("incidents".into()),
            ..Default::default()
        };
        let spec = ChartSpec::from_raw(raw);
        assert_eq!(spec.data_source, DataSource::Demandes);
    }

    #[test]
    fn accented_groupby_tokens_resolve() {
        assert_eq!(
            group_field_from_token("Priorité"),
            Some(GroupField::Priorite)
        );
        assert_eq!(
            group_field_from_token("perimetre"),
            Some(GroupField::Perimetre)
        );
        assert_eq!(group_field_from_token("état"), Some(GroupField::TestState));
        assert_eq!(group_field_from_token("inconnu"), None);
    }

    #[test]
    fn missing_period_defaults_to_six_months() {
        let spec = ChartSpec::from_raw(RawChartSpec::default());
        assert_eq!(spec.time_period, TimePeriod::SixMonths);
    }

    #[test]
    fn unknown_groupby_token_is_dropped() {
        let raw = RawChartSpec {
            groupby: Some(Some("bogus".into())),
            ..Default::default()
        };
        let spec = ChartSpec::from_raw(raw);
        assert_eq!(spec.groupby, None);
        assert_eq!(spec.title, "Évolution mensuelle des cas de test");
    }

    #[test]
    fn absent_groupby_defaults_to_test_state() {
        let spec = ChartSpec::from_raw(RawChartSpec::default());
        assert_eq!(spec.groupby, Some(GroupField::TestState));
        assert_eq!(spec.title, "Répartition par État des tests");
    }

    #[test]
    fn null_groupby_means_no_categorical_axis() {
        let raw: RawChartSpec = serde_json::from_str(r#"{"groupby": null}"#).unwrap();
        assert_eq!(raw.groupby, Some(None));
        let spec = ChartSpec::from_raw(raw);
        assert_eq!(spec.groupby, None);
        assert_eq!(spec.title, "Évolution mensuelle des cas de test");
    }

    #[test]
    fn keyword_specs_use_short_titles() {
        let spec = ChartSpec::grouped(GroupField::Priorite, ChartKind::Bar);
        assert_eq!(spec.title, "Répartition par Priorité");
        let spec = ChartSpec::grouped(GroupField::TestState, ChartKind::Bar);
        assert_eq!(spec.title, "Répartition par Statut");
    }

    #[test]
    fn filters_keep_known_fields_only() {
        let mut map = HashMap::new();
        map.insert("projet".to_string(), serde_json::json!("Alpha"));
        map.insert("couleur".to_string(), serde_json::json!("rouge"));
        let raw = RawChartSpec {
            filters: Some(map),
            ..Default::default()
        };
        let spec = ChartSpec::from_raw(raw);
        assert_eq!(spec.filters.len(), 1);
        assert_eq!(spec.filters[0].field, GroupField::Projet);
        assert_eq!(spec.filters[0].value, "Alpha");
    }

    #[test]
    fn explicit_title_wins_over_derived() {
        let raw = RawChartSpec {
            groupby: Some(Some("projet".into())),
            title: Some("Mes projets".into()),
            ..Default::default()
        };
        let spec = ChartSpec::from_raw(raw);
        assert_eq!(spec.title, "Mes projets");
    }
}
