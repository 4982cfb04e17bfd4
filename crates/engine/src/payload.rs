use serde::Serialize;

use crate::aggregate::Aggregation;
use crate::palette::{colors_for, ERROR_COLOR, NO_DATA_LABEL};
use crate::spec::ChartKind;

/// One dataset of a chart: values aligned with the payload's labels, plus
/// one color per value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

/// Dense 3×3 grid payload for the priority × criticality view. `x` is
/// criticality (columns), `y` is priority (rows), `z[y][x]` the cell count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapPayload {
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub z: Vec<Vec<i64>>,
    pub no_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Chart(ChartPayload),
    Heatmap(HeatmapPayload),
}

/// The response body every question resolves to, success or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<ChartData>,
    pub title: String,
    pub description: String,
    pub is_heatmap: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChartResponse {
    /// Body for a question that could not be resolved at all.
    pub fn failure(message: impl Into<String>) -> ChartResponse {
        ChartResponse {
            success: false,
            chart_data: None,
            title: "Erreur".to_string(),
            description: "Impossible de traiter la demande".to_string(),
            is_heatmap: false,
            error: Some(message.into()),
        }
    }
}

/// Shape an aggregation into a chart payload. An empty aggregation still
/// renders, as a single "Aucune donnée" entry at zero.
pub fn assemble_chart(kind: ChartKind, series_label: &str, agg: &Aggregation) -> ChartPayload {
    if agg.rows.is_empty() {
        return ChartPayload {
            kind,
            labels: vec![NO_DATA_LABEL.to_string()],
            series: vec![Series {
                label: series_label.to_string(),
                values: vec![0.0],
                colors: vec![ERROR_COLOR.to_string()],
            }],
        };
    }
    let labels: Vec<String> = agg.rows.iter().map(|r| r.label.clone()).collect();
    let values: Vec<f64> = agg.rows.iter().map(|r| r.value).collect();
    let colors = colors_for(agg.domain, &labels);
    ChartPayload {
        kind,
        labels,
        series: vec![Series {
            label: series_label.to_string(),
            values,
            colors,
        }],
    }
}

/// Placeholder chart shown when a query failed after resolution.
pub fn error_chart() -> ChartPayload {
    ChartPayload {
        kind: ChartKind::Bar,
        labels: vec!["Erreur".to_string()],
        series: vec![Series {
            label: "Données indisponibles".to_string(),
            values: vec![0.0],
            colors: vec![ERROR_COLOR.to_string()],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregationRow;
    use crate::palette::ColorDomain;

    fn agg(rows: Vec<(&str, f64)>, domain: ColorDomain) -> Aggregation {
        Aggregation {
            rows: rows
                .into_iter()
                .map(|(l, v)| AggregationRow {
                    label: l.to_string(),
                    value: v,
                })
                .collect(),
            domain,
            metric: crate::spec::Metric::Count,
        }
    }

    #[test]
    fn empty_aggregation_renders_a_no_data_entry() {
        let payload = assemble_chart(
            ChartKind::Pie,
            "Nombre de cas de test",
            &agg(vec![], ColorDomain::Open),
        );
        assert_eq!(payload.labels, vec![NO_DATA_LABEL]);
        assert_eq!(payload.series[0].values, vec![0.0]);
        assert_eq!(payload.series[0].colors, vec![ERROR_COLOR]);
        assert_eq!(payload.kind, ChartKind::Pie);
    }

    #[test]
    fn labels_values_and_colors_stay_aligned() {
        let payload = assemble_chart(
            ChartKind::Bar,
            "Nombre de cas de test",
            &agg(vec![("High", 4.0), ("Low", 2.0)], ColorDomain::Priority),
        );
        assert_eq!(payload.labels, vec!["High", "Low"]);
        assert_eq!(payload.series[0].values, vec![4.0, 2.0]);
        assert_eq!(payload.series[0].colors, vec!["#e74c3c", "#27ae60"]);
    }

    #[test]
    fn chart_kind_serializes_as_type_token() {
        let payload = error_chart();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["labels"][0], "Erreur");
    }

    #[test]
    fn failure_body_has_no_chart_data() {
        let body = ChartResponse::failure("source de données inconnue");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("chart_data").is_none());
        assert_eq!(json["error"], "source de données inconnue");
    }
}
