use chartbot_common::error::{ChartbotError, ChartbotResult};
use chartbot_db::testcases::models::GroupField;

use crate::spec::{ChartKind, ChartSpec, RawChartSpec};

/// What the user is asking for, after resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// The priority × criticality cross-tabulation.
    Matrix,
    Chart(ChartSpec),
}

/// Keyword cascade for the fast path. First match wins, so the order here
/// is the precedence order: "priorité des projets" is a priority chart.
const CHART_RULES: &[(&str, GroupField, ChartKind)] = &[
    ("priorité", GroupField::Priorite, ChartKind::Bar),
    ("priorite", GroupField::Priorite, ChartKind::Bar),
    ("prio", GroupField::Priorite, ChartKind::Bar),
    ("projet", GroupField::Projet, ChartKind::Pie),
    ("project", GroupField::Projet, ChartKind::Pie),
    ("statut", GroupField::TestState, ChartKind::Bar),
    ("status", GroupField::TestState, ChartKind::Bar),
    ("périmètre", GroupField::Perimetre, ChartKind::Doughnut),
    ("perimetre", GroupField::Perimetre, ChartKind::Doughnut),
    ("perimeter", GroupField::Perimetre, ChartKind::Doughnut),
    ("état", GroupField::TestState, ChartKind::Bar),
    ("etat", GroupField::TestState, ChartKind::Bar),
    ("state", GroupField::TestState, ChartKind::Bar),
    ("profil", GroupField::Profil, ChartKind::Pie),
    ("criticité", GroupField::Criticite, ChartKind::Bar),
    ("criticite", GroupField::Criticite, ChartKind::Bar),
    ("criticality", GroupField::Criticite, ChartKind::Bar),
];

/// Resolve a question from keywords alone, without the language model.
/// Returns `None` when no rule applies and the model must decide.
pub fn resolve_fast(text: &str) -> Option<Intent> {
    let lower = text.to_lowercase();

    if lower.contains("matrice") || mentions_cross_tab(&lower) {
        return Some(Intent::Matrix);
    }

    for (keyword, field, kind) in CHART_RULES {
        if lower.contains(keyword) {
            return Some(Intent::Chart(ChartSpec::grouped(*field, *kind)));
        }
    }
    None
}

/// Resolve from the language model's raw answer. The model is told to emit
/// bare JSON but routinely wraps it in a Markdown code fence anyway.
pub fn resolve_fallback(model_output: &str) -> ChartbotResult<Intent> {
    let json = strip_code_fence(model_output);
    let raw: RawChartSpec = serde_json::from_str(json).map_err(|e| {
        ChartbotError::SpecParse(format!("réponse du modèle illisible: {e}"))
    })?;
    let spec = ChartSpec::from_raw(raw);
    if spec.chart_type == ChartKind::Heatmap {
        return Ok(Intent::Matrix);
    }
    Ok(Intent::Chart(spec))
}

/// The cross-tab vocabulary is the slash-joined pair ("priorité/criticité",
/// any spacing or accent spelling). A sentence that merely mentions both
/// dimensions ("priorité et criticité") charts priority like any other
/// sentence in the cascade.
fn mentions_cross_tab(lower: &str) -> bool {
    let compact: String = lower
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == 'é' { 'e' } else { c })
        .collect();
    compact.contains("priorite/criticite")
}

fn strip_code_fence(s: &str) -> &str {
    let t = s.trim();
    let t = t
        .strip_prefix("```json")
        .or_else(|| t.strip_prefix("```"))
        .unwrap_or(t);
    let t = t.strip_suffix("```").unwrap_or(t);
    t.trim()
}
