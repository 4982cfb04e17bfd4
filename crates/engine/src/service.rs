use chrono::{DateTime, Utc};

use chartbot_common::error::{ChartbotError, ChartbotResult};
use chartbot_db::testcases::repositories::TestCaseRepository;

use crate::aggregate::run_aggregation;
use crate::intent::{resolve_fallback, resolve_fast, Intent};
use crate::llm::{analysis_prompt, LlmResolver};
use crate::matrix::build_matrix;
use crate::payload::{assemble_chart, error_chart, ChartData, ChartResponse};
use crate::spec::Metric;

const MATRIX_TITLE: &str = "Matrice Priorité/Criticité";
const MATRIX_DESCRIPTION: &str =
    "Répartition des cas de test par niveau de priorité et de criticité";
const QUERY_FAILED_DESCRIPTION: &str = "Les données n'ont pas pu être récupérées";

fn series_label(metric: Metric) -> &'static str {
    match metric {
        Metric::Count => "Nombre de cas de test",
        Metric::Average => "Score moyen",
        Metric::Sum => "Score total",
    }
}

/// Turns a free-form question into a chart response.
///
/// Resolution (keywords first, language model as fallback) can fail and
/// those failures propagate as errors. Once a question resolved to an
/// intent, execution never fails the call: query errors degrade to a
/// placeholder "Erreur" chart so the caller always has something to render.
pub struct ChartEngine<R, L> {
    repo: R,
    llm: L,
}

impl<R: TestCaseRepository, L: LlmResolver> ChartEngine<R, L> {
    pub fn new(repo: R, llm: L) -> Self {
        Self { repo, llm }
    }

    pub async fn generate(&self, input: &str, now: DateTime<Utc>) -> ChartbotResult<ChartResponse> {
        let text = input.trim();
        if text.is_empty() {
            return Err(ChartbotError::EmptyInput("la question est vide".into()));
        }

        let intent = match resolve_fast(text) {
            Some(intent) => {
                tracing::debug!("resolved from keywords");
                intent
            }
            None => {
                tracing::debug!("no keyword match, asking the model");
                let raw = self.llm.invoke(&analysis_prompt(text)).await?;
                resolve_fallback(&raw)?
            }
        };

        Ok(self.execute(intent, now).await)
    }

    async fn execute(&self, intent: Intent, now: DateTime<Utc>) -> ChartResponse {
        match intent {
            Intent::Matrix => match build_matrix(&self.repo).await {
                Ok(heatmap) => {
                    let title = if heatmap.no_data {
                        format!("{MATRIX_TITLE} (Aucune donnée trouvée)")
                    } else {
                        MATRIX_TITLE.to_string()
                    };
                    ChartResponse {
                        success: true,
                        chart_data: Some(ChartData::Heatmap(heatmap)),
                        title,
                        description: MATRIX_DESCRIPTION.to_string(),
                        is_heatmap: true,
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "matrix query failed");
                    query_failure(MATRIX_TITLE.to_string(), e)
                }
            },
            Intent::Chart(spec) => match run_aggregation(&self.repo, &spec, now).await {
                Ok(agg) => {
                    let chart = assemble_chart(spec.chart_type, series_label(agg.metric), &agg);
                    ChartResponse {
                        success: true,
                        chart_data: Some(ChartData::Chart(chart)),
                        title: spec.title,
                        description: spec.description,
                        is_heatmap: false,
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, title = %spec.title, "chart query failed");
                    query_failure(spec.title, e)
                }
            },
        }
    }
}

fn query_failure(title: String, error: ChartbotError) -> ChartResponse {
    ChartResponse {
        success: true,
        chart_data: Some(ChartData::Chart(error_chart())),
        title,
        description: QUERY_FAILED_DESCRIPTION.to_string(),
        is_heatmap: false,
        error: Some(error.to_string()),
    }
}
