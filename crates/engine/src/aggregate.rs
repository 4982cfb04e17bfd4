use chrono::{DateTime, Utc};

use chartbot_common::error::ChartbotResult;
use chartbot_db::testcases::models::{GroupField, ScoreMetric};
use chartbot_db::testcases::repositories::TestCaseRepository;

use crate::palette::ColorDomain;
use crate::spec::{ChartSpec, DataSource, Metric};

/// One labeled value in a chart, after ordering and truncation.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationRow {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub rows: Vec<AggregationRow>,
    pub domain: ColorDomain,
    /// The metric actually computed, after source defaults applied.
    pub metric: Metric,
}

/// How a data source behaves when the spec leaves choices open.
struct SourceProfile {
    /// Whether `time_period` applies. Satisfaction scores are snapshots,
    /// not events, so they ignore the window.
    temporal: bool,
    /// Grouping used when the spec names none. `None` means a monthly
    /// time series.
    default_group: Option<GroupField>,
    default_metric: Metric,
}

fn profile_for(source: DataSource) -> SourceProfile {
    match source {
        DataSource::Demandes => SourceProfile {
            temporal: true,
            default_group: None,
            default_metric: Metric::Count,
        },
        DataSource::Applications => SourceProfile {
            temporal: true,
            default_group: Some(GroupField::Projet),
            default_metric: Metric::Count,
        },
        DataSource::Audits => SourceProfile {
            temporal: true,
            default_group: Some(GroupField::TestState),
            default_metric: Metric::Count,
        },
        DataSource::Satisfaction => SourceProfile {
            temporal: false,
            default_group: Some(GroupField::Priorite),
            default_metric: Metric::Average,
        },
        DataSource::Transferts => SourceProfile {
            temporal: true,
            default_group: Some(GroupField::Profil),
            default_metric: Metric::Count,
        },
    }
}

fn domain_for(groupby: Option<GroupField>) -> ColorDomain {
    match groupby {
        Some(GroupField::Priorite) => ColorDomain::Priority,
        Some(GroupField::Criticite) => ColorDomain::Criticality,
        Some(GroupField::TestState) => ColorDomain::TestState,
        _ => ColorDomain::Open,
    }
}

fn severity_rank(label: &str) -> usize {
    match label {
        "High" => 0,
        "Medium" => 1,
        "Low" => 2,
        _ => 3,
    }
}

/// Order rows for display: fixed High → Medium → Low for severity fields
/// (unknown levels trail, largest first), chronological for monthly
/// buckets, largest-first otherwise. Open-ended fields are cut to the ten
/// largest groups after sorting. `explicit` distinguishes a grouping the
/// request asked for from one a source profile defaulted to: the audits
/// default lists states alphabetically, an explicit statut request sorts
/// by value like any other grouping.
fn order_rows(groupby: Option<GroupField>, explicit: bool, rows: &mut Vec<AggregationRow>) {
    match groupby {
        None => rows.sort_by(|a, b| a.label.cmp(&b.label)),
        Some(GroupField::Priorite) | Some(GroupField::Criticite) => {
            rows.sort_by(|a, b| {
                severity_rank(&a.label)
                    .cmp(&severity_rank(&b.label))
                    .then(b.value.total_cmp(&a.value))
            });
        }
        Some(GroupField::TestState) if !explicit => rows.sort_by(|a, b| a.label.cmp(&b.label)),
        Some(GroupField::Projet) | Some(GroupField::Profil) => {
            rows.sort_by(|a, b| b.value.total_cmp(&a.value));
            rows.truncate(10);
        }
        Some(_) => rows.sort_by(|a, b| b.value.total_cmp(&a.value)),
    }
}

/// Run the repository queries a spec calls for and shape the result.
pub async fn run_aggregation<R: TestCaseRepository>(
    repo: &R,
    spec: &ChartSpec,
    now: DateTime<Utc>,
) -> ChartbotResult<Aggregation> {
    let profile = profile_for(spec.data_source);
    let window = if profile.temporal {
        spec.time_period.window(now)
    } else {
        None
    };
    let groupby = spec.groupby.or(profile.default_group);
    let metric = if spec.metric == Metric::Count {
        profile.default_metric
    } else {
        spec.metric
    };

    let mut rows = match metric {
        Metric::Count => match groupby {
            Some(field) => repo
                .count_by(field, window.as_ref(), &spec.filters)
                .await?
                .into_iter()
                .map(|g| AggregationRow {
                    label: g.label,
                    value: g.count as f64,
                })
                .collect(),
            None => repo
                .count_by_month(window.as_ref(), &spec.filters)
                .await?
                .into_iter()
                .map(|g| AggregationRow {
                    label: g.label,
                    value: g.count as f64,
                })
                .collect(),
        },
        Metric::Average | Metric::Sum => {
            let score_metric = if metric == Metric::Average {
                ScoreMetric::Average
            } else {
                ScoreMetric::Sum
            };
            // A score aggregate needs a categorical axis.
            let field = groupby.unwrap_or(GroupField::Projet);
            repo.score_by(field, score_metric, window.as_ref(), &spec.filters)
                .await?
                .into_iter()
                .map(|s| AggregationRow {
                    label: s.label,
                    value: s.value,
                })
                .collect::<Vec<_>>()
        }
    };

    order_rows(groupby, spec.groupby.is_some(), &mut rows);
    Ok(Aggregation {
        rows,
        domain: domain_for(groupby),
        metric,
    })
}
