use async_trait::async_trait;

use crate::testcases::models::{
    FieldFilter, GroupCount, GroupField, MatrixCount, ScoreMetric, ScoreValue, TimeWindow,
};
use chartbot_common::error::ChartbotResult;

/// Read-only query capability over the test-case store.
///
/// This is the only storage dependency of the chart engine: equality filters,
/// date-range bounds, grouped counts, numeric aggregates, and the
/// priority × criticality cross-tabulation. `window = None` means the caller
/// decided the query is not time-bounded (e.g. the source has no temporal
/// attribute), not that the window resolved to "all time".
#[async_trait]
pub trait TestCaseRepository: Send + Sync {
    async fn count_all(&self) -> ChartbotResult<i64>;

    /// Count records per value of `field`, excluding records where the field
    /// is null. No ordering guarantee.
    async fn count_by(
        &self,
        field: GroupField,
        window: Option<&TimeWindow>,
        filters: &[FieldFilter],
    ) -> ChartbotResult<Vec<GroupCount>>;

    /// Count records per `YYYY-MM` creation-month bucket, chronologically
    /// ascending. Records without a creation date are excluded.
    async fn count_by_month(
        &self,
        window: Option<&TimeWindow>,
        filters: &[FieldFilter],
    ) -> ChartbotResult<Vec<GroupCount>>;

    /// Aggregate the `score` column per value of `field`. Records with a
    /// null score are excluded from the aggregate.
    async fn score_by(
        &self,
        field: GroupField,
        metric: ScoreMetric,
        window: Option<&TimeWindow>,
        filters: &[FieldFilter],
    ) -> ChartbotResult<Vec<ScoreValue>>;

    /// Count records per (prio, criticality) pair, excluding records where
    /// either attribute is null.
    async fn matrix_counts(&self) -> ChartbotResult<Vec<MatrixCount>>;
}
