use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::testcases::models::{
    FieldFilter, GroupCount, GroupField, MatrixCount, ScoreMetric, ScoreValue, TimeWindow,
};
use crate::testcases::repositories::TestCaseRepository;
use chartbot_common::error::{ChartbotError, ChartbotResult};

#[derive(Clone)]
pub struct PgTestCaseRepository {
    pool: PgPool,
}

impl PgTestCaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append `and date_creation >= .. and date_creation <= ..` plus equality
/// filters to a query that already has a `where` clause open.
fn push_constraints(
    qb: &mut QueryBuilder<'_, Postgres>,
    window: Option<&TimeWindow>,
    filters: &[FieldFilter],
) {
    if let Some(w) = window {
        if let Some(start) = w.start {
            qb.push(" and date_creation >= ");
            qb.push_bind(start);
        }
        qb.push(" and date_creation <= ");
        qb.push_bind(w.end);
    }
    for f in filters {
        qb.push(" and ");
        qb.push(f.field.column());
        qb.push(" = ");
        qb.push_bind(f.value.clone());
    }
}

#[async_trait]
impl TestCaseRepository for PgTestCaseRepository {
    async fn count_all(&self) -> ChartbotResult<i64> {
        let row = sqlx::query("select count(*) as count from cas_de_test")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ChartbotError::Database(e.to_string()))?;
        Ok(row.get("count"))
    }

    async fn count_by(
        &self,
        field: GroupField,
        window: Option<&TimeWindow>,
        filters: &[FieldFilter],
    ) -> ChartbotResult<Vec<GroupCount>> {
        let col = field.column();
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("select ");
        qb.push(col);
        qb.push(" as label, count(*) as count from cas_de_test where ");
        qb.push(col);
        qb.push(" is not null");
        push_constraints(&mut qb, window, filters);
        qb.push(" group by ");
        qb.push(col);

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ChartbotError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|r| GroupCount {
                label: r.get("label"),
                count: r.get("count"),
            })
            .collect())
    }

    async fn count_by_month(
        &self,
        window: Option<&TimeWindow>,
        filters: &[FieldFilter],
    ) -> ChartbotResult<Vec<GroupCount>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "select to_char(date_trunc('month', date_creation), 'YYYY-MM') as label, \
             count(*) as count from cas_de_test where date_creation is not null",
        );
        push_constraints(&mut qb, window, filters);
        qb.push(" group by 1 order by 1");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ChartbotError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|r| GroupCount {
                label: r.get("label"),
                count: r.get("count"),
            })
            .collect())
    }

    async fn score_by(
        &self,
        field: GroupField,
        metric: ScoreMetric,
        window: Option<&TimeWindow>,
        filters: &[FieldFilter],
    ) -> ChartbotResult<Vec<ScoreValue>> {
        let col = field.column();
        let agg = match metric {
            ScoreMetric::Average => "avg(score)::float8",
            ScoreMetric::Sum => "sum(score)::float8",
        };
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("select ");
        qb.push(col);
        qb.push(" as label, ");
        qb.push(agg);
        qb.push(" as value from cas_de_test where ");
        qb.push(col);
        qb.push(" is not null and score is not null");
        push_constraints(&mut qb, window, filters);
        qb.push(" group by ");
        qb.push(col);

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ChartbotError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|r| ScoreValue {
                label: r.get("label"),
                value: r.get("value"),
            })
            .collect())
    }

    async fn matrix_counts(&self) -> ChartbotResult<Vec<MatrixCount>> {
        let rows = sqlx::query(
            "select prio, criticality, count(*) as count from cas_de_test \
             where prio is not null and criticality is not null \
             group by prio, criticality",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ChartbotError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|r| MatrixCount {
                prio: r.get("prio"),
                criticality: r.get("criticality"),
                count: r.get("count"),
            })
            .collect())
    }
}
