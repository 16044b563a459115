//! `economic_indicators` 테이블 repository.

use tracing::instrument;

use super::{upsert_sql, Database};
use crate::error::Result;
use fma_core::EconomicIndicator;

const COLUMNS: [&str; 7] = [
    "indicator_code",
    "date",
    "indicator_name",
    "value",
    "unit",
    "frequency",
    "source",
];

/// 거시경제 지표 repository.
pub struct IndicatorRepository {
    db: Database,
}

impl IndicatorRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 한 시계열의 관측치를 하나의 트랜잭션으로 upsert합니다.
    #[instrument(skip(self, rows), fields(count = rows.len()))]
    pub async fn upsert_batch(&self, rows: &[EconomicIndicator]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let sql = upsert_sql("economic_indicators", &COLUMNS, &["indicator_code", "date"], false);
        let mut tx = self.db.pool().begin().await?;
        for row in rows {
            sqlx::query(&sql)
                .bind(&row.code)
                .bind(row.date)
                .bind(&row.name)
                .bind(row.value)
                .bind(&row.unit)
                .bind(&row.frequency)
                .bind(&row.source)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(rows.len())
    }

    /// 시리즈 코드의 관측치 수.
    pub async fn count(&self, code: &str) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM economic_indicators WHERE indicator_code = ?")
                .bind(code)
                .fetch_one(self.db.pool())
                .await?;
        Ok(count)
    }
}
