//! `volatility_data` 테이블 repository.

use chrono::NaiveDate;
use tracing::instrument;

use super::{upsert_sql, Database};
use crate::error::{DataError, Result};
use fma_core::{VolatilityRecord, VolatilityType};

const COLUMNS: [&str; 5] = [
    "underlying_symbol",
    "date",
    "volatility_period",
    "volatility_type",
    "volatility_value",
];

/// 변동성 repository.
pub struct VolatilityRepository {
    db: Database,
}

impl VolatilityRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 변동성 레코드를 하나의 트랜잭션으로 upsert합니다.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn upsert_batch(&self, records: &[VolatilityRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let sql = upsert_sql(
            "volatility_data",
            &COLUMNS,
            &["underlying_symbol", "date", "volatility_period", "volatility_type"],
            false,
        );
        let mut tx = self.db.pool().begin().await?;
        for record in records {
            sqlx::query(&sql)
                .bind(&record.underlying_symbol)
                .bind(record.date)
                .bind(i64::from(record.window))
                .bind(record.volatility_type.as_str())
                .bind(record.value)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(records.len())
    }

    /// 심볼/유형/윈도우의 변동성 시계열 (오래된 순).
    pub async fn series(
        &self,
        symbol: &str,
        volatility_type: VolatilityType,
        window: u32,
    ) -> Result<Vec<VolatilityRecord>> {
        let rows: Vec<(NaiveDate, i64, String, f64)> = sqlx::query_as(
            r#"
            SELECT date, volatility_period, volatility_type, volatility_value
            FROM volatility_data
            WHERE underlying_symbol = ? AND volatility_type = ? AND volatility_period = ?
            ORDER BY date
            "#,
        )
        .bind(symbol)
        .bind(volatility_type.as_str())
        .bind(i64::from(window))
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter()
            .map(|(date, period, kind, value)| {
                Ok(VolatilityRecord {
                    underlying_symbol: symbol.to_string(),
                    date,
                    window: u32::try_from(period)
                        .map_err(|e| DataError::QueryError(e.to_string()))?,
                    volatility_type: kind.parse().map_err(DataError::QueryError)?,
                    value,
                })
            })
            .collect()
    }
}
