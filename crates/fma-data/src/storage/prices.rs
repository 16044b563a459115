//! `daily_prices` 테이블 repository.

use chrono::NaiveDate;
use tracing::instrument;

use super::{upsert_sql, Database};
use crate::error::Result;
use fma_core::PriceBar;

const COLUMNS: [&str; 10] = [
    "symbol",
    "date",
    "open_price",
    "high_price",
    "low_price",
    "close_price",
    "adjusted_close",
    "volume",
    "dividend_amount",
    "split_coefficient",
];

/// 일봉 repository.
pub struct PriceRepository {
    db: Database,
}

impl PriceRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 일봉 묶음을 하나의 트랜잭션으로 upsert합니다.
    #[instrument(skip(self, bars), fields(count = bars.len()))]
    pub async fn upsert_batch(&self, bars: &[PriceBar]) -> Result<usize> {
        if bars.is_empty() {
            return Ok(0);
        }

        let sql = upsert_sql("daily_prices", &COLUMNS, &["symbol", "date"], false);
        let mut tx = self.db.pool().begin().await?;
        for bar in bars {
            sqlx::query(&sql)
                .bind(&bar.symbol)
                .bind(bar.date)
                .bind(bar.open)
                .bind(bar.high)
                .bind(bar.low)
                .bind(bar.close)
                .bind(bar.adjusted_close)
                .bind(bar.volume)
                .bind(bar.dividend_amount)
                .bind(bar.split_coefficient)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(bars.len())
    }

    /// 심볼의 종가 시계열 (오래된 순, null 종가 제외).
    pub async fn closing_prices(&self, symbol: &str) -> Result<Vec<(NaiveDate, f64)>> {
        sqlx::query_as(
            r#"
            SELECT date, close_price
            FROM daily_prices
            WHERE symbol = ? AND close_price IS NOT NULL
            ORDER BY date
            "#,
        )
        .bind(symbol)
        .fetch_all(self.db.pool())
        .await
        .map_err(Into::into)
    }

    /// 심볼의 가장 최근 일봉 날짜.
    pub async fn latest_date(&self, symbol: &str) -> Result<Option<NaiveDate>> {
        let row: (Option<NaiveDate>,) =
            sqlx::query_as("SELECT MAX(date) FROM daily_prices WHERE symbol = ?")
                .bind(symbol)
                .fetch_one(self.db.pool())
                .await?;
        Ok(row.0)
    }

    /// 일봉이 저장된 심볼 목록.
    pub async fn symbols(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT symbol FROM daily_prices ORDER BY symbol")
                .fetch_all(self.db.pool())
                .await?;
        Ok(rows.into_iter().map(|(s,)| s).collect())
    }
}
