//! `sector_performance` 테이블 repository.

use chrono::NaiveDate;
use tracing::instrument;

use super::{upsert_sql, Database};
use crate::error::Result;
use fma_core::SectorPerformanceSnapshot;

const COLUMNS: [&str; 6] = [
    "sector",
    "date",
    "number_of_assets",
    "total_market_cap",
    "avg_pe_ratio",
    "avg_dividend_yield",
];

/// 섹터 성과 repository.
pub struct SectorRepository {
    db: Database,
}

impl SectorRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 스냅샷을 하나의 트랜잭션으로 upsert합니다. 같은 날짜의 재계산은 행을 교체합니다.
    #[instrument(skip(self, snapshots), fields(count = snapshots.len()))]
    pub async fn upsert_batch(&self, snapshots: &[SectorPerformanceSnapshot]) -> Result<usize> {
        if snapshots.is_empty() {
            return Ok(0);
        }

        let sql = upsert_sql("sector_performance", &COLUMNS, &["sector", "date"], false);
        let mut tx = self.db.pool().begin().await?;
        for s in snapshots {
            sqlx::query(&sql)
                .bind(&s.sector)
                .bind(s.date)
                .bind(s.number_of_assets)
                .bind(s.total_market_cap)
                .bind(s.avg_pe_ratio)
                .bind(s.avg_dividend_yield)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(snapshots.len())
    }

    /// 특정 날짜의 스냅샷 (섹터 이름 순).
    pub async fn for_date(&self, date: NaiveDate) -> Result<Vec<SectorPerformanceSnapshot>> {
        let rows: Vec<(String, NaiveDate, i64, Option<i64>, Option<f64>, Option<f64>)> =
            sqlx::query_as(
                r#"
                SELECT sector, date, number_of_assets, total_market_cap, avg_pe_ratio, avg_dividend_yield
                FROM sector_performance
                WHERE date = ?
                ORDER BY sector
                "#,
            )
            .bind(date)
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(sector, date, number_of_assets, total_market_cap, avg_pe_ratio, avg_dividend_yield)| {
                    SectorPerformanceSnapshot {
                        sector,
                        date,
                        number_of_assets,
                        total_market_cap,
                        avg_pe_ratio,
                        avg_dividend_yield,
                    }
                },
            )
            .collect())
    }
}
