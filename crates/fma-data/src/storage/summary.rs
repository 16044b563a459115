//! 저장 데이터 요약 조회.

use chrono::NaiveDate;
use serde::Serialize;

use super::Database;
use crate::error::Result;

/// 요약 대상 테이블.
pub const TABLES: [&str; 5] = [
    "assets",
    "daily_prices",
    "economic_indicators",
    "volatility_data",
    "sector_performance",
];

/// 자산 유형별 집계.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetTypeBreakdown {
    pub asset_type: String,
    pub count: i64,
    pub total_market_cap: Option<i64>,
}

/// 섹터별 집계.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorBreakdown {
    pub sector: String,
    pub count: i64,
    pub avg_pe_ratio: Option<f64>,
}

/// 일봉 커버리지.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceCoverage {
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub symbols: i64,
}

/// 전체 요약.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    /// (테이블, 행 수)
    pub table_counts: Vec<(String, i64)>,
    pub asset_types: Vec<AssetTypeBreakdown>,
    /// 자산 수 상위 10개 섹터
    pub top_sectors: Vec<SectorBreakdown>,
    pub prices: PriceCoverage,
}

/// 요약 조회 repository.
pub struct SummaryRepository {
    db: Database,
}

impl SummaryRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn summary(&self) -> Result<DataSummary> {
        let mut table_counts = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(self.db.pool())
                .await?;
            table_counts.push((table.to_string(), count));
        }

        let asset_types: Vec<(String, i64, Option<i64>)> = sqlx::query_as(
            r#"
            SELECT asset_type, COUNT(*), SUM(market_capitalization)
            FROM assets
            WHERE is_active = TRUE
            GROUP BY asset_type
            ORDER BY COUNT(*) DESC, asset_type
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let top_sectors: Vec<(String, i64, Option<f64>)> = sqlx::query_as(
            r#"
            SELECT sector, COUNT(*), AVG(pe_ratio)
            FROM assets
            WHERE is_active = TRUE AND sector IS NOT NULL AND sector != ''
            GROUP BY sector
            ORDER BY COUNT(*) DESC, sector
            LIMIT 10
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let (first_date, last_date, symbols): (Option<NaiveDate>, Option<NaiveDate>, i64) =
            sqlx::query_as(
                "SELECT MIN(date), MAX(date), COUNT(DISTINCT symbol) FROM daily_prices",
            )
            .fetch_one(self.db.pool())
            .await?;

        Ok(DataSummary {
            table_counts,
            asset_types: asset_types
                .into_iter()
                .map(|(asset_type, count, total_market_cap)| AssetTypeBreakdown {
                    asset_type,
                    count,
                    total_market_cap,
                })
                .collect(),
            top_sectors: top_sectors
                .into_iter()
                .map(|(sector, count, avg_pe_ratio)| SectorBreakdown {
                    sector,
                    count,
                    avg_pe_ratio,
                })
                .collect(),
            prices: PriceCoverage {
                first_date,
                last_date,
                symbols,
            },
        })
    }
}
