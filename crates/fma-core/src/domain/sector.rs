//! 섹터 성과 스냅샷.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 섹터 집계에 필요한 자산 밸류에이션 값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetValuation {
    pub symbol: String,
    pub sector: Option<String>,
    pub market_capitalization: Option<i64>,
    pub pe_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
}

/// 섹터별 집계 스냅샷. 식별자는 `(sector, date)`.
///
/// 모든 값은 저장된 자산 레코드에서 계산되며 외부에서 받지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorPerformanceSnapshot {
    pub sector: String,
    pub date: NaiveDate,
    /// 섹터 내 전체 자산 수 (null 시가총액 포함)
    pub number_of_assets: i64,
    /// 시가총액 합계 (null 제외, 모두 null이면 None)
    pub total_market_cap: Option<i64>,
    pub avg_pe_ratio: Option<f64>,
    pub avg_dividend_yield: Option<f64>,
}
