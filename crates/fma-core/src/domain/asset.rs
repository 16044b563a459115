//! 자산(Asset) 정규 레코드.
//!
//! 데이터 소스와 무관하게 `assets` 테이블에 저장되는 단일 형태입니다.
//! 식별자는 `symbol`이며, 같은 심볼을 다시 수집하면 행 전체가 교체됩니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 통화 기본값.
pub const DEFAULT_CURRENCY: &str = "USD";

/// 자산 정규 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// 심볼 (고유 식별자)
    pub symbol: String,
    /// 자산명
    pub name: Option<String>,
    /// 사업 설명
    pub description: Option<String>,
    /// SEC CIK 코드
    pub cik: Option<String>,
    /// 거래소
    pub exchange: Option<String>,
    /// 통화
    pub currency: Option<String>,
    /// 국가
    pub country: Option<String>,
    /// 섹터
    pub sector: Option<String>,
    /// 산업
    pub industry: Option<String>,
    /// 자산 유형 라벨 (Stock, ETF, ...)
    pub asset_type: String,
    /// 재무 지표
    #[serde(flatten)]
    pub fundamentals: Fundamentals,
}

impl Asset {
    /// 식별자와 유형만 있는 최소 레코드.
    ///
    /// 모든 데이터 소스가 실패했을 때 사용합니다. 재무 지표는 모두 null입니다.
    pub fn minimal(symbol: impl Into<String>, asset_type: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            name: Some(symbol.clone()),
            symbol,
            description: None,
            cik: None,
            exchange: None,
            currency: Some(DEFAULT_CURRENCY.to_string()),
            country: None,
            sector: None,
            industry: None,
            asset_type: asset_type.into(),
            fundamentals: Fundamentals::default(),
        }
    }
}

/// 재무 지표.
///
/// 값이 없거나 파싱할 수 없는 필드는 항상 `None`입니다 (센티넬 문자열은 저장하지 않음).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    // 규모
    pub market_capitalization: Option<i64>,
    pub ebitda: Option<i64>,
    pub shares_outstanding: Option<i64>,
    pub revenue_ttm: Option<i64>,
    pub gross_profit_ttm: Option<i64>,

    // 밸류에이션
    pub pe_ratio: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_sales_ratio_ttm: Option<f64>,
    pub price_to_book_ratio: Option<f64>,
    pub ev_to_revenue: Option<f64>,
    pub ev_to_ebitda: Option<f64>,
    pub analyst_target_price: Option<f64>,

    // 주당 지표
    pub book_value: Option<f64>,
    pub eps: Option<f64>,
    pub diluted_eps_ttm: Option<f64>,
    pub revenue_per_share_ttm: Option<f64>,

    // 배당
    pub dividend_per_share: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub dividend_date: Option<NaiveDate>,
    pub ex_dividend_date: Option<NaiveDate>,

    // 수익성 / 성장성
    pub profit_margin: Option<f64>,
    pub operating_margin_ttm: Option<f64>,
    pub return_on_assets_ttm: Option<f64>,
    pub return_on_equity_ttm: Option<f64>,
    pub quarterly_earnings_growth_yoy: Option<f64>,
    pub quarterly_revenue_growth_yoy: Option<f64>,

    // 가격 통계
    pub beta: Option<f64>,
    pub week_52_high: Option<f64>,
    pub week_52_low: Option<f64>,
    pub day_50_moving_average: Option<f64>,
    pub day_200_moving_average: Option<f64>,
}

impl Fundamentals {
    /// 모든 지표가 비어 있는지 확인.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_asset() {
        let asset = Asset::minimal("AXON", "Stock");
        assert_eq!(asset.symbol, "AXON");
        assert_eq!(asset.name.as_deref(), Some("AXON"));
        assert_eq!(asset.asset_type, "Stock");
        assert_eq!(asset.currency.as_deref(), Some(DEFAULT_CURRENCY));
        assert!(asset.sector.is_none());
        assert!(asset.fundamentals.is_empty());
    }
}
