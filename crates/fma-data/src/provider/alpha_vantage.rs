//! Alpha Vantage OVERVIEW 클라이언트.
//!
//! 자산의 기본 정보와 재무 지표를 제공하는 1차 소스입니다.
//! 응답은 사람이 읽는 필드명(`MarketCapitalization`, `PERatio`, `52WeekHigh` 등)을 키로 하는
//! 평면 JSON이며 모든 값이 문자열입니다.
//!
//! 무료 등급은 하루 호출 수가 제한되어 있어 한도를 넘으면 `Note` 또는 `Information`
//! 필드만 담긴 응답이 옵니다.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{FundamentalsProvider, ProviderError, ProviderResult};

/// Alpha Vantage 재무 개요 응답.
///
/// 값은 원시 JSON 그대로 보관하고 변환은 매퍼에서 수행합니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyOverview {
    #[serde(rename = "Symbol")]
    pub symbol: Option<Value>,
    #[serde(rename = "AssetType")]
    pub asset_type: Option<Value>,
    #[serde(rename = "Name")]
    pub name: Option<Value>,
    #[serde(rename = "Description")]
    pub description: Option<Value>,
    #[serde(rename = "CIK")]
    pub cik: Option<Value>,
    #[serde(rename = "Exchange")]
    pub exchange: Option<Value>,
    #[serde(rename = "Currency")]
    pub currency: Option<Value>,
    #[serde(rename = "Country")]
    pub country: Option<Value>,
    #[serde(rename = "Sector")]
    pub sector: Option<Value>,
    #[serde(rename = "Industry")]
    pub industry: Option<Value>,
    #[serde(rename = "MarketCapitalization")]
    pub market_capitalization: Option<Value>,
    #[serde(rename = "EBITDA")]
    pub ebitda: Option<Value>,
    #[serde(rename = "PERatio")]
    pub pe_ratio: Option<Value>,
    #[serde(rename = "PEGRatio")]
    pub peg_ratio: Option<Value>,
    #[serde(rename = "BookValue")]
    pub book_value: Option<Value>,
    #[serde(rename = "DividendPerShare")]
    pub dividend_per_share: Option<Value>,
    #[serde(rename = "DividendYield")]
    pub dividend_yield: Option<Value>,
    #[serde(rename = "EPS")]
    pub eps: Option<Value>,
    #[serde(rename = "RevenuePerShareTTM")]
    pub revenue_per_share_ttm: Option<Value>,
    #[serde(rename = "ProfitMargin")]
    pub profit_margin: Option<Value>,
    #[serde(rename = "OperatingMarginTTM")]
    pub operating_margin_ttm: Option<Value>,
    #[serde(rename = "ReturnOnAssetsTTM")]
    pub return_on_assets_ttm: Option<Value>,
    #[serde(rename = "ReturnOnEquityTTM")]
    pub return_on_equity_ttm: Option<Value>,
    #[serde(rename = "RevenueTTM")]
    pub revenue_ttm: Option<Value>,
    #[serde(rename = "GrossProfitTTM")]
    pub gross_profit_ttm: Option<Value>,
    #[serde(rename = "DilutedEPSTTM")]
    pub diluted_eps_ttm: Option<Value>,
    #[serde(rename = "QuarterlyEarningsGrowthYOY")]
    pub quarterly_earnings_growth_yoy: Option<Value>,
    #[serde(rename = "QuarterlyRevenueGrowthYOY")]
    pub quarterly_revenue_growth_yoy: Option<Value>,
    #[serde(rename = "AnalystTargetPrice")]
    pub analyst_target_price: Option<Value>,
    #[serde(rename = "TrailingPE")]
    pub trailing_pe: Option<Value>,
    #[serde(rename = "ForwardPE")]
    pub forward_pe: Option<Value>,
    #[serde(rename = "PriceToSalesRatioTTM")]
    pub price_to_sales_ratio_ttm: Option<Value>,
    #[serde(rename = "PriceToBookRatio")]
    pub price_to_book_ratio: Option<Value>,
    #[serde(rename = "EVToRevenue")]
    pub ev_to_revenue: Option<Value>,
    #[serde(rename = "EVToEBITDA")]
    pub ev_to_ebitda: Option<Value>,
    #[serde(rename = "Beta")]
    pub beta: Option<Value>,
    #[serde(rename = "52WeekHigh")]
    pub week_52_high: Option<Value>,
    #[serde(rename = "52WeekLow")]
    pub week_52_low: Option<Value>,
    #[serde(rename = "50DayMovingAverage")]
    pub day_50_moving_average: Option<Value>,
    #[serde(rename = "200DayMovingAverage")]
    pub day_200_moving_average: Option<Value>,
    #[serde(rename = "SharesOutstanding")]
    pub shares_outstanding: Option<Value>,
    #[serde(rename = "DividendDate")]
    pub dividend_date: Option<Value>,
    #[serde(rename = "ExDividendDate")]
    pub ex_dividend_date: Option<Value>,

    // 에러/스로틀 마커
    #[serde(rename = "Note")]
    pub note: Option<Value>,
    #[serde(rename = "Information")]
    pub information: Option<Value>,
    #[serde(rename = "Error Message")]
    pub error_message: Option<Value>,
}

impl CompanyOverview {
    /// 사용 가능한 응답인지 검증합니다.
    ///
    /// 스로틀/에러 마커가 있거나 `Symbol`이 비어 있으면 실패합니다.
    pub fn validate(self) -> ProviderResult<Self> {
        if let Some(note) = self.note.as_ref().or(self.information.as_ref()) {
            return Err(ProviderError::Throttled(marker_text(note)));
        }
        if let Some(message) = &self.error_message {
            return Err(ProviderError::Rejected(marker_text(message)));
        }
        match fma_core::coerce::text(self.symbol.as_ref()) {
            Some(_) => Ok(self),
            None => Err(ProviderError::MissingIdentity("Symbol".to_string())),
        }
    }
}

fn marker_text(value: &Value) -> String {
    value
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

/// Alpha Vantage HTTP 클라이언트.
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
}

impl AlphaVantageClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.alphavantage.co";

    /// 클라이언트 생성. API 키가 없으면 모든 조회가 `MissingCredentials`로 실패합니다.
    pub fn new(api_key: Option<SecretString>, timeout: Duration) -> ProviderResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// 기본 URL 변경 (테스트/프록시용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl FundamentalsProvider for AlphaVantageClient {
    fn name(&self) -> &'static str {
        "alpha_vantage"
    }

    async fn fetch_overview(&self, symbol: &str) -> ProviderResult<CompanyOverview> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(ProviderError::MissingCredentials("ALPHA_VANTAGE_API_KEY"))?;

        debug!(symbol = symbol, "Alpha Vantage OVERVIEW 호출");

        let body = self
            .client
            .get(format!("{}/query", self.base_url))
            .query(&[
                ("function", "OVERVIEW"),
                ("symbol", symbol),
                ("apikey", api_key.expose_secret()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let overview: CompanyOverview = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Malformed(format!("OVERVIEW ({}): {}", symbol, e)))?;

        overview.validate()
    }
}
