//! Yahoo Finance 클라이언트.
//!
//! - [`YahooQuoteClient`]: `/v7/finance/quote` 경량 시세 정보 (자산 정보 2차 소스)
//! - [`YahooHistoryClient`]: `yahoo_finance_api` 기반 일봉 이력 (배당/분할 이벤트 포함)

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use yahoo_finance_api as yahoo;

use super::{PriceHistoryProvider, ProviderError, ProviderResult, QuoteInfoProvider};
use fma_core::coerce;

/// Yahoo 경량 시세 정보.
///
/// 값은 숫자 또는 문자열로 올 수 있어 원시 JSON 그대로 보관합니다.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInfo {
    pub symbol: Option<Value>,
    pub long_name: Option<Value>,
    pub long_business_summary: Option<Value>,
    pub exchange: Option<Value>,
    pub currency: Option<Value>,
    pub country: Option<Value>,
    pub sector: Option<Value>,
    pub industry: Option<Value>,
    pub market_cap: Option<Value>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<Value>,
    pub book_value: Option<Value>,
    pub dividend_yield: Option<Value>,
    #[serde(alias = "epsTrailingTwelveMonths")]
    pub trailing_eps: Option<Value>,
    pub beta: Option<Value>,
    pub fifty_two_week_high: Option<Value>,
    pub fifty_two_week_low: Option<Value>,
    pub fifty_day_average: Option<Value>,
    pub two_hundred_day_average: Option<Value>,
    pub shares_outstanding: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteEnvelope {
    quote_response: QuoteResponse,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    result: Vec<QuoteInfo>,
    error: Option<Value>,
}

/// Yahoo 시세 정보 HTTP 클라이언트.
#[derive(Clone)]
pub struct YahooQuoteClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooQuoteClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://query1.finance.yahoo.com";

    pub fn new(timeout: Duration) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()?;
        Ok(Self {
            client,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl QuoteInfoProvider for YahooQuoteClient {
    fn name(&self) -> &'static str {
        "yahoo_quote"
    }

    async fn fetch_quote_info(&self, symbol: &str) -> ProviderResult<QuoteInfo> {
        debug!(symbol = symbol, "Yahoo quote 호출");

        let body = self
            .client
            .get(format!("{}/v7/finance/quote", self.base_url))
            .query(&[("symbols", symbol)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let envelope: QuoteEnvelope = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Malformed(format!("quote ({}): {}", symbol, e)))?;

        if let Some(error) = envelope.quote_response.error.filter(|e| !e.is_null()) {
            return Err(ProviderError::Rejected(error.to_string()));
        }

        envelope
            .quote_response
            .result
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Empty(symbol.to_string()))
    }
}

/// 일봉 원시 데이터.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    /// Unix timestamp (초)
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjclose: f64,
    pub volume: u64,
    /// 해당 일자의 배당금
    pub dividend: Option<f64>,
    /// 해당 일자의 분할 비율 (numerator / denominator)
    pub split: Option<f64>,
}

/// `yahoo_finance_api` 기반 가격 이력 클라이언트.
pub struct YahooHistoryClient {
    connector: yahoo::YahooConnector,
    timeout: Duration,
}

impl YahooHistoryClient {
    pub fn new(timeout: Duration) -> ProviderResult<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| ProviderError::Upstream(format!("Yahoo 커넥터 생성 실패: {}", e)))?;
        Ok(Self { connector, timeout })
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooHistoryClient {
    fn name(&self) -> &'static str {
        "yahoo_chart"
    }

    async fn fetch_history(&self, symbol: &str, period: &str) -> ProviderResult<Vec<RawBar>> {
        debug!(symbol = symbol, period = period, "Yahoo 일봉 이력 호출");

        let response = tokio::time::timeout(
            self.timeout,
            self.connector.get_quote_range(symbol, "1d", period),
        )
        .await
        .map_err(|_| ProviderError::Timeout(self.timeout))?
        .map_err(|e| ProviderError::Upstream(format!("Yahoo chart ({}): {}", symbol, e)))?;

        let quotes = response
            .quotes()
            .map_err(|e| ProviderError::Malformed(format!("Quote 파싱 오류: {}", e)))?;

        // 이벤트가 없으면 빈 목록
        let dividends: HashMap<NaiveDate, f64> = response
            .dividends()
            .unwrap_or_default()
            .iter()
            .filter_map(|d| Some((coerce::date_from_timestamp(d.date as i64)?, d.amount as f64)))
            .collect();
        let splits: HashMap<NaiveDate, f64> = response
            .splits()
            .unwrap_or_default()
            .iter()
            .filter_map(|s| {
                let ratio = coerce::finite(s.numerator as f64 / s.denominator as f64)?;
                Some((coerce::date_from_timestamp(s.date as i64)?, ratio))
            })
            .collect();

        let mut bars: Vec<RawBar> = quotes
            .iter()
            .map(|q| {
                let timestamp = q.timestamp as i64;
                let day = coerce::date_from_timestamp(timestamp);
                RawBar {
                    timestamp,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    adjclose: q.adjclose,
                    volume: q.volume,
                    dividend: day.and_then(|d| dividends.get(&d).copied()),
                    split: day.and_then(|d| splits.get(&d).copied()),
                }
            })
            .collect();
        bars.sort_by_key(|b| b.timestamp);

        Ok(bars)
    }
}
