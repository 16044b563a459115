//! FRED (Federal Reserve Economic Data) 클라이언트.
//!
//! `series/observations` 엔드포인트에서 거시경제 시계열 관측치를 가져옵니다.
//! 결측 관측치는 값이 `"."`로 옵니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{MacroSeriesProvider, ProviderError, ProviderResult};
use fma_core::coerce::DATE_FORMAT;
use fma_core::IndicatorSeries;

/// FRED 시계열 출처 라벨.
pub const FRED_SOURCE: &str = "FRED";

/// 단일 관측치 (원시 값).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FredObservation {
    pub date: Option<Value>,
    pub value: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Option<Vec<FredObservation>>,
    error_message: Option<String>,
}

/// 기본 수집 대상 시계열 목록.
pub fn default_indicator_catalog() -> Vec<IndicatorSeries> {
    vec![
        IndicatorSeries::new("FEDFUNDS", "Federal Funds Rate", "Percent", "Monthly", FRED_SOURCE),
        IndicatorSeries::new("UNRATE", "Unemployment Rate", "Percent", "Monthly", FRED_SOURCE),
        IndicatorSeries::new(
            "CPIAUCSL",
            "Consumer Price Index for All Urban Consumers",
            "Index 1982-84=100",
            "Monthly",
            FRED_SOURCE,
        ),
        IndicatorSeries::new(
            "GDP",
            "Gross Domestic Product",
            "Billions of Dollars",
            "Quarterly",
            FRED_SOURCE,
        ),
        IndicatorSeries::new(
            "GS10",
            "10-Year Treasury Constant Maturity Rate",
            "Percent",
            "Daily",
            FRED_SOURCE,
        ),
        IndicatorSeries::new(
            "DGS2",
            "2-Year Treasury Constant Maturity Rate",
            "Percent",
            "Daily",
            FRED_SOURCE,
        ),
        IndicatorSeries::new("VIXCLS", "CBOE Volatility Index: VIX", "Index", "Daily", FRED_SOURCE),
        IndicatorSeries::new(
            "UMCSENT",
            "University of Michigan: Consumer Sentiment",
            "Index 1966:Q1=100",
            "Monthly",
            FRED_SOURCE,
        ),
    ]
}

/// FRED HTTP 클라이언트.
#[derive(Clone)]
pub struct FredClient {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
}

impl FredClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.stlouisfed.org";

    pub fn new(api_key: Option<SecretString>, timeout: Duration) -> ProviderResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl MacroSeriesProvider for FredClient {
    fn name(&self) -> &'static str {
        "fred"
    }

    async fn fetch_observations(
        &self,
        series_code: &str,
        start: NaiveDate,
    ) -> ProviderResult<Vec<FredObservation>> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(ProviderError::MissingCredentials("FRED_API_KEY"))?;

        debug!(series = series_code, start = %start, "FRED observations 호출");

        let start = start.format(DATE_FORMAT).to_string();
        let body = self
            .client
            .get(format!("{}/fred/series/observations", self.base_url))
            .query(&[
                ("series_id", series_code),
                ("api_key", api_key.expose_secret()),
                ("file_type", "json"),
                ("observation_start", start.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: ObservationsResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Malformed(format!("FRED ({}): {}", series_code, e)))?;

        if let Some(message) = response.error_message {
            return Err(ProviderError::Rejected(message));
        }

        response
            .observations
            .ok_or_else(|| ProviderError::NoObservations(series_code.to_string()))
    }
}
