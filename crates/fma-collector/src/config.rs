//! 환경변수 기반 설정 모듈.

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::CollectorError;
use crate::Result;

/// 자산 유형을 생략했을 때의 기본값
pub const DEFAULT_ASSET_TYPE: &str = "Stock";

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 데이터베이스 URL
    pub database_url: String,
    /// 데이터 소스 설정
    pub providers: ProviderConfig,
    /// 자산/일봉 수집 설정
    pub asset_collect: AssetCollectConfig,
    /// 거시경제 지표 수집 설정
    pub indicator_collect: IndicatorCollectConfig,
    /// 실현 변동성 설정
    pub volatility: VolatilityConfig,
}

/// 데이터 소스 설정
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Alpha Vantage API 키 (없으면 1차 소스를 건너뜀)
    pub alpha_vantage_api_key: Option<SecretString>,
    /// FRED API 키 (없으면 지표 수집을 건너뜀)
    pub fred_api_key: Option<SecretString>,
    /// 호출당 타임아웃 (초)
    pub timeout_secs: u64,
    pub alpha_vantage_base_url: Option<String>,
    pub yahoo_base_url: Option<String>,
    pub fred_base_url: Option<String>,
}

/// 자산/일봉 수집 설정
#[derive(Debug, Clone)]
pub struct AssetCollectConfig {
    /// 수집 대상 (입력 순서대로 처리)
    pub symbols: Vec<AssetRequest>,
    /// 항목 간 최소 간격 (밀리초)
    pub request_delay_ms: u64,
    /// 일봉 조회 기간 (예: "2y")
    pub price_period: String,
}

/// 거시경제 지표 수집 설정
#[derive(Debug, Clone)]
pub struct IndicatorCollectConfig {
    pub enabled: bool,
    /// 시리즈 간 최소 간격 (밀리초)
    pub request_delay_ms: u64,
    /// 관측 시작일
    pub start_date: NaiveDate,
}

/// 실현 변동성 설정
#[derive(Debug, Clone)]
pub struct VolatilityConfig {
    pub enabled: bool,
    /// 롤링 윈도우 (관측치 수)
    pub window: u32,
}

/// 수집 요청 한 건: 심볼과 자산 유형 라벨.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRequest {
    pub symbol: String,
    pub asset_type: String,
}

impl AssetRequest {
    pub fn new(symbol: impl Into<String>, asset_type: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            asset_type: asset_type.into(),
        }
    }
}

impl fmt::Display for AssetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.symbol, self.asset_type)
    }
}

impl FromStr for AssetRequest {
    type Err = CollectorError;

    /// `"AAPL:Stock"` 또는 `"AAPL"` (유형 생략 시 Stock).
    fn from_str(s: &str) -> Result<Self> {
        let (symbol, asset_type) = match s.split_once(':') {
            Some((symbol, asset_type)) => (symbol.trim(), asset_type.trim()),
            None => (s.trim(), DEFAULT_ASSET_TYPE),
        };
        if symbol.is_empty() || asset_type.is_empty() {
            return Err(CollectorError::Config(format!("잘못된 수집 대상: {:?}", s)));
        }
        Ok(Self::new(symbol.to_uppercase(), asset_type))
    }
}

/// 쉼표로 구분된 수집 대상 목록 파싱 (`"SPY:ETF,AAPL:Stock"`).
pub fn parse_asset_list(raw: &str) -> Result<Vec<AssetRequest>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<AssetRequest>)
        .collect()
}

/// 기본 수집 대상: 지수/섹터 ETF, 대형주, 채권/원자재/리츠.
pub fn recommended_universe() -> Vec<AssetRequest> {
    const UNIVERSE: [(&str, &str); 28] = [
        // 지수 ETF
        ("SPY", "ETF"),
        ("QQQ", "ETF"),
        ("IWM", "ETF"),
        ("VTI", "ETF"),
        // 섹터 ETF
        ("XLK", "ETF"),
        ("XLF", "ETF"),
        ("XLE", "ETF"),
        ("XLV", "ETF"),
        ("XLI", "ETF"),
        ("XLY", "ETF"),
        ("XLP", "ETF"),
        ("XLU", "ETF"),
        ("XLRE", "ETF"),
        ("XLB", "ETF"),
        // 대형주
        ("AAPL", "Stock"),
        ("MSFT", "Stock"),
        ("GOOGL", "Stock"),
        ("AMZN", "Stock"),
        ("TSLA", "Stock"),
        ("NVDA", "Stock"),
        ("JPM", "Stock"),
        ("JNJ", "Stock"),
        ("V", "Stock"),
        ("PG", "Stock"),
        // 채권/원자재/리츠
        ("TLT", "ETF"),
        ("SHY", "ETF"),
        ("GLD", "ETF"),
        ("VNQ", "ETF"),
    ];
    UNIVERSE
        .iter()
        .map(|(symbol, asset_type)| AssetRequest::new(*symbol, *asset_type))
        .collect()
}

/// 자산 항목 간 기본 간격 (무료 API 한도 기준)
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 12_000;
/// 지표 시리즈 간 기본 간격
pub const DEFAULT_INDICATOR_DELAY_MS: u64 = 500;
/// 기본 일봉 조회 기간
pub const DEFAULT_PRICE_PERIOD: &str = "2y";
/// 지표 관측 기본 시작일 (오늘 기준 일 수)
pub const DEFAULT_INDICATOR_LOOKBACK_DAYS: i64 = 730;
/// 기본 호출 타임아웃 (초)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl CollectorConfig {
    /// 기본값으로 설정 생성. API 키는 비어 있습니다.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            providers: ProviderConfig {
                alpha_vantage_api_key: None,
                fred_api_key: None,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                alpha_vantage_base_url: None,
                yahoo_base_url: None,
                fred_base_url: None,
            },
            asset_collect: AssetCollectConfig {
                symbols: recommended_universe(),
                request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
                price_period: DEFAULT_PRICE_PERIOD.to_string(),
            },
            indicator_collect: IndicatorCollectConfig {
                enabled: true,
                request_delay_ms: DEFAULT_INDICATOR_DELAY_MS,
                start_date: (Utc::now() - ChronoDuration::days(DEFAULT_INDICATOR_LOOKBACK_DAYS))
                    .date_naive(),
            },
            volatility: VolatilityConfig {
                enabled: true,
                window: fma_analytics::DEFAULT_VOLATILITY_WINDOW,
            },
        }
    }

    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL").map_err(|_| {
            CollectorError::Config("DATABASE_URL 환경변수가 설정되지 않았습니다".to_string())
        })?;
        let mut config = Self::new(database_url);

        if let Ok(raw) = std::env::var("COLLECT_SYMBOLS") {
            if !raw.trim().is_empty() {
                config.asset_collect.symbols = parse_asset_list(&raw)?;
            }
        }

        if let Ok(raw) = std::env::var("INDICATOR_START_DATE") {
            config.indicator_collect.start_date =
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
                    CollectorError::Config(format!("INDICATOR_START_DATE 형식 오류 ({}): {}", raw, e))
                })?;
        }

        let providers = &mut config.providers;
        providers.alpha_vantage_api_key = env_var_secret("ALPHA_VANTAGE_API_KEY");
        providers.fred_api_key = env_var_secret("FRED_API_KEY");
        providers.timeout_secs = env_var_parse("PROVIDER_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);
        providers.alpha_vantage_base_url = std::env::var("ALPHA_VANTAGE_BASE_URL").ok();
        providers.yahoo_base_url = std::env::var("YAHOO_BASE_URL").ok();
        providers.fred_base_url = std::env::var("FRED_BASE_URL").ok();

        let assets = &mut config.asset_collect;
        assets.request_delay_ms =
            env_var_parse("COLLECT_REQUEST_DELAY_MS", DEFAULT_REQUEST_DELAY_MS);
        if let Ok(period) = std::env::var("COLLECT_PRICE_PERIOD") {
            assets.price_period = period;
        }

        let indicators = &mut config.indicator_collect;
        indicators.enabled = env_var_bool("COLLECT_INDICATORS", true);
        indicators.request_delay_ms =
            env_var_parse("INDICATOR_REQUEST_DELAY_MS", DEFAULT_INDICATOR_DELAY_MS);

        let volatility = &mut config.volatility;
        volatility.enabled = env_var_bool("COLLECT_VOLATILITY", true);
        volatility.window = env_var_parse("VOLATILITY_WINDOW", volatility.window);

        config.validate()?;
        Ok(config)
    }

    /// 값 범위 검증. 0초 타임아웃과 2 미만의 변동성 윈도우는 거부합니다.
    pub fn validate(&self) -> Result<()> {
        if self.providers.timeout_secs == 0 {
            return Err(CollectorError::Config(
                "PROVIDER_TIMEOUT_SECS는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.volatility.window < 2 {
            return Err(CollectorError::Config(format!(
                "VOLATILITY_WINDOW는 2 이상이어야 합니다 (현재 {})",
                self.volatility.window
            )));
        }
        Ok(())
    }
}

impl ProviderConfig {
    /// 호출당 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AssetCollectConfig {
    /// 항목 간 최소 간격을 Duration으로 반환
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl IndicatorCollectConfig {
    /// 시리즈 간 최소 간격을 Duration으로 반환
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 환경변수에서 bool 값 파싱
fn env_var_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

/// 비어 있지 않은 비밀 값
fn env_var_secret(key: &str) -> Option<SecretString> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_asset_request() {
        let req: AssetRequest = "spy:ETF".parse().unwrap();
        assert_eq!(req, AssetRequest::new("SPY", "ETF"));

        let req: AssetRequest = " AAPL ".parse().unwrap();
        assert_eq!(req.asset_type, DEFAULT_ASSET_TYPE);

        assert!(":ETF".parse::<AssetRequest>().is_err());
        assert!("SPY:".parse::<AssetRequest>().is_err());
    }

    #[test]
    fn test_parse_asset_list_keeps_order() {
        let list = parse_asset_list("QQQ:ETF, AAPL:Stock,,TLT:ETF").unwrap();
        let symbols: Vec<&str> = list.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["QQQ", "AAPL", "TLT"]);
        assert!(parse_asset_list("SPY:ETF,:Stock").is_err());
    }

    #[test]
    fn test_recommended_universe() {
        let universe = recommended_universe();
        assert_eq!(universe.len(), 28);
        assert_eq!(universe[0], AssetRequest::new("SPY", "ETF"));
        assert!(universe.iter().any(|r| r.symbol == "AAPL" && r.asset_type == "Stock"));
    }

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::new("sqlite::memory:");
        assert_eq!(config.asset_collect.request_delay(), Duration::from_secs(12));
        assert_eq!(config.asset_collect.price_period, "2y");
        assert_eq!(config.providers.timeout(), Duration::from_secs(30));
        assert_eq!(config.volatility.window, 30);
        assert!(config.providers.alpha_vantage_api_key.is_none());
        assert_eq!(config.asset_collect.symbols.len(), 28);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = CollectorConfig::new("sqlite::memory:");
        config.providers.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(CollectorError::Config(_))));

        config.providers.timeout_secs = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_volatility_window() {
        let mut config = CollectorConfig::new("sqlite::memory:");
        for window in [0, 1] {
            config.volatility.window = window;
            assert!(matches!(config.validate(), Err(CollectorError::Config(_))));
        }
        config.volatility.window = 2;
        assert!(config.validate().is_ok());
    }
}
