//! 외부 데이터 소스 클라이언트.
//!
//! 각 소스의 응답은 서로 다른 타입(variant)으로 모델링되며, 정규 레코드로의
//! 변환은 [`crate::mapper`]의 순수 함수가 담당합니다.
//!
//! | 소스 | 용도 | 트레잇 |
//! |---|---|---|
//! | Alpha Vantage OVERVIEW | 자산 재무 지표 (1차) | [`FundamentalsProvider`] |
//! | Yahoo quote | 경량 시세 정보 (2차) | [`QuoteInfoProvider`] |
//! | Yahoo chart | 일봉 가격 이력 | [`PriceHistoryProvider`] |
//! | FRED | 거시경제 시계열 | [`MacroSeriesProvider`] |

pub mod alpha_vantage;
pub mod fred;
pub mod yahoo;

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use thiserror::Error;

pub use alpha_vantage::{AlphaVantageClient, CompanyOverview};
pub use fred::{default_indicator_catalog, FredClient, FredObservation};
pub use yahoo::{QuoteInfo, RawBar, YahooHistoryClient, YahooQuoteClient};

/// 기본 요청 타임아웃.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 데이터 소스 오류.
///
/// 모든 변형은 호출자 입장에서 "이 소스에서 데이터를 얻지 못함"을 의미합니다.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    #[error("요청 타임아웃 ({0:?})")]
    Timeout(Duration),

    #[error("API 키 없음: {0}")]
    MissingCredentials(&'static str),

    #[error("요청 한도 초과: {0}")]
    Throttled(String),

    #[error("데이터 소스 오류: {0}")]
    Upstream(String),

    #[error("요청 거부: {0}")]
    Rejected(String),

    #[error("식별 필드 없음: {0}")]
    MissingIdentity(String),

    #[error("빈 응답: {0}")]
    Empty(String),

    #[error("관측치 없음: {0}")]
    NoObservations(String),

    #[error("응답 형식 오류: {0}")]
    Malformed(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// 자산 정보 페이로드.
///
/// 매퍼는 variant별로 별도의 순수 함수를 가집니다.
#[derive(Debug, Clone)]
pub enum ProviderPayload {
    /// Alpha Vantage 재무 개요 (가장 풍부한 형태)
    Overview(Box<CompanyOverview>),
    /// Yahoo 경량 시세 정보
    QuoteInfo(Box<QuoteInfo>),
    /// 사용 가능한 페이로드 없음
    Unavailable,
}

/// 재무 개요 제공자 (1차 소스).
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    /// 소스 이름 (로그용)
    fn name(&self) -> &'static str;

    /// 심볼의 재무 개요 조회. 식별 필드가 없거나 에러/스로틀 마커가 있으면 `Err`.
    async fn fetch_overview(&self, symbol: &str) -> ProviderResult<CompanyOverview>;
}

/// 경량 시세 정보 제공자 (2차 소스).
#[async_trait]
pub trait QuoteInfoProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// 심볼의 시세 정보 조회. 빈 응답이면 `Err`.
    async fn fetch_quote_info(&self, symbol: &str) -> ProviderResult<QuoteInfo>;
}

/// 일봉 가격 이력 제공자.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// `period` 기간(예: "1y", "2y")의 일봉 조회. 오래된 순.
    async fn fetch_history(&self, symbol: &str, period: &str) -> ProviderResult<Vec<RawBar>>;
}

/// 거시경제 시계열 제공자.
#[async_trait]
pub trait MacroSeriesProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// `start` 이후의 관측치 조회.
    async fn fetch_observations(
        &self,
        series_code: &str,
        start: NaiveDate,
    ) -> ProviderResult<Vec<FredObservation>>;
}
