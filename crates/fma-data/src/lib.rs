//! 데이터 소스 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - 외부 데이터 소스 클라이언트 (Alpha Vantage, Yahoo Finance, FRED)
//! - 소스별 페이로드 → 정규 레코드 매퍼
//! - SQLite 저장소 (자연 키 기준 upsert)

pub mod error;
pub mod mapper;
pub mod provider;
pub mod storage;

pub use error::{DataError, Result};

// 데이터 소스 재내보내기
pub use provider::{
    default_indicator_catalog, AlphaVantageClient, CompanyOverview, FredClient, FredObservation,
    FundamentalsProvider, MacroSeriesProvider, PriceHistoryProvider, ProviderError,
    ProviderPayload, ProviderResult, QuoteInfo, QuoteInfoProvider, RawBar, YahooHistoryClient,
    YahooQuoteClient,
};

// 저장소 타입 재내보내기
pub use storage::{
    AssetRepository, Database, DatabaseConfig, DataSummary, IndicatorRepository, PriceRepository,
    SectorRepository, SummaryRepository, VolatilityRepository,
};
