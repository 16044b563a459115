//! 에러 타입 정의.

use fma_data::{DataError, ProviderError};
use thiserror::Error;

/// Collector 에러 타입
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),

    /// 저장소 에러
    #[error("Storage error: {0}")]
    Data(#[from] DataError),

    /// 데이터 소스 에러 (Alpha Vantage, Yahoo, FRED)
    #[error("Data source error: {0}")]
    Provider(#[from] ProviderError),

    /// 항목의 모든 쓰기가 실패
    #[error("Nothing written for {key}: {reason}")]
    NothingWritten { key: String, reason: String },
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
