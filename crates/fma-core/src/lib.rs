//! # FMA Core
//!
//! 금융 시장 데이터 수집 시스템의 공통 타입을 제공합니다:
//! - 정규 레코드 (자산, 일봉, 거시 지표, 변동성, 섹터 스냅샷)
//! - 필드 변환 (센티넬/파싱 실패 → null)
//! - 로깅 초기화

pub mod coerce;
pub mod domain;
pub mod logging;

pub use domain::*;
pub use logging::{init_logging, LogConfig, LogFormat};
