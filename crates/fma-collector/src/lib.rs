//! 금융 시장 데이터 수집기.
//!
//! 이 crate는 외부 데이터 소스에서 시장 데이터를 수집하는 바이너리를 제공합니다:
//! - 자산 재무 정보 (Alpha Vantage → Yahoo 시세 → 최소 레코드 순 대체)
//! - 일봉 가격 이력 (Yahoo Finance)
//! - 거시경제 지표 (FRED)
//! - 파생 지표 (실현 변동성, 섹터 성과)
//!
//! 모든 외부 호출은 [`runner::BatchRunner`]를 통해 순차적으로, 최소 간격을 두고 실행됩니다.

pub mod config;
pub mod context;
pub mod error;
pub mod modules;
pub mod pipeline;
pub mod rate_limit;
pub mod resolver;
pub mod runner;
pub mod stats;

pub use config::{AssetRequest, CollectorConfig};
pub use context::RunContext;
pub use error::{CollectorError, Result};
pub use pipeline::{Pipeline, Providers, Repositories, RunReport};
pub use rate_limit::{RateGate, Timer, TokioTimer};
pub use resolver::{AssetSource, ResolvedAsset, SourceResolver};
pub use runner::{BatchRunner, Completed, WorkHandler};
pub use stats::{BatchOutcome, ItemOutcome, ItemReport};
