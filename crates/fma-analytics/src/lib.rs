//! 파생 지표 계산.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 실현 변동성 (롤링 표준편차 × √252)
//! - 섹터별 집계 (자산 수, 시가총액 합계, 평균 P/E, 평균 배당수익률)
//!
//! 모든 함수는 입력만으로 결과가 정해지는 순수 함수입니다. 저장은 호출자가 담당합니다.

pub mod sector;
pub mod volatility;

pub use sector::aggregate_sectors;
pub use volatility::{
    realized_volatility, sample_std_dev, simple_returns, DEFAULT_VOLATILITY_WINDOW,
    TRADING_DAYS_PER_YEAR,
};
