//! 실현 변동성 계산 모듈
//!
//! # 계산 공식
//!
//! - 수익률: r_t = P_t / P_{t-1} - 1
//! - 변동성: σ_t = stdev(r_{t-W+1} ..= r_t) × √252 (표본 표준편차, n-1)
//!
//! 직전 W개의 수익률이 모두 있어야 값이 나오며, 그 이전 날짜는 행을 만들지 않습니다.

use chrono::NaiveDate;
use fma_core::{VolatilityRecord, VolatilityType};

/// 연간 거래일 수 (연율화 계산에 사용)
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// 기본 롤링 윈도우 (관측치 수)
pub const DEFAULT_VOLATILITY_WINDOW: u32 = 30;

/// 단순 수익률 시계열. 길이는 `prices.len() - 1`입니다.
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// 표본 표준편차 (n-1). 관측치가 2개 미만이면 `None`.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();
    std_dev.is_finite().then_some(std_dev)
}

/// 종가 시계열(오래된 순)에서 롤링 실현 변동성을 계산합니다.
///
/// 종가가 0 이하이거나 유한하지 않은 날은 수익률 계산 전에 제외합니다.
pub fn realized_volatility(
    symbol: &str,
    closes: &[(NaiveDate, f64)],
    window: u32,
) -> Vec<VolatilityRecord> {
    let w = window as usize;
    if w < 2 {
        return Vec::new();
    }

    let (dates, prices): (Vec<NaiveDate>, Vec<f64>) = closes
        .iter()
        .copied()
        .filter(|(_, close)| close.is_finite() && *close > 0.0)
        .unzip();
    let returns = simple_returns(&prices);
    let annualization = f64::from(TRADING_DAYS_PER_YEAR).sqrt();

    // returns[k]는 dates[k + 1]의 수익률
    returns
        .windows(w)
        .enumerate()
        .filter_map(|(i, trailing)| {
            let std_dev = sample_std_dev(trailing)?;
            Some(VolatilityRecord {
                underlying_symbol: symbol.to_string(),
                date: dates[i + w],
                window,
                volatility_type: VolatilityType::Realized,
                value: std_dev * annualization,
            })
        })
        .collect()
}
