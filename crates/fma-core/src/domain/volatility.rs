//! 변동성 레코드.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 변동성 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatilityType {
    /// 과거 수익률 기반 실현 변동성
    Realized,
    /// 옵션 가격 기반 내재 변동성
    Implied,
}

impl VolatilityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Realized => "Realized",
            Self::Implied => "Implied",
        }
    }
}

impl fmt::Display for VolatilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VolatilityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "realized" => Ok(Self::Realized),
            "implied" => Ok(Self::Implied),
            _ => Err(format!("Unknown volatility type: {}", s)),
        }
    }
}

/// 변동성 정규 레코드.
///
/// 식별자는 `(underlying_symbol, date, window, volatility_type)`.
/// 값은 연율화된 변동성입니다 (0.25 = 25%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityRecord {
    pub underlying_symbol: String,
    pub date: NaiveDate,
    /// 롤링 윈도우 길이 (관측치 수)
    pub window: u32,
    pub volatility_type: VolatilityType,
    pub value: f64,
}
