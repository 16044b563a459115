//! 거시경제 지표 레코드.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 지표 시계열 메타데이터.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    /// 시리즈 코드 (예: "FEDFUNDS")
    pub code: String,
    /// 지표명
    pub name: String,
    /// 단위
    pub unit: String,
    /// 발표 주기
    pub frequency: String,
    /// 출처 라벨
    pub source: String,
}

impl IndicatorSeries {
    pub fn new(code: &str, name: &str, unit: &str, frequency: &str, source: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            unit: unit.to_string(),
            frequency: frequency.to_string(),
            source: source.to_string(),
        }
    }
}

/// 거시경제 지표 정규 레코드. 식별자는 `(code, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicIndicator {
    pub code: String,
    pub date: NaiveDate,
    pub name: String,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub frequency: Option<String>,
    pub source: Option<String>,
}
