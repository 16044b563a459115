//! 일봉 가격 레코드.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 일봉 가격 정규 레코드.
///
/// 식별자는 `(symbol, date)`이며 같은 키로 다시 저장하면 행이 교체됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    /// 수정 종가 (소스에 없으면 종가로 대체)
    pub adjusted_close: Option<f64>,
    pub volume: Option<i64>,
    /// 배당금 (배당이 없는 날은 0)
    pub dividend_amount: Option<f64>,
    /// 분할 비율 (분할이 없는 날은 0)
    pub split_coefficient: Option<f64>,
}
