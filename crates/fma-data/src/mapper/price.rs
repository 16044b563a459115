//! 일봉 매핑.

use fma_core::coerce::{date_from_timestamp, finite};
use fma_core::PriceBar;

use crate::provider::RawBar;

/// 가격 이력 원시 행 → 일봉 레코드.
///
/// 날짜로 변환할 수 없는 행은 버립니다. 수정 종가가 없으면 종가를,
/// 이벤트가 없는 날의 배당금/분할 비율은 0을 사용합니다.
pub fn map_price_history(symbol: &str, rows: &[RawBar]) -> Vec<PriceBar> {
    rows.iter()
        .filter_map(|row| {
            let date = date_from_timestamp(row.timestamp)?;
            let close = finite(row.close);
            Some(PriceBar {
                symbol: symbol.to_string(),
                date,
                open: finite(row.open),
                high: finite(row.high),
                low: finite(row.low),
                close,
                adjusted_close: finite(row.adjclose).or(close),
                volume: i64::try_from(row.volume).ok(),
                dividend_amount: Some(row.dividend.and_then(finite).unwrap_or(0.0)),
                split_coefficient: Some(row.split.and_then(finite).unwrap_or(0.0)),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(timestamp: i64, close: f64, adjclose: f64) -> RawBar {
        RawBar {
            timestamp,
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            adjclose,
            volume: 1_000_000,
            dividend: None,
            split: None,
        }
    }

    #[test]
    fn test_map_price_history() {
        // 2024-01-02 14:30 UTC
        let mut with_events = bar(1_704_205_800, 185.64, 184.9);
        with_events.dividend = Some(0.24);
        with_events.split = Some(4.0);
        let rows = vec![with_events, bar(1_704_292_200, 184.25, f64::NAN)];

        let bars = map_price_history("AAPL", &rows);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].adjusted_close, Some(184.9));
        assert_eq!(bars[0].dividend_amount, Some(0.24));
        assert_eq!(bars[0].split_coefficient, Some(4.0));
        assert_eq!(bars[1].adjusted_close, Some(184.25));
        assert_eq!(bars[1].dividend_amount, Some(0.0));
        assert_eq!(bars[1].split_coefficient, Some(0.0));
        assert_eq!(bars[1].volume, Some(1_000_000));
    }

    #[test]
    fn test_out_of_range_timestamp_dropped() {
        let rows = vec![bar(i64::MAX, 10.0, 10.0)];
        assert!(map_price_history("X", &rows).is_empty());
    }
}
