//! 섹터 성과 집계.
//!
//! 활성 자산을 섹터별로 묶어 자산 수, 시가총액 합계, 평균 P/E, 평균 배당수익률을 계산합니다.
//! 합계와 평균은 null을 제외하고 계산하며(0으로 취급하지 않음), 자산 수는 모든 자산을 셉니다.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use fma_core::{AssetValuation, SectorPerformanceSnapshot};

#[derive(Default)]
struct SectorAccumulator {
    count: i64,
    market_cap_sum: Option<i128>,
    pe_ratios: Vec<f64>,
    dividend_yields: Vec<f64>,
}

impl SectorAccumulator {
    fn add(&mut self, asset: &AssetValuation) {
        self.count += 1;
        if let Some(cap) = asset.market_capitalization {
            *self.market_cap_sum.get_or_insert(0) += i128::from(cap);
        }
        self.pe_ratios.extend(asset.pe_ratio.filter(|v| v.is_finite()));
        self.dividend_yields
            .extend(asset.dividend_yield.filter(|v| v.is_finite()));
    }

    fn into_snapshot(self, sector: String, date: NaiveDate) -> SectorPerformanceSnapshot {
        SectorPerformanceSnapshot {
            sector,
            date,
            number_of_assets: self.count,
            total_market_cap: self.market_cap_sum.and_then(|sum| i64::try_from(sum).ok()),
            avg_pe_ratio: mean(&self.pe_ratios),
            avg_dividend_yield: mean(&self.dividend_yields),
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// 섹터별 스냅샷을 계산합니다 (섹터 이름 순).
///
/// 섹터가 없거나 빈 문자열인 자산은 어느 섹터에도 포함되지 않습니다.
pub fn aggregate_sectors(
    assets: &[AssetValuation],
    date: NaiveDate,
) -> Vec<SectorPerformanceSnapshot> {
    let mut sectors: BTreeMap<String, SectorAccumulator> = BTreeMap::new();

    for asset in assets {
        let Some(sector) = asset.sector.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };
        sectors.entry(sector.to_string()).or_default().add(asset);
    }

    sectors
        .into_iter()
        .map(|(sector, acc)| acc.into_snapshot(sector, date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(
        symbol: &str,
        sector: Option<&str>,
        cap: Option<i64>,
        pe: Option<f64>,
        dy: Option<f64>,
    ) -> AssetValuation {
        AssetValuation {
            symbol: symbol.to_string(),
            sector: sector.map(str::to_string),
            market_capitalization: cap,
            pe_ratio: pe,
            dividend_yield: dy,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn test_null_safe_aggregation() {
        let assets = vec![
            asset("AAPL", Some("TECHNOLOGY"), Some(3_000), Some(30.0), Some(0.005)),
            asset("MSFT", Some("TECHNOLOGY"), None, Some(35.0), None),
            asset("NVDA", Some("TECHNOLOGY"), Some(2_000), None, Some(0.001)),
            asset("JPM", Some("FINANCIAL SERVICES"), None, None, None),
            asset("SPY", None, Some(500), Some(24.0), Some(0.013)),
        ];

        let snapshots = aggregate_sectors(&assets, today());
        assert_eq!(snapshots.len(), 2);

        let financial = &snapshots[0];
        assert_eq!(financial.sector, "FINANCIAL SERVICES");
        assert_eq!(financial.number_of_assets, 1);
        assert_eq!(financial.total_market_cap, None);
        assert_eq!(financial.avg_pe_ratio, None);

        let tech = &snapshots[1];
        assert_eq!(tech.number_of_assets, 3);
        assert_eq!(tech.total_market_cap, Some(5_000));
        assert_eq!(tech.avg_pe_ratio, Some(32.5));
        assert!((tech.avg_dividend_yield.unwrap() - 0.003).abs() < 1e-12);
        assert_eq!(tech.date, today());
    }

    #[test]
    fn test_recompute_is_deterministic() {
        let assets = vec![
            asset("XOM", Some("ENERGY"), Some(400), Some(12.0), Some(0.03)),
            asset("CVX", Some("ENERGY"), Some(300), Some(14.0), Some(0.04)),
        ];
        assert_eq!(
            aggregate_sectors(&assets, today()),
            aggregate_sectors(&assets, today())
        );
    }

    #[test]
    fn test_blank_sector_skipped() {
        let assets = vec![asset("X", Some("  "), Some(1), None, None)];
        assert!(aggregate_sectors(&assets, today()).is_empty());
    }
}
