//! 거시경제 지표 매핑.

use fma_core::coerce::{date, numeric};
use fma_core::{EconomicIndicator, IndicatorSeries};

use crate::provider::FredObservation;

/// 관측치 → 지표 레코드. 날짜나 값이 null로 변환되는 관측치는 버립니다.
pub fn map_observations(
    series: &IndicatorSeries,
    observations: &[FredObservation],
) -> Vec<EconomicIndicator> {
    observations
        .iter()
        .filter_map(|obs| {
            let date = date(obs.date.as_ref())?;
            let value = numeric(obs.value.as_ref())?;
            Some(EconomicIndicator {
                code: series.code.clone(),
                date,
                name: series.name.clone(),
                value: Some(value),
                unit: Some(series.unit.clone()),
                frequency: Some(series.frequency.clone()),
                source: Some(series.source.clone()),
            })
        })
        .collect()
}
