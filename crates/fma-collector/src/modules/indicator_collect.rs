//! 거시경제 지표 수집 모듈.

use async_trait::async_trait;
use chrono::NaiveDate;
use fma_core::IndicatorSeries;
use fma_data::mapper::map_observations;
use fma_data::{IndicatorRepository, MacroSeriesProvider};

use crate::error::CollectorError;
use crate::runner::{Completed, WorkHandler};
use crate::Result;

/// 시리즈 단위 지표 수집 처리기.
pub struct IndicatorCollector<'a> {
    provider: &'a dyn MacroSeriesProvider,
    repo: &'a IndicatorRepository,
    start_date: NaiveDate,
}

impl<'a> IndicatorCollector<'a> {
    pub fn new(
        provider: &'a dyn MacroSeriesProvider,
        repo: &'a IndicatorRepository,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            provider,
            repo,
            start_date,
        }
    }
}

#[async_trait]
impl<'a> WorkHandler for IndicatorCollector<'a> {
    type Item = IndicatorSeries;

    fn key(&self, series: &IndicatorSeries) -> String {
        series.code.clone()
    }

    async fn handle(&self, series: &IndicatorSeries) -> Result<Completed> {
        let observations = self
            .provider
            .fetch_observations(&series.code, self.start_date)
            .await?;
        let rows = map_observations(series, &observations);
        if rows.is_empty() {
            return Err(CollectorError::NothingWritten {
                key: series.code.clone(),
                reason: format!("유효한 관측치 없음 (원본 {}건)", observations.len()),
            });
        }

        let written = self.repo.upsert_batch(&rows).await?;
        let done = Completed::new(written);
        let dropped = observations.len() - rows.len();
        if dropped > 0 {
            return Ok(done.with_note(format!("값 없는 관측치 {}건 제외", dropped)));
        }
        Ok(done)
    }
}
