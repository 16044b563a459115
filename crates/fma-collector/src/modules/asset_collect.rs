//! 자산 + 일봉 수집 모듈.
//!
//! 항목 하나(심볼, 자산 유형)에 대해:
//! 1. 소스 결정 → 자산 레코드 upsert
//! 2. 일봉 조회 → 매핑 → 일괄 upsert
//! 3. 하나라도 저장되었으면 실현 변동성 재계산
//!
//! 자산 행이나 일봉 행 중 하나라도 저장되면 성공입니다.

use async_trait::async_trait;
use fma_data::mapper::map_price_history;
use fma_data::{AssetRepository, PriceHistoryProvider, PriceRepository, VolatilityRepository};

use crate::config::AssetRequest;
use crate::error::CollectorError;
use crate::modules::volatility_sync::sync_symbol_volatility;
use crate::resolver::{AssetSource, SourceResolver};
use crate::runner::{Completed, WorkHandler};
use crate::Result;

/// 변동성 재계산 대상 저장소와 윈도우.
pub struct VolatilityTarget<'a> {
    pub repo: &'a VolatilityRepository,
    pub window: u32,
}

/// 자산/일봉 수집 처리기.
pub struct AssetCollector<'a> {
    resolver: &'a SourceResolver,
    history: &'a dyn PriceHistoryProvider,
    assets: &'a AssetRepository,
    prices: &'a PriceRepository,
    volatility: Option<VolatilityTarget<'a>>,
    price_period: String,
}

impl<'a> AssetCollector<'a> {
    pub fn new(
        resolver: &'a SourceResolver,
        history: &'a dyn PriceHistoryProvider,
        assets: &'a AssetRepository,
        prices: &'a PriceRepository,
        price_period: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            history,
            assets,
            prices,
            volatility: None,
            price_period: price_period.into(),
        }
    }

    /// 성공한 항목마다 실현 변동성을 재계산합니다.
    pub fn with_volatility(mut self, repo: &'a VolatilityRepository, window: u32) -> Self {
        self.volatility = Some(VolatilityTarget { repo, window });
        self
    }

    /// 일봉 조회 + 저장. 저장된 행 수를 반환합니다.
    async fn collect_prices(&self, symbol: &str) -> Result<usize> {
        let raw = self.history.fetch_history(symbol, &self.price_period).await?;
        let bars = map_price_history(symbol, &raw);
        if bars.is_empty() {
            return Err(CollectorError::NothingWritten {
                key: symbol.to_string(),
                reason: format!("{}: 유효한 일봉 없음", self.history.name()),
            });
        }
        Ok(self.prices.upsert_batch(&bars).await?)
    }
}

#[async_trait]
impl<'a> WorkHandler for AssetCollector<'a> {
    type Item = AssetRequest;

    fn key(&self, item: &AssetRequest) -> String {
        item.symbol.clone()
    }

    async fn handle(&self, item: &AssetRequest) -> Result<Completed> {
        let symbol = item.symbol.as_str();
        let mut done = Completed::default();

        // 1. 자산 레코드
        let resolved = self.resolver.resolve_asset(symbol, &item.asset_type).await;
        if resolved.source != AssetSource::Primary {
            let misses: Vec<String> = resolved.misses.iter().map(ToString::to_string).collect();
            done.notes.push(format!(
                "대체 소스 사용 ({}): {}",
                resolved.source,
                misses.join("; ")
            ));
        }
        let asset_error = match self.assets.upsert(&resolved.asset).await {
            Ok(()) => {
                done.records += 1;
                None
            }
            Err(e) => Some(format!("자산 저장 실패: {}", e)),
        };

        // 2. 일봉
        let price_error = match self.collect_prices(symbol).await {
            Ok(rows) => {
                done.records += rows;
                None
            }
            Err(e) => Some(format!("일봉 수집 실패: {}", e)),
        };

        if let (Some(asset_error), Some(price_error)) = (&asset_error, &price_error) {
            return Err(CollectorError::NothingWritten {
                key: symbol.to_string(),
                reason: format!("{}; {}", asset_error, price_error),
            });
        }
        done.notes.extend(asset_error);
        done.notes.extend(price_error);

        // 3. 실현 변동성
        if let Some(target) = &self.volatility {
            match sync_symbol_volatility(self.prices, target.repo, symbol, target.window).await {
                Ok(rows) => done.records += rows,
                Err(e) => done.notes.push(format!("변동성 계산 실패: {}", e)),
            }
        }

        Ok(done)
    }
}
