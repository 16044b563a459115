//! 실현 변동성 동기화 모듈.
//!
//! 저장된 종가에서 롤링 실현 변동성을 다시 계산해 `volatility_data`에 upsert합니다.

use async_trait::async_trait;
use fma_analytics::realized_volatility;
use fma_data::{PriceRepository, VolatilityRepository};

use crate::runner::{Completed, WorkHandler};
use crate::Result;

/// 심볼 하나의 실현 변동성을 재계산합니다. 저장된 행 수를 반환합니다.
///
/// 종가가 윈도우보다 적으면 아무것도 쓰지 않고 0을 반환합니다.
pub async fn sync_symbol_volatility(
    prices: &PriceRepository,
    volatility: &VolatilityRepository,
    symbol: &str,
    window: u32,
) -> Result<usize> {
    let closes = prices.closing_prices(symbol).await?;
    let records = realized_volatility(symbol, &closes, window);
    if records.is_empty() {
        return Ok(0);
    }
    Ok(volatility.upsert_batch(&records).await?)
}

/// `refresh-volatility` 명령용 처리기. 항목은 심볼입니다.
pub struct VolatilityRefresher<'a> {
    prices: &'a PriceRepository,
    volatility: &'a VolatilityRepository,
    window: u32,
}

impl<'a> VolatilityRefresher<'a> {
    pub fn new(
        prices: &'a PriceRepository,
        volatility: &'a VolatilityRepository,
        window: u32,
    ) -> Self {
        Self {
            prices,
            volatility,
            window,
        }
    }
}

#[async_trait]
impl<'a> WorkHandler for VolatilityRefresher<'a> {
    type Item = String;

    fn key(&self, item: &String) -> String {
        item.clone()
    }

    async fn handle(&self, symbol: &String) -> Result<Completed> {
        let rows = sync_symbol_volatility(self.prices, self.volatility, symbol, self.window).await?;
        let done = Completed::new(rows);
        if rows == 0 {
            return Ok(done.with_note(format!("종가가 부족합니다 (window={})", self.window)));
        }
        Ok(done)
    }
}
