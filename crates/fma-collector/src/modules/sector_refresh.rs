//! 섹터 성과 스냅샷 갱신 모듈.

use fma_analytics::aggregate_sectors;
use fma_data::{AssetRepository, SectorRepository};
use tracing::info;

use crate::context::RunContext;
use crate::Result;

/// 활성 자산에서 섹터 스냅샷을 계산해 수집 기준일로 저장합니다.
///
/// 저장된 섹터 수를 반환합니다.
pub async fn refresh_sectors(
    ctx: &RunContext,
    assets: &AssetRepository,
    sectors: &SectorRepository,
) -> Result<usize> {
    let valuations = assets.active_valuations().await?;
    let snapshots = aggregate_sectors(&valuations, ctx.collection_date);
    let written = sectors.upsert_batch(&snapshots).await?;

    ctx.span().in_scope(|| {
        info!(
            assets = valuations.len(),
            sectors = written,
            date = %ctx.collection_date,
            "섹터 성과 갱신 완료"
        )
    });
    Ok(written)
}
