//! 저장 데이터 요약 모듈.

use fma_data::{DataSummary, SummaryRepository};
use tracing::info;

use crate::context::RunContext;
use crate::Result;

/// 요약을 조회하고 로그로 남깁니다.
pub async fn report_summary(ctx: &RunContext, repo: &SummaryRepository) -> Result<DataSummary> {
    let summary = repo.summary().await?;
    ctx.span().in_scope(|| log_summary(&summary));
    Ok(summary)
}

/// 요약 로그 출력
pub fn log_summary(summary: &DataSummary) {
    for (table, count) in &summary.table_counts {
        info!(table = %table, rows = count, "테이블 행 수");
    }
    for breakdown in &summary.asset_types {
        info!(
            asset_type = %breakdown.asset_type,
            count = breakdown.count,
            total_market_cap = ?breakdown.total_market_cap,
            "자산 유형별 집계"
        );
    }
    for sector in &summary.top_sectors {
        info!(
            sector = %sector.sector,
            count = sector.count,
            avg_pe_ratio = ?sector.avg_pe_ratio,
            "섹터별 집계"
        );
    }
    info!(
        first_date = ?summary.prices.first_date,
        last_date = ?summary.prices.last_date,
        symbols = summary.prices.symbols,
        "일봉 커버리지"
    );
}
