//! SQLite 저장소.
//!
//! 모든 쓰기는 자연 키 기준 upsert이며, 논리적 쓰기 하나(레코드 하나 또는 같은 종류의
//! 레코드 묶음)가 하나의 트랜잭션입니다. 쓰기 N이 실패해도 1..N-1은 롤백되지 않습니다.

pub mod assets;
pub mod database;
pub mod indicators;
pub mod prices;
pub mod sectors;
pub mod summary;
pub mod volatility;

pub use assets::AssetRepository;
pub use database::{Database, DatabaseConfig};
pub use indicators::IndicatorRepository;
pub use prices::PriceRepository;
pub use sectors::SectorRepository;
pub use summary::{AssetTypeBreakdown, DataSummary, PriceCoverage, SectorBreakdown, SummaryRepository};
pub use volatility::VolatilityRepository;

/// `INSERT … ON CONFLICT(key) DO UPDATE SET` 문을 만듭니다.
///
/// 키가 아닌 모든 컬럼을 새 값으로 덮어씁니다.
pub(crate) fn upsert_sql(table: &str, columns: &[&str], key: &[&str], touch_updated_at: bool) -> String {
    let placeholders = vec!["?"; columns.len()].join(", ");
    let mut updates: Vec<String> = columns
        .iter()
        .filter(|c| !key.contains(c))
        .map(|c| format!("{c} = excluded.{c}"))
        .collect();
    if touch_updated_at {
        updates.push("updated_at = CURRENT_TIMESTAMP".to_string());
    }

    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders}) ON CONFLICT ({}) DO UPDATE SET {}",
        columns.join(", "),
        key.join(", "),
        updates.join(", ")
    )
}
