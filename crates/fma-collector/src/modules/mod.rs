//! 데이터 수집 모듈.

pub mod asset_collect;
pub mod indicator_collect;
pub mod sector_refresh;
pub mod summary;
pub mod volatility_sync;

pub use asset_collect::AssetCollector;
pub use indicator_collect::IndicatorCollector;
pub use sector_refresh::refresh_sectors;
pub use summary::{log_summary, report_summary};
pub use volatility_sync::{sync_symbol_volatility, VolatilityRefresher};
