//! 정규 레코드 매퍼.
//!
//! 소스별 페이로드를 정규 레코드로 변환하는 순수 함수 모음입니다.
//! 모든 필드 변환은 [`fma_core::coerce`]를 거치므로 매핑은 실패하지 않습니다.

mod asset;
mod indicator;
mod price;

pub use asset::{map_asset, map_overview, map_quote_info};
pub use indicator::map_observations;
pub use price::map_price_history;
