//! 정규 레코드 도메인 모델.

pub mod asset;
pub mod indicator;
pub mod price;
pub mod sector;
pub mod volatility;

pub use asset::*;
pub use indicator::*;
pub use price::*;
pub use sector::*;
pub use volatility::*;
