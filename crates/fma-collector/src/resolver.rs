//! 자산 정보 소스 결정.
//!
//! 1차(재무 개요) → 2차(시세 정보) → 최소 레코드 순으로 시도합니다.
//! 각 소스 호출의 실패는 "없음"으로 취급되며 호출자에게 전파되지 않습니다.
//! 결과는 항상 사용할 수 있는 자산 레코드입니다.

use fma_core::Asset;
use fma_data::mapper::map_asset;
use fma_data::{FundamentalsProvider, ProviderPayload, QuoteInfoProvider};
use std::fmt;

/// 최종 레코드를 만든 소스
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSource {
    Primary,
    Secondary,
    Minimal,
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
            Self::Minimal => write!(f, "minimal"),
        }
    }
}

/// 데이터를 얻지 못한 소스와 이유
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMiss {
    pub source: &'static str,
    pub reason: String,
}

impl fmt::Display for SourceMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.reason)
    }
}

/// 소스 결정 결과
#[derive(Debug, Clone)]
pub struct ResolvedAsset {
    pub asset: Asset,
    pub source: AssetSource,
    /// 앞선 소스들의 실패 이유 (시도 순서)
    pub misses: Vec<SourceMiss>,
}

/// 자산 정보 소스 결정기
pub struct SourceResolver {
    primary: Box<dyn FundamentalsProvider>,
    secondary: Box<dyn QuoteInfoProvider>,
}

impl SourceResolver {
    pub fn new(
        primary: Box<dyn FundamentalsProvider>,
        secondary: Box<dyn QuoteInfoProvider>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// 사용 가능한 첫 페이로드를 찾습니다.
    pub async fn resolve(&self, symbol: &str) -> (ProviderPayload, AssetSource, Vec<SourceMiss>) {
        let mut misses = Vec::new();

        match self.primary.fetch_overview(symbol).await {
            Ok(overview) => {
                return (
                    ProviderPayload::Overview(Box::new(overview)),
                    AssetSource::Primary,
                    misses,
                )
            }
            Err(e) => misses.push(SourceMiss {
                source: self.primary.name(),
                reason: e.to_string(),
            }),
        }

        match self.secondary.fetch_quote_info(symbol).await {
            Ok(info) => {
                return (
                    ProviderPayload::QuoteInfo(Box::new(info)),
                    AssetSource::Secondary,
                    misses,
                )
            }
            Err(e) => misses.push(SourceMiss {
                source: self.secondary.name(),
                reason: e.to_string(),
            }),
        }

        (ProviderPayload::Unavailable, AssetSource::Minimal, misses)
    }

    /// 소스를 결정하고 정규 자산 레코드로 변환합니다.
    pub async fn resolve_asset(&self, symbol: &str, asset_type: &str) -> ResolvedAsset {
        let (payload, source, misses) = self.resolve(symbol).await;
        ResolvedAsset {
            asset: map_asset(symbol, &payload, asset_type),
            source,
            misses,
        }
    }
}
