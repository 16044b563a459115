//! 수집 파이프라인.
//!
//! 데이터 소스와 저장소를 한 번 구성해 두고 각 명령(전체 실행, 지표 수집,
//! 변동성/섹터 갱신, 요약)을 같은 구성 위에서 실행합니다.

use fma_data::{
    default_indicator_catalog, AlphaVantageClient, AssetRepository, DataSummary, Database,
    FredClient, FundamentalsProvider, IndicatorRepository, MacroSeriesProvider,
    PriceHistoryProvider, PriceRepository, QuoteInfoProvider, SectorRepository,
    SummaryRepository, VolatilityRepository, YahooHistoryClient, YahooQuoteClient,
};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{CollectorConfig, ProviderConfig};
use crate::context::RunContext;
use crate::modules::{
    refresh_sectors, report_summary, AssetCollector, IndicatorCollector, VolatilityRefresher,
};
use crate::rate_limit::Timer;
use crate::resolver::SourceResolver;
use crate::runner::BatchRunner;
use crate::stats::BatchOutcome;
use crate::Result;

/// 파이프라인이 사용하는 데이터 소스 묶음.
pub struct Providers {
    pub fundamentals: Box<dyn FundamentalsProvider>,
    pub quote_info: Box<dyn QuoteInfoProvider>,
    pub history: Box<dyn PriceHistoryProvider>,
    /// API 키가 없으면 `None` (지표 수집을 건너뜀)
    pub macro_series: Option<Box<dyn MacroSeriesProvider>>,
}

impl Providers {
    /// 설정에서 실제 HTTP 클라이언트를 구성합니다.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let timeout = config.timeout();

        let mut fundamentals =
            AlphaVantageClient::new(config.alpha_vantage_api_key.clone(), timeout)?;
        if let Some(url) = &config.alpha_vantage_base_url {
            fundamentals = fundamentals.with_base_url(url);
        }

        let mut quote_info = YahooQuoteClient::new(timeout)?;
        if let Some(url) = &config.yahoo_base_url {
            quote_info = quote_info.with_base_url(url);
        }

        let history = YahooHistoryClient::new(timeout)?;

        let macro_series: Option<Box<dyn MacroSeriesProvider>> = match &config.fred_api_key {
            Some(key) => {
                let mut fred = FredClient::new(Some(key.clone()), timeout)?;
                if let Some(url) = &config.fred_base_url {
                    fred = fred.with_base_url(url);
                }
                Some(Box::new(fred))
            }
            None => None,
        };

        Ok(Self {
            fundamentals: Box::new(fundamentals),
            quote_info: Box::new(quote_info),
            history: Box::new(history),
            macro_series,
        })
    }
}

/// 테이블별 repository 묶음. 모두 같은 연결을 공유합니다.
pub struct Repositories {
    pub assets: AssetRepository,
    pub prices: PriceRepository,
    pub indicators: IndicatorRepository,
    pub volatility: VolatilityRepository,
    pub sectors: SectorRepository,
    pub summary: SummaryRepository,
}

impl Repositories {
    pub fn new(db: &Database) -> Self {
        Self {
            assets: AssetRepository::new(db.clone()),
            prices: PriceRepository::new(db.clone()),
            indicators: IndicatorRepository::new(db.clone()),
            volatility: VolatilityRepository::new(db.clone()),
            sectors: SectorRepository::new(db.clone()),
            summary: SummaryRepository::new(db.clone()),
        }
    }
}

/// 전체 실행 결과
#[derive(Debug)]
pub struct RunReport {
    pub assets: BatchOutcome,
    /// 지표 수집을 건너뛰었으면 `None`
    pub indicators: Option<BatchOutcome>,
    /// 섹터 갱신이 실패했으면 `None`
    pub sectors: Option<usize>,
    pub summary: Option<DataSummary>,
}

/// 수집 파이프라인.
pub struct Pipeline<T: Timer + Clone> {
    config: CollectorConfig,
    resolver: SourceResolver,
    history: Box<dyn PriceHistoryProvider>,
    macro_series: Option<Box<dyn MacroSeriesProvider>>,
    repos: Repositories,
    timer: T,
}

impl<T: Timer + Clone> Pipeline<T> {
    pub fn new(config: CollectorConfig, db: &Database, providers: Providers, timer: T) -> Self {
        Self {
            resolver: SourceResolver::new(providers.fundamentals, providers.quote_info),
            history: providers.history,
            macro_series: providers.macro_series,
            repos: Repositories::new(db),
            config,
            timer,
        }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    fn runner(&self, delay: Duration) -> BatchRunner<T> {
        BatchRunner::new(self.timer.clone(), delay)
    }

    /// 자산 + 일봉 (+ 실현 변동성) 수집 배치.
    pub async fn collect_assets(&self, ctx: &RunContext) -> BatchOutcome {
        let settings = &self.config.asset_collect;
        let mut collector = AssetCollector::new(
            &self.resolver,
            self.history.as_ref(),
            &self.repos.assets,
            &self.repos.prices,
            settings.price_period.as_str(),
        );
        if self.config.volatility.enabled {
            collector =
                collector.with_volatility(&self.repos.volatility, self.config.volatility.window);
        }

        self.runner(settings.request_delay())
            .run(ctx, "assets", settings.symbols.as_slice(), &collector)
            .await
    }

    /// 거시경제 지표 수집 배치. 비활성화되었거나 API 키가 없으면 건너뜁니다.
    pub async fn collect_indicators(&self, ctx: &RunContext) -> Option<BatchOutcome> {
        let settings = &self.config.indicator_collect;
        if !settings.enabled {
            ctx.span().in_scope(|| info!("지표 수집 비활성화됨"));
            return None;
        }
        let Some(provider) = self.macro_series.as_deref() else {
            ctx.span()
                .in_scope(|| warn!("FRED_API_KEY가 없어 지표 수집을 건너뜁니다"));
            return None;
        };

        let collector =
            IndicatorCollector::new(provider, &self.repos.indicators, settings.start_date);
        let catalog = default_indicator_catalog();
        let outcome = self
            .runner(settings.request_delay())
            .run(ctx, "indicators", catalog.as_slice(), &collector)
            .await;
        Some(outcome)
    }

    /// 저장된 종가로 실현 변동성을 재계산합니다.
    ///
    /// `symbols`가 없으면 일봉이 있는 모든 심볼이 대상입니다.
    pub async fn refresh_volatility(
        &self,
        ctx: &RunContext,
        symbols: Option<Vec<String>>,
    ) -> Result<BatchOutcome> {
        let symbols = match symbols {
            Some(symbols) => symbols,
            None => self.repos.prices.symbols().await?,
        };
        let refresher = VolatilityRefresher::new(
            &self.repos.prices,
            &self.repos.volatility,
            self.config.volatility.window,
        );
        Ok(self
            .runner(Duration::ZERO)
            .run(ctx, "volatility", symbols.as_slice(), &refresher)
            .await)
    }

    /// 섹터 성과 스냅샷 갱신.
    pub async fn refresh_sectors(&self, ctx: &RunContext) -> Result<usize> {
        refresh_sectors(ctx, &self.repos.assets, &self.repos.sectors).await
    }

    /// 저장 데이터 요약.
    pub async fn summary(&self, ctx: &RunContext) -> Result<DataSummary> {
        report_summary(ctx, &self.repos.summary).await
    }

    /// 전체 수집: 자산/일봉 → 지표 → 섹터 → 요약.
    ///
    /// 단계별 실패는 기록만 하고 다음 단계로 진행합니다.
    pub async fn run(&self, ctx: &RunContext) -> RunReport {
        ctx.span().in_scope(|| info!("=== 전체 수집 시작 ==="));

        ctx.span().in_scope(|| info!("Step 1/4: 자산 및 일봉 수집"));
        let assets = self.collect_assets(ctx).await;

        ctx.span().in_scope(|| info!("Step 2/4: 거시경제 지표 수집"));
        let indicators = self.collect_indicators(ctx).await;

        ctx.span().in_scope(|| info!("Step 3/4: 섹터 성과 갱신"));
        let sectors = match self.refresh_sectors(ctx).await {
            Ok(count) => Some(count),
            Err(e) => {
                ctx.span().in_scope(|| warn!(error = %e, "섹터 성과 갱신 실패"));
                None
            }
        };

        ctx.span().in_scope(|| info!("Step 4/4: 데이터 요약"));
        let summary = match self.summary(ctx).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                ctx.span().in_scope(|| warn!(error = %e, "요약 조회 실패"));
                None
            }
        };

        ctx.span().in_scope(|| info!("=== 전체 수집 완료 ==="));
        RunReport {
            assets,
            indicators,
            sectors,
            summary,
        }
    }
}
