//! 수집 파이프라인 통합 테스트
//!
//! 가짜 데이터 소스와 인메모리 SQLite로 대체 소스 순서, 항목 단위 장애 격리,
//! 호출 간격을 확인합니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use fma_collector::{
    AssetRequest, CollectorConfig, ItemOutcome, Pipeline, Providers, RunContext, Timer,
};
use fma_core::{IndicatorSeries, VolatilityType};
use fma_data::{
    CompanyOverview, Database, DatabaseConfig, FredObservation, FundamentalsProvider,
    MacroSeriesProvider, PriceHistoryProvider, ProviderError, ProviderResult, QuoteInfo,
    QuoteInfoProvider, RawBar,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ==================== 테스트용 시계 ====================

/// 수동 시계. `sleep`은 즉시 반환하고 시계만 전진시킵니다.
#[derive(Clone, Default)]
struct StepTimer {
    now: Arc<Mutex<Duration>>,
}

#[async_trait]
impl Timer for StepTimer {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        *self.now.lock().unwrap() += duration;
    }
}

// ==================== 가짜 데이터 소스 ====================

type CallLog = Arc<Mutex<Vec<(String, String)>>>;

fn log_call(log: &CallLog, source: &str, symbol: &str) {
    log.lock()
        .unwrap()
        .push((source.to_string(), symbol.to_string()));
}

struct FakeFundamentals {
    overviews: HashMap<String, CompanyOverview>,
    log: CallLog,
}

#[async_trait]
impl FundamentalsProvider for FakeFundamentals {
    fn name(&self) -> &'static str {
        "fake_overview"
    }

    async fn fetch_overview(&self, symbol: &str) -> ProviderResult<CompanyOverview> {
        log_call(&self.log, "overview", symbol);
        self.overviews
            .get(symbol)
            .cloned()
            .ok_or_else(|| ProviderError::Throttled("rate limit".to_string()))
    }
}

struct FakeQuotes {
    quotes: HashMap<String, QuoteInfo>,
    log: CallLog,
}

#[async_trait]
impl QuoteInfoProvider for FakeQuotes {
    fn name(&self) -> &'static str {
        "fake_quote"
    }

    async fn fetch_quote_info(&self, symbol: &str) -> ProviderResult<QuoteInfo> {
        log_call(&self.log, "quote", symbol);
        self.quotes
            .get(symbol)
            .cloned()
            .ok_or_else(|| ProviderError::Empty(symbol.to_string()))
    }
}

struct FakeHistory {
    bars: HashMap<String, Vec<RawBar>>,
    timer: StepTimer,
    calls: Arc<Mutex<Vec<(String, Duration)>>>,
}

#[async_trait]
impl PriceHistoryProvider for FakeHistory {
    fn name(&self) -> &'static str {
        "fake_history"
    }

    async fn fetch_history(&self, symbol: &str, _period: &str) -> ProviderResult<Vec<RawBar>> {
        self.calls
            .lock()
            .unwrap()
            .push((symbol.to_string(), self.timer.now()));
        // 호출 자체에 2초 소요
        self.timer.sleep(Duration::from_secs(2)).await;
        self.bars
            .get(symbol)
            .cloned()
            .ok_or_else(|| ProviderError::Upstream(format!("{} not found", symbol)))
    }
}

struct FakeMacro {
    observations: HashMap<String, Vec<FredObservation>>,
}

#[async_trait]
impl MacroSeriesProvider for FakeMacro {
    fn name(&self) -> &'static str {
        "fake_fred"
    }

    async fn fetch_observations(
        &self,
        series_code: &str,
        _start: NaiveDate,
    ) -> ProviderResult<Vec<FredObservation>> {
        self.observations
            .get(series_code)
            .cloned()
            .ok_or_else(|| ProviderError::NoObservations(series_code.to_string()))
    }
}

// ==================== 픽스처 ====================

fn overview(symbol: &str, name: &str, sector: &str, market_cap: &str, pe: &str) -> CompanyOverview {
    CompanyOverview {
        symbol: Some(json!(symbol)),
        asset_type: Some(json!("Common Stock")),
        name: Some(json!(name)),
        sector: Some(json!(sector)),
        market_capitalization: Some(json!(market_cap)),
        pe_ratio: Some(json!(pe)),
        dividend_yield: Some(json!("None")),
        ..Default::default()
    }
}

fn quote(symbol: &str, name: &str) -> QuoteInfo {
    QuoteInfo {
        symbol: Some(json!(symbol)),
        long_name: Some(json!(name)),
        market_cap: Some(json!(500_000_000_000_i64)),
        trailing_pe: Some(json!(18.5)),
        ..Default::default()
    }
}

/// 2024-03-01부터 하루 간격의 일봉
fn bars(closes: &[f64]) -> Vec<RawBar> {
    const MARCH_1_2024: i64 = 1_709_251_200;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| RawBar {
            timestamp: MARCH_1_2024 + i as i64 * 86_400,
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            adjclose: close,
            volume: 1_000_000,
            dividend: None,
            split: None,
        })
        .collect()
}

const CLOSES: [f64; 10] = [100.0, 101.0, 99.5, 102.0, 103.5, 101.0, 104.0, 105.5, 104.5, 106.0];

struct Harness {
    pipeline: Pipeline<StepTimer>,
    log: CallLog,
    history_calls: Arc<Mutex<Vec<(String, Duration)>>>,
}

struct Sources {
    overviews: Vec<CompanyOverview>,
    quotes: Vec<QuoteInfo>,
    history: Vec<(&'static str, Vec<RawBar>)>,
    observations: Option<Vec<(&'static str, Vec<FredObservation>)>>,
}

fn symbol_of(value: &Option<Value>) -> String {
    value
        .as_ref()
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

async fn harness(db: &Database, config: CollectorConfig, sources: Sources) -> Harness {
    let timer = StepTimer::default();
    let log: CallLog = Arc::default();
    let history_calls: Arc<Mutex<Vec<(String, Duration)>>> = Arc::default();

    let providers = Providers {
        fundamentals: Box::new(FakeFundamentals {
            overviews: sources
                .overviews
                .into_iter()
                .map(|o| (symbol_of(&o.symbol), o))
                .collect(),
            log: log.clone(),
        }),
        quote_info: Box::new(FakeQuotes {
            quotes: sources
                .quotes
                .into_iter()
                .map(|q| (symbol_of(&q.symbol), q))
                .collect(),
            log: log.clone(),
        }),
        history: Box::new(FakeHistory {
            bars: sources
                .history
                .into_iter()
                .map(|(s, b)| (s.to_string(), b))
                .collect(),
            timer: timer.clone(),
            calls: Arc::clone(&history_calls),
        }),
        macro_series: sources.observations.map(|obs| {
            Box::new(FakeMacro {
                observations: obs.into_iter().map(|(c, o)| (c.to_string(), o)).collect(),
            }) as Box<dyn MacroSeriesProvider>
        }),
    };

    Harness {
        pipeline: Pipeline::new(config, db, providers, timer),
        log,
        history_calls,
    }
}

async fn migrated_db() -> Database {
    let db = Database::connect(&DatabaseConfig::new("sqlite::memory:"))
        .await
        .unwrap();
    db.migrate().await.unwrap();
    db
}

fn config(symbols: &[(&str, &str)], delay_ms: u64) -> CollectorConfig {
    let mut config = CollectorConfig::new("sqlite::memory:");
    config.asset_collect.symbols = symbols
        .iter()
        .map(|(symbol, asset_type)| AssetRequest::new(*symbol, *asset_type))
        .collect();
    config.asset_collect.request_delay_ms = delay_ms;
    config.indicator_collect.request_delay_ms = 0;
    config.volatility.window = 5;
    config
}

fn no_sources() -> Sources {
    Sources {
        overviews: Vec::new(),
        quotes: Vec::new(),
        history: Vec::new(),
        observations: None,
    }
}

// ==================== 테스트 ====================

#[tokio::test]
async fn test_fallback_chain_order() {
    let db = migrated_db().await;
    let h = harness(
        &db,
        config(&[("AAPL", "Stock"), ("SPY", "ETF"), ("ZZZZ", "Stock")], 0),
        Sources {
            overviews: vec![overview("AAPL", "Apple Inc", "TECHNOLOGY", "3000000000000", "29.5")],
            quotes: vec![quote("SPY", "SPDR S&P 500 ETF Trust")],
            history: vec![("AAPL", bars(&CLOSES)), ("SPY", bars(&CLOSES))],
            observations: None,
        },
    )
    .await;

    let ctx = RunContext::today();
    let outcome = h.pipeline.collect_assets(&ctx).await;
    assert_eq!(outcome.total(), 3);
    assert_eq!(outcome.success(), 3);

    // 1차 성공 시 2차는 호출하지 않음
    let log = h.log.lock().unwrap().clone();
    let calls: Vec<(&str, &str)> = log.iter().map(|(s, k)| (s.as_str(), k.as_str())).collect();
    assert_eq!(
        calls,
        vec![
            ("overview", "AAPL"),
            ("overview", "SPY"),
            ("quote", "SPY"),
            ("overview", "ZZZZ"),
            ("quote", "ZZZZ"),
        ]
    );

    let assets = &h.pipeline.repositories().assets;

    let apple = assets.get("AAPL").await.unwrap().unwrap();
    assert_eq!(apple.name.as_deref(), Some("Apple Inc"));
    assert_eq!(apple.fundamentals.market_capitalization, Some(3_000_000_000_000));
    assert_eq!(apple.fundamentals.dividend_yield, None);

    let spy = assets.get("SPY").await.unwrap().unwrap();
    assert_eq!(spy.name.as_deref(), Some("SPDR S&P 500 ETF Trust"));
    assert_eq!(spy.asset_type, "ETF");
    assert_eq!(spy.fundamentals.pe_ratio, Some(18.5));

    // 모든 소스 실패 → 최소 레코드
    let unknown = assets.get("ZZZZ").await.unwrap().unwrap();
    assert_eq!(unknown.name.as_deref(), Some("ZZZZ"));
    assert_eq!(unknown.currency.as_deref(), Some("USD"));
    assert!(unknown.fundamentals.is_empty());
}

#[tokio::test]
async fn test_price_failure_is_isolated_to_item() {
    let db = migrated_db().await;
    let h = harness(
        &db,
        config(&[("AAPL", "Stock"), ("MSFT", "Stock"), ("QQQ", "ETF")], 0),
        Sources {
            overviews: vec![
                overview("AAPL", "Apple Inc", "TECHNOLOGY", "3000000000000", "29.5"),
                overview("MSFT", "Microsoft Corp", "TECHNOLOGY", "2800000000000", "35.1"),
            ],
            quotes: Vec::new(),
            // MSFT 일봉 없음
            history: vec![("AAPL", bars(&CLOSES)), ("QQQ", bars(&CLOSES))],
            observations: None,
        },
    )
    .await;

    let ctx = RunContext::today();
    let outcome = h.pipeline.collect_assets(&ctx).await;

    let keys: Vec<&str> = outcome.items.iter().map(|i| i.key.as_str()).collect();
    assert_eq!(keys, vec!["AAPL", "MSFT", "QQQ"]);
    // 자산 행은 저장되었으므로 MSFT도 성공 (참고 사항 포함)
    assert_eq!(outcome.success(), 3);
    match &outcome.items[1].outcome {
        ItemOutcome::Succeeded { records, notes } => {
            assert_eq!(*records, 1);
            assert!(notes.iter().any(|n| n.contains("일봉 수집 실패")));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let prices = &h.pipeline.repositories().prices;
    assert_eq!(prices.closing_prices("AAPL").await.unwrap().len(), 10);
    assert!(prices.closing_prices("MSFT").await.unwrap().is_empty());
    assert_eq!(prices.closing_prices("QQQ").await.unwrap().len(), 10);

    // 10개 종가 → 9개 수익률 → 윈도우 5로 5개 행
    let volatility = &h.pipeline.repositories().volatility;
    let series = volatility
        .series("AAPL", VolatilityType::Realized, 5)
        .await
        .unwrap();
    assert_eq!(series.len(), 5);
    assert!(series.iter().all(|r| r.value > 0.0));
    assert!(volatility
        .series("MSFT", VolatilityType::Realized, 5)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_item_fails_when_nothing_written() {
    // 스키마가 없으므로 모든 쓰기가 실패
    let db = Database::connect(&DatabaseConfig::new("sqlite::memory:"))
        .await
        .unwrap();
    let h = harness(
        &db,
        config(&[("AAPL", "Stock"), ("SPY", "ETF")], 0),
        Sources {
            history: vec![("AAPL", bars(&CLOSES))],
            ..no_sources()
        },
    )
    .await;

    let outcome = h.pipeline.collect_assets(&RunContext::today()).await;
    assert_eq!(outcome.total(), 2);
    assert_eq!(outcome.success(), 0);
    assert_eq!(outcome.failed_keys(), vec!["AAPL", "SPY"]);
}

#[tokio::test]
async fn test_calls_are_spaced_by_request_delay() {
    let db = migrated_db().await;
    let h = harness(
        &db,
        config(&[("A", "Stock"), ("B", "Stock"), ("C", "Stock"), ("D", "Stock")], 12_000),
        Sources {
            history: vec![("A", bars(&CLOSES)), ("C", bars(&CLOSES))],
            ..no_sources()
        },
    )
    .await;

    let outcome = h.pipeline.collect_assets(&RunContext::today()).await;
    assert_eq!(outcome.total(), 4);

    let calls = h.history_calls.lock().unwrap().clone();
    let order: Vec<&str> = calls.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(order, vec!["A", "B", "C", "D"]);
    for pair in calls.windows(2) {
        assert!(pair[1].1 - pair[0].1 >= Duration::from_secs(12));
    }
    assert_eq!(calls[0].1, Duration::ZERO);
    // (N - 1) × 간격 + 마지막 호출 2초
    assert_eq!(outcome.elapsed, Duration::from_secs(3 * 12 + 2));
}

#[tokio::test]
async fn test_indicators_skipped_without_credentials() {
    let db = migrated_db().await;
    let h = harness(&db, config(&[], 0), no_sources()).await;
    assert!(h.pipeline.collect_indicators(&RunContext::today()).await.is_none());
}

#[tokio::test]
async fn test_indicator_batch_continues_past_missing_series() {
    let db = migrated_db().await;
    let observations = vec![
        FredObservation {
            date: Some(json!("2024-01-01")),
            value: Some(json!("5.33")),
        },
        FredObservation {
            date: Some(json!("2024-02-01")),
            value: Some(json!(".")),
        },
        FredObservation {
            date: Some(json!("2024-03-01")),
            value: Some(json!("5.33")),
        },
    ];
    let h = harness(
        &db,
        config(&[], 0),
        Sources {
            observations: Some(vec![("FEDFUNDS", observations)]),
            ..no_sources()
        },
    )
    .await;

    let outcome = h
        .pipeline
        .collect_indicators(&RunContext::today())
        .await
        .unwrap();
    let catalog: Vec<IndicatorSeries> = fma_data::default_indicator_catalog();
    assert_eq!(outcome.total(), catalog.len());
    assert_eq!(outcome.success(), 1);
    assert_eq!(outcome.records(), 2);
    assert_eq!(
        h.pipeline
            .repositories()
            .indicators
            .count("FEDFUNDS")
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn test_run_refreshes_sectors_from_active_assets() {
    let db = migrated_db().await;
    let h = harness(
        &db,
        config(&[("AAPL", "Stock"), ("MSFT", "Stock"), ("XOM", "Stock")], 0),
        Sources {
            overviews: vec![
                overview("AAPL", "Apple Inc", "TECHNOLOGY", "3000000000000", "30.0"),
                overview("MSFT", "Microsoft Corp", "TECHNOLOGY", "2000000000000", "34.0"),
                overview("XOM", "Exxon Mobil", "ENERGY", "None", "12.0"),
            ],
            quotes: Vec::new(),
            history: vec![("AAPL", bars(&CLOSES))],
            observations: None,
        },
    )
    .await;

    let ctx = RunContext::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    let report = h.pipeline.run(&ctx).await;

    assert_eq!(report.assets.success(), 3);
    assert!(report.indicators.is_none());
    assert_eq!(report.sectors, Some(2));

    let snapshots = h
        .pipeline
        .repositories()
        .sectors
        .for_date(ctx.collection_date)
        .await
        .unwrap();
    let tech = snapshots.iter().find(|s| s.sector == "TECHNOLOGY").unwrap();
    assert_eq!(tech.number_of_assets, 2);
    assert_eq!(tech.total_market_cap, Some(5_000_000_000_000));
    assert_eq!(tech.avg_pe_ratio, Some(32.0));

    let energy = snapshots.iter().find(|s| s.sector == "ENERGY").unwrap();
    assert_eq!(energy.number_of_assets, 1);
    assert_eq!(energy.total_market_cap, None);

    let summary = report.summary.unwrap();
    let asset_rows = summary
        .table_counts
        .iter()
        .find(|(table, _)| table == "assets")
        .map(|(_, count)| *count);
    assert_eq!(asset_rows, Some(3));
}

#[tokio::test]
async fn test_refresh_volatility_from_persisted_prices() {
    let db = migrated_db().await;
    let mut cfg = config(&[("SPY", "ETF")], 0);
    cfg.volatility.enabled = false;
    let h = harness(
        &db,
        cfg,
        Sources {
            history: vec![("SPY", bars(&CLOSES))],
            ..no_sources()
        },
    )
    .await;

    let ctx = RunContext::today();
    h.pipeline.collect_assets(&ctx).await;
    let volatility = &h.pipeline.repositories().volatility;
    assert!(volatility
        .series("SPY", VolatilityType::Realized, 5)
        .await
        .unwrap()
        .is_empty());

    let outcome = h.pipeline.refresh_volatility(&ctx, None).await.unwrap();
    assert_eq!(outcome.total(), 1);
    assert_eq!(outcome.records(), 5);

    // 재실행해도 행 수는 그대로
    h.pipeline
        .refresh_volatility(&ctx, Some(vec!["SPY".to_string()]))
        .await
        .unwrap();
    assert_eq!(
        volatility
            .series("SPY", VolatilityType::Realized, 5)
            .await
            .unwrap()
            .len(),
        5
    );
}
