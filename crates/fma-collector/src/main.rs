//! 금융 시장 데이터 수집기 CLI.

use clap::{Parser, Subcommand};
use fma_core::logging::{init_logging, LogConfig};
use fma_data::{Database, DatabaseConfig};
use fma_collector::config::parse_asset_list;
use fma_collector::{CollectorConfig, Pipeline, Providers, RunContext, TokioTimer};

#[derive(Parser)]
#[command(name = "fma-collector")]
#[command(about = "Financial market data collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 스키마 생성 (DB 파일이 없으면 만듦)
    Setup,

    /// 전체 수집 (자산/일봉 → 지표 → 섹터 → 요약)
    Run,

    /// 거시경제 지표만 수집
    CollectIndicators,

    /// 저장된 종가로 실현 변동성 재계산
    RefreshVolatility {
        /// 특정 심볼만 계산 (쉼표로 구분, 예: "SPY,AAPL")
        #[arg(long)]
        symbols: Option<String>,
    },

    /// 섹터 성과 스냅샷 갱신
    RefreshSectors,

    /// 저장 데이터 요약
    Summary,

    /// 저장된 자산 정보 조회
    Show {
        /// 조회할 심볼
        symbol: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 로깅 초기화
    init_logging(LogConfig::new(&cli.log_level).with_env_format())
        .map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!("FMA Data Collector 시작");

    // 설정 로드
    let config = CollectorConfig::from_env()?;
    tracing::debug!(
        symbols = config.asset_collect.symbols.len(),
        delay_ms = config.asset_collect.request_delay_ms,
        "설정 로드 완료"
    );

    // DB 연결
    let db = Database::connect(&DatabaseConfig::new(config.database_url.as_str())).await?;
    tracing::info!("데이터베이스 연결 성공");

    let ctx = RunContext::today();

    if let Commands::Setup = cli.command {
        db.migrate().await?;
        db.health_check().await?;
        tracing::info!("데이터베이스 준비 완료");
        db.close().await;
        return Ok(());
    }

    let providers = Providers::from_config(&config.providers)?;
    let pipeline = Pipeline::new(config, &db, providers, TokioTimer::new());

    // 명령 실행
    match cli.command {
        Commands::Setup => {}
        Commands::Run => {
            let report = pipeline.run(&ctx).await;
            tracing::info!(
                assets = report.assets.success(),
                failed = report.assets.failed(),
                indicators = report.indicators.as_ref().map(|o| o.records()),
                sectors = report.sectors,
                "수집 종료"
            );
        }
        Commands::CollectIndicators => {
            if pipeline.collect_indicators(&ctx).await.is_none() {
                tracing::warn!("지표 수집이 실행되지 않았습니다");
            }
        }
        Commands::RefreshVolatility { symbols } => {
            let symbols = symbols
                .map(|raw| -> anyhow::Result<Vec<String>> {
                    Ok(parse_asset_list(&raw)?
                        .into_iter()
                        .map(|req| req.symbol)
                        .collect())
                })
                .transpose()?;
            pipeline.refresh_volatility(&ctx, symbols).await?;
        }
        Commands::RefreshSectors => {
            pipeline.refresh_sectors(&ctx).await?;
        }
        Commands::Summary => {
            let summary = pipeline.summary(&ctx).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Show { symbol } => {
            let symbol = symbol.to_uppercase();
            let repos = pipeline.repositories();
            match repos.assets.get(&symbol).await? {
                Some(asset) => {
                    let latest = repos.prices.latest_date(&symbol).await?;
                    println!("{}", serde_json::to_string_pretty(&asset)?);
                    match latest {
                        Some(date) => println!("최근 일봉: {}", date),
                        None => println!("최근 일봉: 없음"),
                    }
                }
                None => println!("{}: 저장된 자산 정보가 없습니다", symbol),
            }
        }
    }

    db.close().await;
    tracing::info!("FMA Data Collector 종료");

    Ok(())
}
