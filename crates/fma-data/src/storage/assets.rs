//! `assets` 테이블 repository.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::{debug, instrument};

use super::{upsert_sql, Database};
use crate::error::Result;
use fma_core::{Asset, AssetValuation, Fundamentals};

const TABLE: &str = "assets";

const COLUMNS: [&str; 43] = [
    "symbol",
    "name",
    "description",
    "cik",
    "exchange",
    "currency",
    "country",
    "sector",
    "industry",
    "asset_type",
    "market_capitalization",
    "ebitda",
    "shares_outstanding",
    "revenue_ttm",
    "gross_profit_ttm",
    "pe_ratio",
    "peg_ratio",
    "trailing_pe",
    "forward_pe",
    "price_to_sales_ratio_ttm",
    "price_to_book_ratio",
    "ev_to_revenue",
    "ev_to_ebitda",
    "analyst_target_price",
    "book_value",
    "eps",
    "diluted_eps_ttm",
    "revenue_per_share_ttm",
    "dividend_per_share",
    "dividend_yield",
    "dividend_date",
    "ex_dividend_date",
    "profit_margin",
    "operating_margin_ttm",
    "return_on_assets_ttm",
    "return_on_equity_ttm",
    "quarterly_earnings_growth_yoy",
    "quarterly_revenue_growth_yoy",
    "beta",
    "week_52_high",
    "week_52_low",
    "day_50_moving_average",
    "day_200_moving_average",
];

/// 자산 repository.
pub struct AssetRepository {
    db: Database,
}

impl AssetRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 자산 레코드를 upsert합니다. 같은 심볼의 기존 행은 전체가 교체됩니다.
    #[instrument(skip(self, asset), fields(symbol = %asset.symbol))]
    pub async fn upsert(&self, asset: &Asset) -> Result<()> {
        let sql = upsert_sql(TABLE, &COLUMNS, &["symbol"], true);
        let f = &asset.fundamentals;

        let mut tx = self.db.pool().begin().await?;
        sqlx::query(&sql)
            .bind(&asset.symbol)
            .bind(&asset.name)
            .bind(&asset.description)
            .bind(&asset.cik)
            .bind(&asset.exchange)
            .bind(&asset.currency)
            .bind(&asset.country)
            .bind(&asset.sector)
            .bind(&asset.industry)
            .bind(&asset.asset_type)
            .bind(f.market_capitalization)
            .bind(f.ebitda)
            .bind(f.shares_outstanding)
            .bind(f.revenue_ttm)
            .bind(f.gross_profit_ttm)
            .bind(f.pe_ratio)
            .bind(f.peg_ratio)
            .bind(f.trailing_pe)
            .bind(f.forward_pe)
            .bind(f.price_to_sales_ratio_ttm)
            .bind(f.price_to_book_ratio)
            .bind(f.ev_to_revenue)
            .bind(f.ev_to_ebitda)
            .bind(f.analyst_target_price)
            .bind(f.book_value)
            .bind(f.eps)
            .bind(f.diluted_eps_ttm)
            .bind(f.revenue_per_share_ttm)
            .bind(f.dividend_per_share)
            .bind(f.dividend_yield)
            .bind(f.dividend_date)
            .bind(f.ex_dividend_date)
            .bind(f.profit_margin)
            .bind(f.operating_margin_ttm)
            .bind(f.return_on_assets_ttm)
            .bind(f.return_on_equity_ttm)
            .bind(f.quarterly_earnings_growth_yoy)
            .bind(f.quarterly_revenue_growth_yoy)
            .bind(f.beta)
            .bind(f.week_52_high)
            .bind(f.week_52_low)
            .bind(f.day_50_moving_average)
            .bind(f.day_200_moving_average)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!("자산 저장 완료");
        Ok(())
    }

    /// 심볼로 자산을 조회합니다.
    pub async fn get(&self, symbol: &str) -> Result<Option<Asset>> {
        let sql = format!("SELECT {} FROM {TABLE} WHERE symbol = ?", COLUMNS.join(", "));
        let row = sqlx::query(&sql)
            .bind(symbol)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(asset_from_row).transpose().map_err(Into::into)
    }

    /// 활성 자산의 섹터 집계용 값을 조회합니다.
    pub async fn active_valuations(&self) -> Result<Vec<AssetValuation>> {
        let rows: Vec<(String, Option<String>, Option<i64>, Option<f64>, Option<f64>)> =
            sqlx::query_as(
                r#"
                SELECT symbol, sector, market_capitalization, pe_ratio, dividend_yield
                FROM assets
                WHERE is_active = TRUE
                ORDER BY symbol
                "#,
            )
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(symbol, sector, market_capitalization, pe_ratio, dividend_yield)| AssetValuation {
                    symbol,
                    sector,
                    market_capitalization,
                    pe_ratio,
                    dividend_yield,
                },
            )
            .collect())
    }

    /// 활성/비활성 표시. 비활성 자산은 섹터 집계에서 제외됩니다.
    pub async fn set_active(&self, symbol: &str, active: bool) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE assets SET is_active = ?, updated_at = CURRENT_TIMESTAMP WHERE symbol = ?",
        )
        .bind(active)
        .bind(symbol)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn asset_from_row(row: &SqliteRow) -> std::result::Result<Asset, sqlx::Error> {
    Ok(Asset {
        symbol: row.try_get("symbol")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        cik: row.try_get("cik")?,
        exchange: row.try_get("exchange")?,
        currency: row.try_get("currency")?,
        country: row.try_get("country")?,
        sector: row.try_get("sector")?,
        industry: row.try_get("industry")?,
        asset_type: row.try_get("asset_type")?,
        fundamentals: Fundamentals {
            market_capitalization: row.try_get("market_capitalization")?,
            ebitda: row.try_get("ebitda")?,
            shares_outstanding: row.try_get("shares_outstanding")?,
            revenue_ttm: row.try_get("revenue_ttm")?,
            gross_profit_ttm: row.try_get("gross_profit_ttm")?,
            pe_ratio: row.try_get("pe_ratio")?,
            peg_ratio: row.try_get("peg_ratio")?,
            trailing_pe: row.try_get("trailing_pe")?,
            forward_pe: row.try_get("forward_pe")?,
            price_to_sales_ratio_ttm: row.try_get("price_to_sales_ratio_ttm")?,
            price_to_book_ratio: row.try_get("price_to_book_ratio")?,
            ev_to_revenue: row.try_get("ev_to_revenue")?,
            ev_to_ebitda: row.try_get("ev_to_ebitda")?,
            analyst_target_price: row.try_get("analyst_target_price")?,
            book_value: row.try_get("book_value")?,
            eps: row.try_get("eps")?,
            diluted_eps_ttm: row.try_get("diluted_eps_ttm")?,
            revenue_per_share_ttm: row.try_get("revenue_per_share_ttm")?,
            dividend_per_share: row.try_get("dividend_per_share")?,
            dividend_yield: row.try_get("dividend_yield")?,
            dividend_date: row.try_get("dividend_date")?,
            ex_dividend_date: row.try_get("ex_dividend_date")?,
            profit_margin: row.try_get("profit_margin")?,
            operating_margin_ttm: row.try_get("operating_margin_ttm")?,
            return_on_assets_ttm: row.try_get("return_on_assets_ttm")?,
            return_on_equity_ttm: row.try_get("return_on_equity_ttm")?,
            quarterly_earnings_growth_yoy: row.try_get("quarterly_earnings_growth_yoy")?,
            quarterly_revenue_growth_yoy: row.try_get("quarterly_revenue_growth_yoy")?,
            beta: row.try_get("beta")?,
            week_52_high: row.try_get("week_52_high")?,
            week_52_low: row.try_get("week_52_low")?,
            day_50_moving_average: row.try_get("day_50_moving_average")?,
            day_200_moving_average: row.try_get("day_200_moving_average")?,
        },
    })
}
