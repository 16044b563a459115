//! 자산 매핑.
//!
//! 페이로드 우선순위는 레코드 단위입니다. 재무 개요가 있으면 그 매핑만 사용하고,
//! 없을 때만 시세 정보로, 둘 다 없으면 최소 레코드로 내려갑니다. 필드 단위 병합은 하지 않습니다.

use fma_core::coerce::{date, integer, numeric, text};
use fma_core::{Asset, Fundamentals, DEFAULT_CURRENCY};

use crate::provider::{CompanyOverview, ProviderPayload, QuoteInfo};

/// 페이로드 variant에 맞는 매퍼로 자산 레코드를 만듭니다.
pub fn map_asset(symbol: &str, payload: &ProviderPayload, asset_type: &str) -> Asset {
    match payload {
        ProviderPayload::Overview(overview) => map_overview(symbol, overview, asset_type),
        ProviderPayload::QuoteInfo(info) => map_quote_info(symbol, info, asset_type),
        ProviderPayload::Unavailable => Asset::minimal(symbol, asset_type),
    }
}

/// Alpha Vantage 재무 개요 → 자산.
///
/// 레코드 키는 항상 요청한 `symbol`입니다. 페이로드의 `Symbol`은 응답 유효성 판단에만 쓰이고
/// 저장 키로는 쓰지 않습니다.
pub fn map_overview(symbol: &str, o: &CompanyOverview, asset_type: &str) -> Asset {
    Asset {
        symbol: symbol.to_string(),
        name: text(o.name.as_ref()),
        description: text(o.description.as_ref()),
        cik: text(o.cik.as_ref()),
        exchange: text(o.exchange.as_ref()),
        currency: text(o.currency.as_ref()).or_else(|| Some(DEFAULT_CURRENCY.to_string())),
        country: text(o.country.as_ref()),
        sector: text(o.sector.as_ref()),
        industry: text(o.industry.as_ref()),
        asset_type: text(o.asset_type.as_ref()).unwrap_or_else(|| asset_type.to_string()),
        fundamentals: Fundamentals {
            market_capitalization: integer(o.market_capitalization.as_ref()),
            ebitda: integer(o.ebitda.as_ref()),
            shares_outstanding: integer(o.shares_outstanding.as_ref()),
            revenue_ttm: integer(o.revenue_ttm.as_ref()),
            gross_profit_ttm: integer(o.gross_profit_ttm.as_ref()),
            pe_ratio: numeric(o.pe_ratio.as_ref()),
            peg_ratio: numeric(o.peg_ratio.as_ref()),
            trailing_pe: numeric(o.trailing_pe.as_ref()),
            forward_pe: numeric(o.forward_pe.as_ref()),
            price_to_sales_ratio_ttm: numeric(o.price_to_sales_ratio_ttm.as_ref()),
            price_to_book_ratio: numeric(o.price_to_book_ratio.as_ref()),
            ev_to_revenue: numeric(o.ev_to_revenue.as_ref()),
            ev_to_ebitda: numeric(o.ev_to_ebitda.as_ref()),
            analyst_target_price: numeric(o.analyst_target_price.as_ref()),
            book_value: numeric(o.book_value.as_ref()),
            eps: numeric(o.eps.as_ref()),
            diluted_eps_ttm: numeric(o.diluted_eps_ttm.as_ref()),
            revenue_per_share_ttm: numeric(o.revenue_per_share_ttm.as_ref()),
            dividend_per_share: numeric(o.dividend_per_share.as_ref()),
            dividend_yield: numeric(o.dividend_yield.as_ref()),
            dividend_date: date(o.dividend_date.as_ref()),
            ex_dividend_date: date(o.ex_dividend_date.as_ref()),
            profit_margin: numeric(o.profit_margin.as_ref()),
            operating_margin_ttm: numeric(o.operating_margin_ttm.as_ref()),
            return_on_assets_ttm: numeric(o.return_on_assets_ttm.as_ref()),
            return_on_equity_ttm: numeric(o.return_on_equity_ttm.as_ref()),
            quarterly_earnings_growth_yoy: numeric(o.quarterly_earnings_growth_yoy.as_ref()),
            quarterly_revenue_growth_yoy: numeric(o.quarterly_revenue_growth_yoy.as_ref()),
            beta: numeric(o.beta.as_ref()),
            week_52_high: numeric(o.week_52_high.as_ref()),
            week_52_low: numeric(o.week_52_low.as_ref()),
            day_50_moving_average: numeric(o.day_50_moving_average.as_ref()),
            day_200_moving_average: numeric(o.day_200_moving_average.as_ref()),
        },
    }
}

/// Yahoo 시세 정보 → 자산.
///
/// 시세 정보에 없는 재무 지표는 null로 남습니다.
pub fn map_quote_info(symbol: &str, q: &QuoteInfo, asset_type: &str) -> Asset {
    Asset {
        symbol: symbol.to_string(),
        name: text(q.long_name.as_ref()).or_else(|| Some(symbol.to_string())),
        description: text(q.long_business_summary.as_ref()),
        cik: None,
        exchange: text(q.exchange.as_ref()),
        currency: text(q.currency.as_ref()).or_else(|| Some(DEFAULT_CURRENCY.to_string())),
        country: text(q.country.as_ref()),
        sector: text(q.sector.as_ref()),
        industry: text(q.industry.as_ref()),
        asset_type: asset_type.to_string(),
        fundamentals: Fundamentals {
            market_capitalization: integer(q.market_cap.as_ref()),
            shares_outstanding: integer(q.shares_outstanding.as_ref()),
            pe_ratio: numeric(q.trailing_pe.as_ref()),
            book_value: numeric(q.book_value.as_ref()),
            dividend_yield: numeric(q.dividend_yield.as_ref()),
            eps: numeric(q.trailing_eps.as_ref()),
            beta: numeric(q.beta.as_ref()),
            week_52_high: numeric(q.fifty_two_week_high.as_ref()),
            week_52_low: numeric(q.fifty_two_week_low.as_ref()),
            day_50_moving_average: numeric(q.fifty_day_average.as_ref()),
            day_200_moving_average: numeric(q.two_hundred_day_average.as_ref()),
            ..Fundamentals::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn overview(value: serde_json::Value) -> CompanyOverview {
        serde_json::from_value(value).unwrap()
    }

    fn quote(value: serde_json::Value) -> QuoteInfo {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_map_overview() {
        let o = overview(json!({
            "Symbol": "AAPL",
            "AssetType": "Common Stock",
            "Name": "Apple Inc",
            "CIK": "320193",
            "Exchange": "NASDAQ",
            "Sector": "TECHNOLOGY",
            "MarketCapitalization": "3000000000000",
            "EBITDA": "None",
            "PERatio": "28.5",
            "PEGRatio": "-",
            "52WeekHigh": "199.62",
            "DividendDate": "2024-02-15",
            "ExDividendDate": "N/A"
        }));

        let asset = map_overview("AAPL", &o, "Stock");
        assert_eq!(asset.asset_type, "Common Stock");
        assert_eq!(asset.cik.as_deref(), Some("320193"));
        assert_eq!(asset.currency.as_deref(), Some("USD"));
        assert_eq!(asset.fundamentals.market_capitalization, Some(3_000_000_000_000));
        assert_eq!(asset.fundamentals.ebitda, None);
        assert_eq!(asset.fundamentals.pe_ratio, Some(28.5));
        assert_eq!(asset.fundamentals.peg_ratio, None);
        assert_eq!(asset.fundamentals.week_52_high, Some(199.62));
        assert_eq!(
            asset.fundamentals.dividend_date,
            NaiveDate::from_ymd_opt(2024, 2, 15)
        );
        assert_eq!(asset.fundamentals.ex_dividend_date, None);
    }

    #[test]
    fn test_map_overview_uses_requested_type_when_missing() {
        let o = overview(json!({ "Symbol": "SPY", "AssetType": "None" }));
        let asset = map_overview("SPY", &o, "ETF");
        assert_eq!(asset.asset_type, "ETF");
        assert_eq!(asset.name, None);
    }

    #[test]
    fn test_map_overview_keys_by_requested_symbol() {
        // 클래스 주식 등에서 응답 심볼 표기가 요청과 다를 수 있음
        let o = overview(json!({
            "Symbol": "BRK-B",
            "Name": "Berkshire Hathaway Inc",
            "AssetType": "Common Stock",
        }));
        let asset = map_overview("BRK.B", &o, "Stock");
        assert_eq!(asset.symbol, "BRK.B");
        assert_eq!(asset.name.as_deref(), Some("Berkshire Hathaway Inc"));

        let via_payload = map_asset("BRK.B", &ProviderPayload::Overview(Box::new(o)), "Stock");
        assert_eq!(via_payload.symbol, "BRK.B");
    }

    #[test]
    fn test_map_quote_info() {
        let q = quote(json!({
            "symbol": "QQQ",
            "marketCap": 250000000000.0,
            "trailingPE": "31.2",
            "fiftyDayAverage": 430.1,
            "sector": ""
        }));

        let asset = map_quote_info("QQQ", &q, "ETF");
        assert_eq!(asset.name.as_deref(), Some("QQQ"));
        assert_eq!(asset.asset_type, "ETF");
        assert_eq!(asset.sector, None);
        assert_eq!(asset.fundamentals.market_capitalization, Some(250_000_000_000));
        assert_eq!(asset.fundamentals.pe_ratio, Some(31.2));
        assert_eq!(asset.fundamentals.day_50_moving_average, Some(430.1));
        assert_eq!(asset.fundamentals.forward_pe, None);
    }

    #[test]
    fn test_map_unavailable_is_minimal() {
        let asset = map_asset("AXON", &ProviderPayload::Unavailable, "Stock");
        assert_eq!(asset, Asset::minimal("AXON", "Stock"));
    }

    #[test]
    fn test_sparse_overview_wins_over_rich_quote() {
        // 재무 개요가 사용 가능하면 비어 있는 필드도 시세 정보로 채우지 않음
        let sparse = ProviderPayload::Overview(Box::new(overview(json!({
            "Symbol": "MSFT",
            "Name": "Microsoft Corporation"
        }))));
        let rich = quote(json!({
            "longName": "Microsoft Corp",
            "marketCap": 3100000000000u64,
            "beta": 0.9
        }));

        let from_overview = map_asset("MSFT", &sparse, "Stock");
        let from_quote = map_quote_info("MSFT", &rich, "Stock");

        assert_eq!(from_overview.name.as_deref(), Some("Microsoft Corporation"));
        assert!(from_overview.fundamentals.is_empty());
        assert_eq!(from_quote.fundamentals.beta, Some(0.9));
    }
}
