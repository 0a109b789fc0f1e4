use chrono::NaiveDate;
use common::{ChartResponse, CompanyProfile};

use super::{get, with_query};

fn date_param(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

/// Company header for `ticker`; an empty ticker yields the placeholder.
pub async fn get_company(ticker: &str) -> Result<CompanyProfile, String> {
    get(&with_query("/company", &[("ticker", Some(ticker.to_string()))])).await
}

pub async fn get_price_chart(
    ticker: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<ChartResponse, String> {
    let endpoint = with_query(
        "/charts/price",
        &[
            ("ticker", Some(ticker.to_string())),
            ("start_date", date_param(start_date)),
            ("end_date", date_param(end_date)),
        ],
    );
    get(&endpoint).await
}

pub async fn get_indicator_chart(
    ticker: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<ChartResponse, String> {
    let endpoint = with_query(
        "/charts/indicator",
        &[
            ("ticker", Some(ticker.to_string())),
            ("start_date", date_param(start_date)),
            ("end_date", date_param(end_date)),
        ],
    );
    get(&endpoint).await
}

pub async fn get_forecast_chart(ticker: &str, days: u32) -> Result<ChartResponse, String> {
    let endpoint = with_query(
        "/charts/forecast",
        &[
            ("ticker", Some(ticker.to_string())),
            ("days", Some(days.to_string())),
        ],
    );
    get(&endpoint).await
}
