use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use common::{CompanyProfile, DateRange, PricePoint, PriceSeries, Ticker};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, instrument, trace, warn};

use crate::error::{MarketError, Result};
use crate::provider::MarketDataProvider;

/// Endpoints the Yahoo client talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YahooEndpoints {
    /// v8 chart endpoint, the ticker is appended as a path segment
    pub chart_url: String,
    /// v10 quoteSummary endpoint, the ticker is appended as a path segment
    pub summary_url: String,
    /// Page that hands out the session cookie the crumb is bound to
    pub cookie_url: String,
    /// Returns the crumb as plain text for the current session cookie
    pub crumb_url: String,
}

impl Default for YahooEndpoints {
    fn default() -> Self {
        Self {
            chart_url: YahooClient::DEFAULT_CHART_URL.to_string(),
            summary_url: YahooClient::DEFAULT_SUMMARY_URL.to_string(),
            cookie_url: YahooClient::DEFAULT_COOKIE_URL.to_string(),
            crumb_url: YahooClient::DEFAULT_CRUMB_URL.to_string(),
        }
    }
}

/// Yahoo Finance client for daily price history and company profiles.
///
/// quoteSummary only answers requests carrying a crumb that matches the
/// session cookie, so the client keeps a cookie jar and caches the crumb
/// until Yahoo rejects it.
pub struct YahooClient {
    http_client: HttpClient,
    endpoints: YahooEndpoints,
    crumb: Mutex<Option<String>>,
}

impl YahooClient {
    pub const DEFAULT_CHART_URL: &'static str = "https://query1.finance.yahoo.com/v8/finance/chart";
    pub const DEFAULT_SUMMARY_URL: &'static str =
        "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
    pub const DEFAULT_COOKIE_URL: &'static str = "https://fc.yahoo.com";
    pub const DEFAULT_CRUMB_URL: &'static str = "https://query2.finance.yahoo.com/v1/test/getcrumb";
    // Yahoo rejects requests without a browser-like agent
    const USER_AGENT: &'static str = "Mozilla/5.0 (compatible; stockcast/0.1)";
    const SUMMARY_MODULES: &'static str = "assetProfile,price";

    /// Create a client with the given endpoints (public Yahoo, proxies, testing)
    pub fn with_endpoints(endpoints: YahooEndpoints, timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .user_agent(Self::USER_AGENT)
            .cookie_store(true)
            .build()?;

        let trim = |url: String| url.trim_end_matches('/').to_string();
        Ok(Self {
            http_client,
            endpoints: YahooEndpoints {
                chart_url: trim(endpoints.chart_url),
                summary_url: trim(endpoints.summary_url),
                cookie_url: endpoints.cookie_url,
                crumb_url: endpoints.crumb_url,
            },
            crumb: Mutex::new(None),
        })
    }

    /// Issues a GET and returns the body of a successful response.
    async fn get_body(&self, ticker: &Ticker, url: &str, query: &[(&str, String)]) -> Result<String> {
        trace!(url, ?query, "Sending request to Yahoo");
        let response = self.http_client.get(url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_error(ticker, status.as_u16(), &body));
        }

        Ok(body)
    }

    fn cached_crumb(&self) -> Option<String> {
        self.crumb.lock().ok().and_then(|crumb| crumb.clone())
    }

    fn store_crumb(&self, value: Option<String>) {
        if let Ok(mut crumb) = self.crumb.lock() {
            *crumb = value;
        }
    }

    /// Returns the session crumb, asking Yahoo for a fresh one when none is
    /// cached or `refresh` is set.
    async fn crumb(&self, refresh: bool) -> Result<String> {
        if refresh {
            self.store_crumb(None);
        } else if let Some(crumb) = self.cached_crumb() {
            return Ok(crumb);
        }

        // Only the Set-Cookie header matters here, the page itself answers 404
        let cookie_response = self.http_client.get(&self.endpoints.cookie_url).send().await?;
        trace!(status = cookie_response.status().as_u16(), "Primed Yahoo session cookie");

        let response = self.http_client.get(&self.endpoints.crumb_url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "Yahoo refused to hand out a crumb");
            return Err(MarketError::Upstream {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let crumb = parse_crumb(&body)?;
        debug!("Obtained Yahoo crumb");
        self.store_crumb(Some(crumb.clone()));
        Ok(crumb)
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    #[instrument(skip(self))]
    async fn fetch_history(&self, ticker: &Ticker, range: Option<DateRange>) -> Result<PriceSeries> {
        let url = format!("{}/{}", self.endpoints.chart_url, ticker);
        let mut query = vec![
            ("interval", "1d".to_string()),
            ("events", "history".to_string()),
        ];

        match range {
            Some(range) => {
                // period2 is exclusive, so ask for the day after the end date
                let end = range.end.checked_add_days(Days::new(1)).unwrap_or(range.end);
                query.push(("period1", unix_midnight(range.start).to_string()));
                query.push(("period2", unix_midnight(end).to_string()));
            }
            None => query.push(("range", "max".to_string())),
        }

        let body = self.get_body(ticker, &url, &query).await?;
        let series = parse_chart(ticker, &body)?;
        debug!(points = series.len(), "Fetched price history");

        // Yahoo occasionally returns a bar outside the requested window
        Ok(match range {
            Some(range) => series.within(range),
            None => series,
        })
    }

    #[instrument(skip(self))]
    async fn fetch_profile(&self, ticker: &Ticker) -> Result<CompanyProfile> {
        let url = format!("{}/{}", self.endpoints.summary_url, ticker);

        let crumb = self.crumb(false).await?;
        let body = match self.get_body(ticker, &url, &summary_query(&crumb)).await {
            // Crumb expired along with the session cookie
            Err(MarketError::Upstream { status: 401, .. }) => {
                debug!("Crumb rejected, refreshing session");
                let crumb = self.crumb(true).await?;
                self.get_body(ticker, &url, &summary_query(&crumb)).await?
            }
            other => other?,
        };
        parse_summary(ticker, &body)
    }
}

fn summary_query(crumb: &str) -> [(&'static str, String); 2] {
    [
        ("modules", YahooClient::SUMMARY_MODULES.to_string()),
        ("crumb", crumb.to_string()),
    ]
}

/// Validates the plain-text body of the crumb endpoint.
pub(crate) fn parse_crumb(body: &str) -> Result<String> {
    let crumb = body.trim();
    let looks_like_markup = crumb.starts_with('<') || crumb.starts_with('{');
    if crumb.is_empty() || looks_like_markup || crumb.chars().any(char::is_whitespace) {
        return Err(MarketError::Decode(format!(
            "Unexpected crumb response: {}",
            crumb.chars().take(80).collect::<String>()
        )));
    }
    Ok(crumb.to_string())
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: Option<String>,
    description: Option<String>,
}

impl YahooError {
    fn is_not_found(&self) -> bool {
        self.code.as_deref() == Some("Not Found")
    }

    fn message(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryBody,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    result: Option<Vec<SummaryResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    asset_profile: Option<AssetProfile>,
    price: Option<PriceModule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetProfile {
    long_business_summary: Option<String>,
    website: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    short_name: Option<String>,
    long_name: Option<String>,
}

/// Maps a non-success response onto a market error.
fn classify_error(ticker: &Ticker, status: u16, body: &str) -> MarketError {
    let yahoo_error = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("chart")
                .or_else(|| value.get("quoteSummary"))
                .and_then(|inner| inner.get("error"))
                .cloned()
        })
        .and_then(|error| serde_json::from_value::<YahooError>(error).ok());

    if status == 404 || yahoo_error.as_ref().is_some_and(YahooError::is_not_found) {
        return MarketError::TickerNotFound(ticker.to_string());
    }

    let message = yahoo_error
        .map(|e| e.message())
        .unwrap_or_else(|| body.chars().take(200).collect());
    warn!(status, %message, "Yahoo returned an error");
    MarketError::Upstream { status, message }
}

/// Parses a v8 chart payload into a price series.
///
/// Bars with a missing open or close are skipped. Dates are taken in the
/// exchange's local time using the offset reported in `meta`.
pub(crate) fn parse_chart(ticker: &Ticker, body: &str) -> Result<PriceSeries> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.chart.error {
        return Err(if error.is_not_found() {
            MarketError::TickerNotFound(ticker.to_string())
        } else {
            MarketError::Upstream {
                status: 200,
                message: error.message(),
            }
        });
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| MarketError::TickerNotFound(ticker.to_string()))?;

    let offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(PriceSeries::empty(ticker.as_str()));
    };
    let opens = quote.open.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();

    let mut points = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let open = opens.get(i).copied().flatten();
        let close = closes.get(i).copied().flatten();
        let (Some(open), Some(close)) = (open, close) else {
            trace!(ts, "Skipping bar without open/close");
            continue;
        };
        let date = DateTime::from_timestamp(ts + offset, 0)
            .ok_or_else(|| MarketError::Decode(format!("Invalid timestamp: {}", ts)))?
            .date_naive();
        points.push(PricePoint::new(date, open, close));
    }

    Ok(PriceSeries::new(ticker.as_str(), points))
}

/// Parses a quoteSummary payload into a company profile.
pub(crate) fn parse_summary(ticker: &Ticker, body: &str) -> Result<CompanyProfile> {
    let envelope: SummaryEnvelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.quote_summary.error {
        return Err(if error.is_not_found() {
            MarketError::TickerNotFound(ticker.to_string())
        } else {
            MarketError::Upstream {
                status: 200,
                message: error.message(),
            }
        });
    }

    let result = envelope
        .quote_summary
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| MarketError::TickerNotFound(ticker.to_string()))?;

    let (name_short, name_long) = match result.price {
        Some(price) => (price.short_name, price.long_name),
        None => (None, None),
    };
    let (description, website) = match result.asset_profile {
        Some(profile) => (profile.long_business_summary, profile.website),
        None => (None, None),
    };

    Ok(CompanyProfile {
        name: name_short.or(name_long).unwrap_or_else(|| ticker.to_string()),
        logo_url: website.as_deref().and_then(logo_from_website),
        description: description.unwrap_or_default(),
    })
}

/// Derives a logo URL from the company's website host.
fn logo_from_website(website: &str) -> Option<String> {
    let without_scheme = website
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let host = without_scheme.split(['/', '?', '#']).next()?;
    let host = host.trim_start_matches("www.");

    if host.is_empty() {
        return None;
    }
    Some(format!("https://logo.clearbit.com/{}", host))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_OK: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "symbol": "AAA", "gmtoffset": -18000 },
                "timestamp": [1578061800, 1578321000, 1578407400],
                "indicators": {
                    "quote": [{
                        "open": [10.0, 11.0, null],
                        "close": [10.5, 11.5, 12.5],
                        "high": [11.0, 12.0, 13.0]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    const CHART_NOT_FOUND: &str = r#"{
        "chart": {
            "result": null,
            "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
        }
    }"#;

    const CHART_NO_BARS: &str = r#"{
        "chart": {
            "result": [{ "meta": { "gmtoffset": 0 }, "indicators": { "quote": [{}] } }],
            "error": null
        }
    }"#;

    const SUMMARY_OK: &str = r#"{
        "quoteSummary": {
            "result": [{
                "assetProfile": {
                    "longBusinessSummary": "Makes widgets.",
                    "website": "https://www.example.com/about"
                },
                "price": { "shortName": "Example Corp", "longName": "Example Corporation" }
            }],
            "error": null
        }
    }"#;

    fn ticker() -> Ticker {
        Ticker::parse("AAA").unwrap()
    }

    #[test]
    fn test_parse_chart_skips_incomplete_bars() {
        let series = parse_chart(&ticker(), CHART_OK).unwrap();

        assert_eq!(series.ticker, "AAA");
        assert_eq!(series.len(), 2);
        assert_eq!(series.opens(), vec![10.0, 11.0]);
        assert_eq!(series.closes(), vec![10.5, 11.5]);
        assert_eq!(
            series.dates(),
            vec![
                NaiveDate::from_ymd_opt(2020, 1, 3).unwrap(),
                NaiveDate::from_ymd_opt(2020, 1, 6).unwrap(),
            ]
        );
    }

    #[test]
    fn test_parse_chart_not_found() {
        let result = parse_chart(&ticker(), CHART_NOT_FOUND);
        assert!(matches!(result, Err(MarketError::TickerNotFound(t)) if t == "AAA"));
    }

    #[test]
    fn test_parse_chart_without_bars_is_empty() {
        let series = parse_chart(&ticker(), CHART_NO_BARS).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_chart_rejects_garbage() {
        let result = parse_chart(&ticker(), "<html>oops</html>");
        assert!(matches!(result, Err(MarketError::Decode(_))));
    }

    #[test]
    fn test_parse_summary() {
        let profile = parse_summary(&ticker(), SUMMARY_OK).unwrap();

        assert_eq!(profile.name, "Example Corp");
        assert_eq!(profile.description, "Makes widgets.");
        assert_eq!(profile.logo_url.as_deref(), Some("https://logo.clearbit.com/example.com"));
    }

    #[test]
    fn test_classify_error_statuses() {
        assert!(matches!(
            classify_error(&ticker(), 404, ""),
            MarketError::TickerNotFound(_)
        ));
        assert!(matches!(
            classify_error(&ticker(), 500, CHART_NOT_FOUND),
            MarketError::TickerNotFound(_)
        ));
        assert!(matches!(
            classify_error(&ticker(), 503, "busy"),
            MarketError::Upstream { status: 503, .. }
        ));
    }

    #[test]
    fn test_parse_crumb() {
        // getcrumb answers with a bare token, sometimes with an escaped slash
        assert_eq!(parse_crumb("hZ4kPq1Zs8V").unwrap(), "hZ4kPq1Zs8V");
        assert_eq!(parse_crumb("a.b\\u002Fc7\n").unwrap(), "a.b\\u002Fc7");

        for body in [
            "",
            "  ",
            "<html><body>Will be right back</body></html>",
            r#"{"finance":{"error":{}}}"#,
            "Too Many Requests",
        ] {
            assert!(matches!(parse_crumb(body), Err(MarketError::Decode(_))), "{:?} accepted", body);
        }
    }

    #[test]
    fn test_summary_query_carries_crumb() {
        let query = summary_query("hZ4kPq1Zs8V");
        assert!(query.contains(&("crumb", "hZ4kPq1Zs8V".to_string())));
        assert!(query.contains(&("modules", "assetProfile,price".to_string())));
    }

    #[test]
    fn test_crumb_cache() {
        let client = YahooClient::with_endpoints(YahooEndpoints::default(), Duration::from_secs(1)).unwrap();
        assert_eq!(client.cached_crumb(), None);

        client.store_crumb(Some("abc".to_string()));
        assert_eq!(client.cached_crumb().as_deref(), Some("abc"));
        client.store_crumb(None);
        assert_eq!(client.cached_crumb(), None);
    }

    #[test]
    fn test_endpoints_drop_trailing_slash() {
        let endpoints = YahooEndpoints {
            chart_url: "http://localhost:1/chart/".to_string(),
            ..YahooEndpoints::default()
        };
        let client = YahooClient::with_endpoints(endpoints, Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoints.chart_url, "http://localhost:1/chart");
        assert_eq!(client.endpoints.crumb_url, YahooClient::DEFAULT_CRUMB_URL);
    }

    #[test]
    fn test_logo_from_website() {
        assert_eq!(
            logo_from_website("http://apple.com").as_deref(),
            Some("https://logo.clearbit.com/apple.com")
        );
        assert_eq!(logo_from_website(""), None);
    }
}
