use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Description shown before the user has entered a ticker.
const PLACEHOLDER_DESCRIPTION: &str = "This is a single-page web application which shows company \
information (logo, registered name and description) and stock plots based on the stock code \
given by the user. It also contains a regression model that predicts closing prices for the \
number of days entered by the user.";
const PLACEHOLDER_LOGO: &str = "https://www.aegonlife.com/insurance-investment-knowledge/wp-content/uploads/2019/08/shutterstock_601834022.jpg";
const PLACEHOLDER_NAME: &str = "Stock Prediction";

/// Upper bound on ticker length; real symbols are far shorter.
pub const MAX_TICKER_LEN: usize = 16;

/// A normalized ticker symbol (trimmed, upper-cased, never empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Parses user input into a ticker. Returns `None` for blank or oversized input.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.len() > MAX_TICKER_LEN {
            tracing::trace!(input, "rejecting ticker input");
            return None;
        }
        Some(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// One daily sample of a price history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: f64, close: f64) -> Self {
        Self { date, open, close }
    }
}

/// Price history of a single ticker, ordered by date ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceSeries {
    pub ticker: String,
    pub points: Vec<PricePoint>,
    /// Date range covered by `points`, `None` when the series is empty
    pub date_range: Option<DateRange>,
}

impl PriceSeries {
    /// Builds a series, sorting the points by date and dropping duplicate dates
    /// (the first sample for a date wins).
    pub fn new(ticker: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);

        let date_range = match (points.first(), points.last()) {
            (Some(first), Some(last)) => Some(DateRange::new(first.date, last.date)),
            _ => None,
        };

        Self {
            ticker: ticker.into(),
            points,
            date_range,
        }
    }

    pub fn empty(ticker: impl Into<String>) -> Self {
        Self::new(ticker, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.open).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Returns the samples whose dates fall inside `range`.
    pub fn within(&self, range: DateRange) -> Self {
        let points = self
            .points
            .iter()
            .filter(|p| range.contains(p.date))
            .copied()
            .collect();
        Self::new(self.ticker.clone(), points)
    }
}

/// Company metadata shown in the page header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompanyProfile {
    /// Display name
    pub name: String,
    /// Logo image URL, if the provider knows one
    pub logo_url: Option<String>,
    /// Long business summary
    pub description: String,
}

impl CompanyProfile {
    /// The fixed triple shown when no ticker has been entered.
    pub fn placeholder() -> Self {
        Self {
            name: PLACEHOLDER_NAME.to_string(),
            logo_url: Some(PLACEHOLDER_LOGO.to_string()),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}
