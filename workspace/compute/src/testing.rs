//! Series fixtures shared by the compute tests.

use chrono::{Days, NaiveDate};
use common::{PricePoint, PriceSeries};

pub const TICKER: &str = "AAA";

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Series of (open, close) pairs on consecutive days starting 2020-01-01.
pub fn dated_series(values: &[(f64, f64)]) -> PriceSeries {
    let start = date(2020, 1, 1);
    let points = values
        .iter()
        .enumerate()
        .map(|(i, (open, close))| {
            PricePoint::new(start.checked_add_days(Days::new(i as u64)).unwrap(), *open, *close)
        })
        .collect();
    PriceSeries::new(TICKER, points)
}

/// `len` days of open = close = `value`.
pub fn flat_series(value: f64, len: usize) -> PriceSeries {
    dated_series(&vec![(value, value); len])
}

/// Closes 1, 2, 3, ... with opens half a point lower.
pub fn rising_series(len: usize) -> PriceSeries {
    let values: Vec<(f64, f64)> = (1..=len).map(|i| (i as f64 - 0.5, i as f64)).collect();
    dated_series(&values)
}
