//! Conversion between [`PriceSeries`] and the polars price table.
//!
//! Columns of the table:
//! - `date`: i32, days since 0001-01-01 (chrono's day count from CE)
//! - `open`: f64
//! - `close`: f64

use chrono::{Datelike, NaiveDate};
use common::PriceSeries;
use polars::prelude::*;

use crate::error::{ComputeError, Result};

pub const DATE: &str = "date";
pub const OPEN: &str = "open";
pub const CLOSE: &str = "close";

/// Builds the price table for a series.
pub fn to_dataframe(series: &PriceSeries) -> Result<DataFrame> {
    let dates: Vec<i32> = series.points.iter().map(|p| p.date.num_days_from_ce()).collect();

    let df = DataFrame::new(vec![
        Series::new(DATE.into(), dates).into(),
        Series::new(OPEN.into(), series.opens()).into(),
        Series::new(CLOSE.into(), series.closes()).into(),
    ])?;

    Ok(df)
}

/// Reads a float column row by row.
pub fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|e| ComputeError::DataFrame(format!("Missing {} column: {}", name, e)))?;

    (0..df.height())
        .map(|i| {
            column
                .get(i)
                .map_err(|e| ComputeError::Series(format!("Error getting {} at row {}: {}", name, i, e)))?
                .try_extract::<f64>()
                .map_err(|e| {
                    ComputeError::Series(format!("Error extracting {} as f64 at row {}: {}", name, i, e))
                })
        })
        .collect()
}

/// Reads the `date` column back into calendar dates.
pub fn date_column(df: &DataFrame) -> Result<Vec<NaiveDate>> {
    let column = df
        .column(DATE)
        .map_err(|e| ComputeError::DataFrame(format!("Missing date column: {}", e)))?;

    (0..df.height())
        .map(|i| {
            let days = column
                .get(i)
                .map_err(|e| ComputeError::Series(format!("Error getting date at row {}: {}", i, e)))?
                .try_extract::<i32>()
                .map_err(|e| ComputeError::Series(format!("Error extracting date at row {}: {}", i, e)))?;
            NaiveDate::from_num_days_from_ce_opt(days)
                .ok_or_else(|| ComputeError::Date(format!("Invalid date value at row {}: {}", i, days)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dated_series;

    #[test]
    fn test_frame_preserves_columns() {
        let series = dated_series(&[(10.0, 10.5), (11.0, 11.5), (12.0, 12.5)]);
        let df = to_dataframe(&series).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(f64_column(&df, OPEN).unwrap(), series.opens());
        assert_eq!(f64_column(&df, CLOSE).unwrap(), series.closes());
        assert_eq!(date_column(&df).unwrap(), series.dates());
    }

    #[test]
    fn test_empty_series_gives_empty_frame() {
        let series = dated_series(&[]);
        let df = to_dataframe(&series).unwrap();

        assert_eq!(df.height(), 0);
        assert!(date_column(&df).unwrap().is_empty());
    }

    #[test]
    fn test_missing_column_is_reported() {
        let series = dated_series(&[(1.0, 1.0)]);
        let df = to_dataframe(&series).unwrap();

        assert!(matches!(f64_column(&df, "volume"), Err(ComputeError::DataFrame(_))));
    }
}
