//! Chart payload handling.
//!
//! The chart endpoint returns parallel arrays of timestamps, closes, and
//! volumes. Only the columns an analysis consumes are kept.

use chrono::{NaiveDate, TimeZone, Utc};
use polars::prelude::{Column, DataFrame, DataType};
use serde::Deserialize;
use stockscope_core::{DataError, DataFrequency, Result, Symbol};

use crate::ApiError;

/// Chart endpoint base URL.
pub(crate) const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

const SECONDS_PER_DAY: i64 = 86_400;

/// Builds the chart URL covering `start` through the end of `end` (UTC).
pub(crate) fn chart_url(
    symbol: &Symbol,
    start: NaiveDate,
    end: NaiveDate,
    frequency: DataFrequency,
) -> String {
    let period1 = start
        .and_hms_opt(0, 0, 0)
        .map_or(0, |dt| Utc.from_utc_datetime(&dt).timestamp());
    let period2 = end
        .and_hms_opt(23, 59, 59)
        .map_or(0, |dt| Utc.from_utc_datetime(&dt).timestamp());

    format!(
        "{CHART_URL}/{symbol}?period1={period1}&period2={period2}&interval={}",
        frequency.interval()
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartPayload {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartSeries>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartSeries {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

impl ChartPayload {
    /// Converts the payload into a `symbol`/`date`/`close`/`volume` frame.
    ///
    /// Samples missing a close are kept as nulls; the consumer skips them.
    pub(crate) fn into_frame(
        self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DataFrame> {
        if let Some(error) = self.chart.error {
            return Err(error.into_data_error(symbol));
        }
        let series = self
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?;

        if series.timestamp.is_empty() {
            return Err(DataError::NoPriceHistory {
                symbol: symbol.to_string(),
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let quote = series.indicators.quote.into_iter().next().unwrap_or_default();
        let rows = series.timestamp.len();
        let mut days = Vec::with_capacity(rows);
        let mut closes = Vec::with_capacity(rows);
        let mut volumes = Vec::with_capacity(rows);

        for (i, &ts) in series.timestamp.iter().enumerate() {
            let day = i32::try_from(ts.div_euclid(SECONDS_PER_DAY))
                .map_err(|_| DataError::Parse(format!("Timestamp out of range: {ts}")))?;
            days.push(day);
            closes.push(quote.close.get(i).copied().flatten());
            volumes.push(quote.volume.get(i).copied().flatten());
        }

        let frame = DataFrame::new(vec![
            Column::new("symbol".into(), vec![symbol.as_str(); rows]),
            Column::new("date".into(), days).cast(&DataType::Date)?,
            Column::new("close".into(), closes),
            Column::new("volume".into(), volumes),
        ])?;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockscope_core::PriceSeries;

    fn payload(json: &str) -> ChartPayload {
        serde_json::from_str(json).unwrap()
    }

    fn frame(chart: ChartPayload, symbol: &str) -> Result<DataFrame> {
        chart.into_frame(
            &Symbol::new(symbol),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    #[test]
    fn test_chart_url() {
        let url = chart_url(
            &Symbol::new("aapl"),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            DataFrequency::Daily,
        );

        assert_eq!(
            url,
            "https://query1.finance.yahoo.com/v8/finance/chart/AAPL\
             ?period1=1704067200&period2=1706745599&interval=1d"
        );
    }

    #[test]
    fn test_into_frame() {
        let chart = payload(
            r#"{"chart": {"result": [{
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {"quote": [{
                    "open": [187.15, 184.22, 182.15],
                    "close": [185.64, null, 181.91],
                    "volume": [82488700, 58414500, null]
                }]}
            }], "error": null}}"#,
        );

        let df = frame(chart, "AAPL").unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);

        let series = PriceSeries::from_ohlcv(&df).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(
            series.bars()[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(series.bars()[1].volume, 0);
    }

    #[test]
    fn test_short_quote_arrays_pad_with_nulls() {
        let chart = payload(
            r#"{"chart": {"result": [{
                "timestamp": [1704205800, 1704292200],
                "indicators": {"quote": [{"close": [185.64], "volume": [100]}]}
            }]}}"#,
        );

        let df = frame(chart, "AAPL").unwrap();
        let series = PriceSeries::from_ohlcv(&df).unwrap();
        assert_eq!(series.closes(), vec![185.64]);
    }

    #[test]
    fn test_not_found() {
        let chart = payload(
            r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#,
        );

        let err = frame(chart, "BAD").unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound(s) if s == "BAD"));
    }

    #[test]
    fn test_empty_history() {
        let chart = payload(r#"{"chart": {"result": [{"indicators": {"quote": []}}]}}"#);

        let err = frame(chart, "NEW").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "No price history for NEW between 2024-01-01 and 2024-01-31"
        );
    }
}
