//! CSV bar feed.
//!
//! Reads `timestamp,close[,volume]` rows into [`Bar`]s. Timestamps may
//! be RFC 3339 or naive `YYYY-MM-DD HH:MM:SS` (interpreted as UTC, the
//! shape minute-bar exports usually carry). The engine precondition is
//! strictly increasing timestamps, so an out-of-order or duplicate row
//! is a hard feed error, not something to paper over.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;
use twistbreak_core::domain::Bar;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read bar file: {0}")]
    Csv(#[from] csv::Error),

    #[error("bar file has no '{0}' column")]
    MissingColumn(&'static str),

    #[error("row {row}: unparseable timestamp '{value}'")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}: unparseable close '{value}'")]
    BadClose { row: usize, value: String },

    #[error("row {row}: timestamp {current} not after {previous} (bars must be strictly increasing)")]
    OutOfOrder {
        row: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Load bars from a CSV file with a header row.
///
/// `timestamp` and `close` columns are required, `volume` is optional.
/// Rows with an empty close are kept as `close = 0.0` bars so the
/// engine's own invalid-bar handling sees (and skips) them — that
/// matches how the original feed represented missing minutes.
pub fn read_bars(path: &Path) -> Result<Vec<Bar>, FeedError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let col = |name: &'static str| -> Result<usize, FeedError> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(FeedError::MissingColumn(name))
    };
    let ts_col = col("timestamp")?;
    let close_col = col("close")?;
    let volume_col = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("volume"));

    let mut bars = Vec::new();
    let mut previous: Option<DateTime<Utc>> = None;

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 2; // 1-based, after the header

        let ts_raw = record.get(ts_col).unwrap_or_default();
        let timestamp = parse_timestamp(ts_raw).ok_or_else(|| FeedError::BadTimestamp {
            row,
            value: ts_raw.to_string(),
        })?;

        if let Some(prev) = previous {
            if timestamp <= prev {
                return Err(FeedError::OutOfOrder {
                    row,
                    previous: prev,
                    current: timestamp,
                });
            }
        }
        previous = Some(timestamp);

        let close_raw = record.get(close_col).unwrap_or_default().trim();
        let close = if close_raw.is_empty() {
            0.0
        } else {
            close_raw.parse::<f64>().map_err(|_| FeedError::BadClose {
                row,
                value: close_raw.to_string(),
            })?
        };

        let volume = volume_col
            .and_then(|c| record.get(c))
            .and_then(|v| v.trim().parse::<f64>().ok());

        bars.push(Bar {
            timestamp,
            close,
            volume,
        });
    }

    Ok(bars)
}
