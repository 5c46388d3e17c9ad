//! Parallel-array time series as returned by Open-Meteo, and the index
//! lookups the views need.
//!
//! Timestamps are local wall-clock times of the requested location
//! (`timezone=auto`), so every reference instant handed to the lookups must
//! be shifted with [`local_now`] first.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};
use std::ops::Range;
use thiserror::Error;

/// Number of upcoming days shown by the daily forecast (today excluded).
pub const FORECAST_DAYS: usize = 5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SeriesError {
    #[error("series has {timestamps} timestamps but {values} values")]
    LengthMismatch { timestamps: usize, values: usize },

    #[error("unparseable timestamp '{0}'")]
    BadTimestamp(String),

    #[error("timestamp at index {0} goes back in time")]
    OutOfOrder(usize),
}

/// Parse the timestamp shapes Open-Meteo emits: `2024-05-01T13:00`,
/// `2024-05-01T13:00:00` and plain dates (read as midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Wall-clock time at a location whose offset from UTC is `utc_offset_seconds`.
pub fn local_now(now: DateTime<Utc>, utc_offset_seconds: i32) -> NaiveDateTime {
    (now + Duration::seconds(i64::from(utc_offset_seconds))).naive_utc()
}

fn same_hour(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date() && a.hour() == b.hour()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T> {
    timestamps: Vec<NaiveDateTime>,
    values: Vec<T>,
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self {
            timestamps: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T> TimeSeries<T> {
    pub fn new(timestamps: Vec<NaiveDateTime>, values: Vec<T>) -> Result<Self, SeriesError> {
        if timestamps.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                timestamps: timestamps.len(),
                values: values.len(),
            });
        }

        if let Some(pos) = timestamps.windows(2).position(|w| w[1] < w[0]) {
            return Err(SeriesError::OutOfOrder(pos + 1));
        }

        Ok(Self { timestamps, values })
    }

    /// Build a series from the raw `time` array of a response block.
    pub fn parse(raw: &[String], values: Vec<T>) -> Result<Self, SeriesError> {
        let timestamps = raw
            .iter()
            .map(|s| parse_timestamp(s).ok_or_else(|| SeriesError::BadTimestamp(s.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(timestamps, values)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamp(&self, index: usize) -> Option<NaiveDateTime> {
        self.timestamps.get(index).copied()
    }

    pub fn value(&self, index: usize) -> Option<&T> {
        self.values.get(index)
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, &T)> {
        self.timestamps.iter().copied().zip(self.values.iter())
    }

    /// First index whose timestamp is at or after `reference`.
    pub fn index_at_or_after(&self, reference: NaiveDateTime) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let idx = self.timestamps.partition_point(|t| *t < reference);
        (idx < self.len()).then_some(idx)
    }

    /// First index falling in the same clock hour as `now`.
    pub fn index_for_current_hour(&self, now: NaiveDateTime) -> Option<usize> {
        let top_of_hour = now.date().and_hms_opt(now.hour(), 0, 0)?;
        self.index_at_or_after(top_of_hour)
            .filter(|&idx| same_hour(self.timestamps[idx], top_of_hour))
    }

    /// First index strictly later than `now`; `None` once the series is exhausted.
    pub fn index_strictly_after(&self, now: NaiveDateTime) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let idx = self.timestamps.partition_point(|t| *t <= now);
        (idx < self.len()).then_some(idx)
    }

    /// Daily forecast rows: offsets `1..=FORECAST_DAYS`, skipping today at 0.
    pub fn forecast_day_indices(&self) -> Range<usize> {
        let end = self.len().min(FORECAST_DAYS + 1);
        end.min(1)..end
    }
}
