//! Running stats value object.
//!
//! `pace` is derived state: it is recomputed from `(distance, time)` every time
//! either changes and can never be assigned directly.

use serde::{Deserialize, Serialize};

use crate::core::distance::sanitize_distance;
use crate::core::pace::calc_pace;
use crate::core::time::{format_time, is_valid_time};

/// Stats for one submission, always held in canonical form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRunStats")]
pub struct RunStats {
    distance: String,
    time: String,
    pace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

/// Unnormalized stats as they arrive from a form or fixture file.
///
/// Any `pace` field in the input is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawRunStats {
    #[serde(default)]
    distance: String,
    #[serde(default)]
    time: String,
    #[serde(default)]
    date: Option<String>,
}

impl From<RawRunStats> for RunStats {
    fn from(raw: RawRunStats) -> Self {
        let mut stats = RunStats::from_raw(&raw.distance, &raw.time);
        stats.date = raw.date;
        stats
    }
}

impl RunStats {
    /// Empty stats: every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize raw distance and time strings and derive pace.
    pub fn from_raw(distance: &str, time: &str) -> Self {
        let distance = sanitize_distance(distance);
        let time = format_time(time);
        let pace = calc_pace(&distance, &time);
        Self {
            distance,
            time,
            pace,
            date: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Apply a raw distance keystroke string.
    pub fn set_distance(&mut self, raw: &str) {
        self.distance = sanitize_distance(raw);
        self.recompute_pace();
    }

    /// Apply a raw time keystroke string.
    pub fn set_time(&mut self, raw: &str) {
        self.time = format_time(raw);
        self.recompute_pace();
    }

    pub fn set_date(&mut self, date: Option<String>) {
        self.date = date;
    }

    pub fn distance(&self) -> &str {
        &self.distance
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn pace(&self) -> &str {
        &self.pace
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Advisory warning when the time has out-of-range minutes or seconds.
    ///
    /// Never blocks anything; callers decide whether to surface it.
    pub fn time_warning(&self) -> Option<&'static str> {
        if self.time.is_empty() || is_valid_time(&self.time) {
            None
        } else {
            Some("minutes and seconds must be between 00 and 59")
        }
    }

    fn recompute_pace(&mut self) {
        self.pace = calc_pace(&self.distance, &self.time);
    }
}
