//! Normalization helpers for `runcard normalize` and `runcard pace`.

use serde::Serialize;

use crate::core::stats::RunStats;

/// Canonical stats plus the advisory time check, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizeOutcome {
    pub distance: String,
    pub time: String,
    pub pace: String,
    pub time_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl NormalizeOutcome {
    pub fn from_stats(stats: &RunStats) -> Self {
        let warning = stats.time_warning().map(str::to_string);
        Self {
            distance: stats.distance().to_string(),
            time: stats.time().to_string(),
            pace: stats.pace().to_string(),
            time_valid: warning.is_none(),
            warning,
        }
    }
}

/// Normalize raw distance and time keystrokes.
pub fn normalize(distance: &str, time: &str) -> NormalizeOutcome {
    NormalizeOutcome::from_stats(&RunStats::from_raw(distance, time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_reports_canonical_values() {
        let outcome = normalize("5.2km", "2814");
        assert_eq!(
            outcome,
            NormalizeOutcome {
                distance: "5.2".to_string(),
                time: "28:14".to_string(),
                pace: "5'26\"".to_string(),
                time_valid: true,
                warning: None,
            }
        );
    }

    #[test]
    fn normalize_warns_without_blocking() {
        let outcome = normalize("5", "2875");
        assert_eq!(outcome.time, "28:75");
        assert!(!outcome.time_valid);
        assert!(outcome.warning.is_some());
        assert!(!outcome.pace.is_empty());
    }

    #[test]
    fn json_omits_absent_warning() {
        let json = serde_json::to_string(&normalize("", "")).expect("serialize");
        assert_eq!(
            json,
            r#"{"distance":"","time":"","pace":"","time_valid":true}"#
        );
    }
}
