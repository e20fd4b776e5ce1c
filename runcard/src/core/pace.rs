//! Pace derived from distance and elapsed time.

use crate::core::time::total_seconds;

/// Compute pace as `M'SS"` per distance unit, or an empty string.
///
/// Distance must parse as a positive number and time as `MM:SS` or
/// `H:MM:SS` totalling more than zero seconds. Seconds that round up to 60
/// carry into the minutes.
pub fn calc_pace(distance: &str, time: &str) -> String {
    let Some(units) = parse_distance(distance) else {
        return String::new();
    };
    let Some(seconds) = total_seconds(time).filter(|s| *s > 0) else {
        return String::new();
    };

    let seconds_per_unit = seconds as f64 / units;
    let mut minutes = (seconds_per_unit / 60.0).floor() as u64;
    let mut remainder = (seconds_per_unit % 60.0).round() as u64;
    if remainder == 60 {
        minutes += 1;
        remainder = 0;
    }
    format!("{minutes}'{remainder:02}\"")
}

fn parse_distance(distance: &str) -> Option<f64> {
    distance
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d > 0.0)
}
