//! Elapsed-time keystroke formatter and advisory validator.
//!
//! The formatter behaves like a stopwatch keypad: the two least significant
//! digits are seconds, the next two minutes, anything left over is hours.

/// Maximum digits accepted (`HH:MM:SS`).
const MAX_TIME_DIGITS: usize = 6;

/// Format raw time input into `MM:SS` or `H:MM:SS`.
///
/// One or two digits are returned without a colon: the value is still being
/// typed and is read as minutes-only.
pub fn format_time(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_TIME_DIGITS)
        .collect();

    match digits.len() {
        0 => String::new(),
        1..=2 => digits,
        3..=4 => {
            let (minutes, seconds) = digits.split_at(digits.len() - 2);
            format!("{minutes}:{seconds}")
        }
        _ => {
            let (rest, seconds) = digits.split_at(digits.len() - 2);
            let (hours, minutes) = rest.split_at(rest.len() - 2);
            format!("{hours}:{minutes}:{seconds}")
        }
    }
}

/// Advisory check that minutes and seconds fall in `[0, 59]`.
///
/// A value without `:` is still being typed and always passes. Hours (and
/// minutes in `MM:SS`) are unbounded.
pub fn is_valid_time(time: &str) -> bool {
    if !time.contains(':') {
        return true;
    }
    let Some(segments) = parse_segments(time) else {
        return false;
    };
    match segments.as_slice() {
        [_, seconds] => *seconds <= 59,
        [_, minutes, seconds] => *minutes <= 59 && *seconds <= 59,
        _ => false,
    }
}

/// Total elapsed seconds for `MM:SS` or `H:MM:SS`.
///
/// Returns `None` for anything that is not two or three numeric segments, or
/// when the total does not fit in a `u64`.
pub fn total_seconds(time: &str) -> Option<u64> {
    let (hours, minutes, seconds) = match parse_segments(time)?.as_slice() {
        [minutes, seconds] => (0, *minutes, *seconds),
        [hours, minutes, seconds] => (*hours, *minutes, *seconds),
        _ => return None,
    };
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Split on `:` and parse each segment as an unsigned integer.
fn parse_segments(time: &str) -> Option<Vec<u64>> {
    time.split(':').map(parse_segment).collect()
}

/// An empty segment (`"28:"`) reads as zero.
fn parse_segment(segment: &str) -> Option<u64> {
    if segment.is_empty() {
        return Some(0);
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_by_digit_count() {
        assert_eq!(format_time(""), "");
        assert_eq!(format_time("2"), "2");
        assert_eq!(format_time("28"), "28");
        assert_eq!(format_time("281"), "2:81");
        assert_eq!(format_time("2814"), "28:14");
        assert_eq!(format_time("10530"), "1:05:30");
        assert_eq!(format_time("103045"), "10:30:45");
    }

    #[test]
    fn strips_non_digits_and_caps_length() {
        assert_eq!(format_time("28:14"), "28:14");
        assert_eq!(format_time("1:05:30"), "1:05:30");
        assert_eq!(format_time("1h 05m 30s"), "1:05:30");
        assert_eq!(format_time("1234567"), "12:34:56");
        assert_eq!(format_time("mm:ss"), "");
    }

    #[test]
    fn validator_flags_out_of_range_segments() {
        assert!(!is_valid_time("28:65"));
        assert!(!is_valid_time("1:30:61"));
        assert!(!is_valid_time("1:60:00"));
        assert!(is_valid_time("28:14"));
        assert!(is_valid_time("99:59"));
        assert!(is_valid_time("100:00:00"));
    }

    #[test]
    fn validator_is_lenient_while_typing() {
        assert!(is_valid_time("28"));
        assert!(is_valid_time(""));
    }

    #[test]
    fn validator_rejects_malformed_segments() {
        assert!(!is_valid_time("28:1a"));
        assert!(!is_valid_time("28:-1"));
        assert!(!is_valid_time("1:2:3:4"));
    }

    #[test]
    fn empty_segments_read_as_zero() {
        assert!(is_valid_time("28:"));
        assert!(is_valid_time("1::05"));
        assert_eq!(total_seconds("28:"), Some(1680));
        assert_eq!(total_seconds(":30"), Some(30));
        assert_eq!(total_seconds(":"), Some(0));
    }

    #[test]
    fn total_seconds_reads_both_shapes() {
        assert_eq!(total_seconds("28:14"), Some(1694));
        assert_eq!(total_seconds("1:05:30"), Some(3930));
        assert_eq!(total_seconds("28"), None);
        assert_eq!(total_seconds("1:2:3:4"), None);
        assert_eq!(total_seconds("x:10"), None);
        assert_eq!(total_seconds("99999999999999999:00:00"), None);
    }
}
