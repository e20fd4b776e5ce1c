//! Distance keystroke sanitizer.

/// Maximum digits kept before the decimal point.
const MAX_INTEGER_DIGITS: usize = 3;
/// Maximum digits kept after the decimal point.
const MAX_FRACTION_DIGITS: usize = 2;

/// Normalize raw distance input into `D{1,3}(.DD)?` shape.
///
/// Drops everything except digits and `.`, keeps the first `.` as the decimal
/// point (digits after later dots are kept, the dots are not), then truncates
/// the integer part to 3 digits and the fraction to 2. A trailing `.` survives
/// so the user can keep typing. Plausibility is not checked: `999.99` is fine.
pub fn sanitize_distance(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let (integer, fraction) = match kept.split_once('.') {
        Some((integer, rest)) => (integer, Some(rest.replace('.', ""))),
        None => (kept.as_str(), None),
    };

    let mut out: String = integer.chars().take(MAX_INTEGER_DIGITS).collect();
    if let Some(fraction) = fraction {
        out.push('.');
        out.extend(fraction.chars().take(MAX_FRACTION_DIGITS));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_canonical_values() {
        assert_eq!(sanitize_distance("5.2"), "5.2");
        assert_eq!(sanitize_distance("42.19"), "42.19");
        assert_eq!(sanitize_distance("999.99"), "999.99");
        assert_eq!(sanitize_distance(""), "");
    }

    #[test]
    fn collapses_extra_dots_and_truncates_fraction() {
        assert_eq!(sanitize_distance("12.345.6"), "12.34");
        assert_eq!(sanitize_distance("1..5"), "1.5");
    }

    #[test]
    fn truncates_integer_part_from_the_right() {
        assert_eq!(sanitize_distance("12345"), "123");
        assert_eq!(sanitize_distance("1234.5"), "123.5");
    }

    #[test]
    fn strips_non_numeric_characters() {
        assert_eq!(sanitize_distance("10.5 km"), "10.5");
        assert_eq!(sanitize_distance("abc"), "");
        assert_eq!(sanitize_distance("-3,2"), "32");
    }

    #[test]
    fn preserves_in_progress_decimal_point() {
        assert_eq!(sanitize_distance("5."), "5.");
        assert_eq!(sanitize_distance(".5"), ".5");
    }
}
