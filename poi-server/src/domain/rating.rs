//! Rating attributes.

/// Error returned when a rating has no leading number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rating is not a number: {0:?}")]
pub struct RatingParseError(String);

/// Parse a rating permissively.
///
/// Ratings arrive as numbers or as free text such as `"4.5"`, `"4.5/5"` or
/// `" 3 stars"`. The longest numeric prefix after leading whitespace is
/// used; text with no numeric prefix is an error.
///
/// # Examples
///
/// ```
/// use poi_server::domain::parse_rating;
///
/// assert_eq!(parse_rating("4.5/5"), Ok(4.5));
/// assert_eq!(parse_rating("-1e1x"), Ok(-10.0));
/// assert!(parse_rating("great").is_err());
/// ```
pub fn parse_rating(text: &str) -> Result<f64, RatingParseError> {
    let trimmed = text.trim_start();
    let prefix = numeric_prefix(trimmed);

    if prefix.is_empty() {
        return Err(RatingParseError(text.to_string()));
    }

    prefix
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .ok_or_else(|| RatingParseError(text.to_string()))
}

/// Longest prefix of `s` that reads as a decimal literal.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    if s[i..].starts_with("Infinity") {
        return &s[..i + "Infinity".len()];
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        // A bare "." only counts when digits surround it on at least one side
        if digits > 0 {
            i = j;
        }
    }

    if digits == 0 {
        return "";
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    &s[..i]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_numbers() {
        assert_eq!(parse_rating("4"), Ok(4.0));
        assert_eq!(parse_rating("4.25"), Ok(4.25));
        assert_eq!(parse_rating(" 3.5"), Ok(3.5));
        assert_eq!(parse_rating(".5"), Ok(0.5));
        assert_eq!(parse_rating("5."), Ok(5.0));
    }

    #[test]
    fn trailing_text_is_ignored() {
        assert_eq!(parse_rating("4.5/5"), Ok(4.5));
        assert_eq!(parse_rating("3 stars"), Ok(3.0));
        assert_eq!(parse_rating("2e"), Ok(2.0));
        assert_eq!(parse_rating("2e+"), Ok(2.0));
    }

    #[test]
    fn rejects_text_without_number() {
        assert!(parse_rating("").is_err());
        assert!(parse_rating("N/A").is_err());
        assert!(parse_rating(".").is_err());
        assert!(parse_rating("-").is_err());
        assert!(parse_rating("NaN").is_err());
    }

    #[test]
    fn infinity_is_a_number() {
        assert_eq!(parse_rating("Infinity"), Ok(f64::INFINITY));
        assert_eq!(parse_rating("-Infinity"), Ok(f64::NEG_INFINITY));
    }

    #[test]
    fn error_display() {
        let err = parse_rating("great").unwrap_err();
        assert_eq!(err.to_string(), "rating is not a number: \"great\"");
    }
}
