//! Price range attributes.
//!
//! Layers store a POI's typical spend as `"min-max"`, e.g. `"100-200"`.

use std::str::FromStr;

use serde::Serialize;

/// Error returned when a price range string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceParseError {
    /// The text does not split into exactly two parts on `-`
    #[error("expected exactly one '-' between two prices")]
    Delimiter,

    /// One side is not a finite decimal number
    #[error("invalid price value: {0:?}")]
    NotNumeric(String),
}

/// A parsed `min-max` price range.
///
/// `min` and `max` are taken positionally from the source text and are not
/// reordered, so `min > max` is possible for badly entered data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

impl PriceRange {
    /// Build a range from its two bounds.
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            average: (min + max) / 2.0,
        }
    }

    /// Parse a `min-max` string.
    ///
    /// Whitespace around either number is tolerated.
    ///
    /// # Examples
    ///
    /// ```
    /// use poi_server::domain::PriceRange;
    ///
    /// let range = PriceRange::parse("100-200").unwrap();
    /// assert_eq!(range.average, 150.0);
    ///
    /// assert!(PriceRange::parse("abc-200").is_err());
    /// assert!(PriceRange::parse("200").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, PriceParseError> {
        let parts: Vec<&str> = text.split('-').collect();
        let [min, max] = parts.as_slice() else {
            return Err(PriceParseError::Delimiter);
        };

        Ok(Self::new(parse_amount(min)?, parse_amount(max)?))
    }
}

impl FromStr for PriceRange {
    type Err = PriceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_amount(token: &str) -> Result<f64, PriceParseError> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PriceParseError::NotNumeric(token.to_string()))
}

/// Lenient form used during aggregation: absent or malformed text is `None`.
pub fn parse_price_range(text: Option<&str>) -> Option<PriceRange> {
    text.and_then(|t| PriceRange::parse(t).ok())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any pair of non-negative integers round-trips through the text form
        #[test]
        fn integer_pairs_parse(a in 0u32..100_000, b in 0u32..100_000) {
            let range = PriceRange::parse(&format!("{a}-{b}")).unwrap();
            prop_assert_eq!(range.min, f64::from(a));
            prop_assert_eq!(range.max, f64::from(b));
            prop_assert_eq!(range.average, (f64::from(a) + f64::from(b)) / 2.0);
        }

        /// Parsing is total
        #[test]
        fn never_panics(text in ".*") {
            let _ = PriceRange::parse(&text);
        }

        /// Text without a dash never parses
        #[test]
        fn no_dash_rejected(text in "[^-]*") {
            prop_assert_eq!(PriceRange::parse(&text), Err(PriceParseError::Delimiter));
        }
    }
}
