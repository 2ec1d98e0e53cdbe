//! Parsing helpers for caller-supplied text.
//!
//! The statistical cores only accept already-numeric input. These helpers are
//! the bridge for callers holding raw text (a typed comma list, spreadsheet
//! cells): anything that is not a finite number is surfaced as
//! [`Error::NonNumericInput`] instead of being dropped or coerced to zero.

use crate::error::{Error, Result};

/// Parse a single value as a finite `f64`.
///
/// Surrounding whitespace is ignored. `NaN` and infinities are rejected even
/// though the standard library would accept their spellings.
///
/// # Examples
///
/// ```
/// use statkit::utils::parse_number;
///
/// assert_eq!(parse_number(" 4.5 ").unwrap(), 4.5);
/// assert!(parse_number("four").is_err());
/// assert!(parse_number("inf").is_err());
/// ```
pub fn parse_number(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::non_numeric(trimmed)),
    }
}

/// Parse a comma-separated list of numbers.
///
/// Every item must parse; an empty item (e.g. `"1,,2"`) is an error.
///
/// # Examples
///
/// ```
/// use statkit::utils::parse_number_list;
///
/// let values = parse_number_list("1, 2.5, -3").unwrap();
/// assert_eq!(values, vec![1.0, 2.5, -3.0]);
/// ```
pub fn parse_number_list(text: &str) -> Result<Vec<f64>> {
    text.split(',').map(parse_number).collect()
}

/// Parse an optional cell: blank text is a missing value.
pub(crate) fn parse_cell(text: &str) -> Result<Option<f64>> {
    if text.trim().is_empty() {
        Ok(None)
    } else {
        parse_number(text).map(Some)
    }
}
