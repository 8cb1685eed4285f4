//! Total numeric coercion for claim cells.
//!
//! Every value in a claim export is text. Wherever numeric semantics are
//! needed (tariffs, the derived `Selisih` column) the value goes through
//! [`to_number`], which never fails: anything that is not a finite number
//! reads as `0.0`.

/// Parse a cell as a number, degrading to `0.0`.
///
/// Surrounding whitespace is ignored. Empty strings, non-numeric text,
/// `NaN` and infinities all read as `0.0`.
///
/// # Examples
///
/// ```
/// use casemix_core::coercion::to_number;
///
/// assert_eq!(to_number("1000"), 1000.0);
/// assert_eq!(to_number(" 12.5 "), 12.5);
/// assert_eq!(to_number("n/a"), 0.0);
/// assert_eq!(to_number(""), 0.0);
/// ```
pub fn to_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Render a coerced number back into cell text.
///
/// Whole numbers are written without a fractional part (`200`, not
/// `200.0`) so derived columns read like the integer tariffs they come
/// from.
pub fn number_to_cell(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
