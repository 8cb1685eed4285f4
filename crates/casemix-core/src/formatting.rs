//! Display formatting for counts, Rupiah amounts and shares.

/// Digit grouping for counts (`1,250 rows`).
const COUNT_GROUP: char = ',';
/// Digit grouping for Rupiah amounts (`Rp 1.250.000`).
const RUPIAH_GROUP: char = '.';

/// Format `value` with `,` digit grouping and `decimals` fractional digits.
///
/// Used for claim, hit and code counts.
///
/// # Examples
///
/// ```
/// use casemix_core::formatting::format_number;
///
/// assert_eq!(format_number(1250.0, 0), "1,250");
/// assert_eq!(format_number(48_215.0, 0), "48,215");
/// assert_eq!(format_number(12.5, 1), "12.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    format_grouped(value, decimals, COUNT_GROUP, '.')
}

/// Format a Rupiah amount with `.` thousands grouping and no decimals, the
/// way tariffs are printed on Indonesian claim forms.
///
/// # Examples
///
/// ```
/// use casemix_core::formatting::format_rupiah;
///
/// assert_eq!(format_rupiah(1_234_567.0), "Rp 1.234.567");
/// assert_eq!(format_rupiah(0.0),         "Rp 0");
/// assert_eq!(format_rupiah(-2_500.0),    "Rp -2.500");
/// ```
pub fn format_rupiah(amount: f64) -> String {
    format!("Rp {}", format_grouped(amount, 0, RUPIAH_GROUP, ','))
}

/// `part` as a percentage of `whole`, rounded to `decimal_places`.
/// An empty `whole` gives `0.0`.
///
/// ```
/// use casemix_core::formatting::percentage;
///
/// assert_eq!(percentage(37.0, 1250.0, 1), 3.0);
/// assert_eq!(percentage(5.0, 0.0, 1), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let scale = 10_f64.powi(decimal_places as i32);
    (part * 100.0 * scale / whole).round() / scale
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn format_grouped(value: f64, decimals: u32, group: char, point: char) -> String {
    let fixed = format!("{:.*}", decimals as usize, value.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    // No sign when the value rounds to zero.
    if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    out.push_str(&group_digits(whole, group));
    if let Some(fraction) = fraction {
        out.push(point);
        out.push_str(fraction);
    }
    out
}

/// Insert `sep` between every three digits, counting from the right.
fn group_digits(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_row_counts() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(1_000.0, 0), "1,000");
        assert_eq!(format_number(250_000.0, 0), "250,000");
    }

    #[test]
    fn test_format_number_keeps_decimals() {
        assert_eq!(format_number(2.96, 1), "3.0");
        assert_eq!(format_number(1_204.25, 2), "1,204.25");
    }

    #[test]
    fn test_format_rupiah_inacbg_tariffs() {
        assert_eq!(format_rupiah(3_457_800.0), "Rp 3.457.800");
        assert_eq!(format_rupiah(187_500.0), "Rp 187.500");
        assert_eq!(format_rupiah(1_250_000_000.0), "Rp 1.250.000.000");
    }

    #[test]
    fn test_format_rupiah_under_recovery() {
        assert_eq!(format_rupiah(-150_000.0), "Rp -150.000");
    }

    #[test]
    fn test_format_rupiah_rounds_to_whole() {
        assert_eq!(format_rupiah(999.6), "Rp 1.000");
        assert_eq!(format_rupiah(-0.4), "Rp 0");
    }

    #[test]
    fn test_percentage_flagged_share() {
        assert_eq!(percentage(37.0, 1_250.0, 1), 3.0);
        assert_eq!(percentage(1.0, 3.0, 1), 33.3);
        assert_eq!(percentage(1_250.0, 1_250.0, 1), 100.0);
    }

    #[test]
    fn test_percentage_without_rows() {
        assert_eq!(percentage(0.0, 0.0, 1), 0.0);
        assert_eq!(percentage(0.0, 480.0, 1), 0.0);
    }

    #[test]
    fn test_group_digits_separator() {
        assert_eq!(group_digits("7", '.'), "7");
        assert_eq!(group_digits("123", '.'), "123");
        assert_eq!(group_digits("1234", '.'), "1.234");
        assert_eq!(group_digits("123456", ','), "123,456");
    }
}
