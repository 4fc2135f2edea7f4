//! Money
//!
//! Amounts are whole rupiah. Indonesian invoices group thousands with a period and
//! carry no decimal places.

/// Currency symbol printed before every amount.
pub const CURRENCY_SYMBOL: &str = "Rp";

const GROUP_SEPARATOR: char = '.';

/// Format an amount as rupiah, e.g. `Rp 1.500.000`.
///
/// Zero renders as `Rp 0`.
pub fn format_currency(value: i64) -> String {
    if value == 0 {
        return format!("{CURRENCY_SYMBOL} 0");
    }

    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }

        grouped.push(digit);
    }

    let sign = if value < 0 { "-" } else { "" };

    format!("{CURRENCY_SYMBOL} {sign}{grouped}")
}

/// Format an unsigned amount, saturating at `i64::MAX`.
pub fn format_amount(value: u64) -> String {
    format_currency(i64::try_from(value).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_a_fixed_literal() {
        assert_eq!(format_currency(0), "Rp 0");
    }

    #[test]
    fn groups_thousands_with_periods() {
        assert_eq!(format_currency(1_500_000), "Rp 1.500.000");
        assert_eq!(format_currency(150_000), "Rp 150.000");
        assert_eq!(format_currency(5_000), "Rp 5.000");
    }

    #[test]
    fn small_values_have_no_separator() {
        assert_eq!(format_currency(7), "Rp 7");
        assert_eq!(format_currency(999), "Rp 999");
    }

    #[test]
    fn negative_values_keep_their_sign() {
        assert_eq!(format_currency(-1_500), "Rp -1.500");
    }

    #[test]
    fn unsigned_amounts_format_the_same() {
        assert_eq!(format_amount(1_234_567), "Rp 1.234.567");
        assert_eq!(format_amount(0), "Rp 0");
    }
}
