//! Money formatting.
//!
//! One formatter renders every monetary value in replies: currency marker,
//! a space, `.` as thousands separator, `,` as decimal separator, and exactly
//! two decimals (`€ 1.234.567,89`).

/// Formats amounts in the European style behind a currency marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    symbol: String,
}

impl MoneyFormat {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return format!("{} {value}", self.symbol);
        }

        let fixed = format!("{:.2}", value.abs());
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        // Values that round to zero never carry a sign.
        let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };

        format!("{} {sign}{},{cents}", self.symbol, group_thousands(whole))
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::new("€")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_small_values() {
        let money = MoneyFormat::default();
        assert_eq!(money.format(0.0), "€ 0,00");
        assert_eq!(money.format(5.5), "€ 5,50");
        assert_eq!(money.format(999.999), "€ 1.000,00");
    }

    #[test]
    fn test_format_thousands_separators() {
        let money = MoneyFormat::default();
        assert_eq!(money.format(800.0), "€ 800,00");
        assert_eq!(money.format(1234.56), "€ 1.234,56");
        assert_eq!(money.format(1_234_567.891), "€ 1.234.567,89");
        assert_eq!(money.format(100_000.0), "€ 100.000,00");
    }

    #[test]
    fn test_format_negative_values() {
        let money = MoneyFormat::default();
        assert_eq!(money.format(-1234.5), "€ -1.234,50");
        assert_eq!(money.format(-0.001), "€ 0,00");
    }

    #[test]
    fn test_format_custom_symbol() {
        assert_eq!(MoneyFormat::new("R$").format(42.0), "R$ 42,00");
    }

    #[test]
    fn test_format_is_stable() {
        let money = MoneyFormat::default();
        for value in [0.1 + 0.2, 123_456.785, 7.0 / 3.0, 1e9] {
            assert_eq!(money.format(value), money.format(value));
        }
    }
}
