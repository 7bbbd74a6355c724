//! Display formatting. Values round here; stored state never rounds.

/// Half-up rounding to an integer, thousands grouping, and a "<symbol> "
/// prefix when a currency symbol is set.
pub fn money(value: f64, currency_symbol: &str) -> String {
    let grouped = thousands(round_half_up(value));
    if currency_symbol.is_empty() {
        grouped
    } else {
        format!("{} {}", currency_symbol, grouped)
    }
}

/// Half-up: exact halves round toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Summary percentages show one decimal place.
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
        assert_eq!(thousands(-1_234_567), "-1,234,567");
    }

    #[test]
    fn currency_prefix_only_when_symbol_set() {
        assert_eq!(money(1_234_567.8, "$"), "$ 1,234,568");
        assert_eq!(money(1_234_567.8, ""), "1,234,568");
        assert_eq!(money(0.0, "€"), "€ 0");
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.4), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(percent(12.0), "12.0%");
        assert_eq!(percent(-100.0), "-100.0%");
        assert_eq!(percent(33.333), "33.3%");
    }
}
