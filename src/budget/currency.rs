/// Format an amount as Mexican pesos: `$1,234,567.89`, `-$12.50`.
pub fn format_mxn(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0.00".to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let negative = amount < 0.0 && cents > 0;
    let whole = group_thousands(cents / 100);
    let sign = if negative { "-" } else { "" };
    format!("{sign}${whole}.{:02}", cents % 100)
}

/// Two-decimal percentage, e.g. `12.50%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mxn() {
        assert_eq!(format_mxn(0.0), "$0.00");
        assert_eq!(format_mxn(5.5), "$5.50");
        assert_eq!(format_mxn(1234.567), "$1,234.57");
        assert_eq!(format_mxn(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_mxn(-98765.4), "-$98,765.40");
        assert_eq!(format_mxn(-0.001), "$0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(12.5), "12.50%");
        assert_eq!(format_percent(100.0), "100.00%");
    }
}
