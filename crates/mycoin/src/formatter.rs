//! Display helpers

/// Shorten an address to `0x71C7...976F`
///
/// Addresses shorter than 10 characters are returned unchanged.
pub fn format_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() < 10 {
        return address.to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Format an amount with thousands separators and 2 to 6 fraction digits
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let fixed = format!("{:.6}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < 2 {
        frac.push('0');
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let negative = amount < 0.0 && (grouped != "0" || frac.chars().any(|c| c != '0'));
    let sign = if negative { "-" } else { "" };

    format!("{sign}{grouped}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address() {
        assert_eq!(
            format_address("0x71C7656EC7ab88b098defB751B7401B5f6d8976F"),
            "0x71C7...976F"
        );
        assert_eq!(format_address("0x1234"), "0x1234");
        assert_eq!(format_address(""), "");
        assert_eq!(format_address("0123456789"), "012345...6789");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(5.0), "5.00");
        assert_eq!(format_amount(1234.5), "1,234.50");
        assert_eq!(format_amount(1234567.891), "1,234,567.891");
        assert_eq!(format_amount(0.1234567), "0.123457");
        assert_eq!(format_amount(-1500.25), "-1,500.25");
        assert_eq!(format_amount(-0.0000001), "0.00");
        assert_eq!(format_amount(100.0), "100.00");
    }
}
