//! Display formatting for prices and file sizes.
//!
//! Output matches what listing and checkout pages render (en-US grouping).

use crate::money::Money;

const FILE_SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    while n >= 1000 {
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.push(n.to_string());
    groups.reverse();
    groups.join(",")
}

fn grouped(amount: f64, symbol: &str, decimals: bool) -> String {
    let money = Money::from_decimal(if decimals { amount } else { amount.round() });
    let sign = if money.is_negative() { "-" } else { "" };
    let cents = money.cents().unsigned_abs();
    let whole = group_thousands(cents / 100);

    if decimals {
        format!("{}{}{}.{:02}", sign, symbol, whole, cents % 100)
    } else {
        format!("{}{}{}", sign, symbol, whole)
    }
}

/// Formats a dollar amount: `$1,234.56`, `-$5.50`.
///
/// ```rust
/// use searchable_core::format::format_usd;
///
/// assert_eq!(format_usd(1234.5), "$1,234.50");
/// assert_eq!(format_usd(-5.5), "-$5.50");
/// ```
pub fn format_usd(amount: f64) -> String {
    grouped(amount, "$", true)
}

/// Formats an amount in the listing's currency.
///
/// | code        | output          |
/// |-------------|-----------------|
/// | `BTC`       | `0.00012345 BTC`|
/// | `USDT`      | `12.50 USDT`    |
/// | `USD`       | `$1,234.56`     |
/// | `EUR`       | `€1,234.56`     |
/// | `GBP`       | `£1,234.56`     |
/// | `JPY`       | `¥1,235`        |
/// | other `XYZ` | `XYZ 1,234.56`  |
///
/// Codes are case-insensitive. A missing or NaN amount shows `$0.00`, and
/// a code that is not three letters falls back to USD.
pub fn format_currency(amount: Option<f64>, currency: &str) -> String {
    let Some(amount) = amount.filter(|a| !a.is_nan()) else {
        return format_usd(0.0);
    };

    let code = currency.trim().to_ascii_uppercase();
    match code.as_str() {
        "BTC" => format!("{:.8} BTC", amount),
        "USDT" => format!("{:.2} USDT", amount),
        "USD" => format_usd(amount),
        "EUR" => grouped(amount, "€", true),
        "GBP" => grouped(amount, "£", true),
        "JPY" => grouped(amount, "¥", false),
        other if other.len() == 3 && other.bytes().all(|b| b.is_ascii_alphabetic()) => {
            grouped(amount, &format!("{} ", other), true)
        }
        _ => format_usd(amount),
    }
}

/// Human-readable size, base 1024, at most two decimals.
///
/// ```rust
/// use searchable_core::format::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < FILE_SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, FILE_SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(10.99), "$10.99");
        assert_eq!(format_usd(1234.56), "$1,234.56");
        assert_eq!(format_usd(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_usd(-5.5), "-$5.50");
    }

    #[test]
    fn test_format_currency_crypto() {
        assert_eq!(format_currency(Some(0.00012345), "BTC"), "0.00012345 BTC");
        assert_eq!(format_currency(Some(12.5), "usdt"), "12.50 USDT");
    }

    #[test]
    fn test_format_currency_fiat() {
        assert_eq!(format_currency(Some(100.0), "USD"), "$100.00");
        assert_eq!(format_currency(Some(1234.56), "eur"), "€1,234.56");
        assert_eq!(format_currency(Some(9.5), "GBP"), "£9.50");
        assert_eq!(format_currency(Some(1234.6), "JPY"), "¥1,235");
        assert_eq!(format_currency(Some(100.0), "CHF"), "CHF 100.00");
    }

    #[test]
    fn test_format_currency_fallbacks() {
        assert_eq!(format_currency(None, "USD"), "$0.00");
        assert_eq!(format_currency(Some(f64::NAN), "EUR"), "$0.00");
        assert_eq!(format_currency(Some(100.0), "DOLLARS"), "$100.00");
        assert_eq!(format_currency(Some(100.0), ""), "$100.00");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(100), "100 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1 GB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
    }
}
