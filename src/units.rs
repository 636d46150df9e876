//! Fixed-point balance conversion
//!
//! Upstream balance providers report raw balances as hexadecimal big-integer
//! strings paired with a decimal-place count. The integer-to-decimal split
//! here is exact (`U256` division/modulo); floating point only enters later,
//! at the display/multiplication step.

use alloy::primitives::U256;

/// Fractional digits kept after the exact split; anything smaller renders
/// as zero
pub const MAX_FRACTIONAL_DIGITS: usize = 8;

/// Convert a `0x`-prefixed hex balance into a decimal amount string.
///
/// Returns `None` for malformed input (missing prefix, empty or non-hex
/// body). Callers must treat `None` as "unknown", not as zero.
pub fn hex_balance_to_decimal(hex: &str, decimals: u32) -> Option<String> {
    let body = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))?;
    if body.is_empty() {
        return None;
    }
    let value = U256::from_str_radix(body, 16).ok()?;

    if decimals == 0 {
        return Some(value.to_string());
    }

    let denom = match U256::from(10u8).checked_pow(U256::from(decimals)) {
        Some(denom) => denom,
        // 10^decimals exceeds 256 bits, so any representable value is far
        // below the displayable precision
        None => return Some("0".to_string()),
    };

    let whole = value / denom;
    let remainder = value % denom;
    if remainder.is_zero() {
        return Some(whole.to_string());
    }

    let mut fraction = format!(
        "{:0>width$}",
        remainder.to_string(),
        width = decimals as usize
    );
    fraction.truncate(MAX_FRACTIONAL_DIGITS);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        Some(whole.to_string())
    } else {
        Some(format!("{}.{}", whole, fraction))
    }
}

/// Parse a decimal amount string for the final display/multiplication step.
/// Non-finite results are treated as unknown.
pub fn decimal_to_f64(amount: &str) -> Option<f64> {
    amount.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_ether() {
        // 10^18 wei
        assert_eq!(
            hex_balance_to_decimal("0xde0b6b3a7640000", 18).as_deref(),
            Some("1")
        );
    }

    #[test]
    fn test_one_wei_truncates_to_zero() {
        // 10^-18 is below the 8-digit display precision
        assert_eq!(hex_balance_to_decimal("0x1", 18).as_deref(), Some("0"));
    }

    #[test]
    fn test_fractional_amount() {
        // 1.5 * 10^18
        assert_eq!(
            hex_balance_to_decimal("0x14d1120d7b160000", 18).as_deref(),
            Some("1.5")
        );
    }

    #[test]
    fn test_six_decimals_token() {
        // 1_000_000 units of a 6-decimals token
        assert_eq!(hex_balance_to_decimal("0xf4240", 6).as_deref(), Some("1"));
        // 1_500_000 units
        assert_eq!(
            hex_balance_to_decimal("0x16e360", 6).as_deref(),
            Some("1.5")
        );
    }

    #[test]
    fn test_zero_decimals() {
        assert_eq!(hex_balance_to_decimal("0x2a", 0).as_deref(), Some("42"));
    }

    #[test]
    fn test_fraction_kept_to_eight_digits() {
        // 123456789 over 10^8 keeps all eight fractional digits after the
        // leading 1
        assert_eq!(
            hex_balance_to_decimal("0x75bcd15", 8).as_deref(),
            Some("1.23456789")
        );
        // ninth digit is truncated, not rounded: 1234567891 / 10^9
        assert_eq!(
            hex_balance_to_decimal("0x499602d3", 9).as_deref(),
            Some("1.23456789")
        );
    }

    #[test]
    fn test_oversized_decimals_renders_zero() {
        assert_eq!(hex_balance_to_decimal("0xff", 200).as_deref(), Some("0"));
    }

    #[test]
    fn test_malformed_input_is_unknown() {
        assert_eq!(hex_balance_to_decimal("not-hex", 18), None);
        assert_eq!(hex_balance_to_decimal("0x", 18), None);
        assert_eq!(hex_balance_to_decimal("", 18), None);
        assert_eq!(hex_balance_to_decimal("0xzz", 18), None);
    }

    #[test]
    fn test_decimal_to_f64() {
        assert_eq!(decimal_to_f64("1.5"), Some(1.5));
        assert_eq!(decimal_to_f64("0"), Some(0.0));
        assert_eq!(decimal_to_f64("abc"), None);
    }
}
