use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits kept for token amounts and USD display
pub const DISPLAY_DECIMALS: u32 = 4;

/// Largest scale a `Decimal` can represent
const MAX_DECIMAL_SCALE: u32 = 28;

/// Convert a raw integer amount (smallest token unit) into a human amount.
///
/// Exact while the value fits the 96-bit mantissa and `decimals <= 28`;
/// anything larger goes through `f64`.
pub fn scale_raw_amount(units: i128, decimals: u32) -> Option<Decimal> {
    if decimals <= MAX_DECIMAL_SCALE {
        if let Ok(value) = Decimal::try_from_i128_with_scale(units, decimals) {
            return Some(value);
        }
    }

    scale_f64(units as f64, decimals)
}

/// Parse a raw integer amount string and scale it by `decimals`.
///
/// Only integer literals are accepted: `"1.5"` or `"1e6"` yield `None`.
pub fn parse_raw_amount(raw: &str, decimals: u32) -> Option<Decimal> {
    let trimmed = raw.trim();
    match trimmed.parse::<i128>() {
        Ok(units) => scale_raw_amount(units, decimals),
        Err(_) if is_integer_literal(trimmed) => {
            // wider than i128
            let units: f64 = trimmed.parse().ok()?;
            scale_f64(units, decimals)
        }
        Err(_) => None,
    }
}

fn scale_f64(units: f64, decimals: u32) -> Option<Decimal> {
    let exponent = i32::try_from(decimals).unwrap_or(i32::MAX);
    Decimal::from_f64(units / 10f64.powi(exponent))
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Round to four fractional digits, half away from zero, always rendering all four.
pub fn round_display_amount(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_DECIMALS);
    rounded
}

/// `0.0000`
pub fn zero_display_amount() -> Decimal {
    Decimal::new(0, DISPLAY_DECIMALS)
}

/// Format a USD value as `$1 234.5678`; `None` renders as `$0.0000`.
pub fn format_usd(value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return "$0.0000".to_string();
    };
    render_usd(round_display_amount(value), ' ')
}

/// Format a USD total as `$1,234.57`, as used for aggregate volumes.
pub fn format_usd_total(value: Decimal) -> String {
    let mut rounded =
        value.round_dp_with_strategy(TOTAL_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(TOTAL_DECIMALS);
    render_usd(rounded, ',')
}

/// Fractional digits shown for aggregate USD totals
const TOTAL_DECIMALS: u32 = 2;

fn render_usd(rounded: Decimal, separator: char) -> String {
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("${}{}.{}", sign, grouped, frac),
        None => format!("${}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scale_raw_amount_usdc() {
        let value = scale_raw_amount(1_500_000, 6).unwrap();
        assert_eq!(value, dec!(1.5));
        assert_eq!(round_display_amount(value).to_string(), "1.5000");
    }

    #[test]
    fn test_zero_decimals_appends_four_zeros() {
        for units in [0_i128, 7, 42, 1_000_000] {
            let value = scale_raw_amount(units, 0).unwrap();
            assert_eq!(
                round_display_amount(value).to_string(),
                format!("{}.0000", units)
            );
        }
    }

    #[test]
    fn test_eighteen_decimals() {
        let value = parse_raw_amount("1234567890000000000", 18).unwrap();
        assert_eq!(round_display_amount(value).to_string(), "1.2346");
    }

    #[test]
    fn test_oversized_amount_falls_back_to_float() {
        // 10^30 wei does not fit a Decimal mantissa
        let value = parse_raw_amount("1000000000000000000000000000000", 18).unwrap();
        assert_eq!(round_display_amount(value).to_string(), "1000000000000.0000");
    }

    #[test]
    fn test_non_integer_amounts_are_rejected() {
        assert!(parse_raw_amount("1.5", 6).is_none());
        assert!(parse_raw_amount("1e6", 6).is_none());
        assert!(parse_raw_amount("", 6).is_none());
        assert!(parse_raw_amount("abc", 6).is_none());
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(round_display_amount(dec!(0.00005)).to_string(), "0.0001");
        assert_eq!(round_display_amount(dec!(0.00025)).to_string(), "0.0003");
        assert_eq!(round_display_amount(dec!(-0.00005)).to_string(), "-0.0001");
        assert_eq!(round_display_amount(dec!(2.71828)).to_string(), "2.7183");
        assert_eq!(round_display_amount(dec!(2.71824)).to_string(), "2.7182");
    }

    #[test]
    fn test_zero_display_amount() {
        assert_eq!(zero_display_amount().to_string(), "0.0000");
        assert!(zero_display_amount().is_zero());
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(None), "$0.0000");
        assert_eq!(format_usd(Some(dec!(0))), "$0.0000");
        assert_eq!(format_usd(Some(dec!(1.5))), "$1.5000");
        assert_eq!(format_usd(Some(dec!(1234.56789))), "$1 234.5679");
        assert_eq!(format_usd(Some(dec!(1234567))), "$1 234 567.0000");
        assert_eq!(format_usd(Some(dec!(-999.1))), "$-999.1000");
    }

    #[test]
    fn test_format_usd_total() {
        assert_eq!(format_usd_total(Decimal::ZERO), "$0.00");
        assert_eq!(format_usd_total(dec!(4)), "$4.00");
        assert_eq!(format_usd_total(dec!(1234.565)), "$1,234.57");
        assert_eq!(format_usd_total(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_usd_total(dec!(-0.004)), "$0.00");
    }
}
