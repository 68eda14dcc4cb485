//! Decimal rounding shared by the draw-rate and expectation figures.
//!
//! Ties are rounded half away from zero. Exact ratios are rounded with integer
//! arithmetic so results such as `2.675` never depend on binary float error.

const MAX_DIGITS: u32 = 18;

/// Rounds `value` to `digits` decimal places, ties away from zero.
pub fn round_half_away(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits.min(MAX_DIGITS) as i32);
    (value * factor).round() / factor
}

/// Rounds the exact ratio `num / den` to `digits` decimal places, ties away from zero.
///
/// Falls back to float rounding when the scaled numerator does not fit in `i128`.
pub fn round_ratio(num: i128, den: i128, digits: u32) -> f64 {
    debug_assert!(den != 0, "ratio with zero denominator");
    let digits = digits.min(MAX_DIGITS);
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    let scale = 10i128.pow(digits);
    let rounded = num
        .unsigned_abs()
        .checked_mul(scale as u128)
        .and_then(|scaled| scaled.checked_mul(2))
        .and_then(|doubled| doubled.checked_add(den as u128))
        .map(|top| top / (2 * den as u128));
    match rounded {
        Some(magnitude) => {
            let magnitude = magnitude as f64 / scale as f64;
            if num < 0 {
                -magnitude
            } else {
                magnitude
            }
        }
        None => round_half_away(num as f64 / den as f64, digits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_ties_round_away_from_zero() {
        assert_eq!(round_half_away(0.25, 1), 0.3);
        assert_eq!(round_half_away(-0.25, 1), -0.3);
        assert_eq!(round_half_away(12.34, 0), 12.0);
    }

    #[test]
    fn ratio_ties_round_away_from_zero() {
        // 2.675 is not representable as f64; the exact ratio still rounds up.
        assert_eq!(round_ratio(2675, 1000, 2), 2.68);
        assert_eq!(round_ratio(-2675, 1000, 2), -2.68);
        assert_eq!(round_ratio(1, 8, 2), 0.13);
        assert_eq!(round_ratio(1, 3, 2), 0.33);
        assert_eq!(round_ratio(2, 3, 0), 1.0);
    }

    #[test]
    fn ratio_normalizes_negative_denominator() {
        assert_eq!(round_ratio(1, -4, 1), -0.3);
        assert_eq!(round_ratio(-1, -4, 1), 0.3);
    }

    #[test]
    fn ratio_falls_back_on_overflow() {
        let value = round_ratio(i128::MAX / 2, i128::MAX / 4, 2);
        assert!((value - 2.0).abs() < 1e-9);
    }
}
