//! Hypergeometric chance of drawing at least one copy of a card.

use crate::combin::binomial;
use crate::rounding::{round_half_away, round_ratio};
use crate::StatsError;

/// Decimal places of every draw-rate figure.
pub const RATE_DIGITS: u32 = 1;

/// Percentage chance that a hand of `hand_size` cards drawn without
/// replacement from `total_size` cards holds at least one of the
/// `include_size` marked cards, rounded to [`RATE_DIGITS`] places.
///
/// When fewer than `hand_size` unmarked cards exist every hand must contain a
/// marked one, so the result is exactly 100. A deck smaller than the hand with
/// nothing marked has no meaningful answer and is rejected.
pub fn draw_rate(total_size: usize, include_size: usize, hand_size: usize) -> Result<f64, StatsError> {
    if hand_size == 0 {
        return Err(StatsError::invalid("hand size must be positive"));
    }
    if include_size > total_size {
        return Err(StatsError::invalid(format!(
            "{include_size} marked cards exceed deck size {total_size}"
        )));
    }
    if include_size == 0 {
        if total_size < hand_size {
            return Err(StatsError::invalid(format!(
                "deck of {total_size} cards cannot fill a hand of {hand_size}"
            )));
        }
        return Ok(0.0);
    }
    let exclude_size = total_size - include_size;
    if exclude_size < hand_size {
        return Ok(100.0);
    }

    Ok(exact_rate(total_size, exclude_size, hand_size)
        .unwrap_or_else(|| approximate_rate(total_size, exclude_size, hand_size)))
}

/// `1 - C(exclude, hand) / C(total, hand)` as a percentage, using integer
/// binomials. `None` if they do not fit.
fn exact_rate(total_size: usize, exclude_size: usize, hand_size: usize) -> Option<f64> {
    let all = binomial(total_size as u64, hand_size as u64)?;
    let miss = binomial(exclude_size as u64, hand_size as u64)?;
    let all = i128::try_from(all).ok()?;
    let miss = i128::try_from(miss).ok()?;
    let hit = (all - miss).checked_mul(100)?;
    Some(round_ratio(hit, all, RATE_DIGITS))
}

/// Same figure accumulated as a product of ratios, which never overflows.
fn approximate_rate(total_size: usize, exclude_size: usize, hand_size: usize) -> f64 {
    let miss = (0..hand_size).fold(1.0f64, |acc, i| {
        acc * (exclude_size - i) as f64 / (total_size - i) as f64
    });
    round_half_away((1.0 - miss) * 100.0, RATE_DIGITS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_marked_is_zero() {
        assert_eq!(draw_rate(10, 0, 5), Ok(0.0));
    }

    #[test]
    fn everything_marked_is_certain() {
        assert_eq!(draw_rate(10, 10, 5), Ok(100.0));
    }

    #[test]
    fn too_few_unmarked_cards_is_certain() {
        assert_eq!(draw_rate(10, 3, 8), Ok(100.0));
        assert_eq!(draw_rate(3, 1, 5), Ok(100.0));
    }

    #[test]
    fn single_card_hand() {
        assert_eq!(draw_rate(5, 1, 1), Ok(20.0));
    }

    #[test]
    fn starter_deck_rates() {
        // 3 Estates in 10 cards, hand of 5: 1 - C(7,5)/C(10,5) = 1 - 21/252.
        assert_eq!(draw_rate(10, 3, 5), Ok(91.7));
        // 7 Coppers: C(3,5) = 0.
        assert_eq!(draw_rate(10, 7, 5), Ok(100.0));
        assert_eq!(draw_rate(40, 10, 5), Ok(78.3));
    }

    #[test]
    fn rejects_invalid_arguments() {
        assert!(matches!(draw_rate(10, 1, 0), Err(StatsError::InvalidInput(_))));
        assert!(matches!(draw_rate(10, 11, 5), Err(StatsError::InvalidInput(_))));
        assert!(matches!(draw_rate(3, 0, 5), Err(StatsError::InvalidInput(_))));
    }

    #[test]
    fn large_decks_use_the_product_form() {
        let exact = exact_rate(400, 390, 10).expect("fits");
        let approx = approximate_rate(400, 390, 10);
        assert!((exact - approx).abs() <= 0.1 + 1e-9);
        assert_eq!(exact_rate(2_000, 1_000, 1_000), None);
        let rate = draw_rate(2_000, 1_000, 1_000).expect("rate");
        assert_eq!(rate, 100.0);
    }
}
