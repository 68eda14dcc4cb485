//! Exact expected hand value by enumerating every equally likely hand.

use crate::combin::Combinations;
use crate::rounding::round_ratio;
use crate::StatsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many hands are enumerated between two interrupt checks.
const INTERRUPT_STRIDE: u64 = 4_096;

/// One deck entry as seen by the engine: a draw value and how many copies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawEntry {
    pub value: i64,
    pub count: u32,
}

/// Serializable deck state handed across the worker boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckSnapshot {
    pub entries: Vec<DrawEntry>,
}

impl DeckSnapshot {
    pub fn new(entries: Vec<DrawEntry>) -> Self {
        Self { entries }
    }

    pub fn size(&self) -> usize {
        self.entries.iter().map(|entry| entry.count as usize).sum()
    }

    /// One element per physical card copy.
    pub fn flatten(&self) -> Vec<i64> {
        let mut elements = Vec::with_capacity(self.size());
        for entry in &self.entries {
            elements.extend(std::iter::repeat(entry.value).take(entry.count as usize));
        }
        elements
    }
}

impl From<Vec<(i64, u32)>> for DeckSnapshot {
    fn from(pairs: Vec<(i64, u32)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(value, count)| DrawEntry { value, count })
                .collect(),
        )
    }
}

/// Number of hands reaching each total value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SumHistogram {
    counts: BTreeMap<i64, u64>,
    hands: u64,
}

impl SumHistogram {
    /// Enumerates every `hand_size` selection of `elements` and groups them by sum.
    ///
    /// `interrupt` is polled periodically; once it returns true the enumeration
    /// stops and `Ok(None)` is returned.
    pub fn collect(
        elements: &[i64],
        hand_size: usize,
        interrupt: Option<&dyn Fn() -> bool>,
    ) -> Result<Option<Self>, StatsError> {
        validate(elements.len(), hand_size)?;
        let mut histogram = Self::default();
        let mut hands = Combinations::new(elements, hand_size);
        while let Some(sum) =
            hands.next_with(|items| items.copied().try_fold(0i64, i64::checked_add))
        {
            let Some(sum) = sum else {
                return Err(StatsError::invalid("hand total overflows a 64-bit value"));
            };
            *histogram.counts.entry(sum).or_insert(0) += 1;
            histogram.hands += 1;
            if histogram.hands % INTERRUPT_STRIDE == 0 && interrupt.is_some_and(|stop| stop()) {
                return Ok(None);
            }
        }
        Ok(Some(histogram))
    }

    pub fn hands(&self) -> u64 {
        self.hands
    }

    /// Hands per distinct total, in ascending order of the total.
    pub fn iter(&self) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.counts.iter().map(|(&sum, &count)| (sum, count))
    }

    /// Exact numerator of the mean: sum over totals of `total * hands`.
    pub fn weighted_total(&self) -> i128 {
        self.iter()
            .map(|(sum, count)| i128::from(sum) * i128::from(count))
            .sum()
    }

    /// Unrounded expected total.
    pub fn mean(&self) -> f64 {
        self.iter()
            .map(|(sum, count)| sum as f64 * count as f64 / self.hands as f64)
            .sum()
    }

    /// Expected total rounded to `digits` places, ties away from zero.
    pub fn rounded_mean(&self, digits: u32) -> f64 {
        round_ratio(self.weighted_total(), i128::from(self.hands), digits)
    }
}

fn validate(elements: usize, hand_size: usize) -> Result<(), StatsError> {
    if hand_size == 0 {
        return Err(StatsError::invalid("hand size must be positive"));
    }
    if elements < hand_size {
        return Err(StatsError::invalid(format!(
            "deck of {elements} cards cannot fill a hand of {hand_size}"
        )));
    }
    Ok(())
}

/// Exact expected sum of a `hand_size` hand drawn from `snapshot`, rounded to
/// `digits` decimal places.
pub fn expected_value(snapshot: &DeckSnapshot, hand_size: usize, digits: u32) -> Result<f64, StatsError> {
    let histogram = SumHistogram::collect(&snapshot.flatten(), hand_size, None)?;
    // Without an interrupt the enumeration always runs to completion.
    Ok(histogram.map_or(0.0, |histogram| histogram.rounded_mean(digits)))
}

/// Like [`expected_value`] but abandons the enumeration once `interrupt`
/// returns true, yielding `Ok(None)`.
pub fn expected_value_interruptible(
    snapshot: &DeckSnapshot,
    hand_size: usize,
    digits: u32,
    interrupt: Option<&dyn Fn() -> bool>,
) -> Result<Option<f64>, StatsError> {
    let histogram = SumHistogram::collect(&snapshot.flatten(), hand_size, interrupt)?;
    Ok(histogram.map(|histogram| histogram.rounded_mean(digits)))
}
