//! Weighted random selection.
//!
//! Given labeled items with positive weights, picks one with probability
//! proportional to its weight: draw `u` uniform in `[0, total)`, then walk
//! the items accumulating weight until the running sum exceeds `u`.
//! Items with zero, negative, or non-finite weight never win but keep their
//! position, so duplicate labels stay distinct draw units.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::rng::WasmRng;

/// One labeled entry on a wheel or raffle list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedItem {
    pub label: String,
    pub weight: f64,
}

impl WeightedItem {
    pub fn new(label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }

    /// True when the item can ever be selected.
    #[inline(always)]
    pub fn is_eligible(&self) -> bool {
        self.weight.is_finite() && self.weight > 0.0
    }
}

/// Items that can actually be selected (positive, finite weight).
pub fn eligible(items: &[WeightedItem]) -> impl Iterator<Item = &WeightedItem> {
    items.iter().filter(|item| item.is_eligible())
}

/// Sum of eligible weights. Zero when nothing is selectable.
pub fn total_weight(items: &[WeightedItem]) -> f64 {
    eligible(items).map(|item| item.weight).sum()
}

/// Select an index into `items` with probability proportional to weight.
///
/// Fails with `InvalidInput` when no item has positive weight. Floating
/// point accumulation can leave `u` just past the final cumulative sum; the
/// last eligible item absorbs that sliver so the walk never comes up empty.
pub fn sample_index(items: &[WeightedItem], rng: &mut WasmRng) -> Result<usize, EngineError> {
    let total = total_weight(items);
    if total <= 0.0 {
        return Err(EngineError::InvalidInput);
    }

    let u = rng.next_f64() * total;
    let mut accumulated = 0.0;
    let mut last_eligible = None;

    for (i, item) in items.iter().enumerate() {
        if !item.is_eligible() {
            continue;
        }
        accumulated += item.weight;
        if u < accumulated {
            return Ok(i);
        }
        last_eligible = Some(i);
    }

    last_eligible.ok_or(EngineError::InvalidInput)
}

/// Select an item with probability proportional to weight.
pub fn sample<'a>(
    items: &'a [WeightedItem],
    rng: &mut WasmRng,
) -> Result<&'a WeightedItem, EngineError> {
    sample_index(items, rng).map(|i| &items[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(weights: &[(&str, f64)]) -> Vec<WeightedItem> {
        weights
            .iter()
            .map(|&(label, w)| WeightedItem::new(label, w))
            .collect()
    }

    #[test]
    fn test_empty_input_rejected() {
        let mut rng = WasmRng::from_seed(1);
        assert_eq!(sample(&[], &mut rng), Err(EngineError::InvalidInput));
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let mut rng = WasmRng::from_seed(1);
        let set = items(&[("a", 0.0), ("b", -2.0)]);
        assert_eq!(sample(&set, &mut rng), Err(EngineError::InvalidInput));
    }

    #[test]
    fn test_single_eligible_item_always_wins() {
        let mut rng = WasmRng::from_seed(2);
        let set = items(&[("dead", 0.0), ("alive", 3.5), ("nan", f64::NAN)]);
        for _ in 0..500 {
            assert_eq!(sample(&set, &mut rng).unwrap().label, "alive");
        }
    }

    #[test]
    fn test_ineligible_items_never_selected() {
        let mut rng = WasmRng::from_seed(3);
        let set = items(&[("a", 1.0), ("skip", -1.0), ("b", 1.0)]);
        for _ in 0..2000 {
            let i = sample_index(&set, &mut rng).unwrap();
            assert_ne!(i, 1);
        }
    }

    #[test]
    fn test_duplicate_labels_are_distinct_units() {
        let mut rng = WasmRng::from_seed(4);
        let set = items(&[("same", 1.0), ("same", 1.0)]);
        let mut hits = [0u32; 2];
        for _ in 0..4000 {
            hits[sample_index(&set, &mut rng).unwrap()] += 1;
        }
        assert!(hits[0] > 1500 && hits[1] > 1500, "hits: {:?}", hits);
    }

    #[test]
    fn test_frequencies_match_weight_share() {
        // Scenario from the selection contract: weights 1/1/2 over 40k
        // trials should land near 10k/10k/20k, within 5% of each expected
        // count.
        let mut rng = WasmRng::from_seed(1234);
        let set = items(&[("A", 1.0), ("B", 1.0), ("C", 2.0)]);
        let mut counts = [0u32; 3];
        let trials = 40_000;
        for _ in 0..trials {
            counts[sample_index(&set, &mut rng).unwrap()] += 1;
        }

        let expected = [10_000.0, 10_000.0, 20_000.0];
        for (i, &count) in counts.iter().enumerate() {
            let delta = (count as f64 - expected[i]).abs();
            assert!(
                delta < expected[i] * 0.05,
                "item {} count {} too far from {}",
                i,
                count,
                expected[i]
            );
        }
    }

    #[test]
    fn test_fractional_weights() {
        let mut rng = WasmRng::from_seed(77);
        let set = items(&[("light", 0.1), ("heavy", 0.9)]);
        let mut heavy = 0u32;
        let trials = 20_000;
        for _ in 0..trials {
            if sample(&set, &mut rng).unwrap().label == "heavy" {
                heavy += 1;
            }
        }
        let share = heavy as f64 / trials as f64;
        assert!((share - 0.9).abs() < 0.02, "heavy share {}", share);
    }
}
