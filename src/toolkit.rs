//! The simple randomness utilities: number range, coin, dice, team split,
//! and the per-day fortune.
//!
//! All display strings (face emoji, fortune levels, color names) live in the
//! host app; the engine returns neutral enums and indices into whatever
//! tables the host renders.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::rng::WasmRng;

/// Most dice a single roll can hold, matching the app's picker.
pub const MAX_DICE: usize = 6;

/// Uniform integer in [lo, hi], either order of bounds.
pub fn random_number(lo: i64, hi: i64, rng: &mut WasmRng) -> i64 {
    rng.range_inclusive(lo, hi)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinFace {
    Heads,
    Tails,
}

impl CoinFace {
    pub fn as_str(self) -> &'static str {
        match self {
            CoinFace::Heads => "heads",
            CoinFace::Tails => "tails",
        }
    }
}

pub fn flip_coin(rng: &mut WasmRng) -> CoinFace {
    if rng.chance() {
        CoinFace::Heads
    } else {
        CoinFace::Tails
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    /// Face values, each in 1..=6.
    pub faces: Vec<u8>,
    pub total: u32,
}

/// Roll `count` six-sided dice; the count is clamped to 1..=`MAX_DICE`.
pub fn roll_dice(count: usize, rng: &mut WasmRng) -> DiceRoll {
    let count = count.clamp(1, MAX_DICE);
    let faces: Vec<u8> = (0..count)
        .map(|_| rng.range_inclusive(1, 6) as u8)
        .collect();
    let total = faces.iter().map(|&f| u32::from(f)).sum();
    DiceRoll { faces, total }
}

/// Shuffle the members, then deal them round-robin into `team_count` teams,
/// so team sizes differ by at most one. Fails with `InvalidInput` when the
/// team count is zero or exceeds the member count.
pub fn split_teams(
    members: &[String],
    team_count: usize,
    rng: &mut WasmRng,
) -> Result<Vec<Vec<String>>, EngineError> {
    if team_count == 0 || team_count > members.len() {
        return Err(EngineError::InvalidInput);
    }
    let mut shuffled = members.to_vec();
    rng.shuffle(&mut shuffled);

    let mut teams = vec![Vec::new(); team_count];
    for (i, member) in shuffled.into_iter().enumerate() {
        teams[i % team_count].push(member);
    }
    Ok(teams)
}

/// A day's fortune as indices into the host's display tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fortune {
    pub level_index: usize,
    /// One score in 1..=5 per aspect (career, wealth, ...).
    pub aspect_scores: Vec<u8>,
    /// 0..=99.
    pub lucky_number: u8,
    pub color_index: usize,
}

/// Compute the fortune for one `(date, nickname)` pair.
///
/// The key hash seeds the RNG, so the same person gets the same fortune all
/// day without the host consulting storage; the fortune changes when the
/// date key rolls over.
pub fn daily_fortune(
    date_key: &str,
    nickname: &str,
    level_count: usize,
    aspect_count: usize,
    color_count: usize,
) -> Fortune {
    let mut hasher = DefaultHasher::new();
    date_key.hash(&mut hasher);
    nickname.hash(&mut hasher);
    let mut rng = WasmRng::from_seed(hasher.finish());

    Fortune {
        level_index: rng.index(level_count.max(1)),
        aspect_scores: (0..aspect_count)
            .map(|_| rng.range_inclusive(1, 5) as u8)
            .collect(),
        lucky_number: rng.index(100) as u8,
        color_index: rng.index(color_count.max(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_random_number_in_range() {
        let mut rng = WasmRng::from_seed(1);
        for _ in 0..1000 {
            let v = random_number(-5, 5, &mut rng);
            assert!((-5..=5).contains(&v));
        }
    }

    #[test]
    fn test_random_number_reversed_bounds() {
        let mut rng = WasmRng::from_seed(2);
        assert_eq!(random_number(7, 7, &mut rng), 7);
        let v = random_number(100, 1, &mut rng);
        assert!((1..=100).contains(&v));
    }

    #[test]
    fn test_flip_coin_hits_both_faces() {
        let mut rng = WasmRng::from_seed(3);
        let mut heads = 0u32;
        let trials = 10_000;
        for _ in 0..trials {
            if flip_coin(&mut rng) == CoinFace::Heads {
                heads += 1;
            }
        }
        let share = f64::from(heads) / f64::from(trials);
        assert!((share - 0.5).abs() < 0.02, "heads share {}", share);
    }

    #[test]
    fn test_roll_dice_bounds_and_total() {
        let mut rng = WasmRng::from_seed(4);
        for count in 1..=MAX_DICE {
            let roll = roll_dice(count, &mut rng);
            assert_eq!(roll.faces.len(), count);
            assert!(roll.faces.iter().all(|&f| (1..=6).contains(&f)));
            assert_eq!(roll.total, roll.faces.iter().map(|&f| u32::from(f)).sum::<u32>());
        }
    }

    #[test]
    fn test_roll_dice_clamps_count() {
        let mut rng = WasmRng::from_seed(5);
        assert_eq!(roll_dice(0, &mut rng).faces.len(), 1);
        assert_eq!(roll_dice(99, &mut rng).faces.len(), MAX_DICE);
    }

    #[test]
    fn test_split_teams_partitions_everyone() {
        let mut rng = WasmRng::from_seed(6);
        let members = names(&["a", "b", "c", "d", "e", "f", "g"]);
        let teams = split_teams(&members, 3, &mut rng).unwrap();
        assert_eq!(teams.len(), 3);

        let sizes: Vec<usize> = teams.iter().map(Vec::len).collect();
        let max = sizes.iter().max().unwrap();
        let min = sizes.iter().min().unwrap();
        assert!(max - min <= 1, "uneven teams: {:?}", sizes);

        let mut all: Vec<String> = teams.into_iter().flatten().collect();
        all.sort();
        let mut expected = members.clone();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_split_teams_bad_counts() {
        let mut rng = WasmRng::from_seed(7);
        let members = names(&["a", "b"]);
        assert_eq!(
            split_teams(&members, 0, &mut rng),
            Err(EngineError::InvalidInput)
        );
        assert_eq!(
            split_teams(&members, 3, &mut rng),
            Err(EngineError::InvalidInput)
        );
    }

    #[test]
    fn test_daily_fortune_is_stable_per_key() {
        let a = daily_fortune("2024-06-01", "alice", 7, 5, 8);
        let b = daily_fortune("2024-06-01", "alice", 7, 5, 8);
        assert_eq!(a, b);
    }

    #[test]
    fn test_daily_fortune_fields_in_range() {
        for name in ["", "alice", "bob", "小明"] {
            let fortune = daily_fortune("2024-06-01", name, 7, 5, 8);
            assert!(fortune.level_index < 7);
            assert_eq!(fortune.aspect_scores.len(), 5);
            assert!(fortune.aspect_scores.iter().all(|&s| (1..=5).contains(&s)));
            assert!(fortune.lucky_number < 100);
            assert!(fortune.color_index < 8);
        }
    }

    #[test]
    fn test_daily_fortune_varies_across_days() {
        // Seven levels over thirty days: at least two distinct levels is a
        // safe bet for any reasonable hash.
        let levels: Vec<usize> = (1..=30)
            .map(|day| daily_fortune(&format!("2024-06-{day:02}"), "alice", 7, 5, 8).level_index)
            .collect();
        assert!(levels.iter().any(|&l| l != levels[0]));
    }
}
