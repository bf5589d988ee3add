//! Exhaustible participant pool for lottery-style draws.
//!
//! Each participant can win at most once: a draw picks uniformly among the
//! not-yet-drawn names and appends the winner to the drawn list. Prize tiers
//! partition winners in declared order, each tier holding at most its
//! capacity. The JSON codec matches the shape the browser app persists to
//! localStorage (`participants` / `drawn` / `prizeWinners`), recovering to an
//! empty pool on malformed input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::rng::WasmRng;

/// A named prize bracket with a winner capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeTier {
    pub name: String,
    pub capacity: usize,
}

impl PrizeTier {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }
}

/// Draw state: unique participants, insertion-ordered drawn list, and the
/// winners already assigned to each tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pool {
    pub participants: Vec<String>,
    pub drawn: Vec<String>,
    pub prize_winners: BTreeMap<String, Vec<String>>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add names, trimming whitespace and dropping duplicates while keeping
    /// first-seen order. Splitting comma/newline input is the caller's job.
    pub fn add_participants<I>(&mut self, names: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if !self.participants.iter().any(|p| p == name) {
                self.participants.push(name.to_string());
            }
        }
    }

    /// Remove a participant everywhere: the roster, the drawn list, and any
    /// tier assignment.
    pub fn remove_participant(&mut self, name: &str) {
        self.participants.retain(|p| p != name);
        self.drawn.retain(|d| d != name);
        for winners in self.prize_winners.values_mut() {
            winners.retain(|w| w != name);
        }
    }

    /// Participants that have not been drawn yet, in roster order.
    pub fn available(&self) -> Vec<&str> {
        self.participants
            .iter()
            .filter(|p| !self.drawn.contains(p))
            .map(String::as_str)
            .collect()
    }

    pub fn available_len(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| !self.drawn.contains(p))
            .count()
    }

    /// Draw one winner uniformly from the available participants.
    ///
    /// Fails with `PoolExhausted` when everyone has been drawn; callers are
    /// expected to check `available_len()` first.
    pub fn draw(&mut self, rng: &mut WasmRng) -> Result<String, EngineError> {
        let available = self.available();
        if available.is_empty() {
            return Err(EngineError::PoolExhausted);
        }
        let winner = available[rng.index(available.len())].to_string();
        self.drawn.push(winner.clone());
        Ok(winner)
    }

    /// Count of winners already assigned to a tier.
    fn tier_count(&self, name: &str) -> usize {
        self.prize_winners.get(name).map_or(0, Vec::len)
    }

    /// Draw one winner and assign it to the first tier (in declared order)
    /// with spare capacity. When every tier is full the draw still succeeds
    /// but the tier is `None`.
    pub fn draw_for_tiers(
        &mut self,
        tiers: &[PrizeTier],
        rng: &mut WasmRng,
    ) -> Result<(String, Option<String>), EngineError> {
        let winner = self.draw(rng)?;
        let open = tiers
            .iter()
            .find(|tier| tier.capacity > 0 && self.tier_count(&tier.name) < tier.capacity);
        let tier_name = match open {
            Some(tier) => {
                self.prize_winners
                    .entry(tier.name.clone())
                    .or_default()
                    .push(winner.clone());
                Some(tier.name.clone())
            }
            None => None,
        };
        Ok((winner, tier_name))
    }

    /// Fill every tier in declared order, drawing without replacement until
    /// each reaches capacity or the pool runs dry. Returns what was drawn in
    /// this call per tier; partial results instead of an error when there are
    /// not enough participants.
    pub fn draw_all_for_tiers(
        &mut self,
        tiers: &[PrizeTier],
        rng: &mut WasmRng,
    ) -> Vec<(String, Vec<String>)> {
        let mut assignments = Vec::with_capacity(tiers.len());
        for tier in tiers {
            let mut winners = Vec::new();
            while self.tier_count(&tier.name) + winners.len() < tier.capacity {
                match self.draw(rng) {
                    Ok(winner) => winners.push(winner),
                    Err(EngineError::PoolExhausted) => {
                        log::debug!("pool exhausted while filling tier {:?}", tier.name);
                        break;
                    }
                    Err(_) => break,
                }
            }
            if !winners.is_empty() {
                self.prize_winners
                    .entry(tier.name.clone())
                    .or_default()
                    .extend(winners.iter().cloned());
            }
            assignments.push((tier.name.clone(), winners));
        }
        assignments
    }

    /// Forget who has been drawn, keeping the roster intact.
    pub fn reset_drawn(&mut self) {
        self.drawn.clear();
        self.prize_winners.clear();
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.participants.clear();
        self.reset_drawn();
    }

    /// Lenient decode: anything that fails to parse, or entries that violate
    /// the pool invariants, collapses to a safe default rather than an error.
    pub fn from_json(data: &str) -> Pool {
        let mut pool = match serde_json::from_str::<Pool>(data) {
            Ok(pool) => pool,
            Err(err) => {
                log::warn!("discarding malformed lottery pool: {err}");
                return Pool::default();
            }
        };
        pool.sanitize();
        pool
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Re-establish invariants after decoding untrusted data: drawn entries
    /// must be unique members of the roster, tier winners must come from the
    /// drawn list.
    fn sanitize(&mut self) {
        let mut deduped = Vec::new();
        for name in self.drawn.drain(..) {
            if self.participants.contains(&name) && !deduped.contains(&name) {
                deduped.push(name);
            }
        }
        self.drawn = deduped;
        for winners in self.prize_winners.values_mut() {
            winners.retain(|w| self.drawn.contains(w));
        }
    }
}
