//! Dial geometry and spin animation state machines.
//!
//! The wheel is laid out once from the weighted items: each eligible item
//! owns an arc sized by its share of the total weight, in input order,
//! starting at the fixed pointer reference (0°). Angles grow unbounded while
//! spinning; the arc under the pointer is the one containing
//! `angle mod 360`. The screen-direction flip (CSS rotates the wheel under a
//! fixed top pointer) is the renderer's concern, not the engine's.
//!
//! Two strategies, both frame-driven by repeated `step()` calls:
//! - `MomentumSpin`: a launch velocity decays until it falls under a stop
//!   threshold, and the outcome is read off wherever the dial rests.
//! - `TargetSpin`: the outcome is decided first, then the dial eases forward
//!   to an angle that parks the pointer inside the winner's arc, so the
//!   displayed stop can never disagree with the result.

use serde::Serialize;

use crate::error::EngineError;
use crate::rng::WasmRng;
use crate::sampler::{sample_index, total_weight, WeightedItem};

/// Momentum spin settles when |velocity| drops below this (deg/frame).
pub const STOP_THRESHOLD: f64 = 0.15;
/// Launch velocities below this magnitude are bumped up to it.
pub const MIN_SPIN_SPEED: f64 = 2.0;
/// Base per-frame velocity decay factor.
pub const DECEL_BASE: f64 = 0.975;
/// Extra decay headroom granted at high speed.
pub const DECEL_RANGE: f64 = 0.02;
/// Speed at which the decay factor tops out at `DECEL_BASE + DECEL_RANGE`.
pub const DECEL_SPEED_SCALE: f64 = 15.0;
/// Randomized launch speed range for a plain click (no drag gesture).
pub const MIN_CLICK_SPEED: f64 = 18.0;
pub const MAX_CLICK_SPEED: f64 = 32.0;

/// Target spin: minimum easing speed in deg/frame.
pub const MIN_EASE_SPEED: f64 = 2.0;
/// Target spin: fraction of the remaining distance covered per frame.
pub const EASING_FACTOR: f64 = 0.08;
/// Target spin snaps to the exact target once this close.
pub const SNAP_THRESHOLD: f64 = 0.5;
/// Extra full revolutions a target spin always performs.
pub const DEFAULT_WHOLE_TURNS: u32 = 4;

/// One item's slice of the dial, in degrees from the pointer reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcSpan {
    /// Position in the original item sequence.
    pub index: usize,
    pub label: String,
    pub start_deg: f64,
    pub end_deg: f64,
}

/// Lay the eligible items out around the circle by cumulative weight share.
///
/// Pure function of the weights and their order: identical input always
/// yields identical boundaries. Ineligible items get no arc.
pub fn arc_layout(items: &[WeightedItem]) -> Vec<ArcSpan> {
    let total = total_weight(items);
    if total <= 0.0 {
        return Vec::new();
    }

    let mut spans = Vec::new();
    let mut cursor = 0.0;
    for (index, item) in items.iter().enumerate() {
        if !item.is_eligible() {
            continue;
        }
        let sweep = item.weight / total * 360.0;
        spans.push(ArcSpan {
            index,
            label: item.label.clone(),
            start_deg: cursor,
            end_deg: cursor + sweep,
        });
        cursor += sweep;
    }
    // Close the circle exactly despite accumulated rounding.
    if let Some(last) = spans.last_mut() {
        last.end_deg = 360.0;
    }
    spans
}

/// Map a resting dial angle back to the item whose arc sits under the
/// pointer. Returns the index into the original item sequence, or `None`
/// when nothing is eligible. The last eligible item absorbs rounding at the
/// wrap-around seam.
pub fn pick_by_rotation(items: &[WeightedItem], angle: f64) -> Option<usize> {
    let total = total_weight(items);
    if total <= 0.0 {
        return None;
    }

    let pointer = angle.rem_euclid(360.0);
    let mut accumulated = 0.0;
    let mut last_eligible = None;
    for (i, item) in items.iter().enumerate() {
        if !item.is_eligible() {
            continue;
        }
        accumulated += item.weight / total * 360.0;
        if pointer < accumulated {
            return Some(i);
        }
        last_eligible = Some(i);
    }
    last_eligible
}

/// Absolute rotation target that parks the pointer on the middle of
/// `winner_index`'s arc after at least `whole_turns` extra revolutions,
/// always moving forward from `current_angle`.
pub fn rotation_target(
    items: &[WeightedItem],
    current_angle: f64,
    winner_index: usize,
    whole_turns: u32,
) -> Result<f64, EngineError> {
    let layout = arc_layout(items);
    let span = layout
        .iter()
        .find(|span| span.index == winner_index)
        .ok_or(EngineError::InvalidInput)?;
    let midpoint = (span.start_deg + span.end_deg) / 2.0;

    let mut forward = midpoint - current_angle.rem_euclid(360.0);
    if forward <= 0.0 {
        forward += 360.0;
    }
    Ok(current_angle + forward + f64::from(whole_turns.max(1)) * 360.0)
}

/// Lifecycle of a single spin. Exactly one spin may be in flight per dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    Idle,
    Spinning,
    Settled,
}

/// Physics-flavored spin: the dial keeps the velocity it was launched with
/// and bleeds it off each frame; the winner is whatever arc the pointer
/// rests on. Fairness over many spins comes from the weighted arc layout
/// itself. The host may abandon the spin by simply not stepping it; no
/// outcome is recorded until it settles.
pub struct MomentumSpin {
    items: Vec<WeightedItem>,
    angle: f64,
    velocity: f64,
    phase: SpinPhase,
    outcome: Option<usize>,
}

impl MomentumSpin {
    /// Fails with `InvalidInput` when no item could ever win.
    pub fn new(items: Vec<WeightedItem>, start_angle: f64) -> Result<Self, EngineError> {
        if total_weight(&items) <= 0.0 {
            return Err(EngineError::InvalidInput);
        }
        Ok(Self {
            items,
            angle: start_angle,
            velocity: 0.0,
            phase: SpinPhase::Idle,
            outcome: None,
        })
    }

    /// Launch with a gesture velocity in deg/frame. Magnitudes below
    /// `MIN_SPIN_SPEED` are bumped to it, sign preserved; a non-finite
    /// velocity (degenerate drag sample) is treated as a weak forward
    /// launch. Ignored while a spin is already in flight.
    pub fn launch(&mut self, velocity: f64) {
        if self.phase == SpinPhase::Spinning {
            return;
        }
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        self.velocity = if velocity.abs() < MIN_SPIN_SPEED {
            if velocity >= 0.0 {
                MIN_SPIN_SPEED
            } else {
                -MIN_SPIN_SPEED
            }
        } else {
            velocity
        };
        self.outcome = None;
        self.phase = SpinPhase::Spinning;
    }

    /// Launch with a randomized click speed in `[MIN_CLICK_SPEED, MAX_CLICK_SPEED)`.
    pub fn launch_random(&mut self, rng: &mut WasmRng) {
        let speed = MIN_CLICK_SPEED + rng.next_f64() * (MAX_CLICK_SPEED - MIN_CLICK_SPEED);
        self.launch(speed);
    }

    /// Advance one animation frame. The decay factor scales with current
    /// speed, so fast spins glide and slow ones die quickly. Returns the
    /// phase after the step; the simulation draws no randomness, so a given
    /// launch always rests at the same angle.
    pub fn step(&mut self) -> SpinPhase {
        if self.phase != SpinPhase::Spinning {
            return self.phase;
        }
        self.angle += self.velocity;
        let speed = self.velocity.abs();
        self.velocity *= DECEL_BASE + DECEL_RANGE * (speed / DECEL_SPEED_SCALE).min(1.0);

        if self.velocity.abs() <= STOP_THRESHOLD {
            self.outcome = pick_by_rotation(&self.items, self.angle);
            self.phase = SpinPhase::Settled;
        }
        self.phase
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn items(&self) -> &[WeightedItem] {
        &self.items
    }

    /// The decided item, only once the dial has settled.
    pub fn outcome(&self) -> Option<&WeightedItem> {
        match self.phase {
            SpinPhase::Settled => self.outcome.map(|i| &self.items[i]),
            _ => None,
        }
    }
}

/// Pre-decided spin: the winner is sampled (or supplied by a pool draw)
/// before the dial moves, then the animation eases toward the matching
/// angle and snaps onto it. Not cancellable mid-spin; the dial always
/// reaches the target.
pub struct TargetSpin {
    items: Vec<WeightedItem>,
    angle: f64,
    target: f64,
    winner: Option<usize>,
    phase: SpinPhase,
}

impl TargetSpin {
    pub fn new(items: Vec<WeightedItem>, start_angle: f64) -> Result<Self, EngineError> {
        if total_weight(&items) <= 0.0 {
            return Err(EngineError::InvalidInput);
        }
        Ok(Self {
            items,
            angle: start_angle,
            target: start_angle,
            winner: None,
            phase: SpinPhase::Idle,
        })
    }

    /// Sample the winner by weight, then aim the dial at it. Ignored while a
    /// spin is already in flight.
    pub fn launch(&mut self, rng: &mut WasmRng) -> Result<(), EngineError> {
        if self.phase == SpinPhase::Spinning {
            return Ok(());
        }
        let winner = sample_index(&self.items, rng)?;
        self.launch_toward(winner)
    }

    /// Aim the dial at an externally decided winner (e.g. a pool draw).
    pub fn launch_toward(&mut self, winner_index: usize) -> Result<(), EngineError> {
        if self.phase == SpinPhase::Spinning {
            return Ok(());
        }
        self.target = rotation_target(&self.items, self.angle, winner_index, DEFAULT_WHOLE_TURNS)?;
        self.winner = Some(winner_index);
        self.phase = SpinPhase::Spinning;
        Ok(())
    }

    /// Advance one animation frame: cover a fixed fraction of the remaining
    /// distance (never slower than `MIN_EASE_SPEED`), and snap exactly onto
    /// the target once within `SNAP_THRESHOLD`.
    pub fn step(&mut self) -> SpinPhase {
        if self.phase != SpinPhase::Spinning {
            return self.phase;
        }
        let remaining = self.target - self.angle;
        if remaining < SNAP_THRESHOLD {
            self.angle = self.target;
            self.phase = SpinPhase::Settled;
            return self.phase;
        }
        let speed = (remaining * EASING_FACTOR).max(MIN_EASE_SPEED);
        self.angle = (self.angle + speed).min(self.target);
        self.phase
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn items(&self) -> &[WeightedItem] {
        &self.items
    }

    /// The decided item, only once the dial has settled on it.
    pub fn outcome(&self) -> Option<&WeightedItem> {
        match self.phase {
            SpinPhase::Settled => self.winner.map(|i| &self.items[i]),
            _ => None,
        }
    }
}
