//! WebAssembly randomness engine for the Random Toolbox.
//!
//! Exports the selection engine behind the browser app's randomness
//! features (weighted decision wheel, lottery draw, dice, coin, team
//! splitter, daily fortune) via wasm-bindgen. Rendering, localization, and
//! localStorage access stay in JavaScript; the app feeds strings and
//! weights in and gets outcomes, arc layouts, and JSON blobs back.

pub mod error;
pub mod history;
pub mod pool;
pub mod rng;
pub mod sampler;
pub mod toolkit;
pub mod wheel;

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;

    use crate::error::EngineError;
    use crate::history::HistoryLog;
    use crate::pool::{Pool, PrizeTier};
    use crate::rng::WasmRng;
    use crate::sampler::{self, WeightedItem};
    use crate::toolkit;
    use crate::wheel::{self, MomentumSpin, SpinPhase, TargetSpin};

    fn items_from(labels: Vec<String>, weights: Vec<f64>) -> Vec<WeightedItem> {
        labels
            .into_iter()
            .zip(weights)
            .map(|(label, weight)| WeightedItem { label, weight })
            .collect()
    }

    fn js_err(err: EngineError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    fn phase_name(phase: SpinPhase) -> String {
        match phase {
            SpinPhase::Idle => "idle",
            SpinPhase::Spinning => "spinning",
            SpinPhase::Settled => "settled",
        }
        .to_string()
    }

    /// Weighted sample over parallel label/weight arrays.
    #[wasm_bindgen(js_name = "sampleWeighted")]
    pub fn wasm_sample_weighted(
        labels: Vec<String>,
        weights: Vec<f64>,
    ) -> Result<String, JsValue> {
        let items = items_from(labels, weights);
        let mut rng = WasmRng::new();
        sampler::sample(&items, &mut rng)
            .map(|item| item.label.clone())
            .map_err(js_err)
    }

    /// Arc boundaries for rendering the dial.
    /// Returns `[{index, label, startDeg, endDeg}, ...]`.
    #[wasm_bindgen(js_name = "arcLayout")]
    pub fn wasm_arc_layout(labels: Vec<String>, weights: Vec<f64>) -> JsValue {
        let items = items_from(labels, weights);
        serde_wasm_bindgen::to_value(&wheel::arc_layout(&items)).unwrap()
    }

    /// Which label sits under the pointer at a given dial angle.
    #[wasm_bindgen(js_name = "pickByRotation")]
    pub fn wasm_pick_by_rotation(
        labels: Vec<String>,
        weights: Vec<f64>,
        angle: f64,
    ) -> Option<String> {
        let items = items_from(labels, weights);
        wheel::pick_by_rotation(&items, angle).map(|i| items[i].label.clone())
    }

    /// Momentum wheel: launched with a gesture velocity, the outcome is read
    /// off wherever the dial rests.
    #[wasm_bindgen]
    pub struct DriftSpin {
        inner: MomentumSpin,
        rng: WasmRng,
    }

    #[wasm_bindgen]
    impl DriftSpin {
        #[wasm_bindgen(constructor)]
        pub fn new(
            labels: Vec<String>,
            weights: Vec<f64>,
            start_angle: f64,
        ) -> Result<DriftSpin, JsValue> {
            let inner =
                MomentumSpin::new(items_from(labels, weights), start_angle).map_err(js_err)?;
            Ok(DriftSpin {
                inner,
                rng: WasmRng::new(),
            })
        }

        /// Launch with the velocity measured from a drag gesture.
        pub fn launch(&mut self, velocity: f64) {
            self.inner.launch(velocity);
        }

        /// Launch with a randomized click speed.
        #[wasm_bindgen(js_name = "launchRandom")]
        pub fn launch_random(&mut self) {
            self.inner.launch_random(&mut self.rng);
        }

        /// Advance one animation frame. Returns true once settled.
        pub fn step(&mut self) -> bool {
            self.inner.step() == SpinPhase::Settled
        }

        pub fn phase(&self) -> String {
            phase_name(self.inner.phase())
        }

        pub fn angle(&self) -> f64 {
            self.inner.angle()
        }

        /// The decided label, or null while idle/spinning.
        pub fn outcome(&self) -> Option<String> {
            self.inner.outcome().map(|item| item.label.clone())
        }
    }

    /// Target-first wheel: the winner is decided before the dial moves, then
    /// the animation eases onto the matching angle.
    #[wasm_bindgen]
    pub struct WheelSpin {
        inner: TargetSpin,
        rng: WasmRng,
    }

    #[wasm_bindgen]
    impl WheelSpin {
        #[wasm_bindgen(constructor)]
        pub fn new(
            labels: Vec<String>,
            weights: Vec<f64>,
            start_angle: f64,
        ) -> Result<WheelSpin, JsValue> {
            let inner =
                TargetSpin::new(items_from(labels, weights), start_angle).map_err(js_err)?;
            Ok(WheelSpin {
                inner,
                rng: WasmRng::new(),
            })
        }

        /// Sample a winner by weight and start easing toward it.
        pub fn launch(&mut self) -> Result<(), JsValue> {
            self.inner.launch(&mut self.rng).map_err(js_err)
        }

        /// Ease toward an externally decided winner (index into the labels).
        #[wasm_bindgen(js_name = "launchToward")]
        pub fn launch_toward(&mut self, winner_index: usize) -> Result<(), JsValue> {
            self.inner.launch_toward(winner_index).map_err(js_err)
        }

        /// Advance one animation frame. Returns true once settled.
        pub fn step(&mut self) -> bool {
            self.inner.step() == SpinPhase::Settled
        }

        pub fn phase(&self) -> String {
            phase_name(self.inner.phase())
        }

        pub fn angle(&self) -> f64 {
            self.inner.angle()
        }

        pub fn target(&self) -> f64 {
            self.inner.target()
        }

        /// The decided label, or null until the dial settles on it.
        pub fn outcome(&self) -> Option<String> {
            self.inner.outcome().map(|item| item.label.clone())
        }
    }

    /// Lottery pool with optional prize tiers.
    #[wasm_bindgen]
    pub struct Lottery {
        pool: Pool,
        tiers: Vec<PrizeTier>,
        rng: WasmRng,
    }

    #[wasm_bindgen]
    impl Lottery {
        #[wasm_bindgen(constructor)]
        pub fn new() -> Lottery {
            Lottery {
                pool: Pool::new(),
                tiers: Vec::new(),
                rng: WasmRng::new(),
            }
        }

        /// Restore from persisted JSON; malformed input yields an empty pool.
        #[wasm_bindgen(js_name = "fromJson")]
        pub fn from_json(data: &str) -> Lottery {
            Lottery {
                pool: Pool::from_json(data),
                tiers: Vec::new(),
                rng: WasmRng::new(),
            }
        }

        #[wasm_bindgen(js_name = "toJson")]
        pub fn to_json(&self) -> String {
            self.pool.to_json()
        }

        #[wasm_bindgen(js_name = "setTiers")]
        pub fn set_tiers(&mut self, names: Vec<String>, capacities: Vec<u32>) {
            self.tiers = names
                .into_iter()
                .zip(capacities)
                .map(|(name, capacity)| PrizeTier::new(name, capacity as usize))
                .collect();
        }

        #[wasm_bindgen(js_name = "addParticipants")]
        pub fn add_participants(&mut self, names: Vec<String>) {
            self.pool.add_participants(names);
        }

        pub fn remove(&mut self, name: &str) {
            self.pool.remove_participant(name);
        }

        #[wasm_bindgen(js_name = "participantCount")]
        pub fn participant_count(&self) -> usize {
            self.pool.participants.len()
        }

        #[wasm_bindgen(js_name = "availableCount")]
        pub fn available_count(&self) -> usize {
            self.pool.available_len()
        }

        pub fn draw(&mut self) -> Result<String, JsValue> {
            self.pool.draw(&mut self.rng).map_err(js_err)
        }

        /// Draw one winner into the first open tier.
        /// Returns `{winner, tier}` with `tier: null` when every tier is full.
        #[wasm_bindgen(js_name = "drawForTiers")]
        pub fn draw_for_tiers(&mut self) -> Result<JsValue, JsValue> {
            let (winner, tier) = self
                .pool
                .draw_for_tiers(&self.tiers, &mut self.rng)
                .map_err(js_err)?;
            let obj = js_sys::Object::new();
            js_sys::Reflect::set(&obj, &"winner".into(), &winner.into()).unwrap();
            let tier_value = match tier {
                Some(name) => JsValue::from_str(&name),
                None => JsValue::NULL,
            };
            js_sys::Reflect::set(&obj, &"tier".into(), &tier_value).unwrap();
            Ok(obj.into())
        }

        /// Fill every tier in order.
        /// Returns `[{tier, winners}, ...]`, partial when the pool runs dry.
        #[wasm_bindgen(js_name = "drawAllForTiers")]
        pub fn draw_all_for_tiers(&mut self) -> JsValue {
            let assignments = self.pool.draw_all_for_tiers(&self.tiers, &mut self.rng);
            let out = js_sys::Array::new();
            for (tier, winners) in assignments {
                let obj = js_sys::Object::new();
                js_sys::Reflect::set(&obj, &"tier".into(), &tier.into()).unwrap();
                let list = js_sys::Array::new();
                for winner in winners {
                    list.push(&JsValue::from_str(&winner));
                }
                js_sys::Reflect::set(&obj, &"winners".into(), &list.into()).unwrap();
                out.push(&obj.into());
            }
            out.into()
        }

        #[wasm_bindgen(js_name = "resetDrawn")]
        pub fn reset_drawn(&mut self) {
            self.pool.reset_drawn();
        }

        pub fn clear(&mut self) {
            self.pool.clear();
        }
    }

    /// Bounded history log (200 records, newest first).
    #[wasm_bindgen]
    pub struct History {
        log: HistoryLog,
        rng: WasmRng,
    }

    #[wasm_bindgen]
    impl History {
        #[wasm_bindgen(constructor)]
        pub fn new() -> History {
            History {
                log: HistoryLog::new(),
                rng: WasmRng::new(),
            }
        }

        /// Restore from persisted JSON; malformed input yields an empty log.
        #[wasm_bindgen(js_name = "fromJson")]
        pub fn from_json(data: &str) -> History {
            History {
                log: HistoryLog::from_json(data),
                rng: WasmRng::new(),
            }
        }

        #[wasm_bindgen(js_name = "toJson")]
        pub fn to_json(&self) -> String {
            self.log.to_json()
        }

        /// Append a record; `now_ms` comes from `Date.now()`. Returns the id.
        pub fn add(&mut self, kind: &str, result: &str, detail: &str, now_ms: f64) -> String {
            self.log
                .add(kind, result, detail, now_ms as u64, &mut self.rng)
                .id
                .clone()
        }

        /// All records, newest first.
        pub fn records(&self) -> JsValue {
            serde_wasm_bindgen::to_value(self.log.records()).unwrap()
        }

        pub fn len(&self) -> usize {
            self.log.len()
        }

        pub fn clear(&mut self) {
            self.log.clear();
        }
    }

    /// Uniform integer in [lo, hi], either order of bounds.
    #[wasm_bindgen(js_name = "randomNumber")]
    pub fn wasm_random_number(lo: i32, hi: i32) -> i32 {
        let mut rng = WasmRng::new();
        toolkit::random_number(i64::from(lo), i64::from(hi), &mut rng) as i32
    }

    /// Returns "heads" or "tails".
    #[wasm_bindgen(js_name = "flipCoin")]
    pub fn wasm_flip_coin() -> String {
        let mut rng = WasmRng::new();
        toolkit::flip_coin(&mut rng).as_str().to_string()
    }

    /// Roll up to six dice. Returns `{faces, total}`.
    #[wasm_bindgen(js_name = "rollDice")]
    pub fn wasm_roll_dice(count: usize) -> JsValue {
        let mut rng = WasmRng::new();
        serde_wasm_bindgen::to_value(&toolkit::roll_dice(count, &mut rng)).unwrap()
    }

    /// Shuffle members into teams. Returns `string[][]`.
    #[wasm_bindgen(js_name = "splitTeams")]
    pub fn wasm_split_teams(members: Vec<String>, team_count: usize) -> Result<JsValue, JsValue> {
        let mut rng = WasmRng::new();
        let teams = toolkit::split_teams(&members, team_count, &mut rng).map_err(js_err)?;
        Ok(serde_wasm_bindgen::to_value(&teams).unwrap())
    }

    /// Deterministic fortune for a `(date, nickname)` pair.
    /// Returns `{levelIndex, aspectScores, luckyNumber, colorIndex}`.
    #[wasm_bindgen(js_name = "dailyFortune")]
    pub fn wasm_daily_fortune(
        date_key: &str,
        nickname: &str,
        level_count: usize,
        aspect_count: usize,
        color_count: usize,
    ) -> JsValue {
        let fortune =
            toolkit::daily_fortune(date_key, nickname, level_count, aspect_count, color_count);
        serde_wasm_bindgen::to_value(&fortune).unwrap()
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM randomkit ready".to_string()
    }
}
