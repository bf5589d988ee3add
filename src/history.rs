//! Bounded draw history, newest first.
//!
//! Mirrors the record shape the browser app persists to localStorage
//! (`{id, type, result, detail, timestamp}`). The log caps at
//! `HISTORY_CAP` entries with FIFO eviction of the oldest. Codecs are
//! lenient: malformed persisted JSON becomes an empty log, never an error.

use serde::{Deserialize, Serialize};

use crate::rng::WasmRng;

/// Maximum number of retained records.
pub const HISTORY_CAP: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    /// Which feature produced the record ("lottery", "dice", ...). The field
    /// is `type` in the persisted JSON.
    #[serde(rename = "type")]
    pub kind: String,
    pub result: String,
    pub detail: String,
    /// Milliseconds since the Unix epoch, supplied by the host clock.
    pub timestamp: u64,
}

/// Append-at-front record log with a hard cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    records: Vec<HistoryRecord>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the front, evicting the oldest past the cap.
    /// The id combines the host timestamp with a random suffix.
    pub fn add(
        &mut self,
        kind: impl Into<String>,
        result: impl Into<String>,
        detail: impl Into<String>,
        now_ms: u64,
        rng: &mut WasmRng,
    ) -> &HistoryRecord {
        let record = HistoryRecord {
            id: format!("{}-{:012x}", now_ms, rng.next_u64() & 0xFFFF_FFFF_FFFF),
            kind: kind.into(),
            result: result.into(),
            detail: detail.into(),
            timestamp: now_ms,
        };
        self.records.insert(0, record);
        self.records.truncate(HISTORY_CAP);
        &self.records[0]
    }

    /// Records newest first.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Lenient decode: garbage in, empty log out. Oversized persisted logs
    /// are trimmed back to the cap.
    pub fn from_json(data: &str) -> HistoryLog {
        match serde_json::from_str::<HistoryLog>(data) {
            Ok(mut log) => {
                log.records.truncate(HISTORY_CAP);
                log
            }
            Err(err) => {
                log::warn!("discarding malformed history log: {err}");
                HistoryLog::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_puts_newest_first() {
        let mut rng = WasmRng::from_seed(1);
        let mut log = HistoryLog::new();
        log.add("dice", "3", "1 die", 1000, &mut rng);
        log.add("coin", "heads", "", 2000, &mut rng);
        assert_eq!(log.records()[0].kind, "coin");
        assert_eq!(log.records()[1].kind, "dice");
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut rng = WasmRng::from_seed(2);
        let mut log = HistoryLog::new();
        for i in 0..(HISTORY_CAP as u64 + 50) {
            log.add("number", i.to_string(), "", i, &mut rng);
        }
        assert_eq!(log.len(), HISTORY_CAP);
        // The 50 oldest entries (timestamps 0..49) are gone.
        assert!(log.records().iter().all(|r| r.timestamp >= 50));
        assert_eq!(log.records()[0].timestamp, HISTORY_CAP as u64 + 49);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut rng = WasmRng::from_seed(3);
        let mut log = HistoryLog::new();
        for _ in 0..100 {
            log.add("coin", "tails", "", 777, &mut rng);
        }
        let mut ids: Vec<&str> = log.records().iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut rng = WasmRng::from_seed(4);
        let mut log = HistoryLog::new();
        log.add("lottery", "alice", "participants: 5", 123_456, &mut rng);
        let decoded = HistoryLog::from_json(&log.to_json());
        assert_eq!(decoded, log);
    }

    #[test]
    fn test_persisted_field_names_match_app_shape() {
        let mut rng = WasmRng::from_seed(5);
        let mut log = HistoryLog::new();
        log.add("coin", "heads", "", 9, &mut rng);
        let json = log.to_json();
        assert!(json.contains("\"type\":\"coin\""));
        assert!(json.contains("\"timestamp\":9"));
    }

    #[test]
    fn test_malformed_json_recovers_to_empty() {
        assert!(HistoryLog::from_json("{oops").is_empty());
        assert!(HistoryLog::from_json("{\"not\": \"a list\"}").is_empty());
        assert!(HistoryLog::from_json("[{\"id\": 7}]").is_empty());
    }

    #[test]
    fn test_clear() {
        let mut rng = WasmRng::from_seed(6);
        let mut log = HistoryLog::new();
        log.add("dice", "6", "", 1, &mut rng);
        log.clear();
        assert!(log.is_empty());
    }
}
