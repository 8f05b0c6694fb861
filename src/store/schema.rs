use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::session::algorithm::Algorithm;

const SCHEMA_VERSION: u32 = 1;

/// Rolling history length per algorithm.
pub const HISTORY_CAP: usize = 100;
/// Window for the rolling average.
pub const AVERAGE_WINDOW: usize = 5;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LibraryData {
    pub schema_version: u32,
    pub algorithms: Vec<Algorithm>,
}

impl Default for LibraryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            algorithms: Vec::new(),
        }
    }
}

impl LibraryData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// A small seed library for first launch.
    pub fn starter() -> Self {
        let cases: &[(&str, &str, &str)] = &[
            ("Sune", "OLL", "R U R' U R U2 R'"),
            ("Anti-Sune", "OLL", "R U2 R' U' R U' R'"),
            ("T", "PLL", "R U R' U' R' F R2 U' R' U' R U R' F'"),
            ("Ua", "PLL", "M2 U M U2 M' U M2"),
            ("H", "PLL", "M2 U M2 U2 M2 U M2"),
            ("Sexy Move", "Basics", "R U R' U'"),
        ];
        let mut algorithms = Vec::new();
        for (name, category, moves) in cases {
            if let Ok(Some(alg)) = Algorithm::from_input(name, category, moves) {
                algorithms.push(alg);
            }
        }
        Self {
            schema_version: SCHEMA_VERSION,
            algorithms,
        }
    }

    /// Re-parse every display string after deserialization, dropping
    /// entries that no longer parse.
    pub fn rehydrate(&mut self) {
        self.algorithms.retain_mut(|alg| alg.rehydrate().is_ok());
    }

    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for alg in &self.algorithms {
            if !out.contains(&alg.category) {
                out.push(alg.category.clone());
            }
        }
        out
    }
}

/// Per-algorithm solve history, keyed by the algorithm's stats key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimingData {
    pub schema_version: u32,
    pub records: HashMap<String, TimingRecord>,
}

impl Default for TimingData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            records: HashMap::new(),
        }
    }
}

impl TimingData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn record_mut(&mut self, key: &str) -> &mut TimingRecord {
        self.records.entry(key.to_string()).or_default()
    }

    pub fn best_times(&self) -> HashMap<String, u64> {
        self.records
            .iter()
            .filter_map(|(k, r)| r.best_ms.map(|ms| (k.clone(), ms)))
            .collect()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimingRecord {
    pub times_ms: Vec<u64>,
    pub best_ms: Option<u64>,
    pub successes: u32,
    pub failures: u32,
}

impl TimingRecord {
    /// Append a completed solve. History is capped with the oldest entry
    /// dropped first; the best only improves on a strictly lower time.
    pub fn record_time(&mut self, ms: u64) {
        if ms == 0 {
            return;
        }
        self.times_ms.push(ms);
        if self.times_ms.len() > HISTORY_CAP {
            self.times_ms.remove(0);
        }
        if self.best_ms.is_none_or(|best| ms < best) {
            self.best_ms = Some(ms);
        }
        self.successes += 1;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    /// Mean of the most recent solves, up to the window size.
    pub fn rolling_average_ms(&self) -> Option<u64> {
        if self.times_ms.is_empty() {
            return None;
        }
        let window = self.times_ms.len().min(AVERAGE_WINDOW);
        let recent = &self.times_ms[self.times_ms.len() - window..];
        Some(recent.iter().sum::<u64>() / window as u64)
    }

    pub fn attempts(&self) -> u32 {
        self.successes + self.failures
    }

    pub fn success_rate(&self) -> f64 {
        if self.attempts() == 0 {
            return 0.0;
        }
        f64::from(self.successes) / f64::from(self.attempts()) * 100.0
    }
}

pub const EXPORT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub cubedex_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub config: Config,
    pub library: LibraryData,
    pub timing: TimingData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_caps_at_limit_dropping_oldest() {
        let mut record = TimingRecord::default();
        for i in 1..=(HISTORY_CAP as u64 + 1) {
            record.record_time(i * 10);
        }
        assert_eq!(record.times_ms.len(), HISTORY_CAP);
        assert_eq!(record.times_ms[0], 20);
        assert_eq!(*record.times_ms.last().unwrap(), (HISTORY_CAP as u64 + 1) * 10);
    }

    #[test]
    fn best_only_improves_on_strictly_lower() {
        let mut record = TimingRecord::default();
        record.record_time(1200);
        assert_eq!(record.best_ms, Some(1200));
        record.record_time(1200);
        assert_eq!(record.best_ms, Some(1200));
        record.record_time(1500);
        assert_eq!(record.best_ms, Some(1200));
        record.record_time(900);
        assert_eq!(record.best_ms, Some(900));
    }

    #[test]
    fn zero_duration_is_ignored() {
        let mut record = TimingRecord::default();
        record.record_time(0);
        assert!(record.times_ms.is_empty());
        assert_eq!(record.best_ms, None);
        assert_eq!(record.successes, 0);
    }

    #[test]
    fn rolling_average_uses_recent_window() {
        let mut record = TimingRecord::default();
        for ms in [5000, 5000, 1000, 1000, 1000, 1000, 1000] {
            record.record_time(ms);
        }
        assert_eq!(record.rolling_average_ms(), Some(1000));

        let mut short = TimingRecord::default();
        short.record_time(400);
        short.record_time(600);
        assert_eq!(short.rolling_average_ms(), Some(500));
        assert_eq!(TimingRecord::default().rolling_average_ms(), None);
    }

    #[test]
    fn success_rate_counts_both_outcomes() {
        let mut record = TimingRecord::default();
        record.record_time(800);
        record.record_time(700);
        record.record_failure();
        assert_eq!(record.attempts(), 3);
        assert!((record.success_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn starter_library_parses() {
        let library = LibraryData::starter();
        assert!(!library.algorithms.is_empty());
        for alg in &library.algorithms {
            assert!(!alg.moves.is_empty());
        }
        assert!(library.categories().contains(&"PLL".to_string()));
    }
}
