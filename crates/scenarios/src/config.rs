//! Detector configuration with configurable thresholds
//!
//! All detection windows and distances are configurable via file, not
//! hardcoded, so thresholds can be tuned without recompilation.

use serde::{Deserialize, Serialize};

/// Configuration for the built-in scenario detectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Max seconds between opposing trades to count as a wash pair
    #[serde(default = "default_wash_window_secs")]
    pub wash_window_secs: i64,

    /// Max seconds between an employee trade and the client trade it ran
    /// ahead of
    #[serde(default = "default_front_run_window_secs")]
    pub front_run_window_secs: i64,

    /// Max screening-path distance at which a severe node flags a transfer
    #[serde(default = "default_mixer_max_distance")]
    pub mixer_max_distance: u32,
}

// Default value functions for serde
fn default_wash_window_secs() -> i64 {
    300 // 5 minutes
}

fn default_front_run_window_secs() -> i64 {
    120 // 2 minutes
}

fn default_mixer_max_distance() -> u32 {
    2
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            wash_window_secs: default_wash_window_secs(),
            front_run_window_secs: default_front_run_window_secs(),
            mixer_max_distance: default_mixer_max_distance(),
        }
    }
}

impl DetectorConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Wash window as a chrono Duration
    pub fn wash_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.wash_window_secs)
    }

    /// Front-run window as a chrono Duration
    pub fn front_run_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.front_run_window_secs)
    }
}
