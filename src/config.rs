// Configuration module for reading Snake.toml
// All tunable parameters for the decision engine live here so behavior can be
// adjusted between games without recompiling

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub policy: PolicyConfig,
    pub appearance: AppearanceConfig,
    pub debug: DebugConfig,
}

/// Timing and response-budget constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
    pub polling_interval_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Decision policy constants
#[derive(Debug, Deserialize, Clone)]
pub struct PolicyConfig {
    /// Length lead (own minus rival) at which the bot switches from
    /// food-seeking to intercepting the rival's head
    pub length_advantage: i32,
    /// Baseline traversal cost of an open cell
    pub base_cell_cost: u32,
    /// Extra cost added to open non-border cells, biasing paths toward the
    /// perimeter as a tie-breaker
    pub interior_cost_bias: u32,
    /// Traversal cost of a cell adjacent to the rival's head
    pub danger_cost: u32,
}

/// Fields returned by the info handshake
#[derive(Debug, Deserialize, Clone)]
pub struct AppearanceConfig {
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 50,
                polling_interval_ms: 10,
            },
            policy: PolicyConfig {
                length_advantage: 1,
                base_cell_cost: 1,
                interior_cost_bias: 1,
                danger_cost: 8,
            },
            appearance: AppearanceConfig {
                author: "pathbound".to_string(),
                color: "#FF0000".to_string(),
                head: "default".to_string(),
                tail: "default".to_string(),
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "pathbound_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Could not load Snake.toml ({}), using hardcoded defaults", e);
                Self::default_hardcoded()
            })
    }
}
