use std::error::Error;
use std::fs;
use std::path::Path;

use csvqr_model::BlockIds;
use csvqr_view::{LayoutConfig, RegionIds};
use serde::Deserialize;

/// Timer settings, all in milliseconds.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub poll_interval_ms: u64,
    pub poll_max_attempts: u32,
    pub resize_debounce_ms: u64,
    /// Delay standing in for "next animation frame".
    pub frame_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 80,
            poll_max_attempts: 40,
            resize_debounce_ms: 120,
            frame_ms: 16,
        }
    }
}

// Top-level dashboard config file; every section is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashConfig {
    pub timing: TimingConfig,
    pub layout: LayoutConfig,
    pub regions: RegionIds,
    pub blocks: BlockIds,
}

impl DashConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(s)?)
    }
}

pub fn load_config_from_path(path: &Path) -> Result<DashConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    DashConfig::from_toml_str(&s)
}
