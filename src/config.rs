//! Configuration loading for RakshaNav

use std::path::Path;

use serde::Deserialize;

use crate::control::limits::VelocityLimits;
use crate::control::pid::PidConfig;
use crate::control::policy::PolicyConfig;
use crate::error::Result;
use crate::io::sim::SimConfig;
use crate::sectors::SectorConfig;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct RakshaConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub sectors: SectorConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub pid: PidChannels,
    #[serde(default)]
    pub limits: VelocityLimits,
    #[serde(default)]
    pub control: ControlLoopConfig,
    #[serde(default)]
    pub sim: SimConfig,
}

/// Range scan contract
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ScanConfig {
    /// Samples per full rotation (default: 360)
    #[serde(default = "default_scan_size")]
    pub size: usize,

    /// Maximum usable range in meters; longer or non-returning samples are
    /// clamped to this (default: 3.5)
    #[serde(default = "default_max_range")]
    pub max_range: f32,
}

/// Gains for the two independent control channels
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PidChannels {
    /// Steering channel (default: kP 0.22, kI 0.01, kD 0.3, window 10)
    #[serde(default = "default_lateral")]
    pub lateral: PidConfig,

    /// Speed channel (default: kP 0.11, kI 0.001, kD 0.01, window 10)
    #[serde(default = "default_longitudinal")]
    pub longitudinal: PidConfig,
}

/// Control loop timing
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ControlLoopConfig {
    /// Tick period in milliseconds (default: 1)
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,

    /// Wall-clock delay after loop start before any control output, to let
    /// sensors and actuators settle (default: 4.0 s)
    #[serde(default = "default_startup_delay")]
    pub startup_delay_secs: f32,

    /// Interval between periodic status log lines (default: 3.0 s)
    #[serde(default = "default_status_interval")]
    pub status_interval_secs: f32,
}

// Default value functions
fn default_scan_size() -> usize {
    360
}
fn default_max_range() -> f32 {
    3.5
}
fn default_lateral() -> PidConfig {
    PidConfig {
        kp: 0.22,
        ki: 0.01,
        kd: 0.3,
        window: 10,
    }
}
fn default_longitudinal() -> PidConfig {
    PidConfig {
        kp: 0.11,
        ki: 0.001,
        kd: 0.01,
        window: 10,
    }
}
fn default_tick_period_ms() -> u64 {
    1
}
fn default_startup_delay() -> f32 {
    4.0
}
fn default_status_interval() -> f32 {
    3.0
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            size: default_scan_size(),
            max_range: default_max_range(),
        }
    }
}

impl Default for PidChannels {
    fn default() -> Self {
        Self {
            lateral: default_lateral(),
            longitudinal: default_longitudinal(),
        }
    }
}

impl Default for ControlLoopConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: default_tick_period_ms(),
            startup_delay_secs: default_startup_delay(),
            status_interval_secs: default_status_interval(),
        }
    }
}

impl Default for RakshaConfig {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            sectors: SectorConfig::default(),
            policy: PolicyConfig::default(),
            pid: PidChannels::default(),
            limits: VelocityLimits::default(),
            control: ControlLoopConfig::default(),
            sim: SimConfig::default(),
        }
    }
}

impl RakshaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RakshaConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
