//! RakshaNav - Reactive Obstacle Avoidance for VacuumTiger-class robots
//!
//! A closed-loop controller that keeps a differential-drive robot clear of
//! obstacles using 360° lidar ranging, producing velocity commands at a
//! fixed control rate. The robot has no goal pose; it reacts purely to
//! instantaneous local clearance.
//!
//! ## Pipeline
//!
//! ```text
//! SensorFeed ──► latest-scan buffer ──► RangePreprocessor
//!                                            │ ClearanceSnapshot
//!                                            ▼
//!                       PID channels ◄── AvoidancePolicy
//!                                            │ raw command
//!                                            ▼
//!                     CommandSink ◄──── VelocityLimits
//! ```
//!
//! ## Threads
//!
//! Two threads share the latest-scan buffer (mutex-guarded, whole-scan
//! replace):
//!
//! - **Sensor thread**: polls the `SensorFeed`, stores each arriving scan
//! - **Control thread**: one avoidance cycle per tick (preprocess, decide,
//!   clamp, emit), logically serial
//!
//! The decision policy selects one of three driving tiers from the sector
//! clearances: crawl-and-turn when an oblique sector is nearly blocked,
//! PID-governed speed when an obstacle is within caution range, and a fixed
//! cruise otherwise.

pub mod config;
pub mod control;
pub mod error;
pub mod io;
pub mod sectors;
pub mod shared;
pub mod threads;
pub mod types;

// Re-export commonly used types
pub use config::RakshaConfig;
pub use control::{
    AvoidanceController, AvoidancePolicy, CycleOutput, DecisionTier, PidConfig, PidController,
    PolicyConfig, VelocityLimits,
};
pub use error::{RakshaError, Result};
pub use io::{CommandSink, SensorFeed};
pub use sectors::{ClearanceSnapshot, RangePreprocessor, SectorConfig};
pub use shared::SharedState;
pub use threads::spawn_threads;
pub use types::{ControlCommand, RangeScan};
