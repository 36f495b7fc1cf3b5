//! Transport boundary: scan sources and command consumers.
//!
//! The control core is transport-agnostic. Anything that can hand over
//! full-circle scans implements [`SensorFeed`]; anything that can accept
//! velocity commands implements [`CommandSink`]. The node ships with a
//! hardware-free simulated pair (see [`sim`]) so it can run and be tested
//! without a robot.

pub mod sim;

use crate::error::Result;
use crate::types::{ControlCommand, RangeScan};

/// Source of range scans.
///
/// Delivery cadence is independent of the control tick and not guaranteed to
/// be periodic; `poll` returns `Ok(None)` when no new scan is available yet.
pub trait SensorFeed {
    fn poll(&mut self) -> Result<Option<RangeScan>>;
}

/// Consumer of velocity commands.
///
/// Must tolerate commands at up to the control tick frequency, including
/// repeats of the same command when the policy held a previous value.
pub trait CommandSink {
    fn send(&mut self, command: ControlCommand) -> Result<()>;
}

