//! One-cycle control pipeline: preprocess → decide → clamp.

use crate::config::RakshaConfig;
use crate::control::limits::VelocityLimits;
use crate::control::policy::{AvoidancePolicy, DecisionTier};
use crate::error::Result;
use crate::sectors::{ClearanceSnapshot, RangePreprocessor};
use crate::types::{ControlCommand, RangeScan};

/// Everything one control cycle produced.
#[derive(Clone, Copy, Debug)]
pub struct CycleOutput {
    /// Saturated command, ready for the sink
    pub command: ControlCommand,
    /// Driving regime the policy selected
    pub tier: DecisionTier,
    /// Sector clearances the decision was based on
    pub clearance: ClearanceSnapshot,
}

/// The full avoidance pipeline, independent of timers and transport.
///
/// The caller supplies the scan and the cycle timestamp, which makes the
/// controller directly drivable from tests and keeps the thread wrapper
/// thin.
pub struct AvoidanceController {
    preprocessor: RangePreprocessor,
    policy: AvoidancePolicy,
    limits: VelocityLimits,
    last_command: Option<ControlCommand>,
}

impl AvoidanceController {
    pub fn new(
        preprocessor: RangePreprocessor,
        policy: AvoidancePolicy,
        limits: VelocityLimits,
    ) -> Self {
        Self {
            preprocessor,
            policy,
            limits,
            last_command: None,
        }
    }

    /// Assemble the pipeline from node configuration.
    pub fn from_config(config: &RakshaConfig) -> Result<Self> {
        let preprocessor = RangePreprocessor::new(&config.sectors, config.scan.size)?;
        let policy = AvoidancePolicy::new(
            config.policy,
            config.pid.lateral,
            config.pid.longitudinal,
        );
        Ok(Self::new(preprocessor, policy, config.limits))
    }

    /// Run one control cycle against the given scan.
    ///
    /// Fails only on a scan contract violation (`InvalidScan`); in that case
    /// no command is produced and [`AvoidanceController::last_command`] still
    /// holds the previous cycle's command.
    pub fn step(&mut self, scan: &RangeScan, timestamp: f64) -> Result<CycleOutput> {
        let clearance = self.preprocessor.preprocess(scan)?;
        let (tier, raw) = self.policy.decide(&clearance, timestamp);
        let command = self.limits.clamp(raw);
        self.last_command = Some(command);

        Ok(CycleOutput {
            command,
            tier,
            clearance,
        })
    }

    /// The last command emitted, if any cycle has completed.
    pub fn last_command(&self) -> Option<ControlCommand> {
        self.last_command
    }
}
