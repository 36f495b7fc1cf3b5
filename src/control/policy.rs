//! Tiered avoidance policy: clearance snapshot in, raw velocity targets out.
//!
//! Three mutually exclusive driving regimes selected by obstacle proximity,
//! in precedence order:
//! - CollisionImminent: crawl forward, steer hard away from the near side
//! - Caution: both channels under PID control
//! - Clear: cruise forward, steer gently to balance side clearance

use serde::Deserialize;

use crate::control::pid::{PidConfig, PidController};
use crate::sectors::ClearanceSnapshot;
use crate::types::ControlCommand;

/// Proximity thresholds and fixed velocities of the tier policy.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PolicyConfig {
    /// Oblique clearance below this selects CollisionImminent (default: 0.5 m)
    #[serde(default = "default_collision_threshold")]
    pub collision_threshold: f32,

    /// Oblique clearance below this (and above the collision threshold)
    /// selects Caution (default: 1.0 m)
    #[serde(default = "default_caution_threshold")]
    pub caution_threshold: f32,

    /// Fixed linear velocity while CollisionImminent (default: 0.005 m/s)
    #[serde(default = "default_crawl_linear_vel")]
    pub crawl_linear_vel: f32,

    /// Fixed linear velocity while Clear (default: 0.2 m/s)
    #[serde(default = "default_cruise_linear_vel")]
    pub cruise_linear_vel: f32,

    /// Steering error amplification while CollisionImminent (default: 16)
    #[serde(default = "default_collision_error_scale")]
    pub collision_error_scale: f32,
}

fn default_collision_threshold() -> f32 {
    0.5
}
fn default_caution_threshold() -> f32 {
    1.0
}
fn default_crawl_linear_vel() -> f32 {
    0.005
}
fn default_cruise_linear_vel() -> f32 {
    0.2
}
fn default_collision_error_scale() -> f32 {
    16.0
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            collision_threshold: default_collision_threshold(),
            caution_threshold: default_caution_threshold(),
            crawl_linear_vel: default_crawl_linear_vel(),
            cruise_linear_vel: default_cruise_linear_vel(),
            collision_error_scale: default_collision_error_scale(),
        }
    }
}

/// Driving regime for one control cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionTier {
    CollisionImminent,
    Caution,
    Clear,
}

impl DecisionTier {
    /// Select the tier for a clearance snapshot.
    ///
    /// Pure function of the snapshot and thresholds; evaluation order is the
    /// tier precedence.
    pub fn classify(clearance: &ClearanceSnapshot, config: &PolicyConfig) -> Self {
        let collides = |d: f32| d < config.collision_threshold;
        let cautious = |d: f32| (config.collision_threshold..config.caution_threshold).contains(&d);

        if collides(clearance.oblique_left) || collides(clearance.oblique_right) {
            DecisionTier::CollisionImminent
        } else if cautious(clearance.oblique_left) || cautious(clearance.oblique_right) {
            DecisionTier::Caution
        } else {
            DecisionTier::Clear
        }
    }
}

/// Tiered decision policy with one PID controller per velocity channel.
///
/// The controllers are agnostic to which tier invoked them; error scaling is
/// policy, not controller state.
pub struct AvoidancePolicy {
    config: PolicyConfig,
    /// Steering channel (angular velocity)
    lateral: PidController,
    /// Speed channel (linear velocity)
    longitudinal: PidController,
    last_linear: f32,
    last_angular: f32,
}

impl AvoidancePolicy {
    pub fn new(config: PolicyConfig, lateral: PidConfig, longitudinal: PidConfig) -> Self {
        Self {
            config,
            lateral: PidController::new(lateral),
            longitudinal: PidController::new(longitudinal),
            last_linear: 0.0,
            last_angular: 0.0,
        }
    }

    /// Compute the raw (pre-saturation) velocity targets for one cycle.
    ///
    /// Both PID channels see the same `timestamp`. If a PID call is a no-op
    /// (non-advancing timestamp) the previous cycle's output for that channel
    /// is carried forward rather than commanding zero.
    pub fn decide(
        &mut self,
        clearance: &ClearanceSnapshot,
        timestamp: f64,
    ) -> (DecisionTier, ControlCommand) {
        let tier = DecisionTier::classify(clearance, &self.config);
        let steer_error = clearance.left - clearance.right;

        let (linear, angular) = match tier {
            DecisionTier::CollisionImminent => {
                let scaled = self.config.collision_error_scale * steer_error;
                let angular = self
                    .lateral
                    .control(scaled, timestamp)
                    .unwrap_or(self.last_angular);
                (self.config.crawl_linear_vel, angular)
            }
            DecisionTier::Caution => {
                let linear = self
                    .longitudinal
                    .control(clearance.front, timestamp)
                    .unwrap_or(self.last_linear);
                let angular = self
                    .lateral
                    .control(steer_error, timestamp)
                    .unwrap_or(self.last_angular);
                (linear, angular)
            }
            DecisionTier::Clear => {
                let angular = self
                    .lateral
                    .control(steer_error, timestamp)
                    .unwrap_or(self.last_angular);
                (self.config.cruise_linear_vel, angular)
            }
        };

        self.last_linear = linear;
        self.last_angular = angular;

        (tier, ControlCommand::new(linear, angular))
    }
}
