//! Saturation of velocity targets to the robot's actuation envelope.

use serde::Deserialize;

use crate::types::ControlCommand;

/// Declared actuation limits of the base.
///
/// The clamp is one-sided: values are capped from above, negative commands
/// pass through unchanged.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct VelocityLimits {
    /// Linear velocity cap in m/s (default: 0.22)
    #[serde(default = "default_max_linear")]
    pub max_linear_vel: f32,

    /// Angular velocity cap in rad/s (default: 2.84)
    #[serde(default = "default_max_angular")]
    pub max_angular_vel: f32,
}

fn default_max_linear() -> f32 {
    0.22
}
fn default_max_angular() -> f32 {
    2.84
}

impl Default for VelocityLimits {
    fn default() -> Self {
        Self {
            max_linear_vel: default_max_linear(),
            max_angular_vel: default_max_angular(),
        }
    }
}

impl VelocityLimits {
    /// Saturate a raw command to the actuation envelope.
    pub fn clamp(&self, command: ControlCommand) -> ControlCommand {
        ControlCommand {
            linear: command.linear.min(self.max_linear_vel),
            angular: command.angular.min(self.max_angular_vel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caps_from_above() {
        let limits = VelocityLimits::default();
        let cmd = limits.clamp(ControlCommand::new(0.5, 10.0));

        assert_eq!(cmd.linear, 0.22);
        assert_eq!(cmd.angular, 2.84);
    }

    #[test]
    fn test_in_range_passes_through() {
        let limits = VelocityLimits::default();
        let cmd = limits.clamp(ControlCommand::new(0.22, 1.5));

        assert_eq!(cmd.linear, 0.22);
        assert_eq!(cmd.angular, 1.5);
    }

    #[test]
    fn test_negative_passes_through() {
        let limits = VelocityLimits::default();
        let cmd = limits.clamp(ControlCommand::new(-0.3, -100.0));

        assert_eq!(cmd.linear, -0.3);
        assert_eq!(cmd.angular, -100.0);
    }
}
