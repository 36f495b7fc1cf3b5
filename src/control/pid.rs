//! Discrete PID controller with a bounded error-history window.
//!
//! The integral term is the running sum of the last `window` errors, kept in
//! a fixed-capacity ring buffer. Once the buffer is full the oldest error is
//! subtracted out, so a persistent offset can never wind the integral up
//! without bound.

use std::collections::VecDeque;

use serde::Deserialize;

/// PID gains and anti-windup window size for one control channel.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PidConfig {
    /// Proportional gain
    pub kp: f32,
    /// Integral gain
    pub ki: f32,
    /// Derivative gain
    pub kd: f32,
    /// Maximum number of retained error samples
    pub window: usize,
}

/// Proportional-integral-derivative controller.
///
/// Each channel (lateral, longitudinal) owns its own instance; state is never
/// shared between channels.
#[derive(Debug)]
pub struct PidController {
    config: PidConfig,
    /// Last `window` errors, oldest first
    history: VecDeque<f32>,
    /// Running sum of the errors currently in `history`
    integral: f32,
    prev_error: f32,
    prev_time: f64,
}

impl PidController {
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            history: VecDeque::with_capacity(config.window + 1),
            integral: 0.0,
            prev_error: 0.0,
            prev_time: 0.0,
        }
    }

    /// Compute the control output for an instantaneous error at `timestamp`
    /// (monotonic seconds).
    ///
    /// Returns `None` without mutating any state when the timestamp has not
    /// advanced (first call, duplicate or out-of-order stamp). Callers must
    /// treat that as "hold the previous output", not as zero.
    pub fn control(&mut self, error: f32, timestamp: f64) -> Option<f32> {
        let dt = (timestamp - self.prev_time) as f32;
        if dt <= 0.0 {
            return None;
        }

        self.history.push_back(error);
        self.integral += error;
        if self.history.len() > self.config.window {
            if let Some(oldest) = self.history.pop_front() {
                self.integral -= oldest;
            }
        }

        let derivative = (error - self.prev_error) / dt;
        let output =
            self.config.kp * error + self.config.ki * self.integral * dt + self.config.kd * derivative;

        self.prev_error = error;
        self.prev_time = timestamp;

        Some(output)
    }

    /// Return the controller to its freshly-constructed state.
    pub fn reset(&mut self) {
        self.history.clear();
        self.integral = 0.0;
        self.prev_error = 0.0;
        self.prev_time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_config() -> PidConfig {
        PidConfig {
            kp: 0.22,
            ki: 0.01,
            kd: 0.3,
            window: 10,
        }
    }

    #[test]
    fn test_first_call_at_time_zero_is_noop() {
        let mut pid = PidController::new(test_config());
        assert!(pid.control(1.0, 0.0).is_none());
        assert!(pid.history.is_empty());
        assert_eq!(pid.integral, 0.0);
    }

    #[test]
    fn test_non_advancing_timestamp_is_noop() {
        let mut pid = PidController::new(test_config());
        let first = pid.control(1.0, 0.1).unwrap();

        assert!(pid.control(2.0, 0.1).is_none());
        assert!(pid.control(2.0, 0.05).is_none());

        // State must be exactly as it was after the first accepted call
        assert_eq!(pid.history.len(), 1);
        assert_eq!(pid.integral, 1.0);
        assert_eq!(pid.prev_error, 1.0);
        assert_eq!(pid.prev_time, 0.1);

        // Advancing again picks up where we left off
        let resumed = pid.control(1.0, 0.2).unwrap();
        assert!(first.is_finite() && resumed.is_finite());
    }

    #[test]
    fn test_output_formula() {
        let mut pid = PidController::new(test_config());
        pid.control(1.0, 0.1).unwrap();
        let out = pid.control(2.0, 0.2).unwrap();

        // kp*e + ki*sum*dt + kd*(e - prev_e)/dt with sum = 1 + 2, dt = 0.1
        let expected = 0.22 * 2.0 + 0.01 * 3.0 * 0.1 + 0.3 * (2.0 - 1.0) / 0.1;
        assert_relative_eq!(out, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_anti_windup_bounds_integral() {
        let mut pid = PidController::new(test_config());
        let e = 2.5;

        for i in 1..=50 {
            pid.control(e, i as f64 * 0.1).unwrap();
        }

        // Integral reflects exactly the last `window` samples, never more
        assert_eq!(pid.history.len(), 10);
        assert_relative_eq!(pid.integral, 10.0 * e, epsilon = 1e-4);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut pid = PidController::new(test_config());
        pid.control(1.0, 0.1).unwrap();
        pid.control(2.0, 0.2).unwrap();

        pid.reset();

        assert!(pid.history.is_empty());
        assert_eq!(pid.integral, 0.0);
        assert_eq!(pid.prev_time, 0.0);
        // After reset the controller behaves like a fresh one
        assert!(pid.control(1.0, 0.0).is_none());
        assert!(pid.control(1.0, 0.1).is_some());
    }
}
