//! Simulated lidar and drive for hardware-free operation.
//!
//! Models a differential-drive robot in an empty rectangular room. The
//! simulated lidar ray-casts against the walls from the robot's current
//! pose; the simulated drive integrates velocity commands back into that
//! pose. Wiring both to the same [`SimWorld`] closes the loop, so the node
//! can be exercised end to end without a robot.

use std::f32::consts::TAU;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

use crate::config::ScanConfig;
use crate::error::{RakshaError, Result};
use crate::io::{CommandSink, SensorFeed};
use crate::types::{ControlCommand, RangeScan};

/// Simulation parameters.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct SimConfig {
    /// Room extent along x in meters (default: 6.0)
    #[serde(default = "default_room_width")]
    pub room_width: f32,

    /// Room extent along y in meters (default: 4.0)
    #[serde(default = "default_room_height")]
    pub room_height: f32,

    /// Scan production rate in Hz (default: 10.0)
    #[serde(default = "default_scan_rate")]
    pub scan_rate_hz: f32,

    /// Standard deviation of Gaussian range noise in meters; 0 disables
    /// noise (default: 0.005)
    #[serde(default = "default_noise_std")]
    pub noise_std: f32,
}

fn default_room_width() -> f32 {
    6.0
}
fn default_room_height() -> f32 {
    4.0
}
fn default_scan_rate() -> f32 {
    10.0
}
fn default_noise_std() -> f32 {
    0.005
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            room_width: default_room_width(),
            room_height: default_room_height(),
            scan_rate_hz: default_scan_rate(),
            noise_std: default_noise_std(),
        }
    }
}

/// Robot pose and room geometry shared by the simulated feed and drive.
#[derive(Debug)]
pub struct SimWorld {
    half_width: f32,
    half_height: f32,
    /// Robot pose: position in meters, heading in radians (0 = +x)
    x: f32,
    y: f32,
    theta: f32,
}

impl SimWorld {
    /// Create a world with the robot at the room center, facing +x.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            half_width: config.room_width / 2.0,
            half_height: config.room_height / 2.0,
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }

    /// Shared handle for wiring a feed and a drive to the same world.
    pub fn shared(config: &SimConfig) -> Arc<Mutex<SimWorld>> {
        Arc::new(Mutex::new(Self::new(config)))
    }

    /// Current robot pose `(x, y, theta)`.
    pub fn pose(&self) -> (f32, f32, f32) {
        (self.x, self.y, self.theta)
    }

    /// Distance from the robot to the nearest wall along a world-frame ray.
    fn wall_distance(&self, angle: f32) -> f32 {
        let (sin_a, cos_a) = angle.sin_cos();

        let tx = if cos_a.abs() > 1e-6 {
            let wall = if cos_a > 0.0 {
                self.half_width
            } else {
                -self.half_width
            };
            (wall - self.x) / cos_a
        } else {
            f32::INFINITY
        };

        let ty = if sin_a.abs() > 1e-6 {
            let wall = if sin_a > 0.0 {
                self.half_height
            } else {
                -self.half_height
            };
            (wall - self.y) / sin_a
        } else {
            f32::INFINITY
        };

        tx.min(ty)
    }

    /// Produce a raw full-circle scan from the current pose.
    ///
    /// Sample 0 looks along the robot's heading; indices increase
    /// counter-clockwise. Noise can push a short return below zero, which a
    /// real sensor never reports, so samples are floored at zero here.
    fn scan(&self, size: usize, noise: Option<&Normal<f32>>, rng: &mut StdRng) -> Vec<f32> {
        let increment = TAU / size as f32;
        (0..size)
            .map(|i| {
                let mut d = self.wall_distance(self.theta + i as f32 * increment);
                if let Some(dist) = noise {
                    d += dist.sample(rng);
                }
                d.max(0.0)
            })
            .collect()
    }

    /// Integrate a velocity command over `dt` seconds.
    ///
    /// Position is confined to the room so a runaway command parks the robot
    /// against a wall instead of teleporting it outside.
    fn apply_command(&mut self, command: ControlCommand, dt: f32) {
        let mid_theta = self.theta + command.angular * dt / 2.0;
        self.x += command.linear * mid_theta.cos() * dt;
        self.y += command.linear * mid_theta.sin() * dt;
        self.theta += command.angular * dt;

        let margin = 0.05;
        self.x = self.x.clamp(-self.half_width + margin, self.half_width - margin);
        self.y = self
            .y
            .clamp(-self.half_height + margin, self.half_height - margin);
    }
}

fn lock_world(world: &Arc<Mutex<SimWorld>>) -> MutexGuard<'_, SimWorld> {
    world.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Simulated 360° lidar ray-casting against the room walls.
pub struct SimulatedLidar {
    world: Arc<Mutex<SimWorld>>,
    scan_size: usize,
    max_range: f32,
    interval: Duration,
    noise: Option<Normal<f32>>,
    rng: StdRng,
    epoch: Instant,
    last_scan: Option<Instant>,
}

impl SimulatedLidar {
    pub fn new(
        world: Arc<Mutex<SimWorld>>,
        scan: &ScanConfig,
        config: &SimConfig,
    ) -> Result<Self> {
        let noise = if config.noise_std > 0.0 {
            let dist = Normal::new(0.0, config.noise_std)
                .map_err(|e| RakshaError::Config(format!("invalid noise_std: {}", e)))?;
            Some(dist)
        } else {
            None
        };
        if config.scan_rate_hz <= 0.0 {
            return Err(RakshaError::Config(format!(
                "scan_rate_hz must be positive, got {}",
                config.scan_rate_hz
            )));
        }

        Ok(Self {
            world,
            scan_size: scan.size,
            max_range: scan.max_range,
            interval: Duration::from_secs_f32(1.0 / config.scan_rate_hz),
            noise,
            rng: StdRng::from_entropy(),
            epoch: Instant::now(),
            last_scan: None,
        })
    }

    /// Fixed-seed variant for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl SensorFeed for SimulatedLidar {
    fn poll(&mut self) -> Result<Option<RangeScan>> {
        if let Some(last) = self.last_scan {
            if last.elapsed() < self.interval {
                return Ok(None);
            }
        }
        self.last_scan = Some(Instant::now());

        let raw = lock_world(&self.world).scan(self.scan_size, self.noise.as_ref(), &mut self.rng);
        let scan = RangeScan::capture(&raw, self.max_range, self.epoch.elapsed().as_secs_f64())?;
        Ok(Some(scan))
    }
}

/// Simulated drive integrating commands into the shared world pose.
pub struct SimulatedDrive {
    world: Arc<Mutex<SimWorld>>,
    last_command: Option<Instant>,
}

impl SimulatedDrive {
    pub fn new(world: Arc<Mutex<SimWorld>>) -> Self {
        Self {
            world,
            last_command: None,
        }
    }
}

impl CommandSink for SimulatedDrive {
    fn send(&mut self, command: ControlCommand) -> Result<()> {
        let now = Instant::now();
        if let Some(last) = self.last_command {
            let dt = now.duration_since(last).as_secs_f32();
            lock_world(&self.world).apply_command(command, dt);
        }
        self.last_command = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quiet_config() -> SimConfig {
        SimConfig {
            room_width: 4.0,
            room_height: 4.0,
            noise_std: 0.0,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_wall_distances_from_center() {
        let world = SimWorld::new(&quiet_config());

        assert_relative_eq!(world.wall_distance(0.0), 2.0, epsilon = 1e-4);
        assert_relative_eq!(world.wall_distance(std::f32::consts::FRAC_PI_2), 2.0, epsilon = 1e-4);
        assert_relative_eq!(world.wall_distance(std::f32::consts::PI), 2.0, epsilon = 1e-4);
        // Diagonal into a corner
        assert_relative_eq!(
            world.wall_distance(std::f32::consts::FRAC_PI_4),
            2.0 * std::f32::consts::SQRT_2,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_scan_is_forward_relative() {
        let mut world = SimWorld::new(&quiet_config());
        world.x = 1.0; // 1 m from the +x wall
        let mut rng = StdRng::seed_from_u64(7);

        let scan = world.scan(360, None, &mut rng);
        assert_eq!(scan.len(), 360);
        // Facing +x: sample 0 sees the near wall
        assert_relative_eq!(scan[0], 1.0, epsilon = 1e-3);
        // Sample 180 looks backwards at the far wall
        assert_relative_eq!(scan[180], 3.0, epsilon = 1e-3);
    }

    #[test]
    fn test_apply_command_integrates_forward_motion() {
        let mut world = SimWorld::new(&quiet_config());
        world.apply_command(ControlCommand::new(0.2, 0.0), 1.0);

        let (x, y, theta) = world.pose();
        assert_relative_eq!(x, 0.2, epsilon = 1e-5);
        assert_relative_eq!(y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(theta, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_apply_command_confines_to_room() {
        let mut world = SimWorld::new(&quiet_config());
        for _ in 0..100 {
            world.apply_command(ControlCommand::new(1.0, 0.0), 1.0);
        }

        let (x, _, _) = world.pose();
        assert!(x <= 2.0);
    }

    #[test]
    fn test_noise_never_produces_negative_samples() {
        let config = SimConfig {
            noise_std: 0.5,
            ..quiet_config()
        };
        let mut world = SimWorld::new(&config);
        world.x = 1.95; // almost touching the +x wall
        let noise = Normal::new(0.0, config.noise_std).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let scan = world.scan(360, Some(&noise), &mut rng);
        assert!(scan.iter().all(|&r| r >= 0.0));
    }
}
