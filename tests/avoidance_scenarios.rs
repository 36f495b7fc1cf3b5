//! End-to-end avoidance scenarios.
//!
//! Drives the full preprocess → decide → clamp pipeline through the public
//! API, plus a threaded smoke run against the simulated robot.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use approx::assert_relative_eq;
use raksha_nav::io::sim::{SimWorld, SimulatedDrive, SimulatedLidar};
use raksha_nav::{
    spawn_threads, AvoidanceController, AvoidancePolicy, ClearanceSnapshot, CommandSink,
    ControlCommand, DecisionTier, RakshaConfig, RangeScan, Result, SensorFeed, SharedState,
};

fn default_controller() -> AvoidanceController {
    AvoidanceController::from_config(&RakshaConfig::default()).unwrap()
}

/// Open space: scans at max range on every tick must settle into a straight
/// cruise at the Clear-tier velocity.
#[test]
fn test_open_space_cruise() {
    let mut controller = default_controller();
    let scan = RangeScan::new(vec![3.5; 360], 0.0);

    for (i, t) in [0.0, 0.1, 0.2].iter().enumerate() {
        let out = controller.step(&scan, *t).unwrap();

        assert_eq!(out.tier, DecisionTier::Clear, "tick {}", i);
        assert_relative_eq!(out.command.linear, 0.2, epsilon = 1e-6);
        // Balanced clearance on both sides: no steering
        assert_relative_eq!(out.command.angular, 0.0, epsilon = 1e-6);
    }
}

/// Obstacle close on the oblique left: crawl and steer hard away, with the
/// lateral PID seeing the amplified error 16 * (left - right) = -32.
#[test]
fn test_collision_imminent_turn_away() {
    let config = RakshaConfig::default();
    let mut policy = AvoidancePolicy::new(config.policy, config.pid.lateral, config.pid.longitudinal);

    let snapshot = ClearanceSnapshot {
        front: 2.0,
        oblique_left: 0.3,
        oblique_right: 2.0,
        left: 1.0,
        right: 3.0,
        min_range: 0.3,
    };

    let t = 0.1;
    let (tier, command) = policy.decide(&snapshot, t);

    assert_eq!(tier, DecisionTier::CollisionImminent);
    assert_relative_eq!(command.linear, 0.005, epsilon = 1e-6);

    // First accepted lateral PID call: dt = 0.1, error = -32
    let e = -32.0f32;
    let dt = 0.1f32;
    let expected = 0.22 * e + 0.01 * e * dt + 0.3 * e / dt;
    assert_relative_eq!(command.angular, expected, epsilon = 1e-3);

    // Saturation must not touch the negative angular command
    let clamped = config.limits.clamp(command);
    assert_relative_eq!(clamped.angular, command.angular, epsilon = 1e-6);
    assert_relative_eq!(clamped.linear, 0.005, epsilon = 1e-6);
}

/// A wall within caution range slows the robot under PID control instead of
/// cruising into it.
#[test]
fn test_caution_tier_modulates_speed() {
    let mut controller = default_controller();

    // Wall roughly ahead: the forward half of the scan shortened
    let mut ranges = vec![3.5f32; 360];
    for i in 0..90 {
        ranges[i] = 0.9;
        ranges[359 - i] = 0.9;
    }
    let scan = RangeScan::new(ranges, 0.0);

    let out = controller.step(&scan, 0.1).unwrap();

    assert_eq!(out.tier, DecisionTier::Caution);
    assert!(out.command.linear <= 0.22, "saturated: {}", out.command.linear);
    // Symmetric blockage: no steering preference
    assert_relative_eq!(out.command.angular, 0.0, epsilon = 1e-4);
}

/// The simulated robot in a small room produces valid scans that drive the
/// pipeline to a saturated, in-envelope command.
#[test]
fn test_simulated_feed_drives_pipeline() {
    let config = RakshaConfig::default();
    let world = SimWorld::shared(&config.sim);
    let mut feed = SimulatedLidar::new(Arc::clone(&world), &config.scan, &config.sim)
        .unwrap()
        .with_seed(42);

    let scan = feed.poll().unwrap().expect("first poll yields a scan");
    assert_eq!(scan.len(), 360);

    let mut controller = default_controller();
    let out = controller.step(&scan, 0.1).unwrap();

    assert!(out.command.linear <= config.limits.max_linear_vel);
    assert!(out.command.angular <= config.limits.max_angular_vel);
}

/// Sink that records everything it is asked to drive.
#[derive(Clone, Default)]
struct CollectingSink {
    commands: Arc<Mutex<Vec<ControlCommand>>>,
}

impl CommandSink for CollectingSink {
    fn send(&mut self, command: ControlCommand) -> Result<()> {
        self.commands.lock().unwrap().push(command);
        Ok(())
    }
}

/// Threaded smoke run: sensor + control threads against the simulated lidar
/// must start emitting in-envelope commands once the startup delay passes.
#[test]
fn test_node_smoke_run() {
    let mut config = RakshaConfig::default();
    config.control.startup_delay_secs = 0.2;
    config.control.tick_period_ms = 5;
    config.sim.noise_std = 0.0;

    let world = SimWorld::shared(&config.sim);
    let feed = SimulatedLidar::new(Arc::clone(&world), &config.scan, &config.sim)
        .unwrap()
        .with_seed(7);
    let drive = SimulatedDrive::new(Arc::clone(&world));

    let sink = CollectingSink::default();
    let commands = Arc::clone(&sink.commands);

    // Forward to the simulated drive as well, closing the loop
    struct TeeSink(CollectingSink, SimulatedDrive);
    impl CommandSink for TeeSink {
        fn send(&mut self, command: ControlCommand) -> Result<()> {
            self.0.send(command)?;
            self.1.send(command)
        }
    }

    let shared = Arc::new(SharedState::new());
    let handles = spawn_threads(
        &config,
        Arc::clone(&shared),
        Box::new(feed),
        Box::new(TeeSink(sink, drive)),
    )
    .unwrap();

    std::thread::sleep(Duration::from_millis(1500));
    shared.signal_shutdown();
    handles.sensor.join().unwrap();
    handles.control.join().unwrap();

    let commands = commands.lock().unwrap();
    assert!(
        commands.len() > 10,
        "expected a stream of commands, got {}",
        commands.len()
    );
    for cmd in commands.iter() {
        assert!(cmd.linear <= config.limits.max_linear_vel);
        assert!(cmd.angular <= config.limits.max_angular_vel);
    }
}
