//! RakshaNav node entry point.
//!
//! Wires the simulated lidar and drive to the control core, spawns the
//! sensor and control threads, and monitors them until shutdown. Pass a
//! config file path as the first argument, or drop a `raksha.toml` next to
//! the binary; otherwise built-in defaults are used.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use tracing::{error, info, warn};

use raksha_nav::io::sim::{SimWorld, SimulatedDrive, SimulatedLidar};
use raksha_nav::{spawn_threads, RakshaConfig, Result, SharedState};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("raksha_nav=info".parse().unwrap()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let config = if args.len() > 1 {
        let config_path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", config_path);
        RakshaConfig::load(config_path)?
    } else if Path::new("raksha.toml").exists() {
        info!("Loading configuration from raksha.toml");
        RakshaConfig::load(Path::new("raksha.toml"))?
    } else {
        info!("Using default configuration");
        RakshaConfig::default()
    };

    info!("RakshaNav v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Actuation envelope: {:.2} m/s, {:.2} rad/s; scan {} samples @ {:.1} m max",
        config.limits.max_linear_vel,
        config.limits.max_angular_vel,
        config.scan.size,
        config.scan.max_range
    );

    // Simulated robot in a rectangular room; feed and drive share one world
    info!(
        "Simulated room {:.1} x {:.1} m",
        config.sim.room_width, config.sim.room_height
    );
    let world = SimWorld::shared(&config.sim);
    let feed = SimulatedLidar::new(Arc::clone(&world), &config.scan, &config.sim)?;
    let sink = SimulatedDrive::new(Arc::clone(&world));

    let shared = Arc::new(SharedState::new());

    // Forward SIGINT/SIGTERM to the shutdown flag
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let signal_shared = Arc::clone(&shared);
    std::thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            if let Some(sig) = signals.forever().next() {
                info!("Received signal {}, shutting down", sig);
                signal_shared.signal_shutdown();
            }
        })
        .expect("Failed to spawn signal thread");

    // Spawn worker threads
    let handles = spawn_threads(&config, Arc::clone(&shared), Box::new(feed), Box::new(sink))?;

    // Main thread: monitor until shutdown
    let check_interval = Duration::from_millis(500);

    loop {
        std::thread::sleep(check_interval);

        if shared.should_shutdown() {
            break;
        }

        if handles.sensor.is_finished() || handles.control.is_finished() {
            warn!("A worker thread exited unexpectedly");
            break;
        }
    }

    // Signal shutdown and wait for threads to finish
    shared.signal_shutdown();
    info!("Waiting for threads to finish...");

    if let Err(e) = handles.sensor.join() {
        error!("Sensor thread panicked: {:?}", e);
    }
    if let Err(e) = handles.control.join() {
        error!("Control thread panicked: {:?}", e);
    }

    info!("RakshaNav finished");
    Ok(())
}
