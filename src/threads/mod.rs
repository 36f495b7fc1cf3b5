//! Two-thread architecture for the avoidance node.
//!
//! - Sensor thread: polls the feed, replaces the shared latest-scan buffer
//! - Control thread: runs one avoidance cycle per tick and feeds the sink

mod control;
mod sensor;

pub use control::ControlThread;
pub use sensor::SensorThread;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::RakshaConfig;
use crate::error::Result;
use crate::io::{CommandSink, SensorFeed};
use crate::shared::SharedState;

/// Thread handles for the running node.
pub struct ThreadHandles {
    pub sensor: JoinHandle<()>,
    pub control: JoinHandle<()>,
}

/// Spawn the sensor and control threads and return their handles.
pub fn spawn_threads(
    config: &RakshaConfig,
    shared: Arc<SharedState>,
    feed: Box<dyn SensorFeed + Send>,
    sink: Box<dyn CommandSink + Send>,
) -> Result<ThreadHandles> {
    // Build the control thread first so a bad configuration fails before
    // anything is spawned
    let mut control_thread = ControlThread::new(config, Arc::clone(&shared), sink)?;

    let sensor_shared = Arc::clone(&shared);
    let sensor = thread::Builder::new()
        .name("sensor".into())
        .spawn(move || {
            let mut sensor_thread = SensorThread::new(sensor_shared, feed);
            sensor_thread.run();
        })
        .expect("Failed to spawn sensor thread");

    let control = thread::Builder::new()
        .name("control".into())
        .spawn(move || {
            control_thread.run();
        })
        .expect("Failed to spawn control thread");

    Ok(ThreadHandles { sensor, control })
}
