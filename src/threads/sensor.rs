//! Sensor thread: scan ingestion.
//!
//! Polls the `SensorFeed` and replaces the shared latest-scan buffer on
//! every arrival. Ingestion runs independently of the control tick; the
//! control thread always reads whatever complete scan arrived last.

use std::sync::Arc;
use std::time::Duration;

use crate::io::SensorFeed;
use crate::shared::SharedState;

/// Sensor thread state and logic.
pub struct SensorThread {
    shared: Arc<SharedState>,
    feed: Box<dyn SensorFeed + Send>,
    poll_interval: Duration,
}

impl SensorThread {
    pub fn new(shared: Arc<SharedState>, feed: Box<dyn SensorFeed + Send>) -> Self {
        Self {
            shared,
            feed,
            poll_interval: Duration::from_millis(1),
        }
    }

    /// Run the sensor thread main loop.
    pub fn run(&mut self) {
        tracing::info!("Sensor thread started");

        loop {
            if self.shared.should_shutdown() {
                tracing::info!("Sensor thread shutting down");
                break;
            }

            match self.feed.poll() {
                Ok(Some(scan)) => {
                    if self.shared.scan_count() == 0 {
                        tracing::info!("First scan received ({} samples)", scan.len());
                    }
                    self.shared.store_scan(scan);
                }
                Ok(None) => {
                    // No new data yet
                }
                Err(e) => {
                    // A bad reading is transient; the next scan supersedes it
                    tracing::error!("Sensor feed error: {}", e);
                }
            }

            std::thread::sleep(self.poll_interval);
        }
    }
}
