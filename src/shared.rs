//! Shared state between the sensor and control threads.
//!
//! The only mutable resource the two threads share is the latest-scan
//! buffer. Scans are replaced wholesale under a mutex, so a control cycle
//! can never observe a torn, partially written scan; the `Arc` handed out
//! keeps the previous scan alive for a cycle that is still reading it while
//! the next one lands.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::types::RangeScan;

/// Shared state between all threads.
#[derive(Debug)]
pub struct SharedState {
    /// Most recent scan; `None` until the first scan arrives
    latest_scan: Mutex<Option<Arc<RangeScan>>>,

    /// Shutdown signal for graceful termination
    shutdown: AtomicBool,

    /// Number of scans received (for status reporting)
    scan_count: AtomicU32,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            latest_scan: Mutex::new(None),
            shutdown: AtomicBool::new(false),
            scan_count: AtomicU32::new(0),
        }
    }

    /// Replace the latest scan (called by the sensor thread on arrival).
    pub fn store_scan(&self, scan: RangeScan) {
        let mut guard = self
            .latest_scan
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(Arc::new(scan));
        self.scan_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the latest scan, or `None` if nothing has arrived yet.
    pub fn latest_scan(&self) -> Option<Arc<RangeScan>> {
        self.latest_scan
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Signal shutdown.
    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Check if shutdown is signaled.
    pub fn should_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Get scan count.
    pub fn scan_count(&self) -> u32 {
        self.scan_count.load(Ordering::Relaxed)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
