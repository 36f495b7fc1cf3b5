//! Control thread: one avoidance cycle per timer tick.
//!
//! Each tick reads the latest scan, runs preprocess → decide → clamp, and
//! forwards the saturated command to the `CommandSink`. Ticks are logically
//! serial; a tick runs to completion before the next one is considered.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RakshaConfig;
use crate::control::AvoidanceController;
use crate::error::Result;
use crate::io::CommandSink;
use crate::shared::SharedState;
use crate::types::ControlCommand;

/// Control thread state and logic.
pub struct ControlThread {
    shared: Arc<SharedState>,
    sink: Box<dyn CommandSink + Send>,
    controller: AvoidanceController,
    tick_period: Duration,
    startup_delay: Duration,
    status_interval: Duration,
}

impl ControlThread {
    pub fn new(
        config: &RakshaConfig,
        shared: Arc<SharedState>,
        sink: Box<dyn CommandSink + Send>,
    ) -> Result<Self> {
        Ok(Self {
            shared,
            sink,
            controller: AvoidanceController::from_config(config)?,
            tick_period: Duration::from_millis(config.control.tick_period_ms),
            startup_delay: Duration::from_secs_f32(config.control.startup_delay_secs),
            status_interval: Duration::from_secs_f32(config.control.status_interval_secs),
        })
    }

    /// Run the control loop.
    pub fn run(&mut self) {
        tracing::info!(
            "Control thread started (tick {:?}, startup delay {:?})",
            self.tick_period,
            self.startup_delay
        );

        let epoch = Instant::now();
        let mut last_status = Instant::now();

        loop {
            let tick_start = Instant::now();

            if self.shared.should_shutdown() {
                tracing::info!("Control thread shutting down");
                if let Err(e) = self.sink.send(ControlCommand::STOP) {
                    tracing::error!("Failed to send stop command: {}", e);
                }
                break;
            }

            self.tick(epoch, &mut last_status);

            // Maintain the tick rate
            let elapsed = tick_start.elapsed();
            if elapsed < self.tick_period {
                std::thread::sleep(self.tick_period - elapsed);
            }
        }
    }

    /// Run one control cycle.
    fn tick(&mut self, epoch: Instant, last_status: &mut Instant) {
        let since_start = epoch.elapsed();

        // Startup delay suppresses all control output so sensors and
        // actuators can settle, regardless of data availability.
        if since_start < self.startup_delay {
            if last_status.elapsed() >= self.status_interval {
                tracing::info!("Initializing...");
                *last_status = Instant::now();
            }
            return;
        }

        let scan = match self.shared.latest_scan() {
            Some(scan) => scan,
            None => {
                if last_status.elapsed() >= self.status_interval {
                    tracing::info!("Initializing... (no scan received yet)");
                    *last_status = Instant::now();
                }
                return;
            }
        };

        match self.controller.step(&scan, since_start.as_secs_f64()) {
            Ok(out) => {
                if let Err(e) = self.sink.send(out.command) {
                    tracing::error!("Failed to send command: {}", e);
                    self.shared.signal_shutdown();
                    return;
                }

                if last_status.elapsed() >= self.status_interval {
                    tracing::info!(
                        "{:?}: closest obstacle {:.2} m, cmd=({:.3} m/s, {:.3} rad/s), scans={}",
                        out.tier,
                        out.clearance.min_range,
                        out.command.linear,
                        out.command.angular,
                        self.shared.scan_count()
                    );
                    *last_status = Instant::now();
                }
            }
            Err(e) => {
                // Cycle-fatal only: hold the previous command, next tick
                // gets a fresh scan and a fresh decision
                tracing::error!("Scan rejected: {}", e);
            }
        }
    }
}
