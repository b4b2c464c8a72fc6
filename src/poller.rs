//! Timed poll loop
//!
//! Drives [`PollCoordinator::run_cycle`] from a tokio interval and hands
//! each completed cycle to a [`ChangelistSink`]. Cycles run inline on the
//! loop task, so a cycle that overruns the interval delays the next tick
//! instead of overlapping it.

use crate::sink::{ChangelistSink, CycleRecord};
use cncsnap_core::{BoxedDeviceReader, PollCoordinator, PollError};
use log::{debug, error, info, trace, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// Owns the coordinator, the device session and the sink for one run
pub struct PollLoop {
    coordinator: PollCoordinator,
    reader: BoxedDeviceReader,
    sink: Box<dyn ChangelistSink>,
    interval: Duration,
    max_cycles: Option<u64>,
    cancel: Arc<AtomicBool>,
    session: Uuid,
}

impl PollLoop {
    pub fn new(
        coordinator: PollCoordinator,
        reader: BoxedDeviceReader,
        sink: Box<dyn ChangelistSink>,
        interval: Duration,
    ) -> Self {
        Self {
            coordinator,
            reader,
            sink,
            interval,
            max_cycles: None,
            cancel: Arc::new(AtomicBool::new(false)),
            session: Uuid::new_v4(),
        }
    }

    /// Stop after `cycles` completed cycles
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn coordinator(&self) -> &PollCoordinator {
        &self.coordinator
    }

    /// Flag that stops the loop at the next collector boundary when set
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Set the cancellation flag on Ctrl-C
    pub fn spawn_shutdown_listener(&self) -> JoinHandle<()> {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    warn!("Shutdown requested, finishing at next collector boundary");
                    cancel.store(true, Ordering::SeqCst);
                }
                Err(e) => error!("Failed to listen for shutdown signal: {}", e),
            }
        })
    }

    /// Poll until cancelled, the cycle limit is reached, or the session fails.
    ///
    /// Returns the number of completed cycles. A cancelled cycle is not
    /// counted and is not published.
    pub async fn run(&mut self) -> Result<u64, PollError> {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Polling every {:?} with {} collectors (session {})",
            self.interval,
            self.coordinator.collectors().len(),
            self.session
        );

        loop {
            if let Some(max) = self.max_cycles {
                if self.coordinator.completed_cycles() >= max {
                    info!("Reached cycle limit of {}", max);
                    break;
                }
            }

            interval.tick().await;

            if self.cancel.load(Ordering::SeqCst) {
                break;
            }

            let report = match self.coordinator.run_cycle(self.reader.as_mut(), &self.cancel) {
                Ok(report) => report,
                Err(e) if e.is_cancelled() => {
                    debug!("{}", e);
                    break;
                }
                Err(e) => {
                    error!("Polling stopped: {}", e);
                    return Err(e);
                }
            };

            let record = CycleRecord::from_report(self.session, &report);
            trace!("Cycle {} took {:?}", report.cycle, report.elapsed);

            if let Err(e) = self.sink.publish(&record) {
                error!("Failed to publish cycle {}: {:#}", record.cycle, e);
                return Err(PollError::Sink {
                    cycle: record.cycle,
                    detail: format!("{:#}", e),
                });
            }
        }

        let completed = self.coordinator.completed_cycles();
        info!("Poll loop finished after {} cycles", completed);
        Ok(completed)
    }
}
