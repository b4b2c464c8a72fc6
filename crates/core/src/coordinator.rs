//! Poll cycle coordinator.
//!
//! Owns both snapshot generations and the changelist, runs the registered
//! collectors in order once per cycle and rotates generations when a cycle
//! completes. A cycle that is cancelled or hits a session failure leaves the
//! previous generation untouched, so the next attempt compares against it.

use crate::{
    BoxedCollector, Changelist, CollectContext, CollectError, Collector, DeviceReader, Generations,
    PollError, Snapshot,
};
use cncsnap_types::{PollConfig, Update};
use log::{debug, error, trace, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Coordinator state between and during cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Running,
}

/// Result of one completed cycle
#[derive(Debug)]
pub struct CycleReport<'a> {
    /// 1-based cycle number
    pub cycle: u64,
    /// Changelist in collector registration order
    pub updates: &'a [Update],
    /// Fields that could not be collected this cycle
    pub field_errors: Vec<CollectError>,
    pub elapsed: Duration,
}

/// Runs the collector list against (previous, next) state
pub struct PollCoordinator {
    collectors: Vec<BoxedCollector>,
    generations: Generations,
    changelist: Changelist,
    state: CycleState,
    completed_cycles: u64,
    max_axes: usize,
    protocol_error_limit: u32,
    /// Consecutive cycles each collector ended in a protocol error
    protocol_streaks: HashMap<String, u32>,
}

impl PollCoordinator {
    pub fn new(collectors: Vec<BoxedCollector>, config: &PollConfig) -> Self {
        let capacity = collectors.iter().map(|c| c.fields().len()).sum();
        Self {
            collectors,
            generations: Generations::new(),
            changelist: Changelist::with_capacity(capacity),
            state: CycleState::Idle,
            completed_cycles: 0,
            max_axes: config.max_axes,
            protocol_error_limit: config.protocol_error_limit.max(1),
            protocol_streaks: HashMap::new(),
        }
    }

    pub fn collectors(&self) -> &[BoxedCollector] {
        &self.collectors
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }

    /// Snapshot built by the last completed cycle
    pub fn previous(&self) -> &Snapshot {
        self.generations.previous()
    }

    /// Changelist of the last cycle
    pub fn changelist(&self) -> &Changelist {
        &self.changelist
    }

    /// Run every collector once, in registration order.
    ///
    /// `cancel` is checked before each collector. Field-level failures are
    /// collected into the report; session failures (including protocol
    /// errors that recur past the configured limit) abort the cycle.
    pub fn run_cycle(
        &mut self,
        reader: &mut dyn DeviceReader,
        cancel: &AtomicBool,
    ) -> Result<CycleReport<'_>, PollError> {
        let cycle = self.completed_cycles + 1;
        let start = Instant::now();

        self.state = CycleState::Running;
        self.changelist.clear();
        self.generations.discard_next();

        let mut field_errors = Vec::new();

        for collector in self.collectors.iter_mut() {
            if cancel.load(Ordering::SeqCst) {
                debug!("Cycle {} cancelled before '{}'", cycle, collector.id());
                self.generations.discard_next();
                self.state = CycleState::Idle;
                return Err(PollError::Cancelled {
                    cycle,
                    collector: collector.id().to_string(),
                });
            }

            let result = {
                let (previous, next) = self.generations.split_mut();
                let mut ctx = CollectContext::new(
                    &mut *reader,
                    previous,
                    next,
                    &mut self.changelist,
                    self.max_axes,
                );
                collector.collect(&mut ctx)
            };

            let err = match result {
                Ok(()) => {
                    self.protocol_streaks.remove(collector.id());
                    trace!("Collector '{}' done", collector.id());
                    continue;
                }
                Err(err) => err,
            };

            let err = if err.is_protocol() {
                let streak = self
                    .protocol_streaks
                    .entry(collector.id().to_string())
                    .or_insert(0);
                *streak += 1;
                if *streak >= self.protocol_error_limit {
                    warn!(
                        "Protocol errors from '{}' recurred {} cycles in a row",
                        collector.id(),
                        streak
                    );
                    err.escalate()
                } else {
                    err
                }
            } else {
                // Only back-to-back protocol errors count towards escalation
                self.protocol_streaks.remove(collector.id());
                err
            };

            if err.is_session() {
                error!("Cycle {} aborted: {}", cycle, err);
                self.protocol_streaks.clear();
                self.generations.discard_next();
                self.state = CycleState::Idle;
                return Err(PollError::Session { cycle, source: err });
            }

            warn!("Cycle {}: {}", cycle, err);
            let (previous, next) = self.generations.split_mut();
            for key in collector.keys() {
                if !next.contains(&key) {
                    if let Some(value) = previous.get(&key) {
                        next.set(key, value.clone());
                    }
                }
            }
            field_errors.push(err);
        }

        self.generations.rotate();
        self.state = CycleState::Idle;
        self.completed_cycles = cycle;

        let elapsed = start.elapsed();
        debug!(
            "Cycle {} produced {} updates ({} field errors) in {:?}",
            cycle,
            self.changelist.len(),
            field_errors.len(),
            elapsed
        );

        Ok(CycleReport {
            cycle,
            updates: self.changelist.as_slice(),
            field_errors,
            elapsed,
        })
    }
}
