//! Tick Driver
//!
//! Samples the signal once per tick and writes the sample, with status
//! `Good`, into every target item through the update path. Coalescing and
//! fan-out happen behind [`UpdateSink::apply_update`], so the driver never
//! talks to the registry directly.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, trace, warn};

use crate::domain::StatusCode;
use crate::driver::Sinusoid;
use crate::ports::{SignalSource, UpdateSink};
use crate::service::Namespace;

/// Simulation configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Time between ticks
    pub interval: Duration,
    /// Peak of the generated signal
    pub amplitude: f64,
    /// Phase advance per tick
    pub step_radians: f64,
    /// Whether the driver runs at all
    pub enabled: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            amplitude: 100.0,
            step_radians: std::f64::consts::PI / 180.0,
            enabled: true,
        }
    }
}

/// Outcome of a single tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub sample: f64,
    /// Writes that were real transitions
    pub changed: usize,
    /// Writes suppressed by coalescing
    pub coalesced: usize,
    pub delivered: usize,
    pub observer_failures: usize,
    /// Writes the sink refused
    pub errors: usize,
}

pub struct TickDriver {
    sink: Arc<dyn UpdateSink>,
    targets: Vec<String>,
    source: Box<dyn SignalSource>,
    config: SimulationConfig,
    ticks: u64,
}

impl TickDriver {
    pub fn new(
        sink: Arc<dyn UpdateSink>,
        targets: Vec<String>,
        source: Box<dyn SignalSource>,
        config: SimulationConfig,
    ) -> Self {
        Self {
            sink,
            targets,
            source,
            config,
            ticks: 0,
        }
    }

    /// Drive every item of `namespace` with the configured sinusoid.
    pub fn for_namespace(namespace: Arc<Namespace>, config: SimulationConfig) -> Self {
        let targets = namespace.store().names().map(String::from).collect();
        let source = Box::new(Sinusoid::new(config.amplitude, config.step_radians));
        Self::new(namespace, targets, source, config)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Run one tick synchronously.
    pub fn tick_once(&mut self) -> TickReport {
        self.ticks += 1;
        let sample = self.source.next_sample();
        let mut report = TickReport {
            tick: self.ticks,
            sample,
            ..Default::default()
        };

        for item in &self.targets {
            match self.sink.apply_update(item, sample, StatusCode::Good) {
                Ok(outcome) => match outcome.report {
                    Some(fan_out) => {
                        report.changed += 1;
                        report.delivered += fan_out.delivered;
                        report.observer_failures += fan_out.failed.len();
                    }
                    None if outcome.changed => report.changed += 1,
                    None => report.coalesced += 1,
                },
                Err(e) => {
                    warn!(item = %item, error = %e, "Tick update rejected");
                    report.errors += 1;
                }
            }
        }

        trace!(
            tick = report.tick,
            sample = report.sample,
            changed = report.changed,
            delivered = report.delivered,
            "Tick complete"
        );
        report
    }

    /// Tick on the configured interval until `shutdown` flips to `true` or
    /// its sender is dropped. Returns the number of ticks run.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        if !self.config.enabled {
            info!("Simulation disabled, tick driver not started");
            return 0;
        }

        info!(
            items = self.targets.len(),
            interval_ms = self.config.interval.as_millis() as u64,
            "Tick driver started"
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick_once();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(ticks = self.ticks, "Tick driver stopped");
        self.ticks
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<u64> {
        tokio::spawn(self.run(shutdown))
    }
}
