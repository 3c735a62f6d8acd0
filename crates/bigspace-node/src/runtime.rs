//! Node runtime: owns the namespace and the background tasks around it.
//!
//! ## Startup Sequence
//!
//! 1. Build the namespace from configuration
//! 2. Subscribe the logging observer to the watched items
//! 3. Spawn the tick driver
//! 4. Spawn the metrics reporter
//!
//! Shutdown flips the watch channel, waits for both tasks, then drops the
//! subscriptions.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use bigspace_namespace::{
    Namespace, NamespaceError, SubscriptionApi, SubscriptionToken, TickDriver,
};

use crate::config::NodeConfig;
use crate::observers::LoggingObserver;

pub struct NodeRuntime {
    config: NodeConfig,
    namespace: Arc<Namespace>,
    observer: Arc<LoggingObserver>,
    tokens: Vec<SubscriptionToken>,
    driver: Option<JoinHandle<u64>>,
    reporter: Option<JoinHandle<()>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    pub fn new(config: NodeConfig) -> Result<Self, NamespaceError> {
        let namespace = Arc::new(Namespace::new(config.namespace.clone())?);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            namespace,
            observer: Arc::new(LoggingObserver::new("console")),
            tokens: Vec::new(),
            driver: None,
            reporter: None,
            shutdown_tx,
            shutdown_rx,
        })
    }

    pub fn namespace(&self) -> &Arc<Namespace> {
        &self.namespace
    }

    pub fn observer(&self) -> &LoggingObserver {
        &self.observer
    }

    /// Start the background tasks. Must be called inside a tokio runtime.
    pub fn start(&mut self) -> Result<(), NamespaceError> {
        let watched: Vec<String> = self
            .namespace
            .store()
            .names()
            .take(self.config.runtime.watch_items)
            .map(String::from)
            .collect();
        for name in &watched {
            let token = self.namespace.subscribe_item(name, self.observer.clone())?;
            self.tokens.push(token);
        }
        if !watched.is_empty() {
            info!(
                session = %self.observer.session(),
                items = watched.len(),
                "Logging observer subscribed"
            );
        }

        let driver = TickDriver::for_namespace(
            Arc::clone(&self.namespace),
            self.config.simulation.clone(),
        );
        self.driver = Some(driver.spawn(self.shutdown_rx.clone()));

        self.reporter = Some(tokio::spawn(report_metrics(
            Arc::clone(&self.namespace),
            self.config.runtime.metrics_interval,
            self.shutdown_rx.clone(),
        )));

        info!(
            items = self.namespace.store().len(),
            namespace = %self.namespace.config().namespace_uri,
            "Node started"
        );
        Ok(())
    }

    /// Stop the background tasks and drop every subscription.
    ///
    /// Returns the number of ticks the driver ran.
    pub async fn shutdown(mut self) -> u64 {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let ticks = match self.driver.take() {
            Some(handle) => handle.await.unwrap_or_else(|e| {
                warn!(error = %e, "Tick driver task failed");
                0
            }),
            None => 0,
        };
        if let Some(handle) = self.reporter.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Metrics reporter task failed");
            }
        }

        for token in self.tokens.drain(..) {
            self.namespace.unsubscribe(&token);
        }

        log_metrics(&self.namespace);
        info!(
            ticks,
            notifications = self.observer.received(),
            "Shutdown complete"
        );
        ticks
    }
}

async fn report_metrics(
    namespace: Arc<Namespace>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => log_metrics(&namespace),
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}

fn log_metrics(namespace: &Namespace) {
    let snapshot = namespace.metrics().snapshot();
    match serde_json::to_string(&snapshot) {
        Ok(json) => info!(
            metrics = %json,
            coalesce_ratio = namespace.metrics().coalesce_ratio(),
            subscriptions = namespace.registry().total_subscriptions(),
            "Namespace metrics"
        ),
        Err(e) => warn!(error = %e, "Failed to encode metrics"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigspace_namespace::{NodeManager, StatusCode, WritePolicy};

    fn config(items: usize, watch: usize) -> NodeConfig {
        let mut config = NodeConfig::default();
        config.namespace.item_count = items;
        config.runtime.watch_items = watch;
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_shutdown() {
        let mut node = NodeRuntime::new(config(3, 2)).unwrap();
        node.start().unwrap();
        assert_eq!(node.namespace().registry().total_subscriptions(), 2);

        // Ticks at 0s and 1s
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let namespace = Arc::clone(node.namespace());
        assert_eq!(node.shutdown().await, 2);

        // Two watched items, two ticks each
        assert_eq!(namespace.metrics().snapshot().notifications_delivered, 4);
        assert_eq!(namespace.registry().total_subscriptions(), 0);
    }

    #[tokio::test]
    async fn test_disabled_simulation_leaves_items_untouched() {
        let mut config = config(2, 0);
        config.simulation.enabled = false;
        let mut node = NodeRuntime::new(config).unwrap();
        node.start().unwrap();

        let namespace = Arc::clone(node.namespace());
        assert_eq!(node.shutdown().await, 0);
        let snap = namespace.store().read("DataItem_0000").unwrap();
        assert_eq!(snap.status, StatusCode::WaitingForInitialData);
    }

    #[tokio::test]
    async fn test_writable_config_reaches_namespace() {
        let mut config = config(1, 0);
        config.namespace.write_policy = WritePolicy::Delegate;
        config.simulation.enabled = false;
        let node = NodeRuntime::new(config).unwrap();

        let namespace = node.namespace();
        let item = namespace.item_id("DataItem_0000");
        assert!(namespace.write_value(&item, 9.0, StatusCode::Good).unwrap());
    }

    #[test]
    fn test_invalid_namespace_config() {
        let mut config = config(1, 0);
        config.namespace.namespace_index = 0;
        assert!(NodeRuntime::new(config).is_err());
    }
}
