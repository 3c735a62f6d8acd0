//! # BigSpace Node
//!
//! Hosts one namespace in a tokio process. The binary in `main.rs` loads
//! configuration, installs logging and runs a [`NodeRuntime`] until Ctrl+C.
//!
//! - `config` - defaults plus `BIGSPACE_*` environment overrides
//! - `telemetry` - `tracing-subscriber` setup
//! - `observers` - observers standing in for client sessions
//! - `runtime` - tick driver, metrics reporter, graceful shutdown

pub mod config;
pub mod observers;
pub mod runtime;
pub mod telemetry;

pub use config::{ConfigError, NodeConfig, RuntimeConfig};
pub use observers::LoggingObserver;
pub use runtime::NodeRuntime;
pub use telemetry::{init_logging, TelemetryConfig, TelemetryError};
