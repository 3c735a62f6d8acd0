//! Driver Layer
//!
//! The periodic producer: a [`SignalSource`](crate::ports::SignalSource)
//! sampled once per tick and written into every target item through an
//! [`UpdateSink`](crate::ports::UpdateSink).

pub mod signal;
pub mod tick;

pub use signal::Sinusoid;
pub use tick::{SimulationConfig, TickDriver, TickReport};
