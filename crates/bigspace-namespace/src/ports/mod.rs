//! Ports Layer
//!
//! - Driving Ports (inbound) - API for the transport layer and producers
//! - Driven Ports (outbound) - observers, clock, signal source

pub mod inbound;
pub mod outbound;

pub use inbound::{NodeManager, ReadRequest, SubscriptionApi, UpdateSink};
pub use outbound::{
    ManualTimeSource, Observer, SignalSource, SystemTimeSource, TimeSource,
};
