//! ghstats gateway library entry.
//!
//! This crate wires configuration, the upstream GitHub client, the stats
//! service, and the HTTP transport into a cohesive service. It is intended to
//! be consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod stats;
pub mod transport;
pub mod upstream;
