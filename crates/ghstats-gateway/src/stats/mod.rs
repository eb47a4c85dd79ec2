//! Stats aggregation (cache + limiter + upstream).

mod service;

pub use service::{assemble, StatsService};
