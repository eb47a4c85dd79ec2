//! ghstats core: transport-agnostic cache, rate limiter, stats model, and errors.
//!
//! This crate defines the concurrency primitives and error surface shared by
//! the gateway and its tests. It carries no HTTP or async runtime
//! dependencies so the primitives can be exercised in isolation.
//!
//! # Panic policy
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths must surface as `GhStatsError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod cache;
pub mod clock;
pub mod error;
pub mod rate_limit;
pub mod stats;

pub use cache::{CacheStats, TtlCache};
pub use clock::{Clock, ManualClock, SystemClock};
/// Shared result type.
pub use error::{ClientCode, GhStatsError, Result, UpstreamError};
pub use rate_limit::FixedWindowLimiter;
pub use stats::{IncludeOptions, RepoStats, StatsResult};
