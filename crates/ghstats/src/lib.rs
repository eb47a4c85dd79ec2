//! Top-level facade crate for ghstats.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use ghstats_core::*;
}

pub mod gateway {
    pub use ghstats_gateway::*;
}
