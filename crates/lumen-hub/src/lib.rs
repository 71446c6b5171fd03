//! LUMEN Hub - Interaction engine and actor runtime
//!
//! One inbound participant event flows through up to six stages:
//! 1. Resolve the author in the session registry
//! 2. Mutate state (message, debit, rename, reaction)
//! 3. Evaluate achievement rules
//! 4. Recompute the leaderboard
//! 5. Queue outbound broadcasts / targeted events
//! 6. Optionally schedule a deferred ambient response
//!
//! The `Hub` itself is synchronous and deterministic; `HubRuntime` wraps it
//! in a single tokio task that serializes every event, runs the periodic
//! cleanup sweep, fires due ambient responses, and publishes the read-only
//! `HubSnapshot`.

pub mod achievements;
pub mod ambient;
pub mod config;
pub mod economy;
pub mod hub;
pub mod outbound;
pub mod pipeline;
pub mod runtime;
pub mod snapshot;

pub use ambient::respond;
pub use config::HubConfig;
pub use hub::{Hub, HubStats, SweepReport, DEFAULT_PARTICLE_COUNT, DEFAULT_SOUND_VOLUME};
pub use outbound::{Deferred, Outbound};
pub use runtime::{HubHandle, HubRuntime};
pub use snapshot::{HubSnapshot, SnapshotHandle};

/// Install a fmt subscriber honoring `RUST_LOG`; a no-op if a global
/// subscriber is already set
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
