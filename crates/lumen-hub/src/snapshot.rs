//! Read-only snapshot surface
//!
//! The excluded HTTP layer never touches hub state directly; it reads the
//! last published `HubSnapshot` through a `SnapshotHandle`. The runtime is
//! the only writer.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use lumen_core::{Environment, HubTime, LeaderboardEntry, Message};

use crate::Hub;

/// Point-in-time view of the queryable hub state
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HubSnapshot {
    pub participant_count: usize,
    pub message_count: usize,
    pub effect_count: usize,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub environment: Environment,
    pub recent_messages: Vec<Message>,
    pub updated_at: HubTime,
}

impl Hub {
    /// Build the queryable snapshot from current state
    pub fn snapshot(&self, now: HubTime) -> HubSnapshot {
        HubSnapshot {
            participant_count: self.participant_count(),
            message_count: self.message_count(),
            effect_count: self.effect_count(),
            leaderboard: self.leaderboard.to_vec(),
            environment: self.environment(),
            recent_messages: self.recent_messages(self.config.recent_window),
            updated_at: now,
        }
    }
}

/// Shared handle to the last published snapshot
#[derive(Clone, Default)]
pub struct SnapshotHandle {
    inner: Arc<RwLock<HubSnapshot>>,
}

impl SnapshotHandle {
    pub fn new() -> Self {
        SnapshotHandle::default()
    }

    pub fn publish(&self, snapshot: HubSnapshot) {
        *self.inner.write() = snapshot;
    }

    /// Clone of the last published snapshot
    pub fn read(&self) -> HubSnapshot {
        self.inner.read().clone()
    }

    pub fn participant_count(&self) -> usize {
        self.inner.read().participant_count
    }

    pub fn message_count(&self) -> usize {
        self.inner.read().message_count
    }

    pub fn effect_count(&self) -> usize {
        self.inner.read().effect_count
    }

    pub fn environment(&self) -> Environment {
        self.inner.read().environment
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.inner.read().leaderboard.clone()
    }
}
