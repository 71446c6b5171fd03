//! Ephemeral stores - short-lived broadcast artifacts
//!
//! Reactions, sound plays, and particle bursts are appended as they are
//! broadcast and pruned once older than their store's retention window.
//! Retention is per store and explicit:
//!
//! - holographic reactions: 30 s
//! - sound plays: 60 s
//! - particle bursts: 30 s
//! - effect-usage notes (derived from messages): 60 s

use std::collections::VecDeque;
use std::time::Duration;

use lumen_core::{
    HolographicEffect, HubTime, MessageId, ParticipantId, ParticleEffect, SoundEffect,
};

pub const VISUAL_RETENTION: Duration = Duration::from_secs(30);
pub const SOUND_RETENTION: Duration = Duration::from_secs(60);
pub const PARTICLE_RETENTION: Duration = Duration::from_secs(30);
pub const EFFECT_USAGE_RETENTION: Duration = Duration::from_secs(60);

/// Anything with a creation timestamp can live in an ephemeral store
pub trait Timestamped {
    fn timestamp(&self) -> HubTime;
}

impl Timestamped for HolographicEffect {
    fn timestamp(&self) -> HubTime {
        self.created_at
    }
}

impl Timestamped for SoundEffect {
    fn timestamp(&self) -> HubTime {
        self.created_at
    }
}

impl Timestamped for ParticleEffect {
    fn timestamp(&self) -> HubTime {
        self.created_at
    }
}

/// Effect names requested alongside a message, kept for the query surface
#[derive(Clone, Debug, PartialEq)]
pub struct EffectUsage {
    pub message_id: MessageId,
    pub author: ParticipantId,
    pub author_name: String,
    pub effects: Vec<String>,
    pub created_at: HubTime,
}

impl Timestamped for EffectUsage {
    fn timestamp(&self) -> HubTime {
        self.created_at
    }
}

/// Append-only store pruned by record age
///
/// Records arrive in timestamp order (the hub is the single writer), so
/// purging pops from the front only.
#[derive(Debug)]
pub struct EphemeralStore<T: Timestamped> {
    records: VecDeque<T>,
    retention: Duration,
}

impl<T: Timestamped> EphemeralStore<T> {
    pub fn new(retention: Duration) -> Self {
        EphemeralStore {
            records: VecDeque::new(),
            retention,
        }
    }

    pub fn push(&mut self, record: T) {
        self.records.push_back(record);
    }

    /// Drop records older than the retention window; returns how many
    pub fn purge(&mut self, now: HubTime) -> usize {
        let cutoff = now.saturating_sub(self.retention);
        let mut purged = 0;
        while let Some(front) = self.records.front() {
            if front.timestamp() >= cutoff {
                break;
            }
            self.records.pop_front();
            purged += 1;
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }
}

/// All ephemeral stores, grouped for the sweep
#[derive(Debug)]
pub struct EphemeralStores {
    pub holographic: EphemeralStore<HolographicEffect>,
    pub sounds: EphemeralStore<SoundEffect>,
    pub particles: EphemeralStore<ParticleEffect>,
    pub effect_usage: EphemeralStore<EffectUsage>,
}

impl EphemeralStores {
    pub fn new() -> Self {
        EphemeralStores {
            holographic: EphemeralStore::new(VISUAL_RETENTION),
            sounds: EphemeralStore::new(SOUND_RETENTION),
            particles: EphemeralStore::new(PARTICLE_RETENTION),
            effect_usage: EphemeralStore::new(EFFECT_USAGE_RETENTION),
        }
    }

    /// Purge every store; returns the total number of dropped records
    pub fn purge_all(&mut self, now: HubTime) -> usize {
        self.holographic.purge(now)
            + self.sounds.purge(now)
            + self.particles.purge(now)
            + self.effect_usage.purge(now)
    }

    /// Total live records across all stores
    pub fn record_count(&self) -> usize {
        self.holographic.len() + self.sounds.len() + self.particles.len() + self.effect_usage.len()
    }
}

impl Default for EphemeralStores {
    fn default() -> Self {
        Self::new()
    }
}
