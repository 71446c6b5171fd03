//! Achievement engine - rule evaluation and awards
//!
//! Rules are evaluated after any mutating operation that could satisfy
//! them. Each rule is idempotent (already-unlocked ids are skipped) and
//! independent: when one event satisfies several rules, all of them fire.
//! Unlock notifications are targeted at the author, never broadcast.

use tracing::warn;

use lumen_catalog::{CREATIVE_GENIUS, EFFECT_MASTER};
use lumen_core::{AchievementUnlocked, ParticipantId, ServerEvent};

use crate::Hub;

/// creative_genius unlocks at this cumulative balance
pub const CREATIVE_GENIUS_THRESHOLD: i64 = 1000;

/// effect_master unlocks at this lifetime activation count
pub const EFFECT_MASTER_THRESHOLD: u64 = 5;

impl Hub {
    /// Grant an achievement if not already unlocked.
    /// Credits the reward and queues the targeted notification.
    /// Returns true when the unlock happened now.
    pub(crate) fn award(&mut self, id: &ParticipantId, achievement_id: &str) -> bool {
        let Some(def) = self.achievements.get(achievement_id).copied() else {
            warn!(achievement_id, "award for unknown achievement id skipped");
            return false;
        };
        let Some(participant) = self.registry.lookup_mut(id) else {
            return false;
        };
        if !participant.grant_achievement(def.id) {
            return false;
        }
        participant.credit(def.reward as i64);
        let balance = participant.points;

        self.stats.achievements_unlocked += 1;
        self.queue_to(
            id.clone(),
            ServerEvent::AchievementUnlocked(AchievementUnlocked {
                id: def.id.to_owned(),
                label: def.label.to_owned(),
                reward: def.reward,
                balance,
            }),
        );
        true
    }

    /// Rules derived from the point balance
    pub(crate) fn check_point_rules(&mut self, id: &ParticipantId) {
        let points = match self.registry.lookup(id) {
            Some(participant) => participant.points,
            None => return,
        };
        if points >= CREATIVE_GENIUS_THRESHOLD {
            self.award(id, CREATIVE_GENIUS);
        }
    }

    /// Rules derived from the lifetime activation counter
    pub(crate) fn check_effect_rules(&mut self, id: &ParticipantId) {
        let activated = match self.registry.lookup(id) {
            Some(participant) => participant.effects_activated,
            None => return,
        };
        if activated >= EFFECT_MASTER_THRESHOLD {
            self.award(id, EFFECT_MASTER);
        }
    }
}
