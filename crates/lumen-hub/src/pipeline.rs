//! Message pipeline - validation, enrichment, history, rewards
//!
//! Events from ids not in the registry are dropped without a response;
//! that is stale client state, not a fault.

use lumen_core::{HubTime, Message, ParticipantId, SendMessage, ServerEvent};
use lumen_state::EffectUsage;

use crate::Hub;

impl Hub {
    pub(crate) fn submit_message(&mut self, id: &ParticipantId, payload: SendMessage, now: HubTime) {
        let reward =
            self.config.message_reward + payload.effects.len() as i64 * self.config.effect_bonus;
        let Some(participant) = self.registry.lookup_mut(id) else {
            self.drop_unknown(id, "send_message");
            return;
        };
        let author_name = participant.name.clone();
        participant.credit(reward);

        let message = Message {
            id: self.history.allocate_id(),
            author: id.clone(),
            author_name,
            text: payload.text,
            sent_at: now,
            effects: payload.effects,
            kind: payload.kind,
            holographic: payload.holographic,
            sound_effect: payload.sound_effect,
        };
        self.history.push(message.clone());
        self.stats.messages += 1;

        if !message.effects.is_empty() {
            self.stores.effect_usage.push(EffectUsage {
                message_id: message.id,
                author: message.author.clone(),
                author_name: message.author_name.clone(),
                effects: message.effects.clone(),
                created_at: now,
            });
        }

        self.queue_broadcast(ServerEvent::NewMessage(message));

        self.check_point_rules(id);
        self.leaderboard.recompute(&self.registry);
        self.queue_roster_update();

        self.maybe_schedule_ambient(now);
    }
}
