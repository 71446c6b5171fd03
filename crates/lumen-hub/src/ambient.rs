//! Ambient responder - system-authored chat presence
//!
//! After a qualifying chat event the hub rolls a fixed probability and, on
//! success, schedules one delayed `ai_response` broadcast. The phrase and
//! delay are chosen at scheduling time; firing is the runtime's job via
//! `Hub::release_due`.

use rand::Rng;

use lumen_catalog::Personality;
use lumen_core::{AiResponse, HubTime, ServerEvent};

use crate::{Deferred, Hub};

/// Pick a response line uniformly at random from the personality's fixed
/// phrase set. `None` only for an empty phrase table.
pub fn respond<R: Rng>(personality: &Personality, rng: &mut R) -> Option<&'static str> {
    if personality.phrases.is_empty() {
        return None;
    }
    let pick = rng.gen_range(0..personality.phrases.len());
    Some(personality.phrases[pick])
}

impl Hub {
    pub(crate) fn maybe_schedule_ambient(&mut self, now: HubTime) {
        if !self.rng.gen_bool(self.config.ambient_probability) {
            return;
        }
        let Some(personality) = self.personalities.get(&self.config.personality).copied() else {
            return;
        };

        let min = self.config.ambient_delay_min.as_millis() as i64;
        let max = self.config.ambient_delay_max.as_millis() as i64;
        let delay = if max > min {
            self.rng.gen_range(min..=max)
        } else {
            min
        };
        let Some(text) = respond(&personality, &mut self.rng) else {
            return;
        };

        let fire_at = HubTime::from_millis(now.as_millis() + delay);
        let event = ServerEvent::AiResponse(AiResponse {
            text: text.to_owned(),
            personality: personality.name.to_owned(),
            sent_at: fire_at,
        });

        self.deferred.push(Deferred { fire_at, event });
        self.stats.ambient_scheduled += 1;
    }
}
