//! Effect economy - point-gated cosmetic activations
//!
//! Debits are all-or-nothing: the activation is rejected before any state
//! changes when the balance cannot cover the cost. A balance is never
//! observed negative as a result of an activation.

use tracing::warn;

use lumen_core::{EffectActivated, HubTime, InsufficientPoints, ParticipantId, ServerEvent};
use lumen_state::ActiveEffect;

use crate::Hub;

impl Hub {
    pub(crate) fn activate_effect(&mut self, id: &ParticipantId, effect_name: &str, now: HubTime) {
        // Unknown effects have no outbound vocabulary entry; like an invalid
        // environment value they are dropped without a response.
        let Some(def) = self.effects.get(effect_name).copied() else {
            tracing::debug!(effect = effect_name, "unknown effect ignored");
            return;
        };
        let Some(participant) = self.registry.lookup_mut(id) else {
            self.drop_unknown(id, "activate_effect");
            return;
        };

        let cost = def.cost as i64;
        if participant.points < cost {
            let current = participant.points;
            self.queue_to(
                id.clone(),
                ServerEvent::InsufficientPoints(InsufficientPoints {
                    effect: def.name.to_owned(),
                    required: cost,
                    current,
                }),
            );
            return;
        }

        if let Err(err) = participant.debit(cost) {
            // unreachable given the check above; treated as an invariant
            // violation: reject the operation, state unchanged
            warn!(%err, "activation debit rejected");
            return;
        }
        participant
            .active_effects
            .push(ActiveEffect::new(def.name, def.duration_secs, now));
        participant.effects_activated += 1;
        let participant_name = participant.name.clone();

        self.stats.effects_activated += 1;
        self.queue_broadcast(ServerEvent::EffectActivated(EffectActivated {
            participant_id: id.clone(),
            participant_name,
            effect: def.name.to_owned(),
            duration_secs: def.duration_secs,
            activated_at: now,
        }));

        self.check_effect_rules(id);
        // an effect_master reward is a point mutation of its own
        self.check_point_rules(id);

        self.leaderboard.recompute(&self.registry);
        self.queue_roster_update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::tests::{join, seeded, t};
    use crate::Outbound;
    use lumen_core::ClientEvent;
    use proptest::prelude::*;

    fn activate(hub: &mut Hub, id: &ParticipantId, effect: &str, at: i64) {
        hub.handle(
            id,
            ClientEvent::ActivateEffect {
                effect: effect.to_owned(),
            },
            t(at),
        );
    }

    #[test]
    fn test_rainbow_trail_scenario() {
        let mut hub = seeded();
        let a = join(&mut hub, "a");

        activate(&mut hub, &a, "rainbow_trail", 1);

        assert_eq!(hub.registry.lookup(&a).unwrap().points, 450);
        let outbound = hub.drain_outgoing();
        match &outbound[0] {
            Outbound::Broadcast(ServerEvent::EffectActivated(activated)) => {
                assert_eq!(activated.effect, "rainbow_trail");
                assert_eq!(activated.duration_secs, 10);
                assert_eq!(activated.activated_at, t(1));
            }
            other => panic!("expected activation broadcast, got {other:?}"),
        }
        // roster follows with the updated balance
        assert!(matches!(
            outbound.last(),
            Some(Outbound::Broadcast(ServerEvent::ParticipantsUpdate(_)))
        ));
    }

    #[test]
    fn test_insufficient_points_targeted_with_amounts() {
        let mut hub = seeded();
        let a = join(&mut hub, "a");

        // 500 - 200 - 200 leaves 100, below pixel_storm's cost
        activate(&mut hub, &a, "pixel_storm", 1);
        activate(&mut hub, &a, "pixel_storm", 2);
        hub.drain_outgoing();

        activate(&mut hub, &a, "pixel_storm", 3);

        let outbound = hub.drain_outgoing();
        assert_eq!(outbound.len(), 1);
        match &outbound[0] {
            Outbound::To(id, ServerEvent::InsufficientPoints(rejected)) => {
                assert_eq!(id, &a);
                assert_eq!(rejected.required, 200);
                assert_eq!(rejected.current, 100);
            }
            other => panic!("expected targeted rejection, got {other:?}"),
        }
        // no partial debit
        assert_eq!(hub.registry.lookup(&a).unwrap().points, 100);
        assert_eq!(hub.registry.lookup(&a).unwrap().active_effects.len(), 2);
    }

    #[test]
    fn test_unknown_effect_no_state_change() {
        let mut hub = seeded();
        let a = join(&mut hub, "a");

        activate(&mut hub, &a, "time_travel", 1);

        assert!(hub.drain_outgoing().is_empty());
        assert_eq!(hub.registry.lookup(&a).unwrap().points, 500);
    }

    #[test]
    fn test_activation_records_instance_with_timestamp() {
        let mut hub = seeded();
        let a = join(&mut hub, "a");

        activate(&mut hub, &a, "sparkle_aura", 7);

        let participant = hub.registry.lookup(&a).unwrap();
        assert_eq!(participant.active_effects.len(), 1);
        assert_eq!(participant.active_effects[0].name, "sparkle_aura");
        assert_eq!(participant.active_effects[0].activated_at, t(7));
        assert_eq!(participant.effects_activated, 1);
    }

    proptest! {
        #[test]
        fn prop_balance_never_negative(names in proptest::collection::vec(0usize..8, 0..60)) {
            let catalog = ["rainbow_trail", "sparkle_aura", "neon_pulse", "golden_glow",
                           "echo_voice", "pixel_storm", "nope", "also_missing"];
            let mut hub = seeded();
            let a = join(&mut hub, "a");

            for (i, pick) in names.iter().enumerate() {
                activate(&mut hub, &a, catalog[*pick], i as i64);
                let points = hub.registry.lookup(&a).unwrap().points;
                prop_assert!(points >= 0, "balance went negative: {points}");
            }
        }
    }
}
