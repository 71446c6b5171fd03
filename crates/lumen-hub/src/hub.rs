//! The hub engine
//!
//! `Hub` is the single owner of all shared session state. It is fully
//! synchronous and deterministic: the runtime stamps every call with a
//! `HubTime` and the RNG seed is injectable, so every behavior is testable
//! without the actor loop. Handlers queue outbound events; the runtime
//! pops and routes them.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use lumen_catalog::{AchievementCatalog, EffectCatalog, PersonalityCatalog};
use lumen_core::{
    ClientEvent, CreateParticles, Environment, HolographicEffect, HolographicReaction, HubTime,
    LeaderboardEntry, Message, ParticipantId, ParticipantsUpdate, ParticleEffect, PlaySound,
    ServerEvent, SoundEffect, Vote, VoteCast, Welcome,
};
use lumen_state::{EphemeralStores, Leaderboard, MessageHistory, Registry};

use crate::{Deferred, HubConfig, Outbound};

/// Particle count when the wire field is absent
pub const DEFAULT_PARTICLE_COUNT: u32 = 12;

/// Sound volume when the wire field is absent (an explicit 0.0 survives)
pub const DEFAULT_SOUND_VOLUME: f32 = 1.0;

/// Running counters, mostly for logs and tests
#[derive(Clone, Copy, Debug, Default)]
pub struct HubStats {
    pub events_in: u64,
    pub messages: u64,
    pub effects_activated: u64,
    pub achievements_unlocked: u64,
    pub ambient_scheduled: u64,
    pub ambient_fired: u64,
    pub sweeps: u64,
    pub records_purged: u64,
    pub dropped_unknown: u64,
}

/// Result of one cleanup sweep
#[derive(Clone, Copy, Debug, Default)]
pub struct SweepReport {
    pub records_purged: usize,
    pub effects_expired: usize,
    pub messages_evicted: usize,
}

/// The interaction engine
pub struct Hub {
    pub(crate) config: HubConfig,
    pub(crate) effects: EffectCatalog,
    pub(crate) achievements: AchievementCatalog,
    pub(crate) personalities: PersonalityCatalog,
    pub(crate) registry: Registry,
    pub(crate) history: MessageHistory,
    pub(crate) stores: EphemeralStores,
    pub(crate) leaderboard: Leaderboard,
    pub(crate) environment: Environment,
    pub(crate) outgoing: VecDeque<Outbound>,
    pub(crate) deferred: Vec<Deferred>,
    pub(crate) rng: StdRng,
    pub(crate) stats: HubStats,
}

impl Hub {
    /// Create a hub with the built-in catalogs
    pub fn new(config: HubConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let personalities = PersonalityCatalog::builtin();
        if personalities.get(&config.personality).is_none() {
            warn!(
                personality = %config.personality,
                "configured personality not in catalog, ambient responder will stay quiet"
            );
        }

        Hub {
            leaderboard: Leaderboard::with_top_n(config.leaderboard_top_n),
            config,
            effects: EffectCatalog::builtin(),
            achievements: AchievementCatalog::builtin(),
            personalities,
            registry: Registry::new(),
            history: MessageHistory::new(),
            stores: EphemeralStores::new(),
            environment: Environment::default(),
            outgoing: VecDeque::new(),
            deferred: Vec::new(),
            rng,
            stats: HubStats::default(),
        }
    }

    // -----------------------------------------------------------------
    // Transport-level lifecycle
    // -----------------------------------------------------------------

    /// A participant connected; register them and send the initial state
    pub fn connect(&mut self, id: ParticipantId, now: HubTime) {
        if let Err(err) = self.registry.register(id.clone(), now) {
            warn!(%err, "registration rejected");
            return;
        }
        self.leaderboard.recompute(&self.registry);

        if let Some(welcome) = self.build_welcome(&id) {
            self.queue_to(id, ServerEvent::Welcome(welcome));
        }
        self.queue_roster_update();
    }

    /// A participant disconnected; idempotent
    pub fn disconnect(&mut self, id: &ParticipantId, _now: HubTime) {
        if self.registry.remove(id).is_none() {
            return;
        }
        self.leaderboard.recompute(&self.registry);
        self.queue_roster_update();
    }

    // -----------------------------------------------------------------
    // Inbound event dispatch
    // -----------------------------------------------------------------

    pub fn handle(&mut self, id: &ParticipantId, event: ClientEvent, now: HubTime) {
        self.stats.events_in += 1;
        match event {
            ClientEvent::SetName { name } => self.set_name(id, name),
            ClientEvent::SendMessage(payload) => self.submit_message(id, payload, now),
            ClientEvent::ActivateEffect { effect } => self.activate_effect(id, &effect, now),
            ClientEvent::HolographicReaction(payload) => {
                self.holographic_reaction(id, payload, now)
            }
            ClientEvent::PlaySound(payload) => self.play_sound(id, payload, now),
            ClientEvent::CreateParticles(payload) => self.create_particles(id, payload, now),
            ClientEvent::ChangeEnvironment { environment } => {
                self.change_environment(&environment)
            }
            ClientEvent::Vote(payload) => self.vote(id, payload, now),
        }
    }

    fn set_name(&mut self, id: &ParticipantId, name: String) {
        let Some(participant) = self.registry.lookup_mut(id) else {
            self.drop_unknown(id, "set_name");
            return;
        };
        participant.name = name;

        self.award(id, lumen_catalog::FIRST_CONTACT);
        // the unlock reward is a point mutation of its own
        self.check_point_rules(id);

        self.leaderboard.recompute(&self.registry);
        self.queue_roster_update();
    }

    fn holographic_reaction(
        &mut self,
        id: &ParticipantId,
        payload: HolographicReaction,
        now: HubTime,
    ) {
        let Some(participant) = self.registry.lookup(id) else {
            self.drop_unknown(id, "holographic_reaction");
            return;
        };
        let event = HolographicEffect {
            participant_id: participant.id.clone(),
            participant_name: participant.name.clone(),
            kind: payload.kind,
            position: payload.position,
            created_at: now,
        };
        self.stores.holographic.push(event.clone());
        self.queue_broadcast(ServerEvent::HolographicEffect(event));
    }

    fn play_sound(&mut self, id: &ParticipantId, payload: PlaySound, now: HubTime) {
        let Some(participant) = self.registry.lookup(id) else {
            self.drop_unknown(id, "play_sound");
            return;
        };
        let event = SoundEffect {
            participant_id: participant.id.clone(),
            participant_name: participant.name.clone(),
            sound: payload.sound,
            volume: payload.volume.unwrap_or(DEFAULT_SOUND_VOLUME),
            created_at: now,
        };
        self.stores.sounds.push(event.clone());
        self.queue_broadcast(ServerEvent::SoundEffect(event));
    }

    fn create_particles(&mut self, id: &ParticipantId, payload: CreateParticles, now: HubTime) {
        let Some(participant) = self.registry.lookup(id) else {
            self.drop_unknown(id, "create_particles");
            return;
        };
        let event = ParticleEffect {
            participant_id: participant.id.clone(),
            participant_name: participant.name.clone(),
            kind: payload.kind,
            position: payload.position,
            count: payload.count.unwrap_or(DEFAULT_PARTICLE_COUNT),
            created_at: now,
        };
        self.stores.particles.push(event.clone());
        self.queue_broadcast(ServerEvent::ParticleEffect(event));
    }

    fn change_environment(&mut self, raw: &str) {
        let Some(environment) = Environment::parse(raw) else {
            debug!(value = raw, "invalid environment value ignored");
            return;
        };
        self.environment = environment;
        self.queue_broadcast(ServerEvent::EnvironmentChanged { environment });
    }

    fn vote(&mut self, id: &ParticipantId, payload: Vote, now: HubTime) {
        let Some(participant) = self.registry.lookup(id) else {
            self.drop_unknown(id, "vote");
            return;
        };
        let event = VoteCast {
            participant_id: participant.id.clone(),
            participant_name: participant.name.clone(),
            option: payload.option,
            effect: payload.effect,
            cast_at: now,
        };
        self.queue_broadcast(ServerEvent::VoteCast(event));
    }

    // -----------------------------------------------------------------
    // Cleanup and deferred work
    // -----------------------------------------------------------------

    /// Periodic cleanup: purge ephemeral stores, prune expired effect
    /// instances, re-apply the history bound
    pub fn sweep(&mut self, now: HubTime) -> SweepReport {
        let records_purged = self.stores.purge_all(now);
        let mut effects_expired = 0;
        for participant in self.registry.iter_mut() {
            effects_expired += participant.prune_expired_effects(now);
        }
        let messages_evicted = self.history.enforce_limit();

        self.stats.sweeps += 1;
        self.stats.records_purged += records_purged as u64;
        debug!(records_purged, effects_expired, messages_evicted, "sweep complete");

        SweepReport {
            records_purged,
            effects_expired,
            messages_evicted,
        }
    }

    /// Move due deferred broadcasts into the outgoing queue, oldest first.
    /// Returns how many fired.
    pub fn release_due(&mut self, now: HubTime) -> usize {
        if self.deferred.is_empty() {
            return 0;
        }
        let mut due: Vec<Deferred> = Vec::new();
        self.deferred.retain(|entry| {
            if entry.fire_at <= now {
                due.push(entry.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|entry| entry.fire_at);

        let fired = due.len();
        for entry in due {
            self.stats.ambient_fired += 1;
            self.queue_broadcast(entry.event);
        }
        fired
    }

    // -----------------------------------------------------------------
    // Outbound queue
    // -----------------------------------------------------------------

    pub fn pop_outgoing(&mut self) -> Option<Outbound> {
        self.outgoing.pop_front()
    }

    pub fn drain_outgoing(&mut self) -> Vec<Outbound> {
        self.outgoing.drain(..).collect()
    }

    pub(crate) fn queue_broadcast(&mut self, event: ServerEvent) {
        self.outgoing.push_back(Outbound::Broadcast(event));
    }

    pub(crate) fn queue_to(&mut self, id: ParticipantId, event: ServerEvent) {
        self.outgoing.push_back(Outbound::To(id, event));
    }

    /// Roster broadcast after any membership, name, or point change
    pub(crate) fn queue_roster_update(&mut self) {
        let participants = self.registry.snapshot();
        self.queue_broadcast(ServerEvent::ParticipantsUpdate(ParticipantsUpdate {
            count: participants.len(),
            participants,
        }));
    }

    pub(crate) fn drop_unknown(&mut self, id: &ParticipantId, op: &str) {
        self.stats.dropped_unknown += 1;
        debug!(participant = %id, op, "event from unknown participant dropped");
    }

    fn build_welcome(&self, id: &ParticipantId) -> Option<Welcome> {
        let participant = self.registry.lookup(id)?;
        Some(Welcome {
            participant_id: participant.id.clone(),
            name: participant.name.clone(),
            points: participant.points,
            level: participant.level(),
            effects: self.effects.infos(),
            achievements: self.achievements.infos(),
            environment: self.environment,
            recent_messages: self.history.recent(self.config.recent_window),
            leaderboard: self.leaderboard.to_vec(),
        })
    }

    // -----------------------------------------------------------------
    // Read-only queries (also backing the published snapshot)
    // -----------------------------------------------------------------

    pub fn participant_count(&self) -> usize {
        self.registry.len()
    }

    pub fn message_count(&self) -> usize {
        self.history.len()
    }

    /// Live ephemeral records across all stores
    pub fn effect_count(&self) -> usize {
        self.stores.record_count()
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        self.leaderboard.entries()
    }

    pub fn recent_messages(&self, n: usize) -> Vec<Message> {
        self.history.recent(n)
    }

    pub fn pending_responses(&self) -> usize {
        self.deferred.len()
    }

    pub fn stats(&self) -> HubStats {
        self.stats
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lumen_core::Position;

    pub(crate) fn t(secs: i64) -> HubTime {
        HubTime::from_secs(secs)
    }

    pub(crate) fn seeded() -> Hub {
        Hub::new(HubConfig {
            rng_seed: Some(42),
            ambient_probability: 0.0,
            ..HubConfig::default()
        })
    }

    pub(crate) fn join(hub: &mut Hub, id: &str) -> ParticipantId {
        let id = ParticipantId::new(id);
        hub.connect(id.clone(), t(0));
        hub.drain_outgoing();
        id
    }

    #[test]
    fn test_connect_sends_welcome_then_roster() {
        let mut hub = seeded();
        hub.connect(ParticipantId::new("a"), t(0));
        let outbound = hub.drain_outgoing();

        assert_eq!(outbound.len(), 2);
        match &outbound[0] {
            Outbound::To(id, ServerEvent::Welcome(welcome)) => {
                assert_eq!(id.as_str(), "a");
                assert_eq!(welcome.points, 500);
                assert_eq!(welcome.name, "Anonymous");
                assert!(!welcome.effects.is_empty());
                assert!(!welcome.achievements.is_empty());
                assert!(welcome.recent_messages.is_empty());
            }
            other => panic!("expected targeted welcome, got {other:?}"),
        }
        match &outbound[1] {
            Outbound::Broadcast(ServerEvent::ParticipantsUpdate(update)) => {
                assert_eq!(update.count, 1);
            }
            other => panic!("expected roster broadcast, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_connect_rejected_without_output() {
        let mut hub = seeded();
        join(&mut hub, "a");

        hub.connect(ParticipantId::new("a"), t(1));

        assert!(hub.drain_outgoing().is_empty());
        assert_eq!(hub.participant_count(), 1);
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let mut hub = seeded();
        let a = join(&mut hub, "a");

        hub.disconnect(&a, t(1));
        assert_eq!(hub.drain_outgoing().len(), 1);
        assert_eq!(hub.participant_count(), 0);

        hub.disconnect(&a, t(2));
        assert!(hub.drain_outgoing().is_empty());
    }

    #[test]
    fn test_unknown_participant_events_dropped_silently() {
        let mut hub = seeded();
        let ghost = ParticipantId::new("ghost");

        hub.handle(
            &ghost,
            ClientEvent::SetName {
                name: "Casper".to_owned(),
            },
            t(1),
        );
        hub.handle(
            &ghost,
            ClientEvent::Vote(Vote {
                option: "a".to_owned(),
                effect: None,
            }),
            t(1),
        );

        assert!(hub.drain_outgoing().is_empty());
        assert_eq!(hub.stats().dropped_unknown, 2);
    }

    #[test]
    fn test_environment_change_valid_and_invalid() {
        let mut hub = seeded();
        join(&mut hub, "a");

        hub.handle(
            &ParticipantId::new("a"),
            ClientEvent::ChangeEnvironment {
                environment: "ocean".to_owned(),
            },
            t(1),
        );
        let outbound = hub.drain_outgoing();
        assert!(matches!(
            outbound[0],
            Outbound::Broadcast(ServerEvent::EnvironmentChanged {
                environment: Environment::Ocean
            })
        ));
        assert_eq!(hub.environment(), Environment::Ocean);

        hub.handle(
            &ParticipantId::new("a"),
            ClientEvent::ChangeEnvironment {
                environment: "volcano".to_owned(),
            },
            t(2),
        );
        assert!(hub.drain_outgoing().is_empty());
        assert_eq!(hub.environment(), Environment::Ocean);
    }

    #[test]
    fn test_vote_broadcast_only_no_mutation() {
        let mut hub = seeded();
        let a = join(&mut hub, "a");
        let before = hub.registry.lookup(&a).unwrap().points;

        hub.handle(
            &a,
            ClientEvent::Vote(Vote {
                option: "red".to_owned(),
                effect: Some("confetti".to_owned()),
            }),
            t(1),
        );

        let outbound = hub.drain_outgoing();
        assert_eq!(outbound.len(), 1);
        match &outbound[0] {
            Outbound::Broadcast(ServerEvent::VoteCast(vote)) => {
                assert_eq!(vote.option, "red");
                assert_eq!(vote.effect.as_deref(), Some("confetti"));
            }
            other => panic!("expected vote broadcast, got {other:?}"),
        }
        assert_eq!(hub.registry.lookup(&a).unwrap().points, before);
    }

    #[test]
    fn test_sound_volume_default_and_explicit_zero() {
        let mut hub = seeded();
        let a = join(&mut hub, "a");

        hub.handle(
            &a,
            ClientEvent::PlaySound(PlaySound {
                sound: "bell".to_owned(),
                volume: None,
            }),
            t(1),
        );
        hub.handle(
            &a,
            ClientEvent::PlaySound(PlaySound {
                sound: "bell".to_owned(),
                volume: Some(0.0),
            }),
            t(2),
        );

        let volumes: Vec<f32> = hub
            .drain_outgoing()
            .iter()
            .filter_map(|o| match o.event() {
                ServerEvent::SoundEffect(sound) => Some(sound.volume),
                _ => None,
            })
            .collect();
        assert_eq!(volumes, vec![1.0, 0.0]);
    }

    #[test]
    fn test_particles_default_count() {
        let mut hub = seeded();
        let a = join(&mut hub, "a");

        hub.handle(
            &a,
            ClientEvent::CreateParticles(CreateParticles {
                kind: "stars".to_owned(),
                position: Position::ORIGIN,
                count: None,
            }),
            t(1),
        );

        match &hub.drain_outgoing()[0] {
            Outbound::Broadcast(ServerEvent::ParticleEffect(burst)) => {
                assert_eq!(burst.count, DEFAULT_PARTICLE_COUNT);
            }
            other => panic!("expected particle broadcast, got {other:?}"),
        }
    }

    #[test]
    fn test_reactions_attach_author_and_land_in_store() {
        let mut hub = seeded();
        let a = join(&mut hub, "a");
        hub.handle(
            &a,
            ClientEvent::SetName {
                name: "Ada".to_owned(),
            },
            t(0),
        );
        hub.drain_outgoing();

        hub.handle(
            &a,
            ClientEvent::HolographicReaction(HolographicReaction {
                kind: "heart".to_owned(),
                position: Position { x: 1.0, y: 2.0, z: 0.0 },
            }),
            t(1),
        );

        match &hub.drain_outgoing()[0] {
            Outbound::Broadcast(ServerEvent::HolographicEffect(reaction)) => {
                assert_eq!(reaction.participant_name, "Ada");
                assert_eq!(reaction.kind, "heart");
            }
            other => panic!("expected holographic broadcast, got {other:?}"),
        }
        assert_eq!(hub.effect_count(), 1);
    }

    #[test]
    fn test_sweep_purges_stores_and_expired_effects() {
        let mut hub = seeded();
        let a = join(&mut hub, "a");

        hub.handle(
            &a,
            ClientEvent::HolographicReaction(HolographicReaction {
                kind: "heart".to_owned(),
                position: Position::ORIGIN,
            }),
            t(0),
        );
        hub.handle(
            &a,
            ClientEvent::ActivateEffect {
                effect: "rainbow_trail".to_owned(),
            },
            t(0),
        );
        hub.drain_outgoing();
        assert_eq!(hub.effect_count(), 1);

        let report = hub.sweep(t(61));

        assert_eq!(report.records_purged, 1);
        assert_eq!(report.effects_expired, 1);
        assert_eq!(hub.effect_count(), 0);
        assert!(hub.registry.lookup(&a).unwrap().active_effects.is_empty());
    }

    #[test]
    fn test_welcome_carries_recent_history_and_leaderboard() {
        let mut hub = seeded();
        let a = join(&mut hub, "a");
        for i in 0..3 {
            hub.handle(
                &a,
                ClientEvent::SendMessage(lumen_core::SendMessage {
                    text: format!("m{i}"),
                    effects: Vec::new(),
                    kind: "chat".to_owned(),
                    holographic: false,
                    sound_effect: None,
                }),
                t(i),
            );
        }
        hub.drain_outgoing();

        hub.connect(ParticipantId::new("b"), t(10));
        let outbound = hub.drain_outgoing();
        match &outbound[0] {
            Outbound::To(_, ServerEvent::Welcome(welcome)) => {
                assert_eq!(welcome.recent_messages.len(), 3);
                assert_eq!(welcome.leaderboard.len(), 2);
                // "a" earned message rewards, so they lead
                assert_eq!(welcome.leaderboard[0].id.as_str(), "a");
            }
            other => panic!("expected welcome, got {other:?}"),
        }
    }
}
