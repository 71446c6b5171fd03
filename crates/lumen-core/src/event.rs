//! Event model for the LUMEN hub
//!
//! Inbound events (participant -> hub) and outbound events (hub -> one or
//! all participants) are tagged JSON objects at the transport boundary.
//! Optional wire fields use explicit `Option`/`#[serde(default)]` defaults
//! so an explicit zero is never confused with an absent field.

use serde::{Deserialize, Serialize};

use crate::{HubTime, MessageId, ParticipantId};

/// A point in the shared scene, for reactions and particle bursts
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Position = Position {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}

/// The shared virtual-world backdrop, a closed set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Forest,
    Ocean,
    Space,
    City,
    Desert,
}

impl Environment {
    pub const ALL: [Environment; 5] = [
        Environment::Forest,
        Environment::Ocean,
        Environment::Space,
        Environment::City,
        Environment::Desert,
    ];

    /// Parse a wire value; unknown values return `None` so the caller can
    /// drop the event silently
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "forest" => Some(Environment::Forest),
            "ocean" => Some(Environment::Ocean),
            "space" => Some(Environment::Space),
            "city" => Some(Environment::City),
            "desert" => Some(Environment::Desert),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Forest => "forest",
            Environment::Ocean => "ocean",
            Environment::Space => "space",
            Environment::City => "city",
            Environment::Desert => "desert",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat message, immutable once created
///
/// Author name is captured at send time; a later rename does not rewrite
/// history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub author: ParticipantId,
    pub author_name: String,
    pub text: String,
    pub sent_at: HubTime,
    #[serde(default)]
    pub effects: Vec<String>,
    #[serde(rename = "type", default = "default_message_kind")]
    pub kind: String,
    #[serde(default)]
    pub holographic: bool,
    #[serde(default)]
    pub sound_effect: Option<String>,
}

fn default_message_kind() -> String {
    "chat".to_owned()
}

// ---------------------------------------------------------------------------
// Inbound events
// ---------------------------------------------------------------------------

/// Payload of `send_message`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub text: String,
    #[serde(default)]
    pub effects: Vec<String>,
    #[serde(rename = "type", default = "default_message_kind")]
    pub kind: String,
    #[serde(default)]
    pub holographic: bool,
    #[serde(default)]
    pub sound_effect: Option<String>,
}

/// Payload of `holographic_reaction`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolographicReaction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
}

/// Payload of `play_sound`
///
/// `volume: None` means the field was absent on the wire; an explicit 0.0
/// is preserved.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaySound {
    pub sound: String,
    #[serde(default)]
    pub volume: Option<f32>,
}

/// Payload of `create_particles`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParticles {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub count: Option<u32>,
}

/// Payload of `vote`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub option: String,
    #[serde(default)]
    pub effect: Option<String>,
}

/// Inbound participant event
///
/// Connect/disconnect are transport-level and do not appear here; the
/// runtime maps them onto registry register/remove directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    SetName { name: String },
    SendMessage(SendMessage),
    ActivateEffect { effect: String },
    HolographicReaction(HolographicReaction),
    PlaySound(PlaySound),
    CreateParticles(CreateParticles),
    ChangeEnvironment { environment: String },
    Vote(Vote),
}

// ---------------------------------------------------------------------------
// Outbound events
// ---------------------------------------------------------------------------

/// Catalog entry as sent in `welcome`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectInfo {
    pub name: String,
    pub label: String,
    pub cost: u32,
    pub duration_secs: u32,
}

/// Achievement catalog entry as sent in `welcome`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementInfo {
    pub id: String,
    pub label: String,
    pub reward: u32,
}

/// Public participant summary used in `participants_update`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub id: ParticipantId,
    pub name: String,
    pub points: i64,
    pub level: u32,
}

/// One leaderboard row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: ParticipantId,
    pub name: String,
    pub points: i64,
}

/// Initial state sent only to the connecting participant
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Welcome {
    pub participant_id: ParticipantId,
    pub name: String,
    pub points: i64,
    pub level: u32,
    pub effects: Vec<EffectInfo>,
    pub achievements: Vec<AchievementInfo>,
    pub environment: Environment,
    pub recent_messages: Vec<Message>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Roster broadcast after any membership or point change
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantsUpdate {
    pub count: usize,
    pub participants: Vec<ParticipantInfo>,
}

/// Broadcast when an effect purchase succeeds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectActivated {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub effect: String,
    pub duration_secs: u32,
    pub activated_at: HubTime,
}

/// Targeted notification for a newly unlocked achievement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementUnlocked {
    pub id: String,
    pub label: String,
    pub reward: u32,
    pub balance: i64,
}

/// Targeted rejection when a purchase cannot be covered
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsufficientPoints {
    pub effect: String,
    pub required: i64,
    pub current: i64,
}

/// Holographic reaction broadcast with author attached
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolographicEffect {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
    pub created_at: HubTime,
}

/// Sound play broadcast with author attached; absent volume resolved to 1.0
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundEffect {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub sound: String,
    pub volume: f32,
    pub created_at: HubTime,
}

/// Particle burst broadcast with author attached
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleEffect {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
    pub count: u32,
    pub created_at: HubTime,
}

/// Vote broadcast, no state mutation behind it
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCast {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub option: String,
    #[serde(default)]
    pub effect: Option<String>,
    pub cast_at: HubTime,
}

/// System-authored ambient chat line
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiResponse {
    pub text: String,
    pub personality: String,
    pub sent_at: HubTime,
}

/// Outbound hub event
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Welcome(Welcome),
    ParticipantsUpdate(ParticipantsUpdate),
    NewMessage(Message),
    EffectActivated(EffectActivated),
    AchievementUnlocked(AchievementUnlocked),
    InsufficientPoints(InsufficientPoints),
    HolographicEffect(HolographicEffect),
    SoundEffect(SoundEffect),
    ParticleEffect(ParticleEffect),
    EnvironmentChanged { environment: Environment },
    VoteCast(VoteCast),
    AiResponse(AiResponse),
}
