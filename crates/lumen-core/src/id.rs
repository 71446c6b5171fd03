//! Identity types for the LUMEN hub
//!
//! Participant identity is the opaque connection id handed to us by the
//! transport layer; the hub never parses or generates it. Message ids are
//! allocated by the hub and strictly increase for the lifetime of the
//! process.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Participant identity - the transport connection id, treated as opaque
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        ParticipantId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Participant({})", self.0)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        ParticipantId(id.to_owned())
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        ParticipantId(id)
    }
}

/// Message identity - hub-allocated, strictly increasing
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl MessageId {
    pub const ZERO: MessageId = MessageId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        MessageId(id)
    }

    /// The id following this one
    #[inline]
    pub fn next(self) -> Self {
        MessageId(self.0 + 1)
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Msg({})", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_opaque() {
        let id = ParticipantId::new("conn-42");
        assert_eq!(id.as_str(), "conn-42");
        assert_eq!(format!("{:?}", id), "Participant(conn-42)");
    }

    #[test]
    fn test_message_id_strictly_increasing() {
        let id = MessageId::new(7);
        assert!(id.next() > id);
        assert_eq!(id.next(), MessageId::new(8));
    }
}
