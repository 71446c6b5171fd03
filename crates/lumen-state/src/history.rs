//! Bounded message history
//!
//! Insertion order, oldest evicted first. Ids are allocated here and
//! strictly increase for the lifetime of the hub.

use std::collections::VecDeque;

use lumen_core::{Message, MessageId};

/// Maximum retained messages
pub const HISTORY_LIMIT: usize = 100;

/// Messages shown to a newly connected participant
pub const RECENT_WINDOW: usize = 20;

#[derive(Debug)]
pub struct MessageHistory {
    messages: VecDeque<Message>,
    limit: usize,
    next_id: MessageId,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        MessageHistory {
            messages: VecDeque::with_capacity(limit.min(HISTORY_LIMIT)),
            limit,
            next_id: MessageId::new(1),
        }
    }

    /// Allocate the id for the next message
    pub fn allocate_id(&mut self) -> MessageId {
        let id = self.next_id;
        self.next_id = self.next_id.next();
        id
    }

    /// Append a message, evicting the oldest once over the limit
    pub fn push(&mut self, message: Message) {
        self.messages.push_back(message);
        while self.messages.len() > self.limit {
            self.messages.pop_front();
        }
    }

    /// The last `n` messages in send order
    pub fn recent(&self, n: usize) -> Vec<Message> {
        let skip = self.messages.len().saturating_sub(n);
        self.messages.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Re-apply the length bound; a no-op unless the limit was lowered.
    /// Returns how many messages were evicted.
    pub fn enforce_limit(&mut self) -> usize {
        let mut evicted = 0;
        while self.messages.len() > self.limit {
            self.messages.pop_front();
            evicted += 1;
        }
        evicted
    }
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new()
    }
}
