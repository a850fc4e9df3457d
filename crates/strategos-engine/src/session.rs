//! Conversation context storage for follow-up chat.

use dashmap::DashMap;

use strategos_core::{ConversationContext, ConversationId};

/// Key-value store of conversation contexts. A miss yields an empty context.
///
/// Concurrent turns on one conversation may race; the last `set` wins.
pub trait SessionStore: Send + Sync {
    fn get(&self, id: &ConversationId) -> ConversationContext;
    fn set(&self, id: &ConversationId, context: ConversationContext);
}

/// Process-lifetime store. Entries are never evicted.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<ConversationId, ConversationContext>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, id: &ConversationId) -> ConversationContext {
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    fn set(&self, id: &ConversationId, context: ConversationContext) {
        let _ = self.sessions.insert(id.clone(), context);
    }
}
