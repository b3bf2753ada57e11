//! Session-scoped storage for in-progress mapping drafts
//!
//! Each session owns one draft. Callers hold a `SessionId` and edit the
//! draft through the store, so concurrent wizards never see each other's
//! entries.

use crate::reconcile::MappingDraft;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Opaque handle for one mapping session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Holds the mapping draft of every active session
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<SessionId, MappingDraft>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with an empty draft
    pub fn create(&mut self) -> SessionId {
        let id = SessionId::new();
        self.sessions.insert(id, MappingDraft::new());
        id
    }

    /// The draft for a session, if it is still active
    pub fn draft(&self, id: SessionId) -> Option<&MappingDraft> {
        self.sessions.get(&id)
    }

    /// Mutable access to a session's draft
    pub fn draft_mut(&mut self, id: SessionId) -> Option<&mut MappingDraft> {
        self.sessions.get_mut(&id)
    }

    /// End a session, returning its draft
    pub fn end(&mut self, id: SessionId) -> Option<MappingDraft> {
        self.sessions.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_starts_with_empty_draft() {
        let mut store = SessionStore::new();
        let id = store.create();
        assert!(store.draft(id).unwrap().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut store = SessionStore::new();
        let first = store.create();
        let second = store.create();

        store
            .draft_mut(first)
            .unwrap()
            .add_entry("name", "full_name");
        store.draft_mut(second).unwrap().add_entry("age", "years");
        store.draft_mut(second).unwrap().add_entry("city", "town");

        assert_eq!(store.draft(first).unwrap().len(), 1);
        assert_eq!(store.draft(second).unwrap().len(), 2);
        assert_eq!(store.draft(first).unwrap().entries()[0].source, "name");
    }

    #[test]
    fn test_end_removes_session() {
        let mut store = SessionStore::new();
        let id = store.create();
        store.draft_mut(id).unwrap().add_entry("a", "b");

        let draft = store.end(id).unwrap();
        assert_eq!(draft.len(), 1);
        assert!(store.draft(id).is_none());
        assert!(store.end(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_session_yields_none() {
        let mut store = SessionStore::new();
        let id = store.create();
        store.end(id);
        assert!(store.draft_mut(id).is_none());
    }
}
