use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ChatTurn, Session};

/// In-memory session store. Sessions live for the lifetime of the process —
/// there is deliberately no persistence and no eviction.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh session with a random id and returns it.
    pub async fn create(&self, remaining_questions: Vec<String>) -> Session {
        let session = Session::new(Uuid::new_v4().to_string(), remaining_questions);
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        session
    }

    /// Returns a snapshot of the session, or `SessionNotFound`.
    pub async fn snapshot(&self, id: &str) -> Result<Session, AppError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::SessionNotFound { id: id.to_string() })
    }

    /// Appends a user/assistant turn pair to the session's history.
    pub async fn append_turns(
        &self,
        id: &str,
        user: ChatTurn,
        assistant: ChatTurn,
    ) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| AppError::SessionNotFound { id: id.to_string() })?;
        session.turns.push(user);
        session.turns.push(assistant);
        Ok(())
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_unique_ids_and_stores_the_session() {
        let store = SessionStore::new();
        let a = store.create(vec!["q1".into()]).await;
        let b = store.create(vec![]).await;

        assert_ne!(a.id, b.id);
        assert_eq!(store.len().await, 2);

        let snap = store.snapshot(&a.id).await.unwrap();
        assert!(snap.turns.is_empty());
        assert_eq!(snap.remaining_questions, vec!["q1".to_string()]);
    }

    #[tokio::test]
    async fn snapshot_of_unknown_id_is_not_found() {
        let store = SessionStore::new();
        let err = store.snapshot("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn append_turns_extends_history_in_order() {
        let store = SessionStore::new();
        let session = store.create(vec![]).await;

        store
            .append_turns(&session.id, ChatTurn::user("hei"), ChatTurn::assistant("hallo"))
            .await
            .unwrap();

        let snap = store.snapshot(&session.id).await.unwrap();
        assert_eq!(snap.turns.len(), 2);
        assert_eq!(snap.turns[0].content, "hei");
        assert_eq!(snap.turns[1].content, "hallo");
    }

    #[tokio::test]
    async fn append_to_unknown_session_fails() {
        let store = SessionStore::new();
        let err = store
            .append_turns("nope", ChatTurn::user("a"), ChatTurn::assistant("b"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
