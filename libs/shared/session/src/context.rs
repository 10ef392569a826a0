use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::store::SessionStore;

const EVENT_CAPACITY: usize = 16;

/// Published when the server rejects the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInvalidated;

/// Shared handle to the session: the token store plus the invalidation
/// channel. Clones share both.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    events: broadcast::Sender<SessionInvalidated>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("has_token", &self.store.read().is_some())
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { store, events }
    }

    pub fn token(&self) -> Option<String> {
        self.store.read()
    }

    pub fn has_token(&self) -> bool {
        self.store.read().is_some()
    }

    pub fn establish(&self, token: &str) {
        self.store.save(token);
        info!("Session established");
    }

    /// Logout. Clears the token without notifying subscribers.
    pub fn end(&self) {
        self.store.clear();
        info!("Session ended");
    }

    /// Clears the token and publishes exactly one `SessionInvalidated`.
    pub fn invalidate(&self) {
        self.store.clear();
        warn!("Session invalidated by the server");

        match self.events.send(SessionInvalidated) {
            Ok(receivers) => debug!("Invalidation delivered to {} subscriber(s)", receivers),
            Err(_) => debug!("Invalidation published with no subscribers"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionInvalidated> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySessionStore;
    use tokio::sync::broadcast::error::TryRecvError;

    fn context_with(token: Option<&str>) -> SessionContext {
        let store = match token {
            Some(t) => MemorySessionStore::with_token(t),
            None => MemorySessionStore::new(),
        };
        SessionContext::new(Arc::new(store))
    }

    #[test]
    fn test_establish_and_end() {
        let session = context_with(None);
        let mut events = session.subscribe();

        session.establish("a.b.c");
        assert_eq!(session.token().as_deref(), Some("a.b.c"));

        session.end();
        assert!(!session.has_token());
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_invalidate_clears_and_publishes_once() {
        let session = context_with(Some("a.b.c"));
        let mut events = session.subscribe();

        session.invalidate();

        assert!(!session.has_token());
        assert_eq!(events.try_recv(), Ok(SessionInvalidated));
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_invalidate_without_subscribers_or_token() {
        let session = context_with(None);
        session.invalidate();
        session.invalidate();
        assert!(!session.has_token());
    }

    #[test]
    fn test_clones_share_store_and_channel() {
        let session = context_with(None);
        let other = session.clone();
        let mut events = session.subscribe();

        other.establish("x.y.z");
        assert_eq!(session.token().as_deref(), Some("x.y.z"));

        other.invalidate();
        assert_eq!(events.try_recv(), Ok(SessionInvalidated));
        assert!(!session.has_token());
    }
}
