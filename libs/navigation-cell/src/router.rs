use tokio::sync::broadcast::{self, error::{RecvError, TryRecvError}};
use tracing::{info, warn};

use shared_session::{SessionContext, SessionInvalidated};

use crate::gate::AccessGate;
use crate::models::{GuardOutcome, View};

/// Tracks the current view. Every navigation goes through the gate, and an
/// invalidation published by the session forces the login view whatever
/// is showing.
pub struct ViewRouter {
    session: SessionContext,
    gate: AccessGate,
    current: View,
    invalidations: broadcast::Receiver<SessionInvalidated>,
}

impl ViewRouter {
    /// Subscribes to the session and routes to `initial` through the gate.
    pub fn new(session: SessionContext, gate: AccessGate, initial: View) -> Self {
        let invalidations = session.subscribe();
        let current = gate.evaluate(&initial, session.token().as_deref()).view().clone();

        Self {
            session,
            gate,
            current,
            invalidations,
        }
    }

    pub fn current(&self) -> &View {
        &self.current
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn navigate(&mut self, target: View) -> GuardOutcome {
        self.sync();

        let outcome = self.gate.evaluate(&target, self.session.token().as_deref());
        self.current = outcome.view().clone();
        outcome
    }

    /// Applies any invalidations received since the last call. Returns true
    /// if the router was forced to the login view.
    pub fn sync(&mut self) -> bool {
        let mut invalidated = false;

        loop {
            match self.invalidations.try_recv() {
                Ok(SessionInvalidated) => invalidated = true,
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Missed {} session event(s)", skipped);
                    invalidated = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        if invalidated {
            self.force_login();
        }
        invalidated
    }

    /// Waits for the next invalidation and redirects to login. Returns false
    /// only if the session channel has closed.
    pub async fn wait_for_invalidation(&mut self) -> bool {
        match self.invalidations.recv().await {
            Ok(SessionInvalidated) | Err(RecvError::Lagged(_)) => {
                self.force_login();
                true
            }
            Err(RecvError::Closed) => false,
        }
    }

    fn force_login(&mut self) {
        if self.current != View::Login {
            info!("Session invalidated, leaving {} for login", self.current);
        }
        self.current = View::Login;
    }
}
