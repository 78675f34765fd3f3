//! View scopes for asynchronous game commands.
//!
//! A command captures a [`ScopeToken`] when it starts. Navigating away
//! advances the [`ViewScope`], after which every token issued earlier is
//! stale and the command's results are discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use derive_new::new;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, instrument};

use crate::event::AppEvent;
use crate::store::GameAction;

/// Monotonic epoch owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    epoch: Arc<AtomicU64>,
}

impl ViewScope {
    /// Creates a scope at epoch zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token bound to the current epoch.
    pub fn token(&self) -> ScopeToken {
        ScopeToken {
            epoch: Arc::clone(&self.epoch),
            issued: self.epoch.load(Ordering::SeqCst),
        }
    }

    /// Invalidates every token issued so far.
    #[instrument(skip(self))]
    pub fn advance(&self) -> u64 {
        let next = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(epoch = next, "View scope advanced");
        next
    }
}

/// Handle proving which view a command was started from.
#[derive(Debug, Clone)]
pub struct ScopeToken {
    epoch: Arc<AtomicU64>,
    issued: u64,
}

impl ScopeToken {
    /// True while no navigation happened since the token was issued.
    pub fn is_current(&self) -> bool {
        self.epoch.load(Ordering::SeqCst) == self.issued
    }

    /// Epoch the token was issued at.
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

/// Sender that drops game actions once its token goes stale.
#[derive(Debug, Clone, new)]
pub struct ScopedSender {
    token: ScopeToken,
    events: UnboundedSender<AppEvent>,
}

impl ScopedSender {
    /// Sends `action` if the scope is still current.
    ///
    /// Returns false when the action was dropped, either because the scope
    /// moved on or because the receiver is gone.
    #[instrument(skip(self), fields(issued = self.token.issued))]
    pub fn send(&self, action: GameAction) -> bool {
        if !self.token.is_current() {
            debug!("Dropping action from stale scope");
            return false;
        }
        self.events
            .send(AppEvent::Game {
                token: self.token.clone(),
                action,
            })
            .is_ok()
    }

    /// Sends a non-store event under the same scope check.
    #[instrument(skip(self), fields(issued = self.token.issued))]
    pub fn send_event(&self, event: AppEvent) -> bool {
        if !self.token.is_current() {
            debug!("Dropping event from stale scope");
            return false;
        }
        self.events.send(event).is_ok()
    }
}
