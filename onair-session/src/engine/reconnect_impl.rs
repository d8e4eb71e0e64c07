use crate::engine::signaling_impl::spawn_signaling;
use crate::engine::{Session, SessionState};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Exponential backoff for re-opening a lost signaling connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl ReconnectPolicy {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Delay before the given attempt (1-based): doubles each time, capped at `max_backoff`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(31);
        self.initial_backoff
            .checked_mul(1u32 << doublings)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

impl Session {
    pub(super) fn on_signaling_closed(&mut self) {
        self.signaling = None;
        let media_connected = self.state() == SessionState::Connected;

        let Some(policy) = self.config.reconnect else {
            info!("Signaling connection closed");
            if !media_connected {
                self.set_state(SessionState::Disconnected);
            }
            return;
        };

        if self.reconnect_attempts >= policy.max_attempts {
            warn!(
                "Signaling connection lost, giving up after {} attempts",
                self.reconnect_attempts
            );
            if !media_connected {
                self.set_state(SessionState::Disconnected);
            }
            return;
        }

        self.reconnect_attempts += 1;
        let delay = policy.delay_for(self.reconnect_attempts);
        info!(
            "Signaling connection lost, reconnecting in {:?} (attempt {}/{})",
            delay, self.reconnect_attempts, policy.max_attempts
        );
        self.reconnect_at = Some(Instant::now() + delay);
        if !media_connected {
            self.set_state(SessionState::Disconnected);
        }
    }

    pub(super) fn reconnect(&mut self) {
        self.reconnect_at = None;
        if self.state() != SessionState::Connected {
            self.set_state(SessionState::SignalingConnecting);
        }
        spawn_signaling(self.config.url.clone(), self.signaling_tx.clone());
    }
}
