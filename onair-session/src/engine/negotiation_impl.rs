use crate::engine::{Session, SessionState};
use crate::transport::PeerState;
use anyhow::{Context, Result};
use onair_core::{IceCandidate, Role, SessionDescription, SignalMessage};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

impl Session {
    /// Runs the opening move for our role on a freshly opened signaling connection.
    ///
    /// Only a media-acquisition failure is returned; it ends the session.
    pub(super) async fn begin_handshake(&mut self) -> Result<()> {
        match self.role {
            Role::Host => {
                let published = self.local_stream_tx.borrow().is_some();
                if !published {
                    self.publish_local_media().await?;
                }
                self.send_offer().await;
            }
            Role::Audience => self.request_offer(),
        }
        Ok(())
    }

    /// Creates an offer, applies it locally and sends it. Safe to repeat at any point.
    pub(super) async fn send_offer(&mut self) {
        match self.create_local_offer().await {
            Ok(sdp) => {
                self.enter_negotiating();
                if !self.send(SignalMessage::Offer { sdp }) {
                    debug!("Offer not sent: signaling is not open");
                }
            }
            Err(e) => error!("Failed to create offer: {:#}", e),
        }
    }

    async fn create_local_offer(&self) -> Result<String> {
        let sdp = self.peer.create_offer().await.context("create offer")?;
        self.peer
            .set_local_description(SessionDescription::offer(sdp.clone()))
            .await
            .context("apply local offer")?;
        Ok(sdp)
    }

    pub(super) fn request_offer(&mut self) {
        if self.send(SignalMessage::NeedOffer) {
            info!("Asked the host for an offer");
            self.arm_negotiation_deadline();
        }
    }

    /// Audience side: answer the host's offer.
    pub(super) async fn accept_offer(&mut self, sdp: String) {
        self.enter_negotiating();

        match self.create_local_answer(sdp).await {
            Ok(answer) => {
                if !self.send(SignalMessage::Answer { sdp: answer }) {
                    debug!("Answer not sent: signaling is not open");
                }
            }
            Err(e) => error!("Failed to answer offer: {:#}", e),
        }
    }

    async fn create_local_answer(&self, offer: String) -> Result<String> {
        self.peer
            .set_remote_description(SessionDescription::offer(offer))
            .await
            .context("apply remote offer")?;
        let sdp = self.peer.create_answer().await.context("create answer")?;
        self.peer
            .set_local_description(SessionDescription::answer(sdp.clone()))
            .await
            .context("apply local answer")?;
        Ok(sdp)
    }

    /// Host side. The connected state follows from the peer connection, not from here.
    pub(super) async fn accept_answer(&mut self, sdp: String) {
        match self
            .peer
            .set_remote_description(SessionDescription::answer(sdp))
            .await
        {
            Ok(()) => info!("Remote description set (answer)"),
            Err(e) => error!("Failed to apply answer: {:#}", e),
        }
    }

    /// Candidates may race the description they belong to; failures are dropped.
    pub(super) async fn apply_remote_candidate(&self, candidate: IceCandidate) {
        debug!("Adding remote ICE candidate: {}", candidate.candidate);
        if let Err(e) = self.peer.add_ice_candidate(candidate).await {
            debug!("Ignoring remote ICE candidate: {:#}", e);
        }
    }

    pub(super) fn on_peer_state(&mut self, state: PeerState) {
        debug!("Peer connection is {}", state);

        match state {
            PeerState::Connected => {
                self.negotiation_deadline = None;
                self.set_state(SessionState::Connected);
            }
            PeerState::Disconnected | PeerState::Failed => {
                self.set_state(SessionState::Disconnected);
            }
            PeerState::New | PeerState::Connecting | PeerState::Closed => {}
        }
    }

    pub(super) async fn on_negotiation_timeout(&mut self) {
        self.negotiation_deadline = None;
        if self.state() == SessionState::Connected {
            return;
        }
        if self.signaling.is_none() {
            debug!("Negotiation timed out while signaling is down");
            return;
        }

        warn!("Negotiation timed out, restarting handshake");
        match self.role {
            Role::Host => self.send_offer().await,
            Role::Audience => self.request_offer(),
        }
    }

    fn enter_negotiating(&mut self) {
        if self.state() == SessionState::Connected {
            return;
        }
        self.set_state(SessionState::Negotiating);
        self.arm_negotiation_deadline();
    }

    fn arm_negotiation_deadline(&mut self) {
        if let Some(timeout) = self.config.negotiation_timeout {
            self.negotiation_deadline = Some(Instant::now() + timeout);
        }
    }
}
