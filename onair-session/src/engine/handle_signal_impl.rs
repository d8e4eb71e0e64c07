use crate::engine::Session;
use onair_core::{Role, SignalMessage};
use tracing::{debug, info, warn};

impl Session {
    pub(super) async fn handle_signal(&mut self, text: String) {
        let msg = match SignalMessage::decode(&text) {
            Ok(m) => m,
            Err(e) => {
                warn!("Rejected signaling frame: {}. Text: {}", e, text);
                return;
            }
        };

        match (msg, self.role) {
            (SignalMessage::Offer { sdp }, Role::Audience) => {
                info!("Received offer");
                self.accept_offer(sdp).await;
            }

            (SignalMessage::Answer { sdp }, Role::Host) => {
                info!("Received answer");
                self.accept_answer(sdp).await;
            }

            (SignalMessage::NeedOffer, Role::Host) => {
                info!("Audience asked for an offer");
                self.send_offer().await;
            }

            (SignalMessage::Candidate { candidate }, _) => {
                self.apply_remote_candidate(candidate).await;
            }

            (SignalMessage::Chat { content }, _) => {
                debug!("Chat received ({} bytes)", content.len());
                self.chat.push(content);
            }

            (msg, role) => {
                debug!("Ignoring '{}': not meant for {}", msg.kind(), role);
            }
        }
    }
}
