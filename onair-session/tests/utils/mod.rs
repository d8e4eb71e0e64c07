
pub use mock_media::*;
pub use mock_peer::*;
pub use peer_client::*;
pub use session_helpers::*;
