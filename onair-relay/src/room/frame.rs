use axum::extract::ws::Message;
use bytes::Bytes;

/// An opaque frame as received from a peer socket. Forwarded byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Bytes),
}

impl Frame {
    /// Converts a socket message into a relayable frame; control frames are not relayed.
    pub fn from_message(msg: Message) -> Option<Self> {
        match msg {
            Message::Text(text) => Some(Frame::Text(text.as_str().to_owned())),
            Message::Binary(data) => Some(Frame::Binary(data)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Frame::Text(text) => text.len(),
            Frame::Binary(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Frame> for Message {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Text(text) => Message::Text(text.into()),
            Frame::Binary(data) => Message::Binary(data),
        }
    }
}
