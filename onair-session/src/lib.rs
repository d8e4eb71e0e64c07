mod chat;
mod engine;
pub mod media;
pub mod transport;

pub use chat::ChatLog;
pub use engine::*;
