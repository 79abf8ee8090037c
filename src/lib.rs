pub mod config;
pub mod decoders;
pub mod engine;
pub mod error;
pub mod packet;
pub mod rules;

pub use engine::DetectEngine;
pub use error::{KsError, Result};
pub use packet::PacketView;
pub use rules::WindowMatch;
