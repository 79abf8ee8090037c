// Protocol decoders, just far enough to expose transport headers to rule keywords
pub mod decoder;
pub mod ethernet;
pub mod ip;
pub mod transport;

#[cfg(test)]
pub(crate) mod fixtures;

pub use decoder::PacketDecoder;
