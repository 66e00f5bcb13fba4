//! # MDC-1200 Protocol Layer
//!
//! The pure, sample-rate-independent half of the modem: CRC, the
//! convolutional parity generator, the payload bit interleaver, and
//! packet/block assembly. Everything here operates on bits and bytes;
//! the `modem` module turns the result into (and back out of) PCM.

pub mod crc;
pub mod fec;
pub mod frame;
pub mod interleave;

pub use frame::{Decoded, DoublePacket, Packet};
