//! # MDC-1200 Modem Layer
//!
//! The sample-domain half of the crate: PCM conversion, the MSK
//! encoder, and the multi-slot streaming decoder. All timing derives
//! from the caller's sample rate; the protocol content comes from the
//! `mdc` module.

pub mod decoder;
pub mod encoder;
pub mod sample;

pub use decoder::{DecodeStats, DecodeStatus, MdcDecoder};
pub use encoder::MdcEncoder;
pub use sample::Sample;
