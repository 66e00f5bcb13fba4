//! # mdc-rs - A Rust Crate for MDC-1200 Signaling over Voice Audio
//!
//! The mdc-rs crate provides a software modem for MDC-1200, the
//! 1200 bit/s MSK in-band data burst format carried on analog
//! narrowband FM voice channels in land-mobile radio systems.
//!
//! ## Features
//!
//! - Encode opcode/argument/unit-ID packets (and double-length packets
//!   with four extra bytes) into PCM audio at any sample rate
//! - Decode packets from arbitrary-length PCM streams: a bank of
//!   phase-staggered bit-clock recoverers, sync-word correlation with
//!   polarity-inversion handling, deinterleaving, and CRC validation
//! - Generic over PCM sample formats (`u8`, `u16`, `i16`, `f32`)
//! - Inline decode callbacks or polled result getters
//! - Support for logging and error handling
//!
//! ## Usage
//!
//! To use the mdc-rs crate in your Rust project, add the following to
//! your Cargo.toml file:
//!
//! ```toml
//! [dependencies]
//! mdc-rs = "1.0.0"
//! ```
//!
//! Then encode a packet and decode it back:
//!
//! ```rust
//! use mdc_rs::{MdcDecoder, MdcEncoder, Packet};
//!
//! let mut encoder = MdcEncoder::new(48000).unwrap();
//! let mut decoder = MdcDecoder::new(48000).unwrap();
//! encoder.set_packet(Packet::new(0x12, 0x34, 0x5678));
//!
//! let mut audio = [0.0f32; 1024];
//! loop {
//!     let n = encoder.get_samples(&mut audio);
//!     if n == 0 {
//!         break;
//!     }
//!     decoder.process_samples(&audio[..n]);
//! }
//! // flush the tail of the burst through the decoder's bit clock
//! for _ in 0..10 {
//!     decoder.process_samples(&[0.0f32; 1024]);
//! }
//!
//! assert_eq!(decoder.take_packet(), Some(Packet::new(0x12, 0x34, 0x5678)));
//! ```

pub mod constants;
pub mod error;
pub mod logging;
pub mod mdc;
pub mod modem;
pub mod util;

pub use crate::error::MdcError;
pub use crate::logging::{init_logger, log_info};

// Core MDC types
pub use mdc::frame::{Decoded, DoublePacket, Packet};
pub use modem::decoder::{DecodeStats, DecodeStatus, MdcDecoder};
pub use modem::encoder::MdcEncoder;
pub use modem::sample::Sample;
