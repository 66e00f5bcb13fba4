//! MDC-1200 Protocol Constants
//!
//! This module defines constants used in the MDC-1200 protocol
//! implementation: wire framing, synchronization, and modem timing.

/// Signaling rate in bits per second
pub const MDC_BAUD: f64 = 1200.0;

/// Mark tone frequency in Hz (no differential bit change)
pub const MARK_FREQ: f64 = 1200.0;

/// Space tone frequency in Hz (differential bit change)
pub const SPACE_FREQ: f64 = 1800.0;

/// Low 32 bits of the 40-bit sync word
pub const SYNC_LOW: u32 = 0x092A_446F;

/// High 8 bits of the 40-bit sync word
pub const SYNC_HIGH: u32 = 0x07;

/// Length of the sync word in bits
pub const SYNC_BITS: u32 = 40;

/// Sync word as transmitted, MSB-first per byte
pub const SYNC_BYTES: [u8; 5] = [0x07, 0x09, 0x2A, 0x44, 0x6F];

/// Maximum Hamming distance from the sync word (or its complement)
/// that still counts as a sync lock
pub const SYNC_TOLERANCE: u32 = 5;

/// Number of phase-staggered decode slots in the default bank
pub const DECODE_SLOTS: usize = 5;

/// Bits in one transmitted payload frame
pub const FRAME_BITS: usize = 112;

/// Bytes in one payload block (data + CRC + status + parity)
pub const BLOCK_BYTES: usize = 14;

/// Opcodes that announce a double-length packet
pub const DOUBLE_PACKET_OPS: [u8; 2] = [0x35, 0x55];

/// Bit-sync leader bytes sent ahead of the sync word on every burst
pub const LEADER_BYTES: usize = 7;

/// Byte pattern used for the leader and any additional preamble
pub const PREAMBLE_BYTE: u8 = 0x55;

/// Default differentiator hysteresis for the zero-crossing demodulator
pub const DEFAULT_HYSTERESIS: f32 = 3.0 / 256.0;

/// Default encoder amplitude, as a fraction of full scale
pub const DEFAULT_AMPLITUDE: f32 = 0.68;

/// Encoder amplitude under the `full-amplitude` feature
pub const FULL_AMPLITUDE: f32 = 1.00;

/// Correlator weights of the four-point demodulator, shared by both
/// decision points
pub const CORRELATOR_WEIGHTS: (f32, f32) = (-0.60, 0.97);
