//! # MDC-1200 Frame Handling
//!
//! This module provides the packet types and the assembly of payload
//! blocks and wire bitstreams for transmission.
//!
//! ## Frame Structure
//!
//! Every burst carries one or two 14-byte payload blocks behind a
//! shared preamble:
//!
//! ```text
//! ┌──────────────┬─────────────┬──────────────┬───────────────────┐
//! │  Preamble    │  Sync word  │  Block 1     │  Block 2          │
//! │  (0x55 × n)  │  (5 bytes)  │  (14 bytes)  │  (14 bytes, dbl)  │
//! └──────────────┴─────────────┴──────────────┴───────────────────┘
//! ```
//!
//! Each block is `[data0..3, crc_lo, crc_hi, 0x00, parity0..6]`: the
//! CRC covers only the 4 data bytes, byte 6 is an always-zero status
//! byte, and the parity bytes come from the convolutional encoder.
//! Preamble and sync bytes go out MSB-first; block bytes are serialized
//! LSB-first and interleaved.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BLOCK_BYTES, DOUBLE_PACKET_OPS, FRAME_BITS, LEADER_BYTES, PREAMBLE_BYTE, SYNC_BYTES,
};
use crate::mdc::crc::calculate_crc;
use crate::mdc::fec::encode_parity;
use crate::mdc::interleave::block_to_wire;

/// A single MDC-1200 packet: opcode, argument, and unit ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub op: u8,
    pub arg: u8,
    pub unit_id: u16,
}

/// A double-length packet carrying four extra payload bytes in a
/// second block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoublePacket {
    pub op: u8,
    pub arg: u8,
    pub unit_id: u16,
    pub extra: [u8; 4],
}

/// A successfully decoded transmission, as delivered to callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decoded {
    Single(Packet),
    Double(DoublePacket),
}

impl Packet {
    /// Create a single packet
    pub fn new(op: u8, arg: u8, unit_id: u16) -> Self {
        Self { op, arg, unit_id }
    }

    /// Whether the opcode marks this as the first half of a double
    /// packet on the air
    pub fn is_double_opcode(&self) -> bool {
        DOUBLE_PACKET_OPS.contains(&self.op)
    }
}

impl DoublePacket {
    /// Create a double packet
    pub fn new(op: u8, arg: u8, unit_id: u16, extra: [u8; 4]) -> Self {
        Self {
            op,
            arg,
            unit_id,
            extra,
        }
    }

    /// The header fields shared with a single packet
    pub fn header(&self) -> Packet {
        Packet::new(self.op, self.arg, self.unit_id)
    }
}

impl Decoded {
    /// Number of payload frames in the transmission: 1 or 2
    pub fn frame_count(&self) -> u8 {
        match self {
            Decoded::Single(_) => 1,
            Decoded::Double(_) => 2,
        }
    }
}

/// Build one 14-byte payload block from its 4 data bytes
///
/// Appends the little-endian CRC, the zero status byte, and the 7
/// convolutional parity bytes.
pub fn build_block(data: [u8; 4]) -> [u8; BLOCK_BYTES] {
    let mut block = [0u8; BLOCK_BYTES];
    block[..4].copy_from_slice(&data);

    let crc = calculate_crc(&data);
    block[4] = (crc & 0xFF) as u8;
    block[5] = (crc >> 8) as u8;
    block[6] = 0x00;

    encode_parity(&mut block);
    block
}

/// Payload blocks for a single packet
pub fn single_blocks(packet: &Packet) -> Vec<[u8; BLOCK_BYTES]> {
    vec![build_block([
        packet.op,
        packet.arg,
        (packet.unit_id >> 8) as u8,
        (packet.unit_id & 0xFF) as u8,
    ])]
}

/// Payload blocks for a double packet
pub fn double_blocks(packet: &DoublePacket) -> Vec<[u8; BLOCK_BYTES]> {
    let mut blocks = single_blocks(&packet.header());
    blocks.push(build_block(packet.extra));
    blocks
}

/// Serialize a burst into wire-order bits
///
/// Emits `preamble_bytes` additional preamble bytes, the built-in
/// 7-byte leader, the sync word, and the interleaved payload blocks in
/// transmission order. This is the exact bit sequence the modulator
/// clocks out.
pub fn wire_bits(blocks: &[[u8; BLOCK_BYTES]], preamble_bytes: usize) -> Vec<bool> {
    let mut bits = Vec::with_capacity(
        (preamble_bytes + LEADER_BYTES + SYNC_BYTES.len()) * 8 + blocks.len() * FRAME_BITS,
    );

    for _ in 0..(preamble_bytes + LEADER_BYTES) {
        bits.extend_from_slice(&crate::util::bits::unpack_msb(PREAMBLE_BYTE));
    }
    for &byte in &SYNC_BYTES {
        bits.extend_from_slice(&crate::util::bits::unpack_msb(byte));
    }
    for block in blocks {
        bits.extend_from_slice(&block_to_wire(block));
    }
    bits
}
