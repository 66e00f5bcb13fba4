//! # Payload Bit Interleaver
//!
//! MDC-1200 interleaves the 112 bits of each payload block across a
//! 7-row by 16-column matrix before transmission, so that a short noise
//! burst on the channel lands on non-adjacent logical bits.
//!
//! ## Mapping
//!
//! With `i` the column index in `0..16` and `j` the row index in `0..7`:
//!
//! ```text
//! wire[j * 16 + i] = logical[i * 7 + j]
//! ```
//!
//! Logical bits are the block's 14 bytes serialized LSB-first. The
//! decoder captures bits in wire order and applies the inverse mapping
//! in one pass before the CRC check.

use crate::constants::{BLOCK_BYTES, FRAME_BITS};
use crate::util::bits::{pack_lsb, unpack_lsb};

/// Matrix rows (bits per column)
const ROWS: usize = 7;

/// Matrix columns
const COLS: usize = 16;

/// Map a logical bit frame into wire transmission order
pub fn interleave(logical: &[bool; FRAME_BITS]) -> [bool; FRAME_BITS] {
    let mut wire = [false; FRAME_BITS];
    for i in 0..COLS {
        for j in 0..ROWS {
            wire[j * COLS + i] = logical[i * ROWS + j];
        }
    }
    wire
}

/// Map a received wire-order frame back into logical bit order
pub fn deinterleave(wire: &[bool; FRAME_BITS]) -> [bool; FRAME_BITS] {
    let mut logical = [false; FRAME_BITS];
    for i in 0..COLS {
        for j in 0..ROWS {
            logical[i * ROWS + j] = wire[j * COLS + i];
        }
    }
    logical
}

/// Serialize a payload block into wire-order bits
pub fn block_to_wire(block: &[u8; BLOCK_BYTES]) -> [bool; FRAME_BITS] {
    let mut logical = [false; FRAME_BITS];
    unpack_lsb(block, &mut logical);
    interleave(&logical)
}

/// Rebuild a payload block from captured wire-order bits
pub fn wire_to_block(wire: &[bool; FRAME_BITS]) -> [u8; BLOCK_BYTES] {
    let logical = deinterleave(wire);
    let mut block = [0u8; BLOCK_BYTES];
    pack_lsb(&logical, &mut block);
    block
}
