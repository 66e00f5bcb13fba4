//! # MDC-1200 CRC-16
//!
//! CRC calculation and verification for the 4 data bytes of each
//! 14-byte payload block.
//!
//! ## CRC Parameters
//!
//! MDC-1200 uses a reflected CRC-16 that is close to, but not the same
//! as, CRC-CCITT:
//! - Polynomial: 0x1021 (CCITT standard)
//! - Reversed polynomial: 0x8408 (for LSB-first calculation)
//! - Initial value: 0x0000
//! - Final XOR: 0xFFFF (result IS complemented)
//!
//! The CRC is transmitted little-endian, low byte first, immediately
//! after the data bytes it covers.

/// Reversed CCITT polynomial for LSB-first calculation
const POLYNOMIAL: u16 = 0x8408;

/// Calculate the MDC-1200 CRC-16 over a data slice
///
/// In normal use the slice is exactly the 4 data bytes of a block; the
/// routine itself accepts any length.
///
/// # Arguments
///
/// * `data` - Data to calculate CRC over
///
/// # Returns
///
/// * CRC-16 value as embedded in MDC-1200 blocks
///
/// # Examples
///
/// ```rust
/// use mdc_rs::mdc::crc::calculate_crc;
///
/// assert_eq!(calculate_crc(&[0x12, 0x34, 0x56, 0x78]), 0x980F);
/// ```
pub fn calculate_crc(data: &[u8]) -> u16 {
    let mut crc: u16 = 0x0000;

    for &byte in data {
        crc ^= byte as u16;

        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLYNOMIAL;
            } else {
                crc >>= 1;
            }
        }
    }

    // MDC complements the final result
    !crc
}

/// Verify the embedded CRC of a payload block
///
/// Recomputes the CRC over the first 4 bytes and compares it with the
/// little-endian CRC field at bytes 4..6.
///
/// # Arguments
///
/// * `block` - At least the first 6 bytes of a payload block
///
/// # Returns
///
/// * `true` if the embedded CRC matches
pub fn verify_crc(block: &[u8]) -> bool {
    if block.len() < 6 {
        return false;
    }

    let received = u16::from_le_bytes([block[4], block[5]]);
    calculate_crc(&block[..4]) == received
}

/// Append the CRC to 4 data bytes, little-endian
///
/// # Arguments
///
/// * `data` - The 4 data bytes of a block
///
/// # Returns
///
/// * The data followed by `crc_lo`, `crc_hi`
pub fn add_crc(data: &[u8; 4]) -> [u8; 6] {
    let crc = calculate_crc(data);
    let mut out = [0u8; 6];
    out[..4].copy_from_slice(data);
    out[4..].copy_from_slice(&crc.to_le_bytes());
    out
}
