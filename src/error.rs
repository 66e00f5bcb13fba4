//! # MDC Error Handling
//!
//! This module defines the MdcError enum, which represents the different
//! error types that can occur in the mdc-rs crate.

use thiserror::Error;

/// Represents the different error types that can occur in the MDC crate.
#[derive(Debug, Error)]
pub enum MdcError {
    /// Indicates an unusable sample rate was given to a constructor.
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// Indicates a decoder was asked for an empty slot bank.
    #[error("Invalid decode slot count: {0}")]
    InvalidSlotCount(usize),
}
