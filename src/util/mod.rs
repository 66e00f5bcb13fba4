//! # Utility Modules
//!
//! This module provides common utility functions and types used
//! throughout the mdc-rs crate: bit packing and Hamming distance for the
//! sync correlator, and rate-limited logging for the decode path.

pub mod bits;
pub mod logging;

// Re-export commonly used types and functions
pub use bits::{hamming_distance, pack_lsb, unpack_lsb, unpack_msb};
pub use logging::{log_frame_hex, LogThrottle};
