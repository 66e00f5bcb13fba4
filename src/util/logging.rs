//! # Decode-Path Logging Helpers
//!
//! Rate-limited logging and hex frame dumps for the demodulator. A
//! decoder fed continuous audio rejects frames constantly (noise never
//! passes the CRC gate), so rejection diagnostics must be throttled to
//! stay usable in long-running captures.
//!
//! ## Usage
//!
//! ```rust
//! use mdc_rs::util::logging::{log_frame_hex, LogThrottle};
//!
//! // Rate-limited logging
//! let mut throttle = LogThrottle::new(1000, 5); // 5 messages per second
//! if throttle.allow() {
//!     log::debug!("CRC mismatch on capture slot");
//! }
//!
//! log_frame_hex("Rejected block", &[0x12, 0x34, 0x56, 0x78]);
//! ```

use std::time::Instant;

/// Throttling structure for rate-limiting log messages
///
/// Prevents log spam when the decoder is running against hours of audio
/// where most capture attempts end in a CRC rejection.
#[derive(Debug)]
pub struct LogThrottle {
    /// Time window for throttling (in milliseconds)
    window_ms: u64,
    /// Maximum messages allowed per window
    cap: u32,
    /// Current message count in window
    count: u32,
    /// Start time of current window
    t0: Instant,
}

impl LogThrottle {
    /// Create new throttle with time window and message cap
    ///
    /// # Arguments
    /// * `window_ms` - Time window in milliseconds
    /// * `cap` - Maximum messages allowed per window
    pub fn new(window_ms: u64, cap: u32) -> Self {
        Self {
            window_ms,
            cap,
            count: 0,
            t0: Instant::now(),
        }
    }

    /// Check if logging is allowed (resets counter after window expires)
    ///
    /// Returns `true` if the message should be logged, `false` if it
    /// should be throttled.
    pub fn allow(&mut self) -> bool {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(self.t0).as_millis() as u64;

        if elapsed_ms > self.window_ms {
            self.t0 = now;
            self.count = 0;
        }

        self.count += 1;
        self.count <= self.cap
    }

    /// Reset the throttle (start new window immediately)
    pub fn reset(&mut self) {
        self.t0 = Instant::now();
        self.count = 0;
    }
}

/// Log frame data in hex format for debugging
///
/// Provides a consistent way to log block payloads across the codebase
/// with a length limit to prevent excessive log output.
pub fn log_frame_hex(prefix: &str, data: &[u8]) {
    const MAX_LOG_BYTES: usize = 64;

    let display_data = if data.len() > MAX_LOG_BYTES {
        &data[..MAX_LOG_BYTES]
    } else {
        data
    };

    let suffix = if data.len() > MAX_LOG_BYTES {
        format!(" ... ({} bytes total)", data.len())
    } else {
        String::new()
    };

    log::debug!("{prefix}: {}{suffix}", hex::encode(display_data));
}
