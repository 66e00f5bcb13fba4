//! # MDC-1200 Decoder
//!
//! Streaming demodulator turning arbitrary-length PCM buffers into
//! decoded packets. The pipeline per sample:
//!
//! 1. **Front end** — normalize the sample; in the zero-crossing build,
//!    run the differentiator with hysteresis and count level toggles.
//! 2. **Bit-clock bank** — advance every decode slot's phase
//!    accumulator; a slot that wraps 2π makes one bit decision. The
//!    slots start staggered across one bit period so that some slot is
//!    close to the transmitter's bit timing.
//! 3. **Sync search** — shift decided bits through a 40-bit window and
//!    score it against the sync word; a near-match (or near-match of
//!    the complement, for inverted audio paths) arms frame capture.
//! 4. **Frame capture** — collect 112 wire bits, deinterleave, and gate
//!    on the CRC. Valid singles latch a result; double-packet opcodes
//!    keep the slot armed for the second block while the rest of the
//!    bank keeps hunting.
//!
//! Nothing is fatal after construction: a failed CRC resets only the
//! slot that captured it, and the bank resynchronizes on the next
//! burst. The registered callback, if any, fires inline from
//! [`process_samples`](MdcDecoder::process_samples) and drains the
//! result latch before the poll getters see it.

use std::f64::consts::TAU;

use crate::constants::{
    DECODE_SLOTS, FRAME_BITS, MDC_BAUD, SYNC_BITS, SYNC_HIGH, SYNC_LOW, SYNC_TOLERANCE,
};
use crate::constants::DOUBLE_PACKET_OPS;
use crate::error::MdcError;
use crate::mdc::crc::calculate_crc;
use crate::mdc::frame::{Decoded, DoublePacket, Packet};
use crate::mdc::interleave::wire_to_block;
use crate::modem::sample::Sample;
use crate::util::bits::hamming_distance;
use crate::util::logging::{log_frame_hex, LogThrottle};

/// Outcome of a `process_samples` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// No complete packet yet; keep feeding samples
    NeedMore,
    /// A single packet is latched for `take_packet`
    SingleReady,
    /// A double packet is latched for `take_double_packet`
    DoubleReady,
}

/// Statistics for decoder operations
#[derive(Debug, Default, Clone, Copy)]
pub struct DecodeStats {
    pub sync_locks: u64,
    pub inverted_sync_locks: u64,
    pub crc_errors: u64,
    pub singles_decoded: u64,
    pub doubles_decoded: u64,
}

/// Per-slot shift state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    /// Dormant; re-arms the sync window on the next decided bit
    Idle,
    /// Hunting for the 40-bit sync word
    SyncSearch,
    /// Capturing the 112 bits of a first (or only) block
    CaptureFirst,
    /// Capturing the second block of a double packet
    CaptureSecond,
}

/// One phase offset of the bit-clock recoverer
#[derive(Debug, Clone)]
struct DecodeSlot {
    /// Bit-clock phase accumulator
    theta: f64,
    /// Most recent bit decision (after differential decoding)
    bit: bool,
    /// Receive polarity is inverted for this slot
    invert: bool,
    /// Top 8 bits of the sync window
    sync_high: u32,
    /// Low 32 bits of the sync window
    sync_low: u32,
    state: SlotState,
    /// Bits captured so far
    count: usize,
    /// Wire-order capture buffer
    bits: [bool; FRAME_BITS],
    /// Level toggles seen during the current bit period
    #[cfg(feature = "zerocrossing")]
    zero_crossings: u32,
    /// Write position in the correlator ring
    #[cfg(not(feature = "zerocrossing"))]
    nl_step: usize,
    /// Ring of the last ten tap samples (two bit periods)
    #[cfg(not(feature = "zerocrossing"))]
    nl_ring: [f32; 10],
}

impl DecodeSlot {
    fn new(index: usize, slot_count: usize) -> Self {
        Self {
            theta: index as f64 * (TAU / slot_count as f64),
            bit: false,
            invert: false,
            sync_high: 0,
            sync_low: 0,
            state: SlotState::Idle,
            count: 0,
            bits: [false; FRAME_BITS],
            #[cfg(feature = "zerocrossing")]
            zero_crossings: 0,
            #[cfg(not(feature = "zerocrossing"))]
            nl_step: index % 10,
            #[cfg(not(feature = "zerocrossing"))]
            nl_ring: [0.0; 10],
        }
    }

    fn arm_capture(&mut self, state: SlotState) {
        self.state = state;
        self.count = 0;
        self.bits = [false; FRAME_BITS];
    }
}

/// Streaming MDC-1200 demodulator.
///
/// Feed PCM through [`process_samples`](MdcDecoder::process_samples)
/// and collect results through the draining getters or a registered
/// callback. One decoder owns its state exclusively; use one instance
/// per audio channel.
pub struct MdcDecoder {
    /// Bit-clock phase step per sample
    incr: f64,
    slots: Vec<DecodeSlot>,
    /// Differentiator hysteresis threshold
    #[cfg(feature = "zerocrossing")]
    hysteresis: f32,
    /// Current differentiator level
    #[cfg(feature = "zerocrossing")]
    level: bool,
    /// Previous normalized sample
    #[cfg(feature = "zerocrossing")]
    last_value: f32,
    /// Result latch: 0 empty, 1 single, 2 double
    good: u8,
    /// A double packet's second block is outstanding
    indouble: bool,
    op: u8,
    arg: u8,
    unit_id: u16,
    /// Received CRC of the last accepted header block
    crc: u16,
    extra: [u8; 4],
    callback: Option<Box<dyn FnMut(Decoded) + Send>>,
    stats: DecodeStats,
    crc_throttle: LogThrottle,
}

impl MdcDecoder {
    /// Create a decoder with the default slot bank.
    ///
    /// # Arguments
    /// * `sample_rate` - Input sampling rate in Hz
    ///
    /// # Returns
    /// * `Ok(MdcDecoder)` - Ready for samples
    /// * `Err(MdcError::InvalidSampleRate)` - Zero sample rate
    pub fn new(sample_rate: u32) -> Result<Self, MdcError> {
        Self::with_slots(sample_rate, DECODE_SLOTS)
    }

    /// Create a decoder with `slot_count` phase-staggered decode slots.
    ///
    /// More slots raise the chance that one is aligned with the
    /// transmitter's bit clock, at proportional CPU cost; values in
    /// 3..=8 are reasonable.
    pub fn with_slots(sample_rate: u32, slot_count: usize) -> Result<Self, MdcError> {
        if sample_rate == 0 {
            return Err(MdcError::InvalidSampleRate(sample_rate));
        }
        if slot_count == 0 {
            return Err(MdcError::InvalidSlotCount(slot_count));
        }

        Ok(Self {
            incr: MDC_BAUD * TAU / f64::from(sample_rate),
            slots: (0..slot_count)
                .map(|k| DecodeSlot::new(k, slot_count))
                .collect(),
            #[cfg(feature = "zerocrossing")]
            hysteresis: crate::constants::DEFAULT_HYSTERESIS,
            #[cfg(feature = "zerocrossing")]
            level: false,
            #[cfg(feature = "zerocrossing")]
            last_value: 0.0,
            good: 0,
            indouble: false,
            op: 0,
            arg: 0,
            unit_id: 0,
            crc: 0,
            extra: [0; 4],
            callback: None,
            stats: DecodeStats::default(),
            crc_throttle: LogThrottle::new(1000, 5),
        })
    }

    /// Register a callback invoked inline on every successful decode.
    ///
    /// While a callback is set it drains the result latch, so the
    /// `take_*` getters return `None` for packets it has delivered.
    /// The callback must not re-enter this decoder.
    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: FnMut(Decoded) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    /// Remove a previously registered callback.
    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    /// Decoder statistics accumulated since construction.
    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    /// Process a buffer of PCM samples.
    ///
    /// Runs to completion; any registered callback fires from inside
    /// this call. Splitting a stream across calls at any point changes
    /// nothing: all demodulation state persists between calls.
    ///
    /// # Returns
    /// * [`DecodeStatus::SingleReady`] / [`DecodeStatus::DoubleReady`] -
    ///   a packet is latched for polling (never seen while a callback
    ///   is registered, since the callback drains the latch)
    /// * [`DecodeStatus::NeedMore`] - keep feeding samples
    pub fn process_samples<S: Sample>(&mut self, samples: &[S]) -> DecodeStatus {
        for &raw in samples {
            self.process_one(raw.to_norm());
        }

        match self.good {
            1 => DecodeStatus::SingleReady,
            2 => DecodeStatus::DoubleReady,
            _ => DecodeStatus::NeedMore,
        }
    }

    /// Retrieve a latched single packet, draining the latch.
    pub fn take_packet(&mut self) -> Option<Packet> {
        if self.good != 1 {
            return None;
        }
        self.good = 0;
        Some(Packet::new(self.op, self.arg, self.unit_id))
    }

    /// Retrieve a latched double packet, draining the latch.
    pub fn take_double_packet(&mut self) -> Option<DoublePacket> {
        if self.good != 2 {
            return None;
        }
        self.good = 0;
        Some(DoublePacket::new(self.op, self.arg, self.unit_id, self.extra))
    }

    /// Zero-crossing front end: differentiate, count hysteresis
    /// toggles, and clock every slot.
    #[cfg(feature = "zerocrossing")]
    fn process_one(&mut self, value: f32) {
        let delta = value - self.last_value;
        self.last_value = value;

        if !self.level {
            if delta > self.hysteresis {
                for slot in &mut self.slots {
                    slot.zero_crossings += 1;
                }
                self.level = true;
            }
        } else if delta < -self.hysteresis {
            for slot in &mut self.slots {
                slot.zero_crossings += 1;
            }
            self.level = false;
        }

        for k in 0..self.slots.len() {
            self.slots[k].theta += self.incr;
            if self.slots[k].theta >= TAU {
                self.bit_tick(k);
                self.slots[k].theta -= TAU;
                self.slots[k].zero_crossings = 0;
            }
        }
    }

    /// Decide one bit from the toggle count of the elapsed bit period.
    ///
    /// One full 1200 Hz cycle toggles twice, one and a half 1800 Hz
    /// cycles toggle three times; 4 covers a straddled mark period.
    #[cfg(feature = "zerocrossing")]
    fn bit_tick(&mut self, k: usize) {
        match self.slots[k].zero_crossings {
            2 | 4 => {}
            3 => {
                let slot = &mut self.slots[k];
                slot.bit = !slot.bit;
            }
            // bit-clock noise, discard this tick
            _ => return,
        }
        self.shift_in(k);
    }

    /// Four-point front end: clock every slot at five taps per bit and
    /// push wrapped samples into the correlator ring.
    #[cfg(not(feature = "zerocrossing"))]
    fn process_one(&mut self, value: f32) {
        for k in 0..self.slots.len() {
            self.slots[k].theta += 5.0 * self.incr;
            if self.slots[k].theta >= TAU {
                let slot = &mut self.slots[k];
                slot.nl_step = (slot.nl_step + 1) % 10;
                slot.nl_ring[slot.nl_step] = value;
                self.bit_tick(k);
                self.slots[k].theta -= TAU;
            }
        }
    }

    /// Four-point bit decision.
    ///
    /// Only ring positions 3 and 8 emit a bit; the tap schedule is part
    /// of the modem design and the other positions only fill the ring.
    #[cfg(not(feature = "zerocrossing"))]
    fn bit_tick(&mut self, k: usize) {
        let slot = &mut self.slots[k];
        let (wa, wb) = crate::constants::CORRELATOR_WEIGHTS;
        let ring = &slot.nl_ring;

        let (vnow, vpast) = match slot.nl_step {
            3 => (
                wa * ring[3] + wb * ring[1],
                wa * ring[7] + wb * ring[9],
            ),
            8 => (
                wa * ring[8] + wb * ring[6],
                wa * ring[2] + wb * ring[4],
            ),
            _ => return,
        };

        slot.bit = vnow > vpast;
        if slot.invert {
            slot.bit = !slot.bit;
        }
        self.shift_in(k);
    }

    /// Route one decided bit through the slot's shift state machine.
    fn shift_in(&mut self, k: usize) {
        let bit = self.slots[k].bit;

        if self.slots[k].state == SlotState::Idle {
            let slot = &mut self.slots[k];
            slot.sync_high = 0;
            slot.sync_low = 0;
            slot.state = SlotState::SyncSearch;
        }

        match self.slots[k].state {
            SlotState::SyncSearch => self.sync_search(k, bit),
            SlotState::CaptureFirst | SlotState::CaptureSecond => {
                let slot = &mut self.slots[k];
                slot.bits[slot.count] = bit;
                slot.count += 1;
                if slot.count == FRAME_BITS {
                    self.process_frame(k);
                }
            }
            SlotState::Idle => {}
        }
    }

    /// Shift the bit into the 40-bit window and score it against the
    /// sync word and its complement.
    fn sync_search(&mut self, k: usize, bit: bool) {
        let slot = &mut self.slots[k];
        slot.sync_high = (slot.sync_high << 1) | (slot.sync_low >> 31);
        slot.sync_low = (slot.sync_low << 1) | u32::from(bit);

        let distance = hamming_distance(slot.sync_high & 0xFF, SYNC_HIGH)
            + hamming_distance(slot.sync_low, SYNC_LOW);

        if distance <= SYNC_TOLERANCE {
            slot.arm_capture(SlotState::CaptureFirst);
            self.stats.sync_locks += 1;
            log::debug!("slot {k} sync lock, distance {distance}");
        } else if distance >= SYNC_BITS - SYNC_TOLERANCE {
            // Polarity-inverted audio path: complement everything from
            // here on for this slot
            slot.bit = !slot.bit;
            slot.invert = !slot.invert;
            slot.arm_capture(SlotState::CaptureFirst);
            self.stats.inverted_sync_locks += 1;
            log::debug!("slot {k} inverted sync lock, distance {distance}");
        }
    }

    /// Deinterleave a full capture, gate it on the CRC, and advance the
    /// single/double framing.
    fn process_frame(&mut self, k: usize) {
        let block = wire_to_block(&self.slots[k].bits);
        let computed = calculate_crc(&block[..4]);
        let received = u16::from_le_bytes([block[4], block[5]]);

        if computed != received {
            self.stats.crc_errors += 1;
            if self.crc_throttle.allow() {
                log_frame_hex("CRC mismatch, slot capture dropped", &block);
            }
            self.slots[k].state = SlotState::Idle;
            return;
        }

        if self.slots[k].state == SlotState::CaptureSecond {
            self.extra.copy_from_slice(&block[..4]);
            self.reset_slots();
            self.good = 2;
            self.indouble = false;
            self.stats.doubles_decoded += 1;
            log::debug!(
                "double packet op=0x{:02X} arg=0x{:02X} unit=0x{:04X} extra={} crc=0x{:04X}",
                self.op,
                self.arg,
                self.unit_id,
                hex::encode(self.extra),
                self.crc
            );
        } else if !self.indouble {
            self.good = 1;
            self.op = block[0];
            self.arg = block[1];
            self.unit_id = u16::from_be_bytes([block[2], block[3]]);
            self.crc = received;

            if DOUBLE_PACKET_OPS.contains(&block[0]) {
                // First half of a double: keep this slot armed for the
                // second block, leave the rest of the bank running
                self.good = 0;
                self.indouble = true;
                self.slots[k].arm_capture(SlotState::CaptureSecond);
            } else {
                self.reset_slots();
                self.stats.singles_decoded += 1;
                log::debug!(
                    "single packet op=0x{:02X} arg=0x{:02X} unit=0x{:04X} crc=0x{:04X}",
                    self.op,
                    self.arg,
                    self.unit_id,
                    self.crc
                );
            }
        } else {
            // Another slot re-captured the first block of the double in
            // flight; arm it for the second block as well, in case the
            // original slot drifts off
            self.slots[k].arm_capture(SlotState::CaptureSecond);
        }

        if self.good != 0 {
            if let Some(mut callback) = self.callback.take() {
                let event = self.latched_event();
                callback(event);
                self.callback = Some(callback);
                self.good = 0;
            }
        }
    }

    fn latched_event(&self) -> Decoded {
        if self.good == 2 {
            Decoded::Double(DoublePacket::new(
                self.op,
                self.arg,
                self.unit_id,
                self.extra,
            ))
        } else {
            Decoded::Single(Packet::new(self.op, self.arg, self.unit_id))
        }
    }

    fn reset_slots(&mut self) {
        for slot in &mut self.slots {
            slot.state = SlotState::Idle;
        }
    }
}
