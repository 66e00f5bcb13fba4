//! End-to-end encode/decode scenarios
//!
//! Drives the full modem loop the way a radio application would: the
//! encoder renders a burst buffer by buffer, the decoder eats the
//! buffers plus trailing silence, and the decoded result must match
//! what was loaded, bit for bit.

use std::sync::{Arc, Mutex};

use mdc_rs::{Decoded, DecodeStatus, DoublePacket, MdcDecoder, MdcEncoder, Packet, Sample};

const BUF: usize = 1024;

/// Render the loaded burst into the decoder, then flush with silence.
fn pump<S: Sample>(encoder: &mut MdcEncoder, decoder: &mut MdcDecoder) {
    let mut buffer = vec![S::silence(); BUF];
    let mut flushes = 10;
    while flushes > 0 {
        let n = encoder.get_samples(&mut buffer);
        let n = if n == 0 {
            flushes -= 1;
            buffer.fill(S::silence());
            BUF
        } else {
            n
        };
        decoder.process_samples(&buffer[..n]);
    }
}

fn decode_single_at(rate: u32) -> Option<Packet> {
    let mut encoder = MdcEncoder::new(rate).unwrap();
    let mut decoder = MdcDecoder::new(rate).unwrap();
    encoder.set_packet(Packet::new(0x12, 0x34, 0x5678));
    pump::<f32>(&mut encoder, &mut decoder);
    decoder.take_packet()
}

#[test]
fn test_single_packet_round_trip_48k() {
    assert_eq!(decode_single_at(48000), Some(Packet::new(0x12, 0x34, 0x5678)));
}

#[test]
fn test_single_packet_across_sample_rates() {
    for rate in [8000, 16000, 22050, 44100, 48000] {
        assert_eq!(
            decode_single_at(rate),
            Some(Packet::new(0x12, 0x34, 0x5678)),
            "single packet must decode at {rate} Hz"
        );
    }
}

#[test]
fn test_double_packet_round_trip() {
    // The four-point correlator needs more than 8 kHz to hold lock
    // across both blocks of a double; the zero-crossing demodulator
    // reaches down to 8 kHz
    #[cfg(feature = "zerocrossing")]
    let rates = [8000, 16000, 48000];
    #[cfg(not(feature = "zerocrossing"))]
    let rates = [16000, 44100, 48000];

    for rate in rates {
        let mut encoder = MdcEncoder::new(rate).unwrap();
        let mut decoder = MdcDecoder::new(rate).unwrap();
        let packet = DoublePacket::new(0x55, 0x34, 0x5678, [0x0A, 0x0B, 0x0C, 0x0D]);
        encoder.set_double_packet(packet);
        pump::<f32>(&mut encoder, &mut decoder);

        assert_eq!(decoder.take_packet(), None, "no single event at {rate} Hz");
        assert_eq!(decoder.take_double_packet(), Some(packet));
    }
}

#[test]
fn test_double_opcode_0x35() {
    let mut encoder = MdcEncoder::new(48000).unwrap();
    let mut decoder = MdcDecoder::new(48000).unwrap();
    let packet = DoublePacket::new(0x35, 0x01, 0xBEEF, [1, 2, 3, 4]);
    encoder.set_double_packet(packet);
    pump::<f32>(&mut encoder, &mut decoder);
    assert_eq!(decoder.take_double_packet(), Some(packet));
}

#[test]
fn test_back_to_back_doubles() {
    let mut decoder = MdcDecoder::new(48000).unwrap();
    let mut encoder = MdcEncoder::new(48000).unwrap();
    let packet = DoublePacket::new(0x55, 0x34, 0x5678, [0x0A, 0x0B, 0x0C, 0x0D]);

    for round in 0..9 {
        encoder.set_double_packet(packet);
        pump::<f32>(&mut encoder, &mut decoder);
        assert_eq!(
            decoder.take_double_packet(),
            Some(packet),
            "round {round} must decode"
        );
    }
    assert_eq!(decoder.stats().doubles_decoded, 9);
}

#[test]
fn test_callback_mode() {
    let mut encoder = MdcEncoder::new(48000).unwrap();
    let mut decoder = MdcDecoder::new(48000).unwrap();

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    decoder.set_callback(move |event| sink.lock().unwrap().push(event));

    encoder.set_packet(Packet::new(0x12, 0x34, 0x5678));
    pump::<f32>(&mut encoder, &mut decoder);

    assert_eq!(
        *events.lock().unwrap(),
        vec![Decoded::Single(Packet::new(0x12, 0x34, 0x5678))]
    );
    // The callback drained the latch; polling sees nothing
    assert_eq!(decoder.take_packet(), None);

    encoder.set_double_packet(DoublePacket::new(0x55, 0x34, 0x5678, [0x0A, 0x0B, 0x0C, 0x0D]));
    pump::<f32>(&mut encoder, &mut decoder);

    let seen = events.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].frame_count(), 2);
    assert_eq!(
        seen[1],
        Decoded::Double(DoublePacket::new(0x55, 0x34, 0x5678, [0x0A, 0x0B, 0x0C, 0x0D]))
    );
}

#[test]
fn test_polarity_inverted_stream_decodes() {
    let mut encoder = MdcEncoder::new(48000).unwrap();
    let mut decoder = MdcDecoder::new(48000).unwrap();
    encoder.set_packet(Packet::new(0x12, 0x34, 0x5678));

    let mut buffer = [0.0f32; BUF];
    let mut flushes = 10;
    while flushes > 0 {
        let n = encoder.get_samples(&mut buffer);
        let n = if n == 0 {
            flushes -= 1;
            buffer.fill(0.0);
            BUF
        } else {
            n
        };
        for sample in buffer[..n].iter_mut() {
            *sample = -*sample;
        }
        decoder.process_samples(&buffer[..n]);
    }

    assert_eq!(decoder.take_packet(), Some(Packet::new(0x12, 0x34, 0x5678)));
}

#[test]
fn test_noise_floor_produces_nothing() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut decoder = MdcDecoder::new(48000).unwrap();
    let mut rng = StdRng::seed_from_u64(0x1200);

    // one second of low-level uniform noise
    let noise: Vec<f32> = (0..48000).map(|_| rng.gen_range(-0.01..0.01)).collect();
    assert_eq!(decoder.process_samples(&noise), DecodeStatus::NeedMore);
    assert_eq!(decoder.take_packet(), None);
    assert_eq!(decoder.take_double_packet(), None);

    // and one second of plain silence
    let silence = vec![0.0f32; 48000];
    assert_eq!(decoder.process_samples(&silence), DecodeStatus::NeedMore);

    // the decoder must still be healthy afterwards
    let mut encoder = MdcEncoder::new(48000).unwrap();
    encoder.set_packet(Packet::new(0x12, 0x34, 0x5678));
    pump::<f32>(&mut encoder, &mut decoder);
    assert_eq!(decoder.take_packet(), Some(Packet::new(0x12, 0x34, 0x5678)));
}

#[test]
fn test_stream_split_invariance() {
    // Feeding the same samples in one call or in ragged chunks must
    // produce identical results
    let mut encoder = MdcEncoder::new(48000).unwrap();
    encoder.set_packet(Packet::new(0x12, 0x34, 0x5678));
    let mut stream = Vec::new();
    let mut buffer = [0.0f32; BUF];
    loop {
        let n = encoder.get_samples(&mut buffer);
        if n == 0 {
            break;
        }
        stream.extend_from_slice(&buffer[..n]);
    }
    stream.extend(std::iter::repeat(0.0f32).take(10 * BUF));

    let mut whole = MdcDecoder::new(48000).unwrap();
    whole.process_samples(&stream);
    let expected = whole.take_packet();
    assert!(expected.is_some());

    for chunk in [1usize, 7, 997] {
        let mut split = MdcDecoder::new(48000).unwrap();
        for piece in stream.chunks(chunk) {
            split.process_samples(piece);
        }
        assert_eq!(split.take_packet(), expected, "chunk size {chunk}");
    }
}

#[test]
fn test_integer_sample_formats() {
    fn round_trip<S: Sample>() -> Option<Packet> {
        let mut encoder = MdcEncoder::new(48000).unwrap();
        let mut decoder = MdcDecoder::new(48000).unwrap();
        encoder.set_packet(Packet::new(0x2B, 0x0C, 0x0642));
        pump::<S>(&mut encoder, &mut decoder);
        decoder.take_packet()
    }

    let expected = Some(Packet::new(0x2B, 0x0C, 0x0642));
    assert_eq!(round_trip::<u8>(), expected, "u8 PCM");
    assert_eq!(round_trip::<u16>(), expected, "u16 PCM");
    assert_eq!(round_trip::<i16>(), expected, "i16 PCM");
}

#[test]
fn test_long_preamble_round_trip() {
    let mut encoder = MdcEncoder::new(48000).unwrap();
    let mut decoder = MdcDecoder::new(48000).unwrap();
    encoder.set_preamble(25);
    encoder.set_packet(Packet::new(0x12, 0x34, 0x5678));
    pump::<f32>(&mut encoder, &mut decoder);
    assert_eq!(decoder.take_packet(), Some(Packet::new(0x12, 0x34, 0x5678)));
}

#[test]
fn test_wider_slot_bank() {
    let mut encoder = MdcEncoder::new(44100).unwrap();
    let mut decoder = MdcDecoder::with_slots(44100, 8).unwrap();
    encoder.set_packet(Packet::new(0x12, 0x34, 0x5678));
    pump::<f32>(&mut encoder, &mut decoder);
    assert_eq!(decoder.take_packet(), Some(Packet::new(0x12, 0x34, 0x5678)));
}

#[test]
fn test_process_samples_status_values() {
    let mut encoder = MdcEncoder::new(48000).unwrap();
    let mut decoder = MdcDecoder::new(48000).unwrap();
    encoder.set_packet(Packet::new(0x12, 0x34, 0x5678));

    let mut stream = Vec::new();
    let mut buffer = [0.0f32; BUF];
    loop {
        let n = encoder.get_samples(&mut buffer);
        if n == 0 {
            break;
        }
        stream.extend_from_slice(&buffer[..n]);
    }
    stream.extend(std::iter::repeat(0.0f32).take(10 * BUF));

    let status = decoder.process_samples(&stream);
    assert_eq!(status, DecodeStatus::SingleReady);
    // the latch survives further idle audio until taken
    assert_eq!(
        decoder.process_samples(&vec![0.0f32; BUF]),
        DecodeStatus::SingleReady
    );
    assert!(decoder.take_packet().is_some());
    assert_eq!(
        decoder.process_samples(&vec![0.0f32; BUF]),
        DecodeStatus::NeedMore
    );
}

mod round_trip_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Full-DSP cases are not free, so keep the case count modest;
        // the bit-level layers get exhaustive property coverage in
        // their own suites
        #![proptest_config(ProptestConfig::with_cases(12))]

        #[test]
        fn prop_any_single_packet_survives_the_air(
            op in any::<u8>().prop_filter("single opcodes only", |op| !matches!(*op, 0x35 | 0x55)),
            arg in any::<u8>(),
            unit_id in any::<u16>(),
        ) {
            let mut encoder = MdcEncoder::new(22050).unwrap();
            let mut decoder = MdcDecoder::new(22050).unwrap();
            encoder.set_packet(Packet::new(op, arg, unit_id));
            pump::<f32>(&mut encoder, &mut decoder);
            prop_assert_eq!(decoder.take_packet(), Some(Packet::new(op, arg, unit_id)));
        }

        #[test]
        fn prop_any_double_packet_survives_the_air(
            op in prop_oneof![Just(0x35u8), Just(0x55u8)],
            arg in any::<u8>(),
            unit_id in any::<u16>(),
            extra in prop::array::uniform4(any::<u8>()),
        ) {
            let mut encoder = MdcEncoder::new(22050).unwrap();
            let mut decoder = MdcDecoder::new(22050).unwrap();
            let packet = DoublePacket::new(op, arg, unit_id, extra);
            encoder.set_double_packet(packet);
            pump::<f32>(&mut encoder, &mut decoder);
            prop_assert_eq!(decoder.take_double_packet(), Some(packet));
        }
    }
}
