#![no_main]

use libfuzzer_sys::fuzz_target;
use mdc_rs::{Decoded, DoublePacket, MdcDecoder, MdcEncoder, Packet};

fuzz_target!(|input: (u8, u8, u16, [u8; 4], u8)| {
    let (op, arg, unit_id, extra, preamble) = input;

    let mut encoder = MdcEncoder::new(24000).unwrap();
    let mut decoder = MdcDecoder::new(24000).unwrap();
    encoder.set_preamble(usize::from(preamble % 32));

    let is_double = matches!(op, 0x35 | 0x55);
    if is_double {
        encoder.set_double_packet(DoublePacket::new(op, arg, unit_id, extra));
    } else {
        encoder.set_packet(Packet::new(op, arg, unit_id));
    }

    let mut buffer = [0.0f32; 1024];
    let mut flushes = 10;
    while flushes > 0 {
        let n = encoder.get_samples(&mut buffer);
        let n = if n == 0 {
            flushes -= 1;
            buffer.fill(0.0);
            buffer.len()
        } else {
            n
        };
        decoder.process_samples(&buffer[..n]);
    }

    // Every encodable packet must survive the loop intact
    let decoded = if is_double {
        decoder.take_double_packet().map(Decoded::Double)
    } else {
        decoder.take_packet().map(Decoded::Single)
    };
    match decoded {
        Some(Decoded::Single(packet)) => {
            assert_eq!((packet.op, packet.arg, packet.unit_id), (op, arg, unit_id));
        }
        Some(Decoded::Double(packet)) => {
            assert_eq!(
                (packet.op, packet.arg, packet.unit_id, packet.extra),
                (op, arg, unit_id, extra)
            );
        }
        None => panic!("round trip lost the packet"),
    }
});
