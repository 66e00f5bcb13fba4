#![no_main]

use libfuzzer_sys::fuzz_target;
use mdc_rs::MdcDecoder;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as raw PCM: the decoder must never panic and
    // never corrupt its state, whatever the channel delivers
    let mut decoder = MdcDecoder::new(8000).unwrap();
    let _ = decoder.process_samples(data);

    // Same bytes as signed 16-bit samples
    let samples: Vec<i16> = data
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let mut decoder = MdcDecoder::new(48000).unwrap();
    let _ = decoder.process_samples(&samples);

    // Split feeding must behave identically to whole feeding
    if !samples.is_empty() {
        let mut split = MdcDecoder::new(48000).unwrap();
        let mid = samples.len() / 2;
        let _ = split.process_samples(&samples[..mid]);
        let status = split.process_samples(&samples[mid..]);
        let _ = status;
    }
});
