//! # Nibble model
//!
//! The histogram-driven hot/cold coder. A one-shot classification pass
//! over a [`Histogram`] picks the 14 most frequent bytes as hot values,
//! each coded in a single nibble; the two remaining nibble codes repeat
//! the previous byte (14) and escape into the cold range (15). Cold bytes
//! are coded as an offset from `cold_min` in just enough bits to span the
//! observed range. When the hot values cover too little of the input for
//! the 12-bit escape to pay off, the model passes bytes through raw.
//!
//! Payloads use the MSB-first [`NibbleStream`](crate::core::NibbleStream)
//! layout and are normally prefixed by the serialized model
//! ([`save`](NibbleModel::save)/[`load`](NibbleModel::load)), so a decoder
//! needs no access to the histogram.

use crate::core::{Mode, NibbleStream};
use crate::stats::Histogram;
use log::{debug, info};
use std::fmt::Display;

/// Number of hot slots, the nibble codes above them are reserved.
const MAX_HOT: usize = 14;

/// Nibble repeating the previous byte.
const RLE_NIBBLE: u8 = 14;

/// Nibble announcing a cold-range offset.
const ESCAPE_NIBBLE: u8 = 15;

/// Coding state of the nibble coder.
///
/// Built once per payload from a histogram (or restored from the wire via
/// [`load`](Self::load)); the only state that moves while coding is the
/// repeat anchor, which encoder and decoder keep in lockstep.
///
/// # Examples
///
/// ```
/// use skew::coders::NibbleModel;
/// use skew::core::NibbleStream;
/// use skew::stats::Histogram;
///
/// let data: Vec<u8> = (0..40).map(|i| if i % 5 == 0 { 4 } else { 9 }).collect();
/// let mut histogram = Histogram::new();
/// histogram.feed(&data);
///
/// let mut encoder = NibbleModel::from_histogram(&histogram);
/// let mut buffer = [0u8; 64];
/// let mut stream = NibbleStream::new(&mut buffer);
///
/// stream.begin_encode();
/// encoder.save(&mut stream);
/// for &byte in &data {
///     encoder.encode_byte(&mut stream, byte);
/// }
/// let written = stream.end_encode();
/// assert!(written < data.len());
///
/// stream.begin_decode();
/// let mut decoder = NibbleModel::load(&mut stream);
/// for &byte in &data {
///     assert_eq!(decoder.decode_byte(&mut stream), byte);
/// }
/// stream.end_decode();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NibbleModel {
    hot_values: [u8; MAX_HOT],
    last_value: u8,
    no_compression: bool,
    cold_min: u8,
    cold_max: u8,
    cold_num_bits: u8,
}

impl NibbleModel {
    /// Classify a histogram into hot and cold symbols.
    ///
    /// Hot selection is a repeated linear scan for the highest remaining
    /// count; ties go to the smallest symbol. A hot hit costs 4 bits
    /// against 12 for an escape, so when the hot values cover less than
    /// half of the total count the model refuses to compress.
    pub fn from_histogram(histogram: &Histogram) -> Self {
        let mut hot_values = [0u8; MAX_HOT];
        let mut selected = [false; 256];
        let mut hot_used = 0;

        for slot in 0..MAX_HOT {
            let mut max_count = 0u32;
            let mut max_symbol = None;
            for symbol in 0..histogram.num_symbols() {
                if selected[symbol] {
                    continue;
                }
                if histogram.count(symbol as u8) > max_count {
                    max_count = histogram.count(symbol as u8);
                    max_symbol = Some(symbol);
                }
            }
            match max_symbol {
                Some(symbol) => {
                    hot_values[slot] = symbol as u8;
                    selected[symbol] = true;
                    hot_used += 1;
                }
                None => break,
            }
        }

        let total_count = histogram.total();
        let hot_count: u64 = hot_values[..hot_used]
            .iter()
            .map(|&symbol| u64::from(histogram.count(symbol)))
            .sum();
        let no_compression = total_count > 0 && hot_count * 2 < total_count;

        let mut cold_min = u8::MAX;
        let mut cold_max = 0u8;
        for symbol in 0..histogram.num_symbols() {
            let symbol = symbol as u8;
            if hot_values[..hot_used].contains(&symbol) || histogram.count(symbol) == 0 {
                continue;
            }
            cold_min = cold_min.min(symbol);
            cold_max = cold_max.max(symbol);
        }

        let cold_num_bits = if cold_max >= cold_min {
            match cold_max - cold_min {
                range if range >= 64 => 8,
                range if range >= 16 => 6,
                range if range >= 4 => 4,
                _ => 2,
            }
        } else {
            // no cold symbol exists, the width is never consulted
            2
        };

        info!(
            "nibble model: {hot_used} hot symbols, cold {cold_min}..={cold_max} in {cold_num_bits} bits{}",
            if no_compression { ", passthrough" } else { "" }
        );

        NibbleModel {
            hot_values,
            last_value: 0,
            no_compression,
            cold_min,
            cold_max,
            cold_num_bits,
        }
    }

    /// Whether the classification pass refused to compress.
    pub fn no_compression(&self) -> bool {
        self.no_compression
    }

    /// Smallest cold symbol observed by the classification pass.
    pub fn cold_min(&self) -> u8 {
        self.cold_min
    }

    /// Largest cold symbol observed by the classification pass.
    pub fn cold_max(&self) -> u8 {
        self.cold_max
    }

    /// Width of the cold-range offset field in bits: 2, 4, 6 or 8.
    pub fn cold_num_bits(&self) -> u8 {
        self.cold_num_bits
    }

    /// Encode one byte.
    pub fn encode_byte(&mut self, stream: &mut NibbleStream, value: u8) {
        debug_assert!(stream.mode() == Mode::Encode, "encode outside an encode session");

        if self.no_compression {
            stream.write_byte(value);
        } else if value == self.last_value {
            stream.write_nibble(RLE_NIBBLE);
        } else {
            self.last_value = value;

            for (index, &hot) in self.hot_values.iter().enumerate() {
                if hot == value {
                    stream.write_nibble(index as u8);
                    return;
                }
            }

            stream.write_nibble(ESCAPE_NIBBLE);
            let residual = value.wrapping_sub(self.cold_min);
            match self.cold_num_bits {
                2 => stream.write_dibit(residual),
                4 => stream.write_nibble(residual),
                6 => {
                    stream.write_dibit(residual >> 4);
                    stream.write_nibble(residual & 0xF);
                }
                _ => stream.write_byte(residual),
            }
        }
    }

    /// Decode one byte written by [`encode_byte`](Self::encode_byte).
    pub fn decode_byte(&mut self, stream: &mut NibbleStream) -> u8 {
        debug_assert!(stream.mode() == Mode::Decode, "decode outside a decode session");

        if self.no_compression {
            return stream.read_byte();
        }

        let nibble = stream.read_nibble();
        if nibble == RLE_NIBBLE {
            // repeat of the anchor, which stays as it is
            return self.last_value;
        }

        let value = if nibble == ESCAPE_NIBBLE {
            let residual = match self.cold_num_bits {
                2 => stream.read_dibit(),
                4 => stream.read_nibble(),
                6 => (stream.read_dibit() << 4) | stream.read_nibble(),
                _ => stream.read_byte(),
            };
            residual.wrapping_add(self.cold_min)
        } else {
            self.hot_values[usize::from(nibble)]
        };

        self.last_value = value;
        value
    }

    /// Serialize the model ahead of its payload: a `no_compression` dibit,
    /// then (when compressing) the cold width nibble, the cold base byte
    /// and the 14 hot values.
    pub fn save(&self, stream: &mut NibbleStream) {
        debug_assert!(stream.mode() == Mode::Encode, "save outside an encode session");

        stream.write_dibit(u8::from(self.no_compression));
        if !self.no_compression {
            stream.write_nibble(self.cold_num_bits);
            stream.write_byte(self.cold_min);
            for &hot in &self.hot_values {
                stream.write_byte(hot);
            }
        }
    }

    /// Restore a model written by [`save`](Self::save), anchor reset.
    pub fn load(stream: &mut NibbleStream) -> Self {
        debug_assert!(stream.mode() == Mode::Decode, "load outside a decode session");

        let no_compression = stream.read_dibit() == 1;
        let mut model = NibbleModel {
            hot_values: [0; MAX_HOT],
            last_value: 0,
            no_compression,
            cold_min: 0,
            cold_max: 0,
            cold_num_bits: 2,
        };
        if !no_compression {
            model.cold_num_bits = stream.read_nibble();
            model.cold_min = stream.read_byte();
            for slot in model.hot_values.iter_mut() {
                *slot = stream.read_byte();
            }
        }
        debug!("nibble model loaded: {model}");
        model
    }
}

impl Display for NibbleModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NibbleModel< cold:{}..={} bits:{} passthrough:{} >",
            self.cold_min, self.cold_max, self.cold_num_bits, self.no_compression
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_classification() {
        let mut sequence: Vec<u8> = (1..=19).collect();
        sequence.extend(1..=14);

        let mut histogram = Histogram::with_symbols(20);
        histogram.feed(&sequence);

        let model = NibbleModel::from_histogram(&histogram);
        assert!(!model.no_compression());
        assert_eq!(model.cold_min(), 15);
        assert_eq!(model.cold_max(), 19);
        assert_eq!(model.cold_num_bits(), 4);
    }

    #[test]
    fn passthrough_gate() {
        let sequence: Vec<u8> = (1..=40).collect();
        let mut histogram = Histogram::with_symbols(41);
        histogram.feed(&sequence);

        let mut encoder = NibbleModel::from_histogram(&histogram);
        assert!(encoder.no_compression());

        let mut buffer = [0u8; 64];
        let mut stream = NibbleStream::new(&mut buffer);
        stream.begin_encode();
        for &byte in &sequence {
            encoder.encode_byte(&mut stream, byte);
        }
        assert_eq!(stream.end_encode(), 40);

        let mut decoder = NibbleModel::from_histogram(&histogram);
        stream.begin_decode();
        for &byte in &sequence {
            assert_eq!(decoder.decode_byte(&mut stream), byte);
        }
        stream.end_decode();
    }

    #[test]
    fn cold_width_ladder() {
        for (range, expected_bits) in [
            (0u8, 2u8),
            (3, 2),
            (4, 4),
            (15, 4),
            (16, 6),
            (63, 6),
            (64, 8),
            (120, 8),
        ] {
            let mut histogram = Histogram::new();
            for symbol in 0..14u8 {
                for _ in 0..10 {
                    histogram.record(symbol);
                }
            }
            histogram.record(100);
            histogram.record(100 + range);

            let model = NibbleModel::from_histogram(&histogram);
            assert!(!model.no_compression());
            assert_eq!(model.cold_num_bits(), expected_bits, "range {range}");
        }
    }

    #[test]
    fn repeat_nibble_keeps_anchor() {
        let data = [5u8, 5, 5, 8, 5];
        let mut histogram = Histogram::new();
        histogram.feed(&data);

        let mut encoder = NibbleModel::from_histogram(&histogram);
        let mut buffer = [0u8; 16];
        let mut stream = NibbleStream::new(&mut buffer);

        // one hot nibble, two repeats, two hot nibbles: 20 bits
        stream.begin_encode();
        for &byte in &data {
            encoder.encode_byte(&mut stream, byte);
        }
        assert_eq!(stream.end_encode(), 3);

        let mut decoder = NibbleModel::from_histogram(&histogram);
        stream.begin_decode();
        for &byte in &data {
            assert_eq!(decoder.decode_byte(&mut stream), byte);
        }
        stream.end_decode();
    }

    #[test]
    fn cold_escapes_roundtrip_at_every_width() {
        for (range, expected_bits) in [(3u8, 2u8), (10, 4), (40, 6), (100, 8)] {
            let cold = [50u8, 50 + range / 2, 50 + range];

            let mut data: Vec<u8> = Vec::new();
            for _ in 0..10 {
                for symbol in 1..=14u8 {
                    data.push(symbol);
                }
            }
            data.extend(cold);
            data.push(cold[0]);
            data.push(cold[0]); // repeat of a cold byte rides the RLE nibble

            let mut histogram = Histogram::new();
            histogram.feed(&data);

            let mut encoder = NibbleModel::from_histogram(&histogram);
            assert_eq!(encoder.cold_num_bits(), expected_bits, "range {range}");

            let mut buffer = [0u8; 256];
            let mut stream = NibbleStream::new(&mut buffer);
            stream.begin_encode();
            for &byte in &data {
                encoder.encode_byte(&mut stream, byte);
            }
            stream.end_encode();

            let mut decoder = NibbleModel::from_histogram(&histogram);
            stream.begin_decode();
            for &byte in &data {
                assert_eq!(decoder.decode_byte(&mut stream), byte, "range {range}");
            }
            stream.end_decode();
        }
    }

    #[test]
    fn corrupt_input_stays_bounded() {
        // a bad payload or model prefix decodes to garbage bytes without
        // leaving the buffer
        let mut buffer = [0xFFu8; 16];
        let mut stream = NibbleStream::new(&mut buffer);

        stream.begin_decode();
        let mut model = NibbleModel::load(&mut stream);
        for _ in 0..32 {
            let _ = model.decode_byte(&mut stream);
        }
        stream.end_decode();
    }

    #[test]
    fn model_save_load_roundtrip() {
        // runs of 14 frequent symbols with two rare cold bytes at the end
        let mut data: Vec<u8> = Vec::new();
        for _ in 0..6 {
            for symbol in 1..=14u8 {
                data.push(symbol);
                data.push(symbol);
            }
        }
        data.push(100);
        data.push(103);

        let mut histogram = Histogram::new();
        histogram.feed(&data);

        let mut encoder = NibbleModel::from_histogram(&histogram);
        assert!(!encoder.no_compression());
        assert_eq!(encoder.cold_num_bits(), 2);

        let mut buffer = [0u8; 256];
        let mut stream = NibbleStream::new(&mut buffer);
        stream.begin_encode();
        encoder.save(&mut stream);
        for &byte in &data {
            encoder.encode_byte(&mut stream, byte);
        }
        let written = stream.end_encode();
        assert!(written < data.len(), "{written} bytes for {}", data.len());

        stream.begin_decode();
        let mut decoder = NibbleModel::load(&mut stream);
        assert_eq!(decoder.cold_num_bits(), 2);
        assert_eq!(decoder.cold_min(), 100);
        for &byte in &data {
            assert_eq!(decoder.decode_byte(&mut stream), byte);
        }
        stream.end_decode();
    }
}
