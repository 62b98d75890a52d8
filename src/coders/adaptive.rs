//! # Adaptive model
//!
//! The state driving the primary coder: a Move-To-Front alphabet over all
//! 256 byte symbols, the Rice parameter `k` with its soft trend counter,
//! and a small ring of recent raw values for the RLE path. Encoder and
//! decoder mutate this state on every call and must stay in lockstep; see
//! the [module overview](crate::coders) for the design reasoning.

use crate::coders::rice::{rice_decode, rice_encode};
use crate::core::{BitStream, Mode};
use log::{debug, info};
use std::fmt::Display;

/// Number of byte symbols ranked by the alphabet.
const ALPHABET_SIZE: usize = 256;

/// Capacity of the recent-values ring searched by the RLE operations.
/// Must stay a power of two, the ring index wraps by mask.
const HISTORY_SIZE: usize = 16;

/// Consecutive biased observations required before `k` moves.
const K_TREND_THRESHOLD: i8 = 12;

/// Alphabet promotion only runs while `k` is below this.
const PROMOTION_K_LIMIT: u8 = 6;

/// Adaptive coding state shared by one encoder/decoder pair.
///
/// A freshly constructed model ranks the alphabet in identity order with
/// `k = 2`. Every `encode_*` call mutates the model, and the matching
/// `decode_*` call applies the identical mutation, so a decoder starting
/// from the same initial state tracks the encoder bit for bit. The
/// operations are not pure; replaying a sequence requires a fresh model.
///
/// # Examples
///
/// ```
/// use skew::coders::AdaptiveModel;
/// use skew::core::BitStream;
///
/// let mut buffer = [0u8; 32];
/// let mut stream = BitStream::new(&mut buffer);
/// let mut encoder = AdaptiveModel::new();
///
/// stream.begin_encode();
/// for delta in [-1i8, 2, 0, -3] {
///     encoder.encode_delta(&mut stream, delta);
/// }
/// stream.end_encode();
///
/// let mut decoder = AdaptiveModel::new();
/// stream.begin_decode();
/// for delta in [-1i8, 2, 0, -3] {
///     assert_eq!(decoder.decode_delta(&mut stream), delta);
/// }
/// stream.end_decode();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptiveModel {
    alphabet: [u8; ALPHABET_SIZE],
    history: [u8; HISTORY_SIZE],
    history_index: usize,
    k: u8,
    k_trend: i8,
}

impl AdaptiveModel {
    /// Create a model in its initial state.
    pub fn new() -> Self {
        info!("New adaptive model, k=2");
        let mut alphabet = [0u8; ALPHABET_SIZE];
        for (symbol, slot) in alphabet.iter_mut().enumerate() {
            *slot = symbol as u8;
        }
        let mut history = [0u8; HISTORY_SIZE];
        for (value, slot) in history.iter_mut().enumerate() {
            *slot = value as u8;
        }
        AdaptiveModel {
            alphabet,
            history,
            history_index: 0,
            k: 2,
            k_trend: 0,
        }
    }

    /// Restore the initial state.
    pub fn reset(&mut self) {
        *self = AdaptiveModel::new();
    }

    /// Encode one byte through the Move-To-Front alphabet.
    pub fn encode_symbol(&mut self, stream: &mut BitStream, value: u8) {
        debug_assert!(stream.mode() == Mode::Encode, "encode outside an encode session");
        // the alphabet is a permutation of 0..=255, every byte has an index
        let index = self
            .alphabet
            .iter()
            .position(|&entry| entry == value)
            .unwrap();
        rice_encode(stream, index as u32, self.k);
        self.promote(index);
        self.update_k(index as u32);
    }

    /// Decode one byte written by [`encode_symbol`](Self::encode_symbol).
    pub fn decode_symbol(&mut self, stream: &mut BitStream) -> u8 {
        debug_assert!(stream.mode() == Mode::Decode, "decode outside a decode session");
        let index = usize::from(rice_decode(stream, self.k));
        let value = self.alphabet[index];
        self.promote(index);
        self.update_k(index as u32);
        value
    }

    /// Encode a value the caller already knows is small.
    pub fn encode_literal(&mut self, stream: &mut BitStream, value: u8) {
        debug_assert!(stream.mode() == Mode::Encode, "encode outside an encode session");
        rice_encode(stream, u32::from(value), self.k);
        self.update_k(u32::from(value));
    }

    /// Decode a value written by [`encode_literal`](Self::encode_literal).
    pub fn decode_literal(&mut self, stream: &mut BitStream) -> u8 {
        debug_assert!(stream.mode() == Mode::Decode, "decode outside a decode session");
        let value = rice_decode(stream, self.k);
        self.update_k(u32::from(value));
        value
    }

    /// Encode a signed delta, zig-zag folded so small magnitudes of either
    /// sign get short codewords.
    pub fn encode_delta(&mut self, stream: &mut BitStream, delta: i8) {
        debug_assert!(stream.mode() == Mode::Encode, "encode outside an encode session");
        let folded = zigzag8_encode(delta);
        rice_encode(stream, u32::from(folded), self.k);
        self.update_k(u32::from(folded));
    }

    /// Decode a delta written by [`encode_delta`](Self::encode_delta).
    pub fn decode_delta(&mut self, stream: &mut BitStream) -> i8 {
        debug_assert!(stream.mode() == Mode::Decode, "decode outside a decode session");
        let folded = rice_decode(stream, self.k);
        self.update_k(u32::from(folded));
        zigzag8_decode(folded)
    }

    /// Encode a byte against the recent-values ring: a hit costs one flag
    /// bit plus the Rice-coded ring index, a miss costs the flag bit plus
    /// the raw byte and enters the ring.
    pub fn encode_rle(&mut self, stream: &mut BitStream, value: u8) {
        debug_assert!(stream.mode() == Mode::Encode, "encode outside an encode session");
        match self.history.iter().position(|&entry| entry == value) {
            Some(index) => {
                stream.write_bits(1, 1);
                rice_encode(stream, index as u32, self.k);
                self.update_k(index as u32);
            }
            None => {
                stream.write_bits(0, 1);
                stream.write_byte(value);
                self.history[self.history_index] = value;
                self.history_index = (self.history_index + 1) & (HISTORY_SIZE - 1);
            }
        }
    }

    /// Decode a byte written by [`encode_rle`](Self::encode_rle).
    pub fn decode_rle(&mut self, stream: &mut BitStream) -> u8 {
        debug_assert!(stream.mode() == Mode::Decode, "decode outside a decode session");
        if stream.read_bits(1) == 1 {
            let index = usize::from(rice_decode(stream, self.k));
            // a corrupt stream can carry any index, stay inside the ring
            let value = self.history[index & (HISTORY_SIZE - 1)];
            self.update_k(index as u32);
            value
        } else {
            let value = stream.read_byte();
            self.history[self.history_index] = value;
            self.history_index = (self.history_index + 1) & (HISTORY_SIZE - 1);
            value
        }
    }

    /// Move a hit halfway to the front, shifting the skipped entries back.
    fn promote(&mut self, index: usize) {
        if index > 0 && self.k < PROMOTION_K_LIMIT {
            let symbol = self.alphabet[index];
            let target = index / 2;
            self.alphabet.copy_within(target..index, target + 1);
            self.alphabet[target] = symbol;
        }
    }

    /// Soft adaptation of `k`: twelve consecutive observations outside the
    /// comfortable band move it one step.
    fn update_k(&mut self, value: u32) {
        if value < (1u32 << self.k) && self.k > 0 {
            self.k_trend -= 1;
        } else if value > (3u32 << self.k) && self.k < 7 {
            self.k_trend += 1;
        }

        if self.k_trend > K_TREND_THRESHOLD {
            self.k += 1;
            self.k_trend = 0;
            debug!("rice parameter raised to k={}", self.k);
        } else if self.k_trend < -K_TREND_THRESHOLD {
            self.k -= 1;
            self.k_trend = 0;
            debug!("rice parameter lowered to k={}", self.k);
        }
    }
}

impl Default for AdaptiveModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AdaptiveModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AdaptiveModel< k:{} trend:{} >", self.k, self.k_trend)
    }
}

/// Fold a signed byte into a non-negative integer, interleaving signs:
/// `0, -1, 1, -2, …` becomes `0, 1, 2, 3, …`.
///
/// # Examples
///
/// ```
/// use skew::coders::zigzag8_encode;
///
/// assert_eq!(zigzag8_encode(0), 0);
/// assert_eq!(zigzag8_encode(-1), 1);
/// assert_eq!(zigzag8_encode(1), 2);
/// ```
pub fn zigzag8_encode(value: i8) -> u8 {
    ((value << 1) ^ (value >> 7)) as u8
}

/// Invert [`zigzag8_encode`].
///
/// # Examples
///
/// ```
/// use skew::coders::zigzag8_decode;
///
/// assert_eq!(zigzag8_decode(3), -2);
/// assert_eq!(zigzag8_decode(4), 2);
/// ```
pub fn zigzag8_decode(folded: u8) -> i8 {
    ((folded >> 1) as i8) ^ -((folded & 1) as i8)
}
