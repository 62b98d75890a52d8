//! # Skew Compression Library
//!
//! A compact, adaptive entropy coder for short-to-medium byte streams whose
//! symbol distribution is skewed (texture transcoding byproducts, font
//! atlases, delta signals, small categorical alphabets). The coder writes a
//! self-delimited bit-level payload into a caller-supplied buffer and
//! decodes it back exactly.
//!
//! Pick the operation that matches the shape of your data:
//!
//! - [`coders::AdaptiveModel::encode_symbol`] for data with categorical
//!   redundancy (repeated patterns),
//! - [`coders::AdaptiveModel::encode_delta`] for small numerical offsets,
//! - [`coders::AdaptiveModel::encode_literal`] for values known to be small,
//! - [`coders::AdaptiveModel::encode_rle`] for streams that revisit the
//!   same few values.
//!
//! Models are cheap; it pays to specialize one model per kind of data
//! instead of pushing mixed data through a single model.
//!
//! ```
//! use skew::coders::AdaptiveModel;
//! use skew::core::BitStream;
//!
//! let mut buffer = [0u8; 64];
//! let mut stream = BitStream::new(&mut buffer);
//! let mut encoder = AdaptiveModel::new();
//!
//! stream.begin_encode();
//! for byte in [7, 7, 9, 7] {
//!     encoder.encode_symbol(&mut stream, byte);
//! }
//! let written = stream.end_encode();
//! assert!(written <= 4);
//!
//! let mut decoder = AdaptiveModel::new();
//! stream.begin_decode();
//! for expected in [7, 7, 9, 7] {
//!     assert_eq!(decoder.decode_symbol(&mut stream), expected);
//! }
//! stream.end_decode();
//! ```

pub mod coders;
pub mod core;
pub mod stats;
