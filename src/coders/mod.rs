//! # Coders
//!
//! Two entropy coder designs live here. Both shrink byte streams whose
//! symbol distribution is skewed, but they come from different generations
//! of the same idea and do not share a wire format.
//!
//! ## The adaptive coder
//!
//! [`AdaptiveModel`] drives a Rice–Golomb backend through a
//! [`BitStream`](crate::core::BitStream). A Rice code with parameter `k`
//! writes a non-negative integer `v` as the unary quotient `v >> k`
//! followed by a zero terminator and `k` remainder bits, so small values
//! get short codewords. Three mechanisms keep the mapping between bytes
//! and small integers honest while the data drifts:
//!
//! - a **Move-To-Front alphabet** re-ranks the 256 byte symbols so that
//!   recently seen bytes sit at low indices. Promotion moves a hit only
//!   halfway to the front (`index / 2`), a low-pass filter that keeps
//!   localized noise from churning the top of the ranking.
//! - a **soft trend counter** adapts `k` itself: observations smaller than
//!   `1 << k` pull the counter down, observations larger than `3 << k`
//!   push it up, and only twelve consecutive biased observations actually
//!   move `k`.
//! - an **escape cutoff** bounds the worst case: once the unary quotient
//!   would pass a `k`-specific limit, the coder emits the limit run and
//!   the raw byte instead of an arbitrarily long unary prefix.
//!
//! On top of the symbol path the model offers literals (values already
//! known to be small), zig-zag folded signed deltas, and an RLE path that
//! indexes a ring of the 16 most recent raw values.
//!
//! Every operation mutates the model, and the decoder applies the exact
//! mutations the encoder applied, so both sides must issue the identical
//! sequence of operations. Encoding is not pure: two encodes of the same
//! byte against the same model generally produce different bits.
//!
//! ## The nibble coder
//!
//! [`NibbleModel`] is the earlier, simpler design, kept because its
//! trade-offs still win on tiny alphabets. A histogram pass picks the 14
//! most frequent bytes as *hot* values coded in a single nibble; nibble 14
//! repeats the previous byte and nibble 15 escapes into the *cold* range,
//! coded in just enough bits to span it. When the hot values cover less
//! than half of the input the model declares the stream incompressible and
//! passes bytes through untouched. Payloads travel over the MSB-first
//! [`NibbleStream`](crate::core::NibbleStream) layout, prefixed by the
//! serialized model.

mod adaptive;
mod nibble;
mod rice;

pub use adaptive::{zigzag8_decode, zigzag8_encode, AdaptiveModel};
pub use nibble::NibbleModel;
