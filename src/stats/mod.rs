//! # Statistics
//!
//! Symbol statistics gathered ahead of coding. The nibble coder is not
//! adaptive: it classifies symbols once, from a [`Histogram`] the caller
//! fills over a representative sample (usually the payload itself), and
//! keeps that classification for the whole payload.

pub(crate) mod histogram;

pub use histogram::Histogram;
