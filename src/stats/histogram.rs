//! # Histogram
//!
//! Occurrence counts for byte symbols, bounded by the size of the active
//! alphabet.

use std::fmt::Debug;

/// Occurrence counts over the byte alphabet.
///
/// `num_symbols` bounds the active alphabet: symbols at or above it are
/// never recorded and never scanned. Keeping the bound tight makes the
/// classification scans of the nibble coder proportionally cheaper.
///
/// # Examples
///
/// ```
/// use skew::stats::Histogram;
///
/// let mut histogram = Histogram::new();
/// histogram.feed(&[7, 7, 3]);
///
/// assert_eq!(histogram.count(7), 2);
/// assert_eq!(histogram.count(9), 0);
/// assert_eq!(histogram.total(), 3);
/// ```
#[derive(Clone)]
pub struct Histogram {
    counts: [u32; 256],
    num_symbols: usize,
}

impl Histogram {
    /// Create an empty histogram over the full byte alphabet.
    pub fn new() -> Self {
        Histogram {
            counts: [0; 256],
            num_symbols: 256,
        }
    }

    /// Create an empty histogram over the first `num_symbols` symbols.
    ///
    /// `num_symbols` must lie in `4..=256`; alphabets smaller than that
    /// have nothing to gain from nibble codes.
    ///
    /// # Examples
    ///
    /// ```
    /// use skew::stats::Histogram;
    ///
    /// let histogram = Histogram::with_symbols(20);
    /// assert_eq!(histogram.num_symbols(), 20);
    /// ```
    pub fn with_symbols(num_symbols: usize) -> Self {
        assert!(num_symbols > 3 && num_symbols <= 256);
        Histogram {
            counts: [0; 256],
            num_symbols,
        }
    }

    /// Count one occurrence of `symbol`.
    pub fn record(&mut self, symbol: u8) {
        debug_assert!(
            usize::from(symbol) < self.num_symbols,
            "symbol outside the active alphabet"
        );
        self.counts[usize::from(symbol)] += 1;
    }

    /// Count every byte of `data`.
    pub fn feed(&mut self, data: &[u8]) {
        for &byte in data {
            self.record(byte);
        }
    }

    /// Occurrences of `symbol`.
    pub fn count(&self, symbol: u8) -> u32 {
        self.counts[usize::from(symbol)]
    }

    /// Sum of all counts inside the active alphabet.
    pub fn total(&self) -> u64 {
        self.counts[..self.num_symbols]
            .iter()
            .map(|&count| u64::from(count))
            .sum()
    }

    /// Size of the active alphabet.
    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Histogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Histogram[")?;
        for (symbol, &count) in self.counts[..self.num_symbols].iter().enumerate() {
            if count > 0 {
                write!(f, "({symbol}:{count})")?;
            }
        }
        write!(f, "]")
    }
}
