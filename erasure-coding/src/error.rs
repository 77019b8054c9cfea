//! Error and result types shared by every operation in the crate.

use core::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Every failure the coding engine can report.
///
/// Failures are synchronous and local: the offending call returns the
/// error and produces no partial output. Whether to log, retry or fail
/// over is the caller's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested `(data_shards, total_shards)` pair lies outside the
    /// protocol-fixed parameter set.
    UnsupportedParameters {
        /// Message symbols per codeword as requested.
        data_shards: usize,
        /// Codeword length as requested.
        total_shards: usize,
    },
    /// Fewer unique valid shard indices than data shards were supplied to
    /// a recovery call.
    InsufficientShards {
        /// Unique valid indices supplied.
        have: usize,
        /// Indices required for recovery.
        need: usize,
    },
    /// A shard index lies outside the codeword.
    IndexOutOfRange(usize),
    /// Chunks have inconsistent lengths, an odd byte count, or a length
    /// that disagrees with the declared piece count.
    InvalidShardLayout(&'static str),
    /// A wire word does not fit in 16 bits. Words are `u16` throughout
    /// this crate, so only an upstream deserializer that widens words
    /// before validating them can observe this.
    WordOutOfRange(u32),
    /// A transpose was attempted over a non-rectangular matrix.
    RaggedMatrix,
    /// Zero denominator in field arithmetic.
    DivByZero,
    /// The Cantor basis constants do not span GF(2^16).
    BasisNotFullRank,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedParameters {
                data_shards,
                total_shards,
            } => write!(
                f,
                "unsupported code parameters: {} data shards of {} total",
                data_shards, total_shards
            ),
            Error::InsufficientShards { have, need } => write!(
                f,
                "insufficient shards for recovery: have {}, need {}",
                have, need
            ),
            Error::IndexOutOfRange(index) => write!(f, "shard index {} out of range", index),
            Error::InvalidShardLayout(detail) => write!(f, "invalid shard layout: {}", detail),
            Error::WordOutOfRange(word) => write!(f, "word {:#x} exceeds 16 bits", word),
            Error::RaggedMatrix => write!(f, "matrix rows are not all the same length"),
            Error::DivByZero => write!(f, "division by zero in GF(2^16)"),
            Error::BasisNotFullRank => write!(f, "Cantor basis does not span GF(2^16)"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
