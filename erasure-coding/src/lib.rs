//! This crate implements systematic Reed-Solomon erasure coding over
//! GF(2^16) for data-availability schemes: a blob of bytes is split into
//! fixed-size pieces, every piece is extended to a 1023-symbol codeword,
//! and the symbols are regrouped position-wise into 1023 chunks so that
//! any sufficient subset of chunks restores the blob bit-for-bit.
//!
//! Codeword symbols are evaluations of the piece's interpolating
//! polynomial at points indexed through a Cantor basis of the field, and
//! both encoding and recovery use the second barycentric form of the
//! Lagrange interpolant with precomputed weights.
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unused_import_braces, unused_qualifications, trivial_casts)]
#![deny(trivial_numeric_casts, variant_size_differences)]
#![deny(non_shorthand_field_patterns, unused_attributes, unused_imports)]
#![deny(unused_extern_crates, renamed_and_removed_lints, unused_allocation)]
#![deny(unused_comparisons, bare_trait_objects, unused_must_use)]
#![deny(unused_mut, unused_unsafe)]
#![forbid(unsafe_code)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

#[cfg(not(feature = "std"))]
pub(crate) use alloc::{collections::BTreeMap, vec::Vec};

#[cfg(feature = "std")]
pub(crate) use std::{collections::BTreeMap, vec::Vec};

/// Creates parallel iterator over refs if `parallel` feature is enabled.
#[macro_export]
macro_rules! cfg_iter {
    ($e: expr) => {{
        #[cfg(feature = "parallel")]
        let result = $e.par_iter();

        #[cfg(not(feature = "parallel"))]
        let result = $e.iter();

        result
    }};
}

/// Creates parallel iterator if `parallel` feature is enabled.
#[macro_export]
macro_rules! cfg_into_iter {
    ($e: expr) => {{
        #[cfg(feature = "parallel")]
        let result = $e.into_par_iter();

        #[cfg(not(feature = "parallel"))]
        let result = $e.into_iter();

        result
    }};
}

/// Returns an iterator over `chunk_size` elements of the slice at a
/// time.
#[macro_export]
macro_rules! cfg_chunks {
    ($e: expr, $size: expr) => {{
        #[cfg(feature = "parallel")]
        let result = $e.par_chunks($size);

        #[cfg(not(feature = "parallel"))]
        let result = $e.chunks($size);

        result
    }};
}

pub mod cantor;
pub mod engine;
pub mod error;
pub mod field;
pub mod layout;
pub mod piece;

pub use cantor::CantorBasis;
pub use engine::{EncodedBlob, ErasureCoder};
pub use error::{Error, Result};
pub use field::Gf65536;
pub use piece::PieceCodec;

/// Number of chunks an encoded blob fans out to, and the codeword length
/// in symbols. Fixed at the protocol level.
pub const TOTAL_SHARDS: usize = 1023;

/// Message symbols per codeword under the blob/audit profile.
pub const BLOB_DATA_SHARDS: usize = 342;

/// Message symbols per codeword under the segment/import profile.
pub const SEGMENT_DATA_SHARDS: usize = 6;

/// Bytes per piece under the blob/audit profile.
pub const BLOB_PIECE_BYTES: usize = 2 * BLOB_DATA_SHARDS;

/// Bytes per piece under the segment/import profile.
pub const SEGMENT_PIECE_BYTES: usize = 2 * SEGMENT_DATA_SHARDS;
