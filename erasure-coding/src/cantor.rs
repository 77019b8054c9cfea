//! The Cantor basis of GF(2^16) and the shard-index → evaluation-point
//! map.
//!
//! The sixteen basis vectors are published as tuples of exponents of the
//! field generator; each vector is the XOR of the listed powers. A shard
//! index selects a subset of the basis through its low bits, and the XOR
//! of that subset is the evaluation point for the corresponding codeword
//! position. Because the basis has full GF(2) rank, distinct indices map
//! to distinct points.

use crate::error::{Error, Result};
use crate::field::{Gf65536, GENERATOR};

/// The published exponent tuples over the generator that define the
/// sixteen basis vectors.
pub const CANTOR_EXPONENTS: [&[i64]; 16] = [
    &[0],
    &[6, 8, 20, 25],
    &[0, 8, 13, 20],
    &[2, 9, 17, 28],
    &[1, 7, 22, 30],
    &[4, 10, 19, 33],
    &[3, 12, 24, 31],
    &[5, 11, 21, 35],
    &[2, 14, 26, 34],
    &[6, 13, 27, 38],
    &[1, 15, 23, 37],
    &[8, 16, 29, 40],
    &[4, 18, 32, 41],
    &[7, 20, 36, 43],
    &[9, 25, 39, 44],
    &[10, 28, 42, 45],
];

/// Width of the basis, and of a coefficient mask, in bits.
const BASIS_BITS: usize = 16;

/// A full-rank GF(2) basis of the field together with its inverse change
/// of basis.
#[derive(Clone, Debug)]
pub struct CantorBasis {
    /// `basis[j]` is the j-th basis vector as a field element.
    basis: [u16; BASIS_BITS],
    /// Rows of the inverted basis matrix: [`Self::poly_to_cantor`] XORs
    /// the rows selected by the element's bits.
    inverse: [u16; BASIS_BITS],
}

impl CantorBasis {
    /// Derives the basis vectors from [`CANTOR_EXPONENTS`] and inverts
    /// the resulting GF(2) matrix.
    ///
    /// Fails with [`Error::BasisNotFullRank`] if the vectors do not span
    /// the field, which can only mean the constant table is corrupt.
    pub fn new(field: &Gf65536) -> Result<Self> {
        let mut basis = [0u16; BASIS_BITS];
        for (vector, exponents) in basis.iter_mut().zip(CANTOR_EXPONENTS.iter()) {
            for &e in *exponents {
                *vector ^= field.pow(GENERATOR, e)?;
            }
        }
        let inverse = invert(&basis).ok_or(Error::BasisNotFullRank)?;
        Ok(CantorBasis { basis, inverse })
    }

    /// The field element a coefficient mask selects: the XOR of the basis
    /// vectors whose bit is set in `mask`.
    #[inline]
    pub fn cantor_to_poly(&self, mask: u16) -> u16 {
        combine(&self.basis, mask)
    }

    /// The coefficient mask of `element` over the basis; exact inverse of
    /// [`Self::cantor_to_poly`].
    #[inline]
    pub fn poly_to_cantor(&self, element: u16) -> u16 {
        combine(&self.inverse, element)
    }

    /// The evaluation point of codeword position `index`. Only the low
    /// ten bits of the index participate, which covers every valid
    /// position `0..1023`.
    #[inline]
    pub fn evaluation_point(&self, index: usize) -> u16 {
        self.cantor_to_poly((index & 0x3FF) as u16)
    }
}

/// XOR of the rows of `rows` selected by the bits of `mask`.
fn combine(rows: &[u16; BASIS_BITS], mask: u16) -> u16 {
    let mut acc = 0;
    for (j, row) in rows.iter().enumerate() {
        if mask >> j & 1 == 1 {
            acc ^= row;
        }
    }
    acc
}

/// Gauss-Jordan elimination over GF(2): reduce `rows` to the identity
/// while applying the same row operations to an identity matrix, yielding
/// the inverse. Returns `None` when the rows are linearly dependent.
fn invert(rows: &[u16; BASIS_BITS]) -> Option<[u16; BASIS_BITS]> {
    let mut work = *rows;
    let mut inverse = [0u16; BASIS_BITS];
    for (j, row) in inverse.iter_mut().enumerate() {
        *row = 1 << j;
    }
    for col in 0..BASIS_BITS {
        let pivot = (col..BASIS_BITS).find(|&r| work[r] >> col & 1 == 1)?;
        work.swap(col, pivot);
        inverse.swap(col, pivot);
        for r in 0..BASIS_BITS {
            if r != col && work[r] >> col & 1 == 1 {
                work[r] ^= work[col];
                inverse[r] ^= inverse[col];
            }
        }
    }
    Some(inverse)
}
