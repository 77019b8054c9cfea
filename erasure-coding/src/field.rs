//! Arithmetic in GF(2^16), the quotient of GF(2)[x] by
//! x^16 + x^5 + x^3 + x^2 + 1.
//!
//! Addition is bitwise XOR. Multiplication, inversion and division go
//! through a discrete-log/exponential table pair built once at
//! construction, making each of them a couple of lookups.

use crate::error::{Error, Result};
use crate::Vec;

/// Number of bits in a field element.
pub const FIELD_BITS: u32 = 16;

/// Number of field elements.
pub const FIELD_SIZE: usize = 1 << FIELD_BITS;

/// The reduction polynomial, x^16 + x^5 + x^3 + x^2 + 1.
pub const MODULUS: u32 = 0x1_002D;

/// The multiplicative generator the tables are built over.
pub const GENERATOR: u16 = 0x0002;

/// Order of the multiplicative group.
const GROUP_ORDER: u32 = (FIELD_SIZE - 1) as u32;

/// The field, materialized as its log/exp tables (about 256 KiB).
///
/// All methods take `&self` and the tables are never written after
/// [`Gf65536::new`] returns, so one instance may serve any number of
/// threads without synchronization.
#[derive(Clone)]
pub struct Gf65536 {
    /// `exp[i]` is `GENERATOR` to the `i`, for `i` in `0..65535`.
    exp: Vec<u16>,
    /// Discrete logs, the inverse of `exp`. `log[0]` is meaningless and
    /// never consulted: zero operands are handled before any lookup.
    log: Vec<u16>,
}

impl Gf65536 {
    /// Builds the tables by iterating powers of the generator under the
    /// reduction polynomial.
    pub fn new() -> Self {
        let mut exp = vec![0u16; GROUP_ORDER as usize];
        let mut log = vec![0u16; FIELD_SIZE];
        let mut state: u32 = 1;
        for i in 0..GROUP_ORDER {
            exp[i as usize] = state as u16;
            log[state as usize] = i as u16;
            state <<= 1;
            if state & (1 << FIELD_BITS) != 0 {
                state ^= MODULUS;
            }
        }
        Gf65536 { exp, log }
    }

    /// Addition; the field has characteristic two.
    #[inline]
    pub fn add(&self, a: u16, b: u16) -> u16 {
        a ^ b
    }

    /// Multiplication through the tables.
    #[inline]
    pub fn mul(&self, a: u16, b: u16) -> u16 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log = u32::from(self.log[a as usize]) + u32::from(self.log[b as usize]);
        self.exp[(log % GROUP_ORDER) as usize]
    }

    /// Multiplicative inverse; zero has none.
    #[inline]
    pub fn inv(&self, a: u16) -> Result<u16> {
        if a == 0 {
            return Err(Error::DivByZero);
        }
        let log = GROUP_ORDER - u32::from(self.log[a as usize]);
        Ok(self.exp[(log % GROUP_ORDER) as usize])
    }

    /// Division.
    #[inline]
    pub fn div(&self, a: u16, b: u16) -> Result<u16> {
        if b == 0 {
            return Err(Error::DivByZero);
        }
        if a == 0 {
            return Ok(0);
        }
        let log =
            GROUP_ORDER + u32::from(self.log[a as usize]) - u32::from(self.log[b as usize]);
        Ok(self.exp[(log % GROUP_ORDER) as usize])
    }

    /// Exponentiation by square-and-multiply.
    ///
    /// `pow(0, 0)` is one by convention; a negative exponent inverts the
    /// base first, so `pow(0, e)` with `e < 0` reports
    /// [`Error::DivByZero`].
    pub fn pow(&self, a: u16, e: i64) -> Result<u16> {
        let (mut base, mut e) = if e < 0 {
            (self.inv(a)?, e.unsigned_abs())
        } else {
            (a, e as u64)
        };
        let mut acc: u16 = 1;
        while e > 0 {
            if e & 1 == 1 {
                acc = self.mul(acc, base);
            }
            base = self.mul(base, base);
            e >>= 1;
        }
        Ok(acc)
    }
}

impl Default for Gf65536 {
    fn default() -> Self {
        Self::new()
    }
}
