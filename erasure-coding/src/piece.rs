//! The systematic Reed-Solomon piece codec.
//!
//! A piece of `k` words is read as the values of a degree-below-`k`
//! polynomial on the first `k` evaluation points; the codeword extends it
//! with the polynomial's values on the remaining points, so the message
//! words appear verbatim at the front. Any `k` distinct codeword
//! positions determine the same polynomial again, which is all recovery
//! has to do. Interpolation and evaluation both use the second
//! barycentric form of the Lagrange interpolant, with the weights of the
//! systematic nodes precomputed at construction.

use crate::cantor::CantorBasis;
use crate::error::{Error, Result};
use crate::field::Gf65536;
use crate::{BTreeMap, Vec, TOTAL_SHARDS};

/// Fixed-parameter encoder/decoder for single pieces.
///
/// Construction builds the field tables, derives the Cantor basis and
/// precomputes every evaluation point together with the barycentric
/// weights of the `data_shards` systematic nodes. Everything is immutable
/// afterwards, so one codec may serve any number of threads.
pub struct PieceCodec {
    data_shards: usize,
    total_shards: usize,
    field: Gf65536,
    basis: CantorBasis,
    /// `points[i]` is the evaluation point of codeword position `i`.
    points: Vec<u16>,
    /// Barycentric weights of the systematic nodes `points[..data_shards]`.
    systematic_weights: Vec<u16>,
}

impl PieceCodec {
    /// Builds a codec for `data_shards`-of-`total_shards` coding.
    ///
    /// The codeword length is fixed at the protocol level, so anything
    /// other than `1 <= data_shards < total_shards = 1023` is
    /// [`Error::UnsupportedParameters`].
    pub fn new(data_shards: usize, total_shards: usize) -> Result<Self> {
        if total_shards != TOTAL_SHARDS || data_shards == 0 || data_shards >= total_shards {
            return Err(Error::UnsupportedParameters {
                data_shards,
                total_shards,
            });
        }
        let field = Gf65536::new();
        let basis = CantorBasis::new(&field)?;
        let points: Vec<u16> = (0..total_shards)
            .map(|index| basis.evaluation_point(index))
            .collect();
        let systematic_weights = barycentric_weights(&field, &points[..data_shards])?;
        Ok(PieceCodec {
            data_shards,
            total_shards,
            field,
            basis,
            points,
            systematic_weights,
        })
    }

    /// Message words per piece.
    pub fn data_shards(&self) -> usize {
        self.data_shards
    }

    /// Codeword length in words.
    pub fn total_shards(&self) -> usize {
        self.total_shards
    }

    /// The basis behind the evaluation points.
    pub fn basis(&self) -> &CantorBasis {
        &self.basis
    }

    /// Systematic encode: the codeword starts with `piece` itself and
    /// continues with the interpolant's values at the parity points.
    pub fn encode(&self, piece: &[u16]) -> Result<Vec<u16>> {
        if piece.len() != self.data_shards {
            return Err(Error::UnsupportedParameters {
                data_shards: piece.len(),
                total_shards: self.total_shards,
            });
        }
        let nodes = &self.points[..self.data_shards];
        let mut codeword = Vec::with_capacity(self.total_shards);
        codeword.extend_from_slice(piece);
        for &x in &self.points[self.data_shards..] {
            codeword.push(barycentric_eval(
                &self.field,
                nodes,
                &self.systematic_weights,
                piece,
                x,
            )?);
        }
        Ok(codeword)
    }

    /// Recovers the message words from at least `data_shards` distinct
    /// `(index, word)` pairs.
    ///
    /// Duplicate indices keep the first word supplied; when more shards
    /// than needed are present, the `data_shards` smallest indices are
    /// the ones used.
    pub fn recover(&self, shards: &[(usize, u16)]) -> Result<Vec<u16>> {
        let mut unique = BTreeMap::new();
        for &(index, word) in shards {
            if index >= self.total_shards {
                return Err(Error::IndexOutOfRange(index));
            }
            unique.entry(index).or_insert(word);
        }
        if unique.len() < self.data_shards {
            return Err(Error::InsufficientShards {
                have: unique.len(),
                need: self.data_shards,
            });
        }
        let mut indices = Vec::with_capacity(self.data_shards);
        let mut values = Vec::with_capacity(self.data_shards);
        for (index, word) in unique.into_iter().take(self.data_shards) {
            indices.push(index);
            values.push(word);
        }
        let selection = self.select(&indices)?;
        self.recover_row(&selection, &values)
    }

    /// Prepares the interpolation data for a fixed choice of shard
    /// indices, so batch decoders pay the weight computation once per
    /// blob rather than once per piece row.
    ///
    /// `indices` must be strictly increasing, in range and of length
    /// `data_shards`.
    pub(crate) fn select(&self, indices: &[usize]) -> Result<ShardSelection> {
        debug_assert_eq!(indices.len(), self.data_shards);
        if indices.iter().enumerate().all(|(j, &index)| index == j) {
            return Ok(ShardSelection {
                nodes: Vec::new(),
                weights: Vec::new(),
                systematic: true,
            });
        }
        let nodes: Vec<u16> = indices.iter().map(|&index| self.points[index]).collect();
        let weights = barycentric_weights(&self.field, &nodes)?;
        Ok(ShardSelection {
            nodes,
            weights,
            systematic: false,
        })
    }

    /// Interpolates one piece row from the shard words of a prepared
    /// selection, evaluating at the systematic points.
    pub(crate) fn recover_row(
        &self,
        selection: &ShardSelection,
        values: &[u16],
    ) -> Result<Vec<u16>> {
        if selection.systematic {
            return Ok(values.to_vec());
        }
        self.points[..self.data_shards]
            .iter()
            .map(|&x| barycentric_eval(&self.field, &selection.nodes, &selection.weights, values, x))
            .collect()
    }
}

/// Interpolation data for one choice of shard indices. When the choice is
/// exactly the systematic window the nodes and weights stay empty and
/// recovery is a copy.
pub(crate) struct ShardSelection {
    nodes: Vec<u16>,
    weights: Vec<u16>,
    systematic: bool,
}

/// The barycentric weight of each node: the inverse of the product of its
/// distances to every other node.
fn barycentric_weights(field: &Gf65536, nodes: &[u16]) -> Result<Vec<u16>> {
    nodes
        .iter()
        .enumerate()
        .map(|(j, &xj)| {
            let mut product: u16 = 1;
            for (m, &xm) in nodes.iter().enumerate() {
                if m != j {
                    product = field.mul(product, xj ^ xm);
                }
            }
            field.inv(product)
        })
        .collect()
}

/// Second barycentric form: the interpolant at `x` is the quotient of two
/// weighted sums over the nodes. Evaluation at one of the nodes short-
/// circuits to the matching sample, where the quotient is undefined.
fn barycentric_eval(
    field: &Gf65536,
    nodes: &[u16],
    weights: &[u16],
    values: &[u16],
    x: u16,
) -> Result<u16> {
    let mut numerator: u16 = 0;
    let mut denominator: u16 = 0;
    for ((&node, &weight), &value) in nodes.iter().zip(weights).zip(values) {
        let distance = x ^ node;
        if distance == 0 {
            return Ok(value);
        }
        let term = field.div(weight, distance)?;
        numerator ^= field.mul(term, value);
        denominator ^= term;
    }
    field.div(numerator, denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SEGMENT_DATA_SHARDS;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    fn test_rng() -> XorShiftRng {
        XorShiftRng::from_seed([
            0x1c, 0xe4, 0x22, 0x90, 0x4b, 0x7a, 0x52, 0x17, 0xa3, 0x08, 0xd5, 0x6f, 0x31, 0x9e,
            0x2b, 0x44,
        ])
    }

    fn random_piece(rng: &mut XorShiftRng, k: usize) -> Vec<u16> {
        (0..k).map(|_| rng.gen::<u16>()).collect()
    }

    #[test]
    fn parameter_guard() {
        assert!(PieceCodec::new(SEGMENT_DATA_SHARDS, TOTAL_SHARDS).is_ok());
        assert!(PieceCodec::new(342, TOTAL_SHARDS).is_ok());
        assert!(matches!(
            PieceCodec::new(0, TOTAL_SHARDS),
            Err(Error::UnsupportedParameters { .. })
        ));
        assert!(matches!(
            PieceCodec::new(TOTAL_SHARDS, TOTAL_SHARDS),
            Err(Error::UnsupportedParameters { .. })
        ));
        assert!(matches!(
            PieceCodec::new(6, 1024),
            Err(Error::UnsupportedParameters { .. })
        ));
        assert!(matches!(
            PieceCodec::new(6, 512),
            Err(Error::UnsupportedParameters { .. })
        ));
    }

    #[test]
    fn codeword_is_systematic() {
        let codec = PieceCodec::new(SEGMENT_DATA_SHARDS, TOTAL_SHARDS).unwrap();
        let rng = &mut test_rng();
        let piece = random_piece(rng, SEGMENT_DATA_SHARDS);
        let codeword = codec.encode(&piece).unwrap();
        assert_eq!(codeword.len(), TOTAL_SHARDS);
        assert_eq!(&codeword[..SEGMENT_DATA_SHARDS], piece.as_slice());
    }

    #[test]
    fn wrong_piece_length_is_rejected() {
        let codec = PieceCodec::new(SEGMENT_DATA_SHARDS, TOTAL_SHARDS).unwrap();
        assert!(matches!(
            codec.encode(&[1, 2, 3]),
            Err(Error::UnsupportedParameters { .. })
        ));
    }

    #[test]
    fn recovers_from_any_shard_subset() {
        let codec = PieceCodec::new(SEGMENT_DATA_SHARDS, TOTAL_SHARDS).unwrap();
        let rng = &mut test_rng();
        let piece = random_piece(rng, SEGMENT_DATA_SHARDS);
        let codeword = codec.encode(&piece).unwrap();

        // the systematic window itself
        let shards: Vec<(usize, u16)> =
            (0..SEGMENT_DATA_SHARDS).map(|i| (i, codeword[i])).collect();
        assert_eq!(codec.recover(&shards).unwrap(), piece);

        // parity only
        let shards: Vec<(usize, u16)> = (1017..1023).map(|i| (i, codeword[i])).collect();
        assert_eq!(codec.recover(&shards).unwrap(), piece);

        // a mix of message and parity positions
        let picks = [0usize, 3, 341, 342, 700, 1022];
        let shards: Vec<(usize, u16)> = picks.iter().map(|&i| (i, codeword[i])).collect();
        assert_eq!(codec.recover(&shards).unwrap(), piece);

        // random subsets
        for _ in 0..20 {
            let mut indices: Vec<usize> = (0..TOTAL_SHARDS).collect();
            for i in (1..indices.len()).rev() {
                let j = rng.gen_range(0, i + 1);
                indices.swap(i, j);
            }
            let shards: Vec<(usize, u16)> = indices[..SEGMENT_DATA_SHARDS]
                .iter()
                .map(|&i| (i, codeword[i]))
                .collect();
            assert_eq!(codec.recover(&shards).unwrap(), piece);
        }
    }

    #[test]
    fn surplus_shards_use_the_smallest_indices() {
        let codec = PieceCodec::new(SEGMENT_DATA_SHARDS, TOTAL_SHARDS).unwrap();
        let rng = &mut test_rng();
        let piece = random_piece(rng, SEGMENT_DATA_SHARDS);
        let mut codeword = codec.encode(&piece).unwrap();

        // corrupt a high position; recovery must not look at it as long as
        // enough lower indices are present
        let mut shards: Vec<(usize, u16)> = (0..8).map(|i| (i, codeword[i])).collect();
        codeword[900] ^= 0x1111;
        shards.push((900, codeword[900]));
        assert_eq!(codec.recover(&shards).unwrap(), piece);
    }

    #[test]
    fn duplicate_indices_keep_the_first_word() {
        let codec = PieceCodec::new(SEGMENT_DATA_SHARDS, TOTAL_SHARDS).unwrap();
        let rng = &mut test_rng();
        let piece = random_piece(rng, SEGMENT_DATA_SHARDS);
        let codeword = codec.encode(&piece).unwrap();

        let mut shards: Vec<(usize, u16)> =
            (0..SEGMENT_DATA_SHARDS).map(|i| (i, codeword[i])).collect();
        // a later, conflicting copy of index 0 must be ignored
        shards.push((0, codeword[0] ^ 0xFFFF));
        assert_eq!(codec.recover(&shards).unwrap(), piece);
    }

    #[test]
    fn index_out_of_range() {
        let codec = PieceCodec::new(SEGMENT_DATA_SHARDS, TOTAL_SHARDS).unwrap();
        assert_eq!(
            codec.recover(&[(1023, 0)]),
            Err(Error::IndexOutOfRange(1023))
        );
        assert_eq!(
            codec.recover(&[(usize::MAX, 0)]),
            Err(Error::IndexOutOfRange(usize::MAX))
        );
    }

    #[test]
    fn insufficient_shards() {
        let codec = PieceCodec::new(SEGMENT_DATA_SHARDS, TOTAL_SHARDS).unwrap();
        let shards: Vec<(usize, u16)> = (0..5).map(|i| (i, 0)).collect();
        assert_eq!(
            codec.recover(&shards),
            Err(Error::InsufficientShards { have: 5, need: 6 })
        );
        // duplicates do not count towards the quorum
        let shards: Vec<(usize, u16)> = [0, 1, 2, 3, 4, 4].iter().map(|&i| (i, 7)).collect();
        assert_eq!(
            codec.recover(&shards),
            Err(Error::InsufficientShards { have: 5, need: 6 })
        );
    }
}
