//! The public erasure-coding boundary: whole-blob encoding into chunks
//! and recovery from any sufficient chunk subset.

use crate::error::{Error, Result};
use crate::layout::{join_words, pad_to_piece_multiple, split_words, transpose};
use crate::piece::PieceCodec;
use crate::{BTreeMap, Vec, BLOB_DATA_SHARDS, SEGMENT_DATA_SHARDS, TOTAL_SHARDS};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A blob after encoding: one chunk per codeword position plus the
/// metadata a decoder needs alongside the chunks.
///
/// Chunk `i` is the concatenation, across all pieces, of each piece's
/// `i`-th codeword symbol, so every chunk is `2 · k_pieces` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedBlob {
    chunks: Vec<Vec<u8>>,
    k_pieces: usize,
    original_len: usize,
}

impl EncodedBlob {
    /// The chunks, indexed by codeword position.
    pub fn chunks(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    /// Number of pieces the padded blob was split into.
    pub fn k_pieces(&self) -> usize {
        self.k_pieces
    }

    /// Length of the unpadded input blob.
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Consumes the value, yielding the chunks.
    pub fn into_chunks(self) -> Vec<Vec<u8>> {
        self.chunks
    }
}

/// Fixed-parameter encoder/decoder over whole blobs.
///
/// All precomputed state is read-only after construction; a single coder
/// may be shared freely across threads.
pub struct ErasureCoder {
    codec: PieceCodec,
}

impl ErasureCoder {
    /// Builds a coder for `data_shards`-of-`total_shards` coding; the
    /// same parameter guard as [`PieceCodec::new`] applies.
    pub fn new(data_shards: usize, total_shards: usize) -> Result<Self> {
        Ok(ErasureCoder {
            codec: PieceCodec::new(data_shards, total_shards)?,
        })
    }

    /// The blob/audit profile: 342-of-1023 coding over 684-byte pieces.
    pub fn for_blobs() -> Result<Self> {
        Self::new(BLOB_DATA_SHARDS, TOTAL_SHARDS)
    }

    /// The segment/import profile: 6-of-1023 coding over 12-byte pieces.
    pub fn for_segments() -> Result<Self> {
        Self::new(SEGMENT_DATA_SHARDS, TOTAL_SHARDS)
    }

    /// Message words per piece.
    pub fn data_shards(&self) -> usize {
        self.codec.data_shards()
    }

    /// Number of chunks an encoded blob fans out to.
    pub fn total_shards(&self) -> usize {
        self.codec.total_shards()
    }

    /// Bytes per piece.
    pub fn piece_bytes(&self) -> usize {
        2 * self.codec.data_shards()
    }

    /// Encodes a blob of any length into `total_shards` chunks such that
    /// any `data_shards` of them reproduce the blob.
    ///
    /// The blob is zero-padded to a whole number of pieces; every piece
    /// is encoded independently and the codewords are transposed so that
    /// chunk `i` collects symbol `i` of every piece.
    pub fn encode_blob(&self, blob: &[u8]) -> Result<EncodedBlob> {
        let (padded, _, k_pieces) = pad_to_piece_multiple(blob, self.piece_bytes());
        if k_pieces == 0 {
            return Ok(EncodedBlob {
                chunks: vec![Vec::new(); self.total_shards()],
                k_pieces: 0,
                original_len: 0,
            });
        }
        let rows = cfg_chunks!(padded, self.piece_bytes())
            .map(|piece| self.codec.encode(&split_words(piece)))
            .collect::<Result<Vec<_>>>()?;
        let columns = transpose(&rows)?;
        let chunks: Vec<Vec<u8>> = cfg_iter!(columns).map(|column| join_words(column)).collect();
        Ok(EncodedBlob {
            chunks,
            k_pieces,
            original_len: blob.len(),
        })
    }

    /// Rebuilds a blob from at least `data_shards` of its chunks.
    ///
    /// `k_pieces` and `original_len` travel out-of-band alongside the
    /// chunks. Duplicate indices keep the first chunk supplied; when more
    /// chunks than needed are present, the smallest indices win.
    pub fn recover_blob<'a, I>(
        &self,
        shards: I,
        k_pieces: usize,
        original_len: usize,
    ) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = (usize, &'a [u8])>,
    {
        let piece_bytes = self.piece_bytes();
        if (original_len + piece_bytes - 1) / piece_bytes != k_pieces {
            return Err(Error::InvalidShardLayout(
                "declared length and piece count disagree",
            ));
        }
        if k_pieces == 0 {
            return Ok(Vec::new());
        }

        let chunk_len = 2 * k_pieces;
        let mut unique: BTreeMap<usize, &[u8]> = BTreeMap::new();
        for (index, chunk) in shards {
            if index >= self.total_shards() {
                return Err(Error::IndexOutOfRange(index));
            }
            if chunk.len() != chunk_len {
                return Err(Error::InvalidShardLayout(
                    "chunk length disagrees with the declared piece count",
                ));
            }
            unique.entry(index).or_insert(chunk);
        }
        if unique.len() < self.data_shards() {
            return Err(Error::InsufficientShards {
                have: unique.len(),
                need: self.data_shards(),
            });
        }

        let mut indices = Vec::with_capacity(self.data_shards());
        let mut shard_words = Vec::with_capacity(self.data_shards());
        for (index, chunk) in unique.into_iter().take(self.data_shards()) {
            indices.push(index);
            shard_words.push(split_words(chunk));
        }
        let selection = self.codec.select(&indices)?;

        let pieces = cfg_into_iter!(0..k_pieces)
            .map(|row| {
                let words: Vec<u16> = shard_words.iter().map(|chunk| chunk[row]).collect();
                self.codec.recover_row(&selection, &words)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut blob = Vec::with_capacity(k_pieces * piece_bytes);
        for piece in &pieces {
            blob.extend_from_slice(&join_words(piece));
        }
        blob.truncate(original_len);
        Ok(blob)
    }

    /// Encodes a single piece of `data_shards` words into a full
    /// codeword.
    pub fn encode_piece(&self, piece: &[u16]) -> Result<Vec<u16>> {
        self.codec.encode(piece)
    }

    /// Recovers a piece from at least `data_shards` distinct
    /// `(index, word)` pairs.
    pub fn recover_piece(&self, shards: &[(usize, u16)]) -> Result<Vec<u16>> {
        self.codec.recover(shards)
    }
}
