//! Byte-level layout: little-endian 16-bit words, padding to whole
//! pieces, and the piece-major ↔ chunk-major transpose.

use crate::error::{Error, Result};
use crate::Vec;

/// Splits an even-length byte string into little-endian 16-bit words.
pub fn split_words(bytes: &[u8]) -> Vec<u16> {
    debug_assert!(bytes.len() % 2 == 0, "callers pad to word boundaries");
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Serializes words back to little-endian bytes; the inverse of
/// [`split_words`].
pub fn join_words(words: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(words.len() * 2);
    for word in words {
        out.extend_from_slice(&word.to_le_bytes());
    }
    out
}

/// Zero-pads `bytes` up to a whole number of `piece_bytes`-sized pieces.
///
/// Returns the padded buffer, the number of padding bytes appended, and
/// the resulting piece count. Empty input stays empty with zero pieces.
pub fn pad_to_piece_multiple(bytes: &[u8], piece_bytes: usize) -> (Vec<u8>, usize, usize) {
    let k_pieces = (bytes.len() + piece_bytes - 1) / piece_bytes;
    let padded_len = k_pieces * piece_bytes;
    let padding = padded_len - bytes.len();
    let mut padded = Vec::with_capacity(padded_len);
    padded.extend_from_slice(bytes);
    padded.resize(padded_len, 0);
    (padded, padding, k_pieces)
}

/// Transposes a rectangular word matrix; rows of differing lengths are
/// reported as [`Error::RaggedMatrix`].
pub fn transpose(rows: &[Vec<u16>]) -> Result<Vec<Vec<u16>>> {
    let width = match rows.first() {
        Some(row) => row.len(),
        None => return Ok(Vec::new()),
    };
    if rows.iter().any(|row| row.len() != width) {
        return Err(Error::RaggedMatrix);
    }
    Ok((0..width)
        .map(|col| rows.iter().map(|row| row[col]).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_round_trip() {
        let bytes = [0x61, 0x5D, 0x17, 0x00, 0xFF, 0x80];
        let words = split_words(&bytes);
        assert_eq!(words, vec![0x5D61, 0x0017, 0x80FF]);
        assert_eq!(join_words(&words), bytes.to_vec());
    }

    #[test]
    fn empty_words() {
        assert_eq!(split_words(&[]), Vec::<u16>::new());
        assert_eq!(join_words(&[]), Vec::<u8>::new());
    }

    #[test]
    fn padding() {
        let (padded, padding, k_pieces) = pad_to_piece_multiple(&[1, 2, 3], 12);
        assert_eq!(padded.len(), 12);
        assert_eq!(&padded[..3], &[1, 2, 3]);
        assert!(padded[3..].iter().all(|&b| b == 0));
        assert_eq!(padding, 9);
        assert_eq!(k_pieces, 1);

        let (padded, padding, k_pieces) = pad_to_piece_multiple(&[7; 24], 12);
        assert_eq!(padded.len(), 24);
        assert_eq!(padding, 0);
        assert_eq!(k_pieces, 2);

        let (padded, padding, k_pieces) = pad_to_piece_multiple(&[], 684);
        assert!(padded.is_empty());
        assert_eq!(padding, 0);
        assert_eq!(k_pieces, 0);
    }

    #[test]
    fn transpose_rectangular() {
        let rows = vec![vec![1, 2, 3], vec![4, 5, 6]];
        let cols = transpose(&rows).unwrap();
        assert_eq!(cols, vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
        assert_eq!(transpose(&cols).unwrap(), rows);
    }

    #[test]
    fn transpose_empty() {
        assert_eq!(transpose(&[]).unwrap(), Vec::<Vec<u16>>::new());
    }

    #[test]
    fn transpose_ragged() {
        let rows = vec![vec![1, 2, 3], vec![4, 5]];
        assert_eq!(transpose(&rows), Err(Error::RaggedMatrix));
    }
}
