// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmtext

//! Hamming(7,4) error correction at the bit level.
//!
//! Each 4-bit nibble is protected by three parity bits, giving a 7-bit block
//! that survives one flipped bit:
//!
//! ```text
//! block layout: [p1, p2, d0, p4, d1, d2, d3]
//! p1 = d0 ^ d1 ^ d3
//! p2 = d0 ^ d2 ^ d3
//! p4 = d1 ^ d2 ^ d3
//! ```
//!
//! A byte is split into two nibbles and encoded as two independent blocks,
//! 14 bits per byte. Decoding computes the syndrome `4*s4 + 2*s2 + s1`; a
//! nonzero syndrome names the 1-based position of the flipped bit, which is
//! corrected in place. Two or more errors in the same block alias onto a
//! wrong single-bit correction and are **not** detectable — the authentication
//! tag upstream catches what this code cannot.

use core::fmt;

/// Encoded bits per source byte (two 7-bit blocks).
pub const BITS_PER_BYTE: usize = 14;

/// Error returned when a Hamming bit sequence has an impossible length.
#[derive(Debug, PartialEq, Eq)]
pub struct HammingLengthError(pub usize);

impl fmt::Display for HammingLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hamming: bit length {} is not a multiple of {BITS_PER_BYTE}", self.0)
    }
}

impl std::error::Error for HammingLengthError {}

/// Encode 4 data bits into a 7-bit Hamming block.
pub fn encode_block(d: [u8; 4]) -> [u8; 7] {
    let p1 = d[0] ^ d[1] ^ d[3];
    let p2 = d[0] ^ d[2] ^ d[3];
    let p4 = d[1] ^ d[2] ^ d[3];
    [p1, p2, d[0], p4, d[1], d[2], d[3]]
}

/// Decode a 7-bit Hamming block, correcting at most one flipped bit.
///
/// # Returns
/// The 4 corrected data bits and the 1-based error position (0 = no error).
pub fn decode_block(block: [u8; 7]) -> ([u8; 4], usize) {
    let mut b = block.map(|bit| bit & 1);
    let s1 = b[0] ^ b[2] ^ b[4] ^ b[6];
    let s2 = b[1] ^ b[2] ^ b[5] ^ b[6];
    let s4 = b[3] ^ b[4] ^ b[5] ^ b[6];
    let error = (4 * s4 + 2 * s2 + s1) as usize;

    if error > 0 {
        b[error - 1] ^= 1;
    }

    ([b[2], b[4], b[5], b[6]], error)
}

/// Hamming-encode a byte slice into a bit sequence, 14 bits per byte.
///
/// The high nibble is encoded first, MSB-first within each nibble.
pub fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(data.len() * BITS_PER_BYTE);
    for &byte in data {
        let high = [byte >> 7 & 1, byte >> 6 & 1, byte >> 5 & 1, byte >> 4 & 1];
        let low = [byte >> 3 & 1, byte >> 2 & 1, byte >> 1 & 1, byte & 1];
        bits.extend_from_slice(&encode_block(high));
        bits.extend_from_slice(&encode_block(low));
    }
    bits
}

/// Decode a Hamming bit sequence produced by [`encode_bytes`].
///
/// Corrects up to one flipped bit per 7-bit block and counts each block that
/// needed a repair.
///
/// # Returns
/// The decoded bytes and the number of corrected blocks.
///
/// # Errors
/// Returns [`HammingLengthError`] if `bits.len()` is not a multiple of 14.
pub fn decode_bytes(bits: &[u8]) -> Result<(Vec<u8>, usize), HammingLengthError> {
    if bits.len() % BITS_PER_BYTE != 0 {
        return Err(HammingLengthError(bits.len()));
    }

    let mut bytes = Vec::with_capacity(bits.len() / BITS_PER_BYTE);
    let mut errors = 0;

    for chunk in bits.chunks(BITS_PER_BYTE) {
        let (high, e1) = decode_block(chunk[..7].try_into().expect("7-bit block"));
        let (low, e2) = decode_block(chunk[7..].try_into().expect("7-bit block"));
        errors += usize::from(e1 > 0) + usize::from(e2 > 0);

        let mut byte = 0u8;
        for (i, &bit) in high.iter().enumerate() {
            byte |= bit << (7 - i);
        }
        for (i, &bit) in low.iter().enumerate() {
            byte |= bit << (3 - i);
        }
        bytes.push(byte);
    }

    Ok((bytes, errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_known_vector() {
        // d = 1011: p1 = 1^0^1 = 0, p2 = 1^1^1 = 1, p4 = 0^1^1 = 0
        assert_eq!(encode_block([1, 0, 1, 1]), [0, 1, 1, 0, 0, 1, 1]);
    }

    #[test]
    fn block_roundtrip_all_nibbles() {
        for n in 0u8..16 {
            let d = [n >> 3 & 1, n >> 2 & 1, n >> 1 & 1, n & 1];
            let (decoded, error) = decode_block(encode_block(d));
            assert_eq!(decoded, d, "nibble {n}");
            assert_eq!(error, 0, "nibble {n}");
        }
    }

    #[test]
    fn single_error_corrected_at_every_position() {
        let d = [1, 0, 0, 1];
        let clean = encode_block(d);
        for pos in 0..7 {
            let mut block = clean;
            block[pos] ^= 1;
            let (decoded, error) = decode_block(block);
            assert_eq!(decoded, d, "flip at {pos}");
            assert_eq!(error, pos + 1, "flip at {pos}");
        }
    }

    #[test]
    fn double_error_is_not_detected() {
        // Two flips in one block alias onto a wrong correction — the decoder
        // still reports a nonzero "error position" but the data is wrong.
        // This is the documented Hamming(7,4) boundary, not a bug.
        let d = [1, 1, 0, 0];
        let mut block = encode_block(d);
        block[0] ^= 1;
        block[3] ^= 1;
        let (decoded, error) = decode_block(block);
        assert_ne!(error, 0);
        assert_ne!(decoded, d);
    }

    #[test]
    fn bytes_roundtrip() {
        let data = [0x00, 0xFF, 0xDE, 0xAD, 0x42];
        let bits = encode_bytes(&data);
        assert_eq!(bits.len(), data.len() * BITS_PER_BYTE);
        let (decoded, errors) = decode_bytes(&bits).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(errors, 0);
    }

    #[test]
    fn bytes_single_flip_per_block_corrected() {
        let data = [0xA5, 0x3C];
        let mut bits = encode_bytes(&data);
        // One flip in the first block, one in the last.
        bits[2] ^= 1;
        bits[21] ^= 1;
        let (decoded, errors) = decode_bytes(&bits).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(errors, 2);
    }

    #[test]
    fn invalid_length_rejected() {
        assert_eq!(decode_bytes(&[0; 13]), Err(HammingLengthError(13)));
        assert_eq!(decode_bytes(&[0; 15]), Err(HammingLengthError(15)));
        // Empty input is a valid zero-byte sequence.
        assert_eq!(decode_bytes(&[]), Ok((vec![], 0)));
    }

    #[test]
    fn error_count_is_per_block() {
        let data = [0xF0];
        let mut bits = encode_bytes(&data);
        // Both blocks of the same byte flipped once each.
        bits[1] ^= 1;
        bits[8] ^= 1;
        let (decoded, errors) = decode_bytes(&bits).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(errors, 2);
    }
}
