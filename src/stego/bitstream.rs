// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmtext

//! Bitstream framing for the encrypted payload.
//!
//! The bitstream is the flat bit sequence carried by the zero-width channel.
//! Both directions share one byte layout:
//!
//! ```text
//! [16 bytes] PBKDF2 salt
//! [12 bytes] AES-GCM nonce
//! [N bytes ] ciphertext (includes 16-byte auth tag)
//! ```
//!
//! With error correction enabled, a 4-byte big-endian length header (the
//! payload byte count) is prepended and header+payload are Hamming(7,4)
//! encoded at 14 bits per byte. Without it, bytes are emitted as 8 raw bits
//! each, MSB first, with no header.
//!
//! The 16/12-byte offsets are a load-bearing contract shared by encode and
//! decode; they must never diverge.

use crate::stego::crypto::{EncryptedData, NONCE_LEN, SALT_LEN};
use crate::stego::hamming;

/// Minimum payload size: the salt and nonce must be present in full.
const MIN_PAYLOAD_BYTES: usize = SALT_LEN + NONCE_LEN; // 28

/// Frame an [`EncryptedData`] into a bit sequence.
///
/// The payload is the raw concatenation salt ‖ nonce ‖ ciphertext. With
/// `use_ecc` the 4-byte length header is prepended and the whole buffer is
/// Hamming-encoded; otherwise the payload is emitted as plain 8-bit bytes.
pub fn pack(data: &EncryptedData, use_ecc: bool) -> Vec<u8> {
    let mut payload = Vec::with_capacity(SALT_LEN + NONCE_LEN + data.ciphertext.len());
    payload.extend_from_slice(&data.salt);
    payload.extend_from_slice(&data.nonce);
    payload.extend_from_slice(&data.ciphertext);

    if use_ecc {
        let mut framed = Vec::with_capacity(4 + payload.len());
        framed.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        framed.extend_from_slice(&payload);
        hamming::encode_bytes(&framed)
    } else {
        bytes_to_bits(&payload)
    }
}

/// Recover an [`EncryptedData`] from an extracted bit sequence.
///
/// Returns the parsed payload (or `None` if it is malformed or undersized)
/// and the number of single-bit corrections the Hamming decode performed.
/// Any parse failure (bit values other than 0/1, a truncated final chunk, a
/// bit count that is not a multiple of the ECC block size) is swallowed and
/// surfaces as `(None, 0)`; the caller decides how to report it.
///
/// In ECC mode the 4-byte length header is parsed but not used to bound the
/// payload slice; the fixed offsets below are authoritative. A mismatch is
/// logged and otherwise ignored.
pub fn unpack(bits: &[u8], use_ecc: bool) -> (Option<EncryptedData>, usize) {
    if bits.iter().any(|&b| b > 1) {
        return (None, 0);
    }

    if use_ecc {
        let Ok((bytes, errors)) = hamming::decode_bytes(bits) else {
            return (None, 0);
        };
        if errors > 0 {
            tracing::debug!(errors, "hamming corrected bit errors");
        }
        if bytes.len() < 4 {
            return (None, 0);
        }
        let declared_len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let body = &bytes[4..];
        if declared_len != body.len() {
            tracing::debug!(declared_len, actual_len = body.len(), "length header mismatch");
        }
        (slice_payload(body), errors)
    } else {
        if bits.len() % 8 != 0 {
            return (None, 0);
        }
        let bytes = bits_to_bytes(bits);
        (slice_payload(&bytes), 0)
    }
}

/// Slice a payload at the fixed salt/nonce/ciphertext offsets.
fn slice_payload(payload: &[u8]) -> Option<EncryptedData> {
    if payload.len() < MIN_PAYLOAD_BYTES {
        return None;
    }
    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&payload[..SALT_LEN]);

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&payload[SALT_LEN..SALT_LEN + NONCE_LEN]);

    Some(EncryptedData {
        salt,
        nonce,
        ciphertext: payload[SALT_LEN + NONCE_LEN..].to_vec(),
    })
}

/// Convert bytes to a bit vector (MSB first within each byte).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    bits
}

/// Convert a bit vector (MSB first, length a multiple of 8) back to bytes.
fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(bits.len() / 8);
    for chunk in bits.chunks_exact(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= (bit & 1) << (7 - i);
        }
        bytes.push(byte);
    }
    bytes
}
