// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmtext

//! Steganographic encoding and decoding pipeline.
//!
//! The stages compose in a fixed order:
//!
//! ```text
//! encode: secret + password
//!           → crypto::encrypt        {salt, nonce, ciphertext}
//!           → bitstream::pack        flat bit sequence (optionally Hamming-coded)
//!           → generator (ngram)      plausible cover sentence
//!           → zerowidth::embed       stego text
//!
//! decode: stego text
//!           → zerowidth::extract     bit sequence
//!           → bitstream::unpack      {salt, nonce, ciphertext} + corrections
//!           → crypto::decrypt        secret
//! ```
//!
//! Every stage is a synchronous pure transform; [`pipeline::StegoEngine`]
//! wires them together and owns the only stateful piece, the cover-text
//! generator. All stage failures surface as exactly one
//! [`error::StegoError`] variant at the engine boundary.

pub mod bitstream;
pub mod crypto;
pub mod error;
pub mod hamming;
mod pipeline;
pub mod zerowidth;

pub use error::StegoError;

/// Minimum accepted password length for encoding.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validate encode inputs before any pipeline stage runs.
///
/// # Errors
/// - [`StegoError::EmptySecret`] if the secret is empty or whitespace-only.
/// - [`StegoError::PasswordTooShort`] if the password has fewer than
///   [`MIN_PASSWORD_LEN`] characters.
pub fn validate_encode_inputs(secret: &str, password: &str) -> Result<(), StegoError> {
    if secret.trim().is_empty() {
        return Err(StegoError::EmptySecret);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(StegoError::PasswordTooShort);
    }
    Ok(())
}

/// Validate decode inputs before any pipeline stage runs.
///
/// # Errors
/// - [`StegoError::EmptyStegoText`] if the stego text is empty or
///   whitespace-only.
/// - [`StegoError::EmptyPassword`] if the password is empty or
///   whitespace-only.
pub fn validate_decode_inputs(stego_text: &str, password: &str) -> Result<(), StegoError> {
    if stego_text.trim().is_empty() {
        return Err(StegoError::EmptyStegoText);
    }
    if password.trim().is_empty() {
        return Err(StegoError::EmptyPassword);
    }
    Ok(())
}

pub use pipeline::{DecodeResult, EncodeResult, EngineConfig, StegoEngine};
