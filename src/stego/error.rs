// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmtext

//! Error types for the steganography pipeline.
//!
//! [`StegoError`] covers all failure modes from input validation through
//! n-gram store access, payload extraction, and decryption. Every stage
//! failure is converted to exactly one of these variants at the pipeline
//! boundary; nothing lower-level crosses it unwrapped.

use core::fmt;

/// Errors that can occur during steganographic encoding or decoding.
#[derive(Debug)]
pub enum StegoError {
    /// The secret message is empty or whitespace-only.
    EmptySecret,
    /// The password is shorter than the 8-character minimum.
    PasswordTooShort,
    /// The stego text handed to decode is empty or whitespace-only.
    EmptyStegoText,
    /// The password handed to decode is empty or whitespace-only.
    EmptyPassword,
    /// The text contains no zero-width markers at all.
    NoHiddenData,
    /// The extracted bit sequence does not parse into a usable payload.
    InvalidPayload,
    /// AES-GCM tag verification failed (wrong password or corrupted data).
    DecryptionFailed,
    /// The decrypted plaintext is not valid UTF-8.
    InvalidUtf8,
    /// The requested n-gram order has no frequency store (only 3 and 4 do).
    UnsupportedOrder(usize),
    /// The frequency store could not be opened or queried.
    Store(rusqlite::Error),
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "secret message cannot be empty"),
            Self::PasswordTooShort => write!(f, "password must be at least 8 characters"),
            Self::EmptyStegoText => write!(f, "stego text cannot be empty"),
            Self::EmptyPassword => write!(f, "password cannot be empty"),
            Self::NoHiddenData => write!(f, "no hidden data found"),
            Self::InvalidPayload => write!(f, "invalid payload"),
            Self::DecryptionFailed => write!(f, "decryption failed (wrong password?)"),
            Self::InvalidUtf8 => write!(f, "decrypted message is not valid UTF-8"),
            Self::UnsupportedOrder(order) => {
                write!(f, "unsupported n-gram order {order} (expected 3 or 4)")
            }
            Self::Store(e) => write!(f, "frequency store error: {e}"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StegoError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Store(e)
    }
}
