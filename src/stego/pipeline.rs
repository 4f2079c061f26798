// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmtext

//! Encode/decode pipeline orchestration.
//!
//! [`StegoEngine`] composes encryption, bitstream framing, cover-text
//! generation, and the zero-width channel into the two public operations.
//! The engine owns the generator (and through it the frequency store);
//! everything else is stateless. Cover text is generated fresh on every
//! encode call, so the same secret never produces the same stego text
//! twice.

use crate::ngram::{CoverTextGenerator, Strategy};
use crate::stego::error::StegoError;
use crate::stego::{bitstream, crypto, validate_decode_inputs, validate_encode_inputs, zerowidth};

/// Default word limit for generated cover text.
const DEFAULT_MAX_WORDS: usize = 15;

/// Engine configuration. Generation behavior is selected here rather than
/// per call, so encode results always report the strategy that actually ran.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on generated cover-text words.
    pub max_words: usize,
    /// Protect the bitstream with Hamming(7,4).
    pub use_ecc: bool,
    /// Cover-text generation strategy.
    pub strategy: Strategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
            use_ecc: true,
            strategy: Strategy::Markov { seed: None },
        }
    }
}

/// Successful encode output.
#[derive(Debug, Clone)]
pub struct EncodeResult {
    /// Cover text with the embedded payload; the string to transport.
    pub stego_text: String,
    /// Marker-free preview of what the reader sees.
    pub visible_text: String,
    /// Label of the generation strategy that produced the cover text.
    pub algorithm: &'static str,
}

/// Successful decode output.
#[derive(Debug, Clone)]
pub struct DecodeResult {
    /// The recovered secret message.
    pub message: String,
    /// Number of single-bit errors the ECC layer repaired.
    pub errors_corrected: usize,
}

/// The full steganography pipeline.
pub struct StegoEngine {
    generator: CoverTextGenerator,
    config: EngineConfig,
}

impl StegoEngine {
    /// Build an engine around a loaded generator.
    pub fn new(generator: CoverTextGenerator, config: EngineConfig) -> Self {
        Self { generator, config }
    }

    /// Build an engine with the default configuration (Markov sampling,
    /// ECC on, 15-word covers).
    pub fn with_defaults(generator: CoverTextGenerator) -> Self {
        Self::new(generator, EngineConfig::default())
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Hide a secret message inside freshly generated cover text.
    ///
    /// # Errors
    /// - [`StegoError::EmptySecret`] / [`StegoError::PasswordTooShort`] if
    ///   validation fails; no pipeline stage runs in that case.
    pub fn encode(&self, secret: &str, password: &str) -> Result<EncodeResult, StegoError> {
        validate_encode_inputs(secret, password)?;

        // 1. Encrypt under the password-derived key (fresh salt + nonce).
        let encrypted = crypto::encrypt(secret, password);

        // 2. Frame the encrypted fields into a flat bit sequence.
        let bits = bitstream::pack(&encrypted, self.config.use_ecc);

        // 3. Generate cover text, freshly on every call.
        let cover = self.generator.generate(&self.config.strategy, self.config.max_words);

        // 4. Embed the bits as zero-width markers.
        let stego_text = zerowidth::embed(&cover, &bits);

        tracing::debug!(
            bits = bits.len(),
            cover_words = cover.split_whitespace().count(),
            algorithm = self.config.strategy.label(),
            "message embedded"
        );

        Ok(EncodeResult {
            visible_text: zerowidth::get_visible(&stego_text),
            algorithm: self.config.strategy.label(),
            stego_text,
        })
    }

    /// Recover a secret message from stego text.
    ///
    /// # Errors
    /// - [`StegoError::EmptyStegoText`] / [`StegoError::EmptyPassword`] on
    ///   blank inputs.
    /// - [`StegoError::NoHiddenData`] if the text carries no markers.
    /// - [`StegoError::InvalidPayload`] if the extracted bits do not frame a
    ///   usable payload.
    /// - [`StegoError::DecryptionFailed`] on tag verification failure.
    /// - [`StegoError::InvalidUtf8`] if the decrypted bytes are not UTF-8.
    pub fn decode(&self, stego_text: &str, password: &str) -> Result<DecodeResult, StegoError> {
        validate_decode_inputs(stego_text, password)?;

        // 1. Cheap pre-check before any extraction work.
        if !zerowidth::has_hidden(stego_text) {
            return Err(StegoError::NoHiddenData);
        }

        // 2. Pull the bit sequence out of the markers.
        let bits = zerowidth::extract(stego_text);

        // 3. Unframe; single-bit errors are repaired and counted here.
        let (data, errors_corrected) = bitstream::unpack(&bits, self.config.use_ecc);
        let data = data.ok_or(StegoError::InvalidPayload)?;

        // 4. Decrypt and verify the authentication tag.
        let plaintext = crypto::decrypt(&data, password)?;
        let message = String::from_utf8(plaintext).map_err(|_| StegoError::InvalidUtf8)?;

        Ok(DecodeResult {
            message,
            errors_corrected,
        })
    }

    /// Shut the engine down, releasing the generator's frequency store.
    pub fn close(self) -> Result<(), StegoError> {
        self.generator.close()
    }
}
