// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmtext

//! # phasm-text
//!
//! Linguistic steganography engine for hiding encrypted text messages in
//! generated natural-language sentences. The cover text is produced by an
//! n-gram statistical language model; the payload rides in zero-width
//! Unicode characters injected after spaces and punctuation, so the visible
//! text reads as ordinary prose.
//!
//! The payload is AES-256-GCM encrypted under a PBKDF2-derived key and
//! framed with Hamming(7,4) error correction, so a message survives a
//! single flipped bit per 7-bit block, and a wrong password fails loudly
//! rather than yielding plausible wrong plaintext. The channel does **not**
//! survive transports that normalize whitespace or strip zero-width
//! characters; that is a documented limitation, not a recoverable error.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use phasm_text::{CoverTextGenerator, NgramStore, StegoEngine};
//!
//! let store = NgramStore::open("3gram.db", 3)?;
//! let engine = StegoEngine::with_defaults(CoverTextGenerator::new(store)?);
//!
//! let encoded = engine.encode("meet at dawn", "Passw0rd!")?;
//! println!("{}", encoded.visible_text); // looks like a normal sentence
//!
//! let decoded = engine.decode(&encoded.stego_text, "Passw0rd!")?;
//! assert_eq!(decoded.message, "meet at dawn");
//! engine.close()?;
//! ```

pub mod ngram;
pub mod stego;

pub use ngram::{CoverTextGenerator, FrequencyTable, ModelStats, NgramStore, Strategy};
pub use stego::crypto::EncryptedData;
pub use stego::{DecodeResult, EncodeResult, EngineConfig, StegoEngine, StegoError};
pub use stego::{MIN_PASSWORD_LEN, validate_decode_inputs, validate_encode_inputs};
