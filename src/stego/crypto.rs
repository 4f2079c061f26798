// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmtext

//! Cryptographic primitives for payload encryption.
//!
//! The key derivation is PBKDF2-HMAC-SHA256 at 100,000 iterations over a
//! random 16-byte salt, producing a 256-bit AES key. Encryption is
//! AES-256-GCM with a random 12-byte nonce and a 128-bit authentication tag
//! appended to the ciphertext. Both salt and nonce are generated fresh per
//! call and travel inside the bitstream payload, so the decoder recovers them
//! from the extracted data before re-deriving the key.
//!
//! The GCM tag is the only integrity check in the whole pipeline: a wrong
//! password or corrupted ciphertext fails tag verification and surfaces as
//! [`StegoError::DecryptionFailed`], never as plausible wrong plaintext.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::stego::error::StegoError;

/// PBKDF2 salt length in bytes.
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// PBKDF2-HMAC-SHA256 iteration count.
/// Deliberately high to slow offline brute-force attempts against the
/// password; each decode attempt pays the same cost once.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Encrypted payload fields produced by [`encrypt`] and consumed by
/// [`decrypt`].
///
/// The salt and nonce lengths are fixed by the array types; the ciphertext
/// includes the 16-byte GCM authentication tag appended by AES-256-GCM.
/// Instances live only for the duration of one encode or decode call and are
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedData {
    /// PBKDF2 salt for key derivation.
    pub salt: [u8; SALT_LEN],
    /// AES-GCM nonce.
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext including the 16-byte authentication tag.
    pub ciphertext: Vec<u8>,
}

/// Derive the AES-256 key from passphrase + salt.
fn derive_key(passphrase: &str, salt: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut key = Zeroizing::new([0u8; 32]);
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, PBKDF2_ITERATIONS, &mut *key);
    key
}

/// Encrypt plaintext with AES-256-GCM under a password-derived key.
///
/// Generates a fresh random salt and nonce on every call, so repeated
/// encryptions of the same message produce unrelated ciphertexts and the
/// derived key is never reused with the same nonce.
pub fn encrypt(plaintext: &str, passphrase: &str) -> EncryptedData {
    use rand::RngCore;
    let mut rng = rand::thread_rng();

    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(passphrase, &salt);
    let cipher = Aes256Gcm::new_from_slice(&*key).expect("valid key length");
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .expect("AES-GCM encrypt should not fail");

    EncryptedData {
        salt,
        nonce: nonce_bytes,
        ciphertext,
    }
}

/// Decrypt an [`EncryptedData`] payload, verifying the authentication tag.
///
/// Re-derives the key from the stored salt.
///
/// # Errors
/// Returns [`StegoError::DecryptionFailed`] if tag verification fails;
/// wrong passphrase and corrupted ciphertext are indistinguishable here.
pub fn decrypt(data: &EncryptedData, passphrase: &str) -> Result<Vec<u8>, StegoError> {
    let key = derive_key(passphrase, &data.salt);
    let cipher = Aes256Gcm::new_from_slice(&*key).expect("valid key length");
    let nonce = Nonce::from_slice(&data.nonce);

    cipher
        .decrypt(nonce, data.ciphertext.as_slice())
        .map_err(|_| StegoError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let msg = "Hello, steganography!";
        let passphrase = "secret123";

        let data = encrypt(msg, passphrase);
        let pt = decrypt(&data, passphrase).unwrap();
        assert_eq!(pt, msg.as_bytes());
    }

    #[test]
    fn wrong_passphrase_fails() {
        let data = encrypt("secret message", "correct");
        let result = decrypt(&data, "wrong");
        assert!(matches!(result, Err(StegoError::DecryptionFailed)));
    }

    #[test]
    fn empty_message_works() {
        let data = encrypt("", "pass");
        let pt = decrypt(&data, "pass").unwrap();
        assert!(pt.is_empty());
    }

    #[test]
    fn field_lengths() {
        let data = encrypt("hi", "pass");
        assert_eq!(data.salt.len(), SALT_LEN);
        assert_eq!(data.nonce.len(), NONCE_LEN);
        // 2 plaintext bytes + 16-byte GCM tag.
        assert_eq!(data.ciphertext.len(), 2 + 16);
    }

    #[test]
    fn key_derivation_deterministic() {
        let a = derive_key("mypass", &[7u8; SALT_LEN]);
        let b = derive_key("mypass", &[7u8; SALT_LEN]);
        assert_eq!(*a, *b);
    }

    #[test]
    fn encryption_key_differs_by_salt() {
        let key1 = derive_key("pass", &[0u8; 16]);
        let key2 = derive_key("pass", &[1u8; 16]);
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn ciphertext_differs_per_encryption() {
        // Even with the same plaintext and passphrase, each encryption
        // should produce different ciphertext (due to random salt + nonce).
        let a = encrypt("same message", "pass");
        let b = encrypt("same message", "pass");
        assert_ne!(a.ciphertext, b.ciphertext, "repeated encryptions should produce different ciphertext");
        assert_ne!(a.salt, b.salt);
    }

    #[test]
    fn corrupted_ciphertext_fails() {
        let mut data = encrypt("tamper me", "pass");
        data.ciphertext[0] ^= 0x01;
        assert!(matches!(decrypt(&data, "pass"), Err(StegoError::DecryptionFailed)));
    }

    #[test]
    fn unicode_roundtrip() {
        let msg = "Héllo wörld! 日本語テスト 🔐";
        let data = encrypt(msg, "unicode-key");
        let pt = decrypt(&data, "unicode-key").unwrap();
        assert_eq!(String::from_utf8(pt).unwrap(), msg);
    }
}
