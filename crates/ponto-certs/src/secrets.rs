//! # Sealed Secrets
//!
//! The certificate password is persisted sealed with AES-256-GCM under a
//! process-wide master key. The sealed form is `nonce (12) || tag (16)
//! || ciphertext`; a fresh random nonce is drawn per seal, so sealing the
//! same password twice produces different bytes.
//!
//! Plaintext passwords are returned wrapped in [`zeroize::Zeroizing`] and
//! are wiped when dropped.

use openssl::rand::rand_bytes;
use openssl::symm::{decrypt_aead, encrypt_aead, Cipher};
use zeroize::{Zeroize, Zeroizing};

use crate::error::CertError;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// The process-wide 32-byte key that seals certificate passwords at rest.
pub struct MasterKey([u8; 32]);

impl MasterKey {
    /// Parse a key from its 64-char hex form (the `PONTO_MASTER_KEY`
    /// environment variable).
    pub fn from_hex(hex_str: &str) -> Result<Self, CertError> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| CertError::MasterKey(format!("not valid hex: {e}")))?;
        if bytes.len() != 32 {
            return Err(CertError::MasterKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        Ok(Self(key))
    }

    /// Generate a random key from the OS CSPRNG.
    pub fn generate() -> Result<Self, CertError> {
        let mut key = [0u8; 32];
        rand_bytes(&mut key)?;
        Ok(Self(key))
    }

    /// Seal a plaintext secret. Output layout: nonce || tag || ciphertext.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CertError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand_bytes(&mut nonce)?;
        let mut tag = [0u8; TAG_LEN];
        let ciphertext = encrypt_aead(
            Cipher::aes_256_gcm(),
            &self.0,
            Some(&nonce),
            &[],
            plaintext,
            &mut tag,
        )?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + TAG_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&tag);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Open a sealed secret. Fails on truncation, tampering, or a
    /// different key.
    pub fn open(&self, sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>, CertError> {
        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(CertError::Crypto("sealed secret too short".into()));
        }
        let (nonce, rest) = sealed.split_at(NONCE_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);
        let plaintext = decrypt_aead(
            Cipher::aes_256_gcm(),
            &self.0,
            Some(nonce),
            &[],
            ciphertext,
            tag,
        )
        .map_err(|_| CertError::Crypto("sealed secret failed authentication".into()))?;
        Ok(Zeroizing::new(plaintext))
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey([redacted])")
    }
}
