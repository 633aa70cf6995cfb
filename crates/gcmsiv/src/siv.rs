//! AES-256-GCM-SIV composition: key derivation, tag computation, and the
//! encrypt/decrypt entry points (RFC 8452).
//!
//! The authentication tag doubles as the CTR-mode initial counter, which is
//! what makes the construction nonce-misuse-resistant: encrypting the same
//! plaintext twice under the same key and nonce yields the same output and
//! leaks nothing beyond that equality.

use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::aes::{self, Aes256};
use crate::ctr;
use crate::polyval::Polyval;

/// Byte length of the 256-bit master key.
pub const KEY_LEN: usize = aes::KEY_LEN;

/// Byte length of the per-message nonce.
pub const NONCE_LEN: usize = 12;

/// Byte length of the authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Errors produced by [`Aes256GcmSiv::decrypt`].
#[derive(Debug, Error)]
pub enum CipherError {
    /// The input is shorter than the tag it must end with.
    #[error("ciphertext shorter than the {TAG_LEN}-byte authentication tag")]
    TruncatedCiphertext,

    /// The recomputed tag does not match; the ciphertext, tag, or associated
    /// data was altered (or the wrong key or nonce was used).
    #[error("authentication tag mismatch")]
    AuthenticationFailed,
}

/// Per-nonce subkeys derived from the master key.
///
/// Zeroed on drop so plaintext key material does not outlive the cipher
/// instance that consumed it.
struct DerivedKeys {
    auth: [u8; TAG_LEN],
    enc: [u8; KEY_LEN],
}

impl Drop for DerivedKeys {
    fn drop(&mut self) {
        self.auth.iter_mut().for_each(|b| *b = 0);
        self.enc.iter_mut().for_each(|b| *b = 0);
    }
}

/// Derive the 128-bit authentication key and 256-bit encryption key.
///
/// AES-encrypts the six blocks `le32(n) || nonce` for n = 0..5 under the
/// master key; the auth key is the first 8 bytes of blocks 0 and 1, the
/// encryption key the first 8 bytes of blocks 2 through 5.
fn derive_keys(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN]) -> DerivedKeys {
    let master = Aes256::new(key);
    let mut derived = DerivedKeys {
        auth: [0u8; TAG_LEN],
        enc: [0u8; KEY_LEN],
    };
    for n in 0u32..6 {
        let mut block = [0u8; 16];
        block[..4].copy_from_slice(&n.to_le_bytes());
        block[4..].copy_from_slice(nonce);
        let output = master.encrypt_block(&block);
        let index = n as usize;
        if index < 2 {
            derived.auth[8 * index..8 * index + 8].copy_from_slice(&output[..8]);
        } else {
            derived.enc[8 * (index - 2)..8 * (index - 2) + 8].copy_from_slice(&output[..8]);
        }
    }
    derived
}

/// An AES-256-GCM-SIV cipher bound to one (key, nonce) pair.
///
/// Subkey derivation and key-schedule expansion happen once at construction;
/// the instance is immutable afterwards and safe to share across threads.
/// A nonce must never be reused with the same key for distinct messages.
pub struct Aes256GcmSiv {
    nonce: [u8; NONCE_LEN],
    auth: Polyval,
    enc: Aes256,
}

impl Aes256GcmSiv {
    pub fn new(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN]) -> Self {
        let derived = derive_keys(key, nonce);
        Self {
            nonce: *nonce,
            auth: Polyval::new(&derived.auth),
            enc: Aes256::new(&derived.enc),
        }
    }

    /// Seal `plaintext`, binding `associated_data` into the tag.
    ///
    /// Returns `ciphertext || tag`; the output is always exactly
    /// [`TAG_LEN`] bytes longer than the input.
    pub fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Vec<u8> {
        let tag = self.tag(plaintext, associated_data);
        let mut counter = tag;
        counter[15] |= 0x80;
        let mut output = ctr::apply_keystream(&self.enc, counter, plaintext);
        output.extend_from_slice(&tag);
        output
    }

    /// Open `ciphertext` (which must end with its tag) against
    /// `associated_data`.
    ///
    /// The tag comparison scans all 16 bytes regardless of where a mismatch
    /// occurs. On failure the recovered plaintext is discarded; it never
    /// reaches the caller.
    ///
    /// # Errors
    ///
    /// [`CipherError::TruncatedCiphertext`] if the input cannot contain a
    /// tag, [`CipherError::AuthenticationFailed`] if verification fails.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        if ciphertext.len() < TAG_LEN {
            return Err(CipherError::TruncatedCiphertext);
        }
        let (body, tag_bytes) = ciphertext.split_at(ciphertext.len() - TAG_LEN);
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(tag_bytes);

        let mut counter = tag;
        counter[15] |= 0x80;
        let plaintext = ctr::apply_keystream(&self.enc, counter, body);

        let expected = self.tag(&plaintext, associated_data);
        if bool::from(tag.ct_eq(&expected)) {
            Ok(plaintext)
        } else {
            Err(CipherError::AuthenticationFailed)
        }
    }

    /// Compute the authentication tag over padded AAD, padded plaintext,
    /// and the bit-length block.
    fn tag(&self, plaintext: &[u8], associated_data: &[u8]) -> [u8; TAG_LEN] {
        let capacity = padded_len(associated_data.len()) + padded_len(plaintext.len()) + 16;
        let mut input = Vec::with_capacity(capacity);
        extend_padded(&mut input, associated_data);
        extend_padded(&mut input, plaintext);
        input.extend_from_slice(&(associated_data.len() as u64 * 8).to_le_bytes());
        input.extend_from_slice(&(plaintext.len() as u64 * 8).to_le_bytes());

        let mut digest = self.auth.digest(&input);
        for (byte, nonce_byte) in digest.iter_mut().zip(self.nonce.iter()) {
            *byte ^= nonce_byte;
        }
        digest[15] &= 0x7f;
        self.enc.encrypt_block(&digest)
    }
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(16) * 16
}

/// Append `data` followed by zero padding up to the next 16-byte boundary.
fn extend_padded(buffer: &mut Vec<u8>, data: &[u8]) {
    buffer.extend_from_slice(data);
    let remainder = data.len() % 16;
    if remainder != 0 {
        buffer.resize(buffer.len() + 16 - remainder, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unhex<const N: usize>(s: &str) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&hex::decode(s).unwrap());
        out
    }

    #[test]
    fn rfc_8452_key_derivation() {
        // First AES-256-GCM-SIV entry in RFC 8452 appendix C.2.
        let key: [u8; KEY_LEN] =
            unhex("0100000000000000000000000000000000000000000000000000000000000000");
        let nonce: [u8; NONCE_LEN] = unhex("030000000000000000000000");

        let derived = derive_keys(&key, &nonce);
        assert_eq!(hex::encode(derived.auth), "b5d3c529dfafac43136d2d11be284d7f");
        assert_eq!(
            hex::encode(derived.enc),
            "b914f4742be9e1d7a2f84addbf96dec3456e3c6c05ecc157cdbf0700fedad222"
        );
    }

    #[test]
    fn padding_lengths() {
        assert_eq!(padded_len(0), 0);
        assert_eq!(padded_len(1), 16);
        assert_eq!(padded_len(16), 16);
        assert_eq!(padded_len(17), 32);
    }

    #[test]
    fn truncated_input_is_rejected_before_any_work() {
        let cipher = Aes256GcmSiv::new(&[0u8; KEY_LEN], &[0u8; NONCE_LEN]);
        assert!(matches!(
            cipher.decrypt(&[0u8; TAG_LEN - 1], b""),
            Err(CipherError::TruncatedCiphertext)
        ));
    }

    #[test]
    fn output_length_is_input_plus_tag() {
        let cipher = Aes256GcmSiv::new(&[7u8; KEY_LEN], &[9u8; NONCE_LEN]);
        for len in [0usize, 1, 15, 16, 17, 47, 64] {
            let plaintext = vec![0x33u8; len];
            assert_eq!(cipher.encrypt(&plaintext, b"aad").len(), len + TAG_LEN);
        }
    }
}
