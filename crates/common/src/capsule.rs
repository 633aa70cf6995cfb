//! The capsule wire format: `nonce || ciphertext || tag`, hex-encoded.
//!
//! A capsule is what the server hands to the browser-side autofill client.
//! The client strips the leading 12-byte nonce and passes the remainder to
//! the AEAD together with the credential id as associated data. Because ids
//! travel as UUIDs, the parser tolerates `-` separators anywhere in the hex.

use std::fmt;

use thiserror::Error;

use gcmsiv::{NONCE_LEN, TAG_LEN};

/// Smallest well-formed capsule: a nonce plus the tag of an empty payload.
pub const MIN_CAPSULE_LEN: usize = NONCE_LEN + TAG_LEN;

/// Errors produced when parsing a capsule from its text form.
#[derive(Debug, Error)]
pub enum CapsuleError {
    /// The text is not valid hexadecimal after separator stripping.
    #[error("capsule is not valid hex")]
    InvalidHex,

    /// The decoded bytes cannot contain a nonce and a tag.
    #[error("capsule too short: {0} bytes, expected at least {MIN_CAPSULE_LEN}")]
    TooShort(usize),
}

/// A sealed credential in transit: the per-message nonce and the AEAD
/// output (`ciphertext || tag`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capsule {
    /// Per-message nonce, generated fresh for every seal.
    pub nonce: [u8; NONCE_LEN],
    /// AEAD output: ciphertext followed by the 16-byte tag.
    pub token: Vec<u8>,
}

impl Capsule {
    /// Concatenate to the raw wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(NONCE_LEN + self.token.len());
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.token);
        bytes
    }

    /// Lowercase hex encoding of [`Capsule::to_bytes`].
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse a capsule from hex text, ignoring UUID-style `-` separators.
    ///
    /// # Errors
    ///
    /// [`CapsuleError::InvalidHex`] for non-hex input,
    /// [`CapsuleError::TooShort`] when the decoded bytes cannot hold a
    /// nonce and a tag.
    pub fn from_hex(text: &str) -> Result<Self, CapsuleError> {
        let cleaned: String = text.trim().chars().filter(|c| *c != '-').collect();
        let bytes = hex::decode(cleaned).map_err(|_| CapsuleError::InvalidHex)?;
        if bytes.len() < MIN_CAPSULE_LEN {
            return Err(CapsuleError::TooShort(bytes.len()));
        }
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&bytes[..NONCE_LEN]);
        Ok(Self {
            nonce,
            token: bytes[NONCE_LEN..].to_vec(),
        })
    }
}

impl fmt::Display for Capsule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Capsule {
        Capsule {
            nonce: [0xab; NONCE_LEN],
            token: vec![0xcd; TAG_LEN + 5],
        }
    }

    #[test]
    fn hex_round_trip() {
        let capsule = sample();
        let parsed = Capsule::from_hex(&capsule.to_hex()).unwrap();
        assert_eq!(parsed, capsule);
    }

    #[test]
    fn parses_dashed_input() {
        let capsule = sample();
        let mut dashed = capsule.to_hex();
        dashed.insert(8, '-');
        dashed.insert(14, '-');
        assert_eq!(Capsule::from_hex(&dashed).unwrap(), capsule);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let capsule = sample();
        let padded = format!("  {}\n", capsule.to_hex());
        assert_eq!(Capsule::from_hex(&padded).unwrap(), capsule);
    }

    #[test]
    fn rejects_non_hex_input() {
        assert!(matches!(
            Capsule::from_hex("not hex at all"),
            Err(CapsuleError::InvalidHex)
        ));
    }

    #[test]
    fn rejects_odd_length_hex() {
        assert!(matches!(
            Capsule::from_hex("abc"),
            Err(CapsuleError::InvalidHex)
        ));
    }

    #[test]
    fn rejects_short_capsules() {
        let short = hex::encode([0u8; MIN_CAPSULE_LEN - 1]);
        assert!(matches!(
            Capsule::from_hex(&short),
            Err(CapsuleError::TooShort(len)) if len == MIN_CAPSULE_LEN - 1
        ));
    }

    #[test]
    fn display_matches_to_hex() {
        let capsule = sample();
        assert_eq!(capsule.to_string(), capsule.to_hex());
    }
}
