//! Credential records and capsule sealing.
//!
//! Each credential carries its own random 256-bit API key; the key never
//! leaves the store except through `peek --show-api-key`, which is how the
//! browser-side client gets configured. Sealing draws a fresh nonce per
//! call, so repeated fetches of the same credential produce distinct
//! capsules.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use common::Capsule;
use gcmsiv::{Aes256GcmSiv, KEY_LEN, NONCE_LEN};

/// Errors produced when sealing a credential.
#[derive(Debug, Error)]
pub enum SealError {
    /// The `[user, password]` payload could not be serialised.
    #[error("failed to serialise credential payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// A stored credential.
///
/// The API key is zeroed when the record is dropped and redacted from
/// `Debug` output; `Display`-style printing is left to the CLI, which owns
/// the masking rules.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Store key; also the associated data that binds capsules to this record.
    pub id: Uuid,
    /// User name delivered to the autofill client.
    pub user: String,
    /// Password delivered to the autofill client.
    pub password: String,
    /// Per-credential AEAD master key, stored as hex.
    #[serde(with = "hex_key")]
    pub api_key: [u8; KEY_LEN],
}

impl Credential {
    /// Create a credential with a fresh v4 id and a random API key.
    pub fn new(user: &str, password: &str) -> Self {
        let mut api_key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut api_key);
        Self {
            id: Uuid::new_v4(),
            user: user.to_owned(),
            password: password.to_owned(),
            api_key,
        }
    }

    /// Seal this credential into a capsule under its own API key.
    ///
    /// The payload is the JSON array `[user, password]`; the credential id
    /// is the associated data, so a capsule only opens against the id it
    /// was fetched under.
    ///
    /// # Errors
    ///
    /// Returns [`SealError::Payload`] if payload serialisation fails.
    pub fn seal(&self) -> Result<Capsule, SealError> {
        let payload = serde_json::to_vec(&(&self.user, &self.password))?;
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        let cipher = Aes256GcmSiv::new(&self.api_key, &nonce);
        let token = cipher.encrypt(&payload, self.id.as_bytes());
        Ok(Capsule { nonce, token })
    }
}

impl Drop for Credential {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.api_key.iter_mut().for_each(|b| *b = 0);
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the password or key material — not even in debug builds.
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Serde adapter storing the API key as a hex string.
mod hex_key {
    use serde::{Deserialize, Deserializer, Serializer};

    use gcmsiv::KEY_LEN;

    pub fn serialize<S: Serializer>(key: &[u8; KEY_LEN], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(key))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u8; KEY_LEN], D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = hex::decode(&text).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("API key must be exactly 32 bytes of hex"))
    }
}
