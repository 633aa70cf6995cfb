//! POLYVAL, the universal hash at the core of GCM-SIV authentication.

use crate::gf128::Gf128;

/// A POLYVAL instance keyed with the hash element `H`.
pub(crate) struct Polyval {
    key: Gf128,
}

impl Polyval {
    pub(crate) fn new(key: &[u8; 16]) -> Self {
        Self {
            key: Gf128::from_le_bytes(*key),
        }
    }

    /// Evaluate the keyed polynomial over `message`.
    ///
    /// `message` must already be padded to a multiple of 16 bytes; callers
    /// own the padding rules. For each block `B`: `S = dot(S + B, H)`.
    ///
    /// # Panics
    ///
    /// Panics if `message` is not block-aligned; that is a programming
    /// error, not a runtime condition.
    pub(crate) fn digest(&self, message: &[u8]) -> [u8; 16] {
        assert!(
            message.len() % 16 == 0,
            "POLYVAL input must be a multiple of 16 bytes"
        );
        let mut acc = Gf128::ZERO;
        for chunk in message.chunks_exact(16) {
            let mut block = [0u8; 16];
            block.copy_from_slice(chunk);
            acc = (acc + Gf128::from_le_bytes(block)).dot(self.key);
        }
        acc.to_le_bytes()
    }
}
