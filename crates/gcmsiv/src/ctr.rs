//! Counter-mode keystream generation with the GCM-SIV counter convention.
//!
//! RFC 8452 increments the 32-bit little-endian integer held in the FIRST
//! four bytes of the counter block, leaving the remaining twelve untouched.
//! This differs from generic AES-CTR and is load-bearing for interop.

use crate::aes::{Aes256, BLOCK_LEN};

/// XOR `message` against the keystream generated from `initial_counter`.
///
/// The same call performs encryption and decryption. The message is consumed
/// in 16-byte strides; the final stride may be shorter. An empty message
/// produces an empty output without touching the cipher.
pub(crate) fn apply_keystream(
    cipher: &Aes256,
    initial_counter: [u8; BLOCK_LEN],
    message: &[u8],
) -> Vec<u8> {
    let mut counter = initial_counter;
    let mut output = Vec::with_capacity(message.len());
    for chunk in message.chunks(BLOCK_LEN) {
        let keystream = cipher.encrypt_block(&counter);
        increment(&mut counter);
        for (byte, key) in chunk.iter().zip(keystream.iter()) {
            output.push(byte ^ key);
        }
    }
    output
}

/// Add 1 (mod 2³²) to the little-endian counter in bytes 0..4.
fn increment(block: &mut [u8; BLOCK_LEN]) {
    let low = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
    block[..4].copy_from_slice(&low.wrapping_add(1).to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_touches_only_the_low_word() {
        let mut block = [0u8; BLOCK_LEN];
        block[4..].copy_from_slice(&[0xaa; 12]);
        increment(&mut block);
        assert_eq!(&block[..4], &[0x01, 0x00, 0x00, 0x00]);
        assert_eq!(&block[4..], &[0xaa; 12]);
    }

    #[test]
    fn increment_wraps_at_u32_max() {
        let mut block = [0u8; BLOCK_LEN];
        block[..4].copy_from_slice(&[0xff, 0xff, 0xff, 0xff]);
        block[4..].copy_from_slice(&[0x7b; 12]);
        increment(&mut block);
        assert_eq!(&block[..4], &[0x00, 0x00, 0x00, 0x00]);
        assert_eq!(&block[4..], &[0x7b; 12]);
    }

    #[test]
    fn keystream_round_trips() {
        let cipher = Aes256::new(&[0x42u8; 32]);
        let counter = [0x07u8; BLOCK_LEN];
        let message = b"neither a multiple of sixteen nor short";
        let encrypted = apply_keystream(&cipher, counter, message);
        assert_ne!(&encrypted, message);
        assert_eq!(apply_keystream(&cipher, counter, &encrypted), message);
    }

    #[test]
    fn empty_message_yields_empty_output() {
        let cipher = Aes256::new(&[0u8; 32]);
        assert!(apply_keystream(&cipher, [0u8; BLOCK_LEN], &[]).is_empty());
    }
}
