//! AES-256 block cipher over the GF(2⁸) algebra.
//!
//! The state is loaded column-major: each 4-byte chunk of the input block
//! becomes one [`Word`]. ShiftRows permutes across words and MixColumns
//! multiplies each word by the fixed MDS matrix; the two conventions are a
//! matched pair and must not be changed independently.

use crate::gf256::{Gf256, Matrix, Word};

/// Byte length of an AES block.
pub(crate) const BLOCK_LEN: usize = 16;

/// Byte length of an AES-256 key.
pub(crate) const KEY_LEN: usize = 32;

const N_ROUNDS: usize = 14;
const KEY_WORDS: usize = KEY_LEN / 4;
const SCHEDULE_WORDS: usize = 4 * (N_ROUNDS + 1);

/// The AES substitution box, indexed by (high nibble, low nibble).
static SBOX: [[u8; 16]; 16] = [
    [0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76],
    [0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0],
    [0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15],
    [0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75],
    [0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84],
    [0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf],
    [0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8],
    [0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2],
    [0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73],
    [0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb],
    [0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79],
    [0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08],
    [0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a],
    [0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e],
    [0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf],
    [0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16],
];

/// Inverse of [`SBOX`].
static INV_SBOX: [[u8; 16]; 16] = [
    [0x52, 0x09, 0x6a, 0xd5, 0x30, 0x36, 0xa5, 0x38, 0xbf, 0x40, 0xa3, 0x9e, 0x81, 0xf3, 0xd7, 0xfb],
    [0x7c, 0xe3, 0x39, 0x82, 0x9b, 0x2f, 0xff, 0x87, 0x34, 0x8e, 0x43, 0x44, 0xc4, 0xde, 0xe9, 0xcb],
    [0x54, 0x7b, 0x94, 0x32, 0xa6, 0xc2, 0x23, 0x3d, 0xee, 0x4c, 0x95, 0x0b, 0x42, 0xfa, 0xc3, 0x4e],
    [0x08, 0x2e, 0xa1, 0x66, 0x28, 0xd9, 0x24, 0xb2, 0x76, 0x5b, 0xa2, 0x49, 0x6d, 0x8b, 0xd1, 0x25],
    [0x72, 0xf8, 0xf6, 0x64, 0x86, 0x68, 0x98, 0x16, 0xd4, 0xa4, 0x5c, 0xcc, 0x5d, 0x65, 0xb6, 0x92],
    [0x6c, 0x70, 0x48, 0x50, 0xfd, 0xed, 0xb9, 0xda, 0x5e, 0x15, 0x46, 0x57, 0xa7, 0x8d, 0x9d, 0x84],
    [0x90, 0xd8, 0xab, 0x00, 0x8c, 0xbc, 0xd3, 0x0a, 0xf7, 0xe4, 0x58, 0x05, 0xb8, 0xb3, 0x45, 0x06],
    [0xd0, 0x2c, 0x1e, 0x8f, 0xca, 0x3f, 0x0f, 0x02, 0xc1, 0xaf, 0xbd, 0x03, 0x01, 0x13, 0x8a, 0x6b],
    [0x3a, 0x91, 0x11, 0x41, 0x4f, 0x67, 0xdc, 0xea, 0x97, 0xf2, 0xcf, 0xce, 0xf0, 0xb4, 0xe6, 0x73],
    [0x96, 0xac, 0x74, 0x22, 0xe7, 0xad, 0x35, 0x85, 0xe2, 0xf9, 0x37, 0xe8, 0x1c, 0x75, 0xdf, 0x6e],
    [0x47, 0xf1, 0x1a, 0x71, 0x1d, 0x29, 0xc5, 0x89, 0x6f, 0xb7, 0x62, 0x0e, 0xaa, 0x18, 0xbe, 0x1b],
    [0xfc, 0x56, 0x3e, 0x4b, 0xc6, 0xd2, 0x79, 0x20, 0x9a, 0xdb, 0xc0, 0xfe, 0x78, 0xcd, 0x5a, 0xf4],
    [0x1f, 0xdd, 0xa8, 0x33, 0x88, 0x07, 0xc7, 0x31, 0xb1, 0x12, 0x10, 0x59, 0x27, 0x80, 0xec, 0x5f],
    [0x60, 0x51, 0x7f, 0xa9, 0x19, 0xb5, 0x4a, 0x0d, 0x2d, 0xe5, 0x7a, 0x9f, 0x93, 0xc9, 0x9c, 0xef],
    [0xa0, 0xe0, 0x3b, 0x4d, 0xae, 0x2a, 0xf5, 0xb0, 0xc8, 0xeb, 0xbb, 0x3c, 0x83, 0x53, 0x99, 0x61],
    [0x17, 0x2b, 0x04, 0x7e, 0xba, 0x77, 0xd6, 0x26, 0xe1, 0x69, 0x14, 0x63, 0x55, 0x21, 0x0c, 0x7d],
];

const MIX_COLUMNS: Matrix = Matrix([
    Word([Gf256(0x02), Gf256(0x03), Gf256(0x01), Gf256(0x01)]),
    Word([Gf256(0x01), Gf256(0x02), Gf256(0x03), Gf256(0x01)]),
    Word([Gf256(0x01), Gf256(0x01), Gf256(0x02), Gf256(0x03)]),
    Word([Gf256(0x03), Gf256(0x01), Gf256(0x01), Gf256(0x02)]),
]);

const INV_MIX_COLUMNS: Matrix = Matrix([
    Word([Gf256(0x0e), Gf256(0x0b), Gf256(0x0d), Gf256(0x09)]),
    Word([Gf256(0x09), Gf256(0x0e), Gf256(0x0b), Gf256(0x0d)]),
    Word([Gf256(0x0d), Gf256(0x09), Gf256(0x0e), Gf256(0x0b)]),
    Word([Gf256(0x0b), Gf256(0x0d), Gf256(0x09), Gf256(0x0e)]),
]);

/// Round constants x^(j-1), j = 1..10; index 0 is an unused placeholder.
const RCON: [u8; 11] = [
    0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36,
];

fn sbox(element: Gf256) -> Gf256 {
    Gf256(SBOX[(element.0 >> 4) as usize][(element.0 & 0x0f) as usize])
}

fn inv_sbox(element: Gf256) -> Gf256 {
    Gf256(INV_SBOX[(element.0 >> 4) as usize][(element.0 & 0x0f) as usize])
}

fn sub_word(word: Word) -> Word {
    word.map(sbox)
}

fn sub_bytes(state: Matrix) -> Matrix {
    state.map(|row| row.map(sbox))
}

fn inv_sub_bytes(state: Matrix) -> Matrix {
    state.map(|row| row.map(inv_sbox))
}

fn shift_rows(state: Matrix) -> Matrix {
    let mut out = state;
    for i in 0..4 {
        for j in 0..4 {
            out.0[i].0[j] = state.0[(i + j) % 4].0[j];
        }
    }
    out
}

fn inv_shift_rows(state: Matrix) -> Matrix {
    let mut out = state;
    for i in 0..4 {
        for j in 0..4 {
            out.0[i].0[j] = state.0[(i + 4 - j) % 4].0[j];
        }
    }
    out
}

fn mix_columns(state: Matrix) -> Matrix {
    state.map(|row| MIX_COLUMNS.mul_vec(row))
}

fn inv_mix_columns(state: Matrix) -> Matrix {
    state.map(|row| INV_MIX_COLUMNS.mul_vec(row))
}

/// Expand a 32-byte key into the 60-word round-key schedule.
///
/// For word index `i >= 8`: rotate + substitute + round constant when
/// `i % 8 == 0`, substitute only when `i % 8 == 4` (the extra step specific
/// to 256-bit keys), then XOR with the word eight positions back.
fn expand_key(key: &[u8; KEY_LEN]) -> Vec<Word> {
    let mut words = Vec::with_capacity(SCHEDULE_WORDS);
    for i in 0..KEY_WORDS {
        words.push(Word::from_bytes([
            key[4 * i],
            key[4 * i + 1],
            key[4 * i + 2],
            key[4 * i + 3],
        ]));
    }
    for i in KEY_WORDS..SCHEDULE_WORDS {
        let mut temp = words[i - 1];
        if i % KEY_WORDS == 0 {
            let rcon = Word::from_bytes([RCON[i / KEY_WORDS], 0, 0, 0]);
            temp = sub_word(temp.rotl(1)) + rcon;
        } else if i % KEY_WORDS == 4 {
            temp = sub_word(temp);
        }
        words.push(words[i - KEY_WORDS] + temp);
    }
    words
}

/// An AES-256 instance with its expanded key schedule.
///
/// The schedule is computed once at construction and never mutated, so a
/// single instance can be shared read-only across threads.
pub(crate) struct Aes256 {
    schedule: Vec<Word>,
}

impl Aes256 {
    pub(crate) fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            schedule: expand_key(key),
        }
    }

    fn add_round_key(&self, state: Matrix, round: usize) -> Matrix {
        let mut out = state;
        for (i, row) in out.0.iter_mut().enumerate() {
            *row = *row + self.schedule[4 * round + i];
        }
        out
    }

    pub(crate) fn encrypt_block(&self, block: &[u8; BLOCK_LEN]) -> [u8; BLOCK_LEN] {
        let mut state = Matrix::from_block(block);
        state = self.add_round_key(state, 0);
        for round in 1..N_ROUNDS {
            state = sub_bytes(state);
            state = shift_rows(state);
            state = mix_columns(state);
            state = self.add_round_key(state, round);
        }
        state = sub_bytes(state);
        state = shift_rows(state);
        state = self.add_round_key(state, N_ROUNDS);
        state.to_block()
    }

    pub(crate) fn decrypt_block(&self, block: &[u8; BLOCK_LEN]) -> [u8; BLOCK_LEN] {
        let mut state = Matrix::from_block(block);
        state = self.add_round_key(state, N_ROUNDS);
        for round in (1..N_ROUNDS).rev() {
            state = inv_shift_rows(state);
            state = inv_sub_bytes(state);
            state = self.add_round_key(state, round);
            state = inv_mix_columns(state);
        }
        state = inv_shift_rows(state);
        state = inv_sub_bytes(state);
        state = self.add_round_key(state, 0);
        state.to_block()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unhex_16(s: &str) -> [u8; 16] {
        let mut out = [0u8; 16];
        out.copy_from_slice(&hex::decode(s).unwrap());
        out
    }

    fn unhex_32(s: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&hex::decode(s).unwrap());
        out
    }

    #[test]
    fn sbox_inverts() {
        for value in 0..=255u8 {
            assert_eq!(inv_sbox(sbox(Gf256(value))), Gf256(value));
        }
    }

    #[test]
    fn shift_rows_inverts() {
        let block: [u8; 16] = core::array::from_fn(|i| i as u8);
        let state = Matrix::from_block(&block);
        assert_eq!(inv_shift_rows(shift_rows(state)), state);
        assert_ne!(shift_rows(state), state);
    }

    #[test]
    fn mix_columns_inverts() {
        let block: [u8; 16] = core::array::from_fn(|i| (3 * i + 1) as u8);
        let state = Matrix::from_block(&block);
        assert_eq!(inv_mix_columns(mix_columns(state)), state);
    }

    #[test]
    fn schedule_has_sixty_words() {
        let cipher = Aes256::new(&[0u8; KEY_LEN]);
        assert_eq!(cipher.schedule.len(), SCHEDULE_WORDS);
    }

    #[test]
    fn fips_197_appendix_c3_vector() {
        let key = unhex_32("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f");
        let plaintext = unhex_16("00112233445566778899aabbccddeeff");
        let ciphertext = unhex_16("8ea2b7ca516745bfeafc49904b496089");

        let cipher = Aes256::new(&key);
        assert_eq!(cipher.encrypt_block(&plaintext), ciphertext);
        assert_eq!(cipher.decrypt_block(&ciphertext), plaintext);
    }

    #[test]
    fn nist_all_zero_vector() {
        let cipher = Aes256::new(&[0u8; KEY_LEN]);
        let ciphertext = unhex_16("dc95c078a2408989ad48a21492842087");
        assert_eq!(cipher.encrypt_block(&[0u8; BLOCK_LEN]), ciphertext);
    }

    #[test]
    fn decrypt_round_trips_arbitrary_blocks() {
        let key = unhex_32("2b7e151628aed2a6abf7158809cf4f3c2b7e151628aed2a6abf7158809cf4f3c");
        let cipher = Aes256::new(&key);
        for seed in 0..8u8 {
            let block: [u8; 16] = core::array::from_fn(|i| seed.wrapping_mul(37).wrapping_add(i as u8));
            assert_eq!(cipher.decrypt_block(&cipher.encrypt_block(&block)), block);
        }
    }
}
