//! GF(2⁸) arithmetic and the small word/matrix algebra underneath AES.
//!
//! Elements are bytes interpreted as polynomials over GF(2) modulo the AES
//! irreducible polynomial x⁸ + x⁴ + x³ + x + 1. Addition is XOR;
//! multiplication reduces via `xtimes` (multiplication by x) so every
//! intermediate stays inside the field.

use std::ops::{Add, Mul};

/// A single element of GF(2⁸).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub(crate) struct Gf256(pub(crate) u8);

impl Gf256 {
    pub(crate) const ZERO: Self = Gf256(0);
    pub(crate) const ONE: Self = Gf256(1);

    fn bit(self, which: u8) -> bool {
        self.0 & (1 << which) != 0
    }

    /// Multiply by x: shift the low 7 bits left, folding the dropped
    /// degree-8 term back in with the reduction polynomial 0x1b.
    fn xtimes(self) -> Self {
        let shifted = (self.0 & 0x7f) << 1;
        if self.0 & 0x80 != 0 {
            Gf256(shifted ^ 0x1b)
        } else {
            Gf256(shifted)
        }
    }

    /// Exponentiation by repeated multiplication.
    pub(crate) fn pow(self, exponent: u32) -> Self {
        let mut acc = Gf256::ONE;
        for _ in 0..exponent {
            acc = acc * self;
        }
        acc
    }

    /// Multiplicative inverse: a²⁵⁴ (the field has 255 nonzero elements).
    /// Zero has no inverse and maps to zero, matching the S-box construction.
    pub(crate) fn inverse(self) -> Self {
        self.pow(254)
    }
}

impl Add for Gf256 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Gf256(self.0 ^ rhs.0)
    }
}

impl Mul for Gf256 {
    type Output = Self;

    /// Double-and-accumulate over the 8 bits of `rhs`, low to high.
    fn mul(self, rhs: Self) -> Self {
        let mut acc = Gf256::ZERO;
        let mut power = self;
        for i in 0..8 {
            if rhs.bit(i) {
                acc = acc + power;
            }
            power = power.xtimes();
        }
        acc
    }
}

/// An AES word: exactly four field elements.
///
/// Under the engine's storage convention each consecutive 4-byte chunk of a
/// block becomes one word, so a word doubles as an AES state column.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Word(pub(crate) [Gf256; 4]);

impl Word {
    pub(crate) const ZERO: Self = Word([Gf256::ZERO; 4]);

    pub(crate) fn from_bytes(bytes: [u8; 4]) -> Self {
        Word(bytes.map(Gf256))
    }

    pub(crate) fn to_bytes(self) -> [u8; 4] {
        self.0.map(|element| element.0)
    }

    /// Cyclic left rotation by `positions`.
    pub(crate) fn rotl(self, positions: usize) -> Self {
        let mut elements = self.0;
        elements.rotate_left(positions);
        Word(elements)
    }

    /// Dot product: sum of elementwise products.
    pub(crate) fn dot(self, other: Word) -> Gf256 {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(Gf256::ZERO, |acc, (&a, &b)| acc + a * b)
    }

    pub(crate) fn map(self, f: impl Fn(Gf256) -> Gf256) -> Self {
        Word(self.0.map(f))
    }
}

impl Add for Word {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut out = Word::ZERO;
        for i in 0..4 {
            out.0[i] = self.0[i] + rhs.0[i];
        }
        out
    }
}

/// A 4×4 matrix of field elements: the AES state, and the fixed MixColumns
/// coefficient matrices.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Matrix(pub(crate) [Word; 4]);

impl Matrix {
    /// Load a 16-byte block column-major: each 4-byte chunk is one word.
    pub(crate) fn from_block(block: &[u8; 16]) -> Self {
        let mut rows = [Word::ZERO; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            *row = Word::from_bytes([
                block[4 * i],
                block[4 * i + 1],
                block[4 * i + 2],
                block[4 * i + 3],
            ]);
        }
        Matrix(rows)
    }

    /// Serialise back to 16 bytes in the same order `from_block` consumed.
    pub(crate) fn to_block(self) -> [u8; 16] {
        let mut block = [0u8; 16];
        for (i, row) in self.0.iter().enumerate() {
            block[4 * i..4 * i + 4].copy_from_slice(&row.to_bytes());
        }
        block
    }

    /// Matrix × vector: one dot product per row.
    pub(crate) fn mul_vec(self, vector: Word) -> Word {
        let mut out = Word::ZERO;
        for (i, row) in self.0.iter().enumerate() {
            out.0[i] = vector.dot(*row);
        }
        out
    }

    pub(crate) fn map(self, f: impl Fn(Word) -> Word) -> Self {
        Matrix(self.0.map(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiply_matches_fips_examples() {
        // Worked examples from FIPS-197 §4.2.
        assert_eq!(Gf256(0x57) * Gf256(0x83), Gf256(0xc1));
        assert_eq!(Gf256(0x57) * Gf256(0x13), Gf256(0xfe));
        assert_eq!(Gf256(0x57) * Gf256(0x02), Gf256(0xae));
    }

    #[test]
    fn multiply_is_commutative() {
        for a in 0..=255u8 {
            for b in [0x00, 0x01, 0x1b, 0x57, 0x83, 0xff] {
                assert_eq!(Gf256(a) * Gf256(b), Gf256(b) * Gf256(a));
            }
        }
    }

    #[test]
    fn multiply_distributes_over_add() {
        for a in [0x03u8, 0x1b, 0x57, 0xc6] {
            for b in [0x05u8, 0x83, 0xaa] {
                for c in [0x11u8, 0x40, 0xfe] {
                    let lhs = Gf256(a) * (Gf256(b) + Gf256(c));
                    let rhs = Gf256(a) * Gf256(b) + Gf256(a) * Gf256(c);
                    assert_eq!(lhs, rhs);
                }
            }
        }
    }

    #[test]
    fn every_nonzero_element_has_an_inverse() {
        for a in 1..=255u8 {
            assert_eq!(Gf256(a) * Gf256(a).inverse(), Gf256::ONE, "a = {a:#04x}");
        }
    }

    #[test]
    fn inverse_of_zero_is_zero() {
        assert_eq!(Gf256::ZERO.inverse(), Gf256::ZERO);
    }

    #[test]
    fn word_rotation_cycles() {
        let word = Word::from_bytes([1, 2, 3, 4]);
        assert_eq!(word.rotl(1).to_bytes(), [2, 3, 4, 1]);
        assert_eq!(word.rotl(4).to_bytes(), [1, 2, 3, 4]);
    }

    #[test]
    fn block_round_trips_through_matrix() {
        let block: [u8; 16] = core::array::from_fn(|i| i as u8);
        assert_eq!(Matrix::from_block(&block).to_block(), block);
    }
}
