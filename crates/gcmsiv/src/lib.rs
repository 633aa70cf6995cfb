//! `gcmsiv` — AES-256-GCM-SIV (RFC 8452) implemented from field primitives
//! up, with no cryptographic dependencies.
//!
//! The crate builds the construction bottom-up: GF(2⁸) arithmetic feeds the
//! AES-256 block cipher, which drives both the CTR keystream and (via key
//! derivation) the GF(2¹²⁸) POLYVAL hash; the GCM-SIV layer ties them
//! together. Only the AEAD surface is public — callers get
//! [`Aes256GcmSiv::encrypt`] and [`Aes256GcmSiv::decrypt`] and nothing else.
//!
//! Every operation is synchronous and free of shared mutable state; an
//! [`Aes256GcmSiv`] value may be used read-only from any number of threads.
//!
//! This is a mathematically faithful implementation, not a hardened one: no
//! claims are made about the timing behavior of table lookups or the
//! multiplication loops on any particular host.

mod aes;
mod ctr;
mod gf128;
mod gf256;
mod polyval;
mod siv;

pub use siv::{Aes256GcmSiv, CipherError, KEY_LEN, NONCE_LEN, TAG_LEN};
