//! Backend-agnostic core of the Branca token format.
//!
//! A Branca token is an XChaCha20-Poly1305 sealed payload behind a fixed 29 byte
//! header, rendered as base-62 text:
//!
//! ```text
//! version (1) || timestamp (4, BE) || nonce (24) || ciphertext (N) || tag (16)
//! ```
//!
//! This crate owns the wire format. The cipher itself is provided by an
//! implementation of [`aead::Aead`], such as the one in the `branca` crate.
#![forbid(unsafe_code)]

pub mod aead;
pub mod base62;
pub mod clock;
pub mod header;
pub mod token;
pub mod validation;

pub use rand_core;

pub use clock::{Clock, FixedClock, SystemClock};
pub use token::{Branca, DecodedToken};

/// The shortest text accepted by [`Branca::decode`].
pub const MIN_TOKEN_LEN: usize = 62;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// Error returned for all Branca operations that can fail
pub enum BrancaError {
    /// The token was too short, was not base-62 encoded, or could not hold a header.
    #[error("invalid base62 token")]
    InvalidToken,
    /// The token header carried an unknown version byte.
    #[error("invalid token version: got {got:#04X} but expected {expected:#04X}")]
    InvalidTokenVersion { got: u8, expected: u8 },
    /// The key was not exactly 32 bytes.
    #[error("bad key length: expected 32 bytes, got {0}")]
    BadKeyLength(usize),
    /// Could not seal or authenticate the token.
    #[error("token could not be authenticated")]
    CryptoError,
    /// The token was authentic but older than the configured TTL.
    #[error("token is expired by {}s", .now - .expiry)]
    ExpiredToken {
        /// UNIX seconds at which the token stopped being valid.
        expiry: i64,
        /// UNIX seconds at which the check was made.
        now: i64,
    },
    /// The random number generator failed to produce a nonce.
    #[error("could not generate a nonce")]
    RandomFailed,
}

impl BrancaError {
    /// The expiry of an [`ExpiredToken`](BrancaError::ExpiredToken) error.
    pub fn expired_at(&self) -> Option<jiff::Timestamp> {
        match *self {
            BrancaError::ExpiredToken { expiry, .. } => jiff::Timestamp::from_second(expiry).ok(),
            _ => None,
        }
    }
}
