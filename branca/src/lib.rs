//! Branca tokens (RustCrypto)
//!
//! ```
//! use branca::{Branca, BrancaError};
//!
//! let branca = Branca::new(*b"supersecretkeyyoushouldnotcommit").with_ttl(3600);
//!
//! // seal a payload into a new token.
//! let token = branca.encode(b"Hello world!").unwrap();
//!
//! // ...
//!
//! // authenticate, decrypt and check the token has not expired.
//! let payload = branca.decode(&token).unwrap();
//! assert_eq!(payload, b"Hello world!");
//!
//! // tokens from another key are rejected.
//! let other = Branca::new(*b"anothersecretkeyyoushouldnotuse!");
//! assert!(matches!(other.decode(&token), Err(BrancaError::CryptoError)));
//! ```
#![forbid(unsafe_code)]

/// Low level implementation primitives.
pub mod core;

pub use branca_core::{
    BrancaError, Clock, DecodedToken, FixedClock, MIN_TOKEN_LEN, SystemClock, base62, header,
    rand_core,
};

/// A Branca token codec backed by [`core::XChaCha20Poly1305`].
pub type Branca<C = SystemClock> = branca_core::Branca<core::XChaCha20Poly1305, C>;
