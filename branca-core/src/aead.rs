//! The authenticated cipher a Branca backend must provide.

use crate::BrancaError;

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 24;
pub const TAG_LEN: usize = 16;

/// An extended-nonce AEAD, IETF XChaCha20-Poly1305 for Branca.
///
/// Implementations must report every authentication failure as
/// [`BrancaError::CryptoError`] without further detail.
pub trait Aead: 'static {
    /// Encrypt `plaintext` in place and append the tag.
    fn seal(
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        plaintext: Vec<u8>,
        aad: &[u8],
    ) -> Result<Vec<u8>, BrancaError>;

    /// Verify the trailing tag and decrypt `ciphertext` in place.
    fn open(
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        ciphertext: Vec<u8>,
        aad: &[u8],
    ) -> Result<Vec<u8>, BrancaError>;
}
