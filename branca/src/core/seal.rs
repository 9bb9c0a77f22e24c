use branca_core::BrancaError;
use branca_core::aead::{Aead, KEY_LEN, NONCE_LEN, TAG_LEN};
use chacha20poly1305::KeyInit;
use chacha20poly1305::aead::AeadInPlace;

use super::XChaCha20Poly1305;

impl Aead for XChaCha20Poly1305 {
    fn seal(
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        mut payload: Vec<u8>,
        aad: &[u8],
    ) -> Result<Vec<u8>, BrancaError> {
        payload.reserve_exact(TAG_LEN);
        chacha20poly1305::XChaCha20Poly1305::new(key.into())
            .encrypt_in_place(nonce.into(), aad, &mut payload)
            .map_err(|_| BrancaError::CryptoError)?;

        Ok(payload)
    }

    fn open(
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        mut payload: Vec<u8>,
        aad: &[u8],
    ) -> Result<Vec<u8>, BrancaError> {
        if payload.len() < TAG_LEN {
            return Err(BrancaError::CryptoError);
        }

        chacha20poly1305::XChaCha20Poly1305::new(key.into())
            .decrypt_in_place(nonce.into(), aad, &mut payload)
            .map_err(|_| BrancaError::CryptoError)?;

        Ok(payload)
    }
}
