//! The fixed token header.
//!
//! The header is authenticated as associated data but never encrypted.

use crate::aead::NONCE_LEN;

/// Branca magic byte.
pub const VERSION: u8 = 0xBA;

/// `version (1) || timestamp (4) || nonce (24)`
pub const HEADER_LEN: usize = 1 + 4 + NONCE_LEN;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    /// Creation time in UNIX seconds.
    pub timestamp: u32,
    pub nonce: [u8; NONCE_LEN],
}

impl Header {
    /// A header for the current format version.
    pub fn new(timestamp: u32, nonce: [u8; NONCE_LEN]) -> Self {
        Self {
            version: VERSION,
            timestamp,
            nonce,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0; HEADER_LEN];
        let (version, rest) = out.split_at_mut(1);
        let (timestamp, nonce) = rest.split_at_mut(4);
        version[0] = self.version;
        timestamp.copy_from_slice(&self.timestamp.to_be_bytes());
        nonce.copy_from_slice(&self.nonce);
        out
    }

    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Self {
        let [version, t0, t1, t2, t3, nonce @ ..] = *bytes;
        Self {
            version,
            timestamp: u32::from_be_bytes([t0, t1, t2, t3]),
            nonce,
        }
    }

    /// Split a binary token into its raw header and the sealed payload.
    ///
    /// Returns `None` if there are fewer than [`HEADER_LEN`] bytes.
    pub fn split(token: &[u8]) -> Option<(&[u8; HEADER_LEN], &[u8])> {
        token.split_first_chunk::<HEADER_LEN>()
    }
}
