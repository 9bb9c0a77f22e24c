//! The token codec.

use core::fmt;
use core::marker::PhantomData;

use rand_core::{OsRng, TryCryptoRng};

use crate::aead::{Aead, KEY_LEN, NONCE_LEN};
use crate::clock::{Clock, SystemClock};
use crate::header::{HEADER_LEN, Header, VERSION};
use crate::{BrancaError, MIN_TOKEN_LEN, base62, validation};

/// Encodes and decodes Branca tokens under a single key.
///
/// The key is held as given and checked on every operation, so a key of the
/// wrong length fails with [`BrancaError::BadKeyLength`] on both paths.
///
/// A `Branca` is never mutated by encoding or decoding and can be shared
/// between threads.
pub struct Branca<A, C = SystemClock> {
    key: Box<[u8]>,
    ttl: u32,
    clock: C,
    _aead: PhantomData<fn() -> A>,
}

/// The authenticated contents of a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedToken {
    pub payload: Vec<u8>,
    /// Creation time in UNIX seconds.
    pub timestamp: u32,
}

impl DecodedToken {
    pub fn created_at(&self) -> Option<jiff::Timestamp> {
        jiff::Timestamp::from_second(i64::from(self.timestamp)).ok()
    }
}

impl<A: Aead> Branca<A> {
    /// Create a codec for `key` with expiration disabled.
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Branca {
            key: key.into().into_boxed_slice(),
            ttl: 0,
            clock: SystemClock,
            _aead: PhantomData,
        }
    }
}

impl<A: Aead, C: Clock> Branca<A, C> {
    /// Replace the time source used to stamp and expire tokens.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Branca<A, C2> {
        Branca {
            key: self.key,
            ttl: self.ttl,
            clock,
            _aead: PhantomData,
        }
    }

    /// Set the time-to-live in seconds. Zero disables expiration.
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the time-to-live in seconds. Zero disables expiration.
    pub fn set_ttl(&mut self, ttl: u32) {
        self.ttl = ttl;
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    fn key(&self) -> Result<&[u8; KEY_LEN], BrancaError> {
        <&[u8; KEY_LEN]>::try_from(&*self.key)
            .map_err(|_| BrancaError::BadKeyLength(self.key.len()))
    }

    /// Seal `payload` into a new token, stamped with the current time and a
    /// random nonce from the operating system.
    ///
    /// An empty payload produces a token shorter than [`MIN_TOKEN_LEN`]
    /// characters, which [`decode`](Self::decode) will reject.
    pub fn encode(&self, payload: &[u8]) -> Result<String, BrancaError> {
        self.encode_with_rng(payload, OsRng)
    }

    /// Seal `payload` into a new token, drawing the nonce from `rng`.
    pub fn encode_with_rng(
        &self,
        payload: &[u8],
        rng: impl TryCryptoRng,
    ) -> Result<String, BrancaError> {
        // wraps after 2106-02-07
        let timestamp = self.clock.now() as u32;
        self.encode_with_timestamp(payload, timestamp, rng)
    }

    /// Seal `payload` into a new token with an explicit creation time.
    pub fn encode_with_timestamp(
        &self,
        payload: &[u8],
        timestamp: u32,
        mut rng: impl TryCryptoRng,
    ) -> Result<String, BrancaError> {
        let key = self.key()?;

        let mut nonce = [0; NONCE_LEN];
        rng.try_fill_bytes(&mut nonce)
            .map_err(|_| BrancaError::RandomFailed)?;

        let header = Header::new(timestamp, nonce).to_bytes();
        let sealed = A::seal(key, &nonce, payload.to_vec(), &header)?;

        let mut token = Vec::with_capacity(HEADER_LEN + sealed.len());
        token.extend_from_slice(&header);
        token.extend_from_slice(&sealed);

        Ok(base62::encode(&token))
    }

    /// Authenticate and decrypt a token, returning its payload.
    ///
    /// Text shorter than [`MIN_TOKEN_LEN`] characters is rejected with
    /// [`BrancaError::InvalidToken`], which covers every empty-payload token.
    /// Base-62 conversion of valid text is quadratic in its length, so callers
    /// accepting tokens from untrusted sources should bound their size first.
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, BrancaError> {
        self.decode_with_timestamp(text).map(|token| token.payload)
    }

    /// Authenticate and decrypt a token, returning its payload and creation time.
    ///
    /// Expiration is only checked once the token is known to be authentic.
    pub fn decode_with_timestamp(&self, text: &str) -> Result<DecodedToken, BrancaError> {
        if text.len() < MIN_TOKEN_LEN {
            tracing::debug!(len = text.len(), "token shorter than {MIN_TOKEN_LEN} characters");
            return Err(BrancaError::InvalidToken);
        }

        let token = base62::decode(text).inspect_err(|_| {
            tracing::debug!("token is not valid base62");
        })?;
        let (raw_header, ciphertext) = Header::split(&token).ok_or_else(|| {
            tracing::debug!(len = token.len(), "token too short to hold a header");
            BrancaError::InvalidToken
        })?;

        let header = Header::from_bytes(raw_header);
        if header.version != VERSION {
            tracing::debug!(version = header.version, "unknown token version");
            return Err(BrancaError::InvalidTokenVersion {
                got: header.version,
                expected: VERSION,
            });
        }

        let key = self.key()?;
        let payload = A::open(key, &header.nonce, ciphertext.to_vec(), raw_header)
            .inspect_err(|_| tracing::trace!("token failed authentication"))?;

        validation::check_expiry(header.timestamp, self.ttl, self.clock.now())?;

        Ok(DecodedToken {
            payload,
            timestamp: header.timestamp,
        })
    }
}

impl<A, C: Clone> Clone for Branca<A, C> {
    fn clone(&self) -> Self {
        Branca {
            key: self.key.clone(),
            ttl: self.ttl,
            clock: self.clock.clone(),
            _aead: PhantomData,
        }
    }
}

impl<A, C: fmt::Debug> fmt::Debug for Branca<A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Branca")
            .field("key", &"[redacted]")
            .field("ttl", &self.ttl)
            .field("clock", &self.clock)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rand_core::impls::{next_u32_via_fill, next_u64_via_fill};

    use super::Branca;
    use crate::aead::{Aead, KEY_LEN, NONCE_LEN, TAG_LEN};
    use crate::clock::FixedClock;
    use crate::{BrancaError, base62};

    /// Keyed xor with a folded checksum. Not a cipher, but it authenticates
    /// every byte of its inputs, which is all these tests need.
    struct XorAead;

    fn checksum(key: &[u8], nonce: &[u8], aad: &[u8], ciphertext: &[u8]) -> [u8; TAG_LEN] {
        let mut tag = [0u8; TAG_LEN];
        let bytes = key.iter().chain(nonce).chain(aad).chain(ciphertext);
        for (i, b) in bytes.enumerate() {
            tag[i % TAG_LEN] = tag[i % TAG_LEN].rotate_left(3) ^ b;
        }
        tag
    }

    impl Aead for XorAead {
        fn seal(
            key: &[u8; KEY_LEN],
            nonce: &[u8; NONCE_LEN],
            mut buf: Vec<u8>,
            aad: &[u8],
        ) -> Result<Vec<u8>, BrancaError> {
            for (i, b) in buf.iter_mut().enumerate() {
                *b ^= key[i % KEY_LEN];
            }
            let tag = checksum(key, nonce, aad, &buf);
            buf.extend_from_slice(&tag);
            Ok(buf)
        }

        fn open(
            key: &[u8; KEY_LEN],
            nonce: &[u8; NONCE_LEN],
            mut buf: Vec<u8>,
            aad: &[u8],
        ) -> Result<Vec<u8>, BrancaError> {
            let split = buf.len().checked_sub(TAG_LEN).ok_or(BrancaError::CryptoError)?;
            let tag = buf.split_off(split);
            if checksum(key, nonce, aad, &buf)[..] != tag[..] {
                return Err(BrancaError::CryptoError);
            }
            for (i, b) in buf.iter_mut().enumerate() {
                *b ^= key[i % KEY_LEN];
            }
            Ok(buf)
        }
    }

    struct FixedNonce(u8);

    impl rand_core::RngCore for FixedNonce {
        fn next_u32(&mut self) -> u32 {
            next_u32_via_fill(self)
        }

        fn next_u64(&mut self) -> u64 {
            next_u64_via_fill(self)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(self.0);
        }
    }

    impl rand_core::CryptoRng for FixedNonce {}

    const KEY: &[u8; 32] = b"supersecretkeyyoushouldnotcommit";

    fn branca(now: i64) -> Branca<XorAead, FixedClock> {
        Branca::new(*KEY).with_clock(FixedClock(now))
    }

    #[test]
    fn round_trip() {
        let b = branca(1_700_000_000);
        for payload in [&b"Hello world!"[..], &[0; 1], &[0; 100], &[0xff; 3]] {
            let token = b.encode_with_rng(payload, FixedNonce(9)).unwrap();
            let decoded = b.decode_with_timestamp(&token).unwrap();
            assert_eq!(decoded.payload, payload);
            assert_eq!(decoded.timestamp, 1_700_000_000);
        }
    }

    #[test]
    fn binary_layout() {
        let b = branca(0x0102_0304);
        let token = b.encode_with_rng(b"abc", FixedNonce(0xee)).unwrap();

        let bytes = base62::decode(&token).unwrap();
        assert_eq!(bytes.len(), 29 + 3 + 16);
        assert_eq!(bytes[0], 0xBA);
        assert_eq!(bytes[1..5], [1, 2, 3, 4]);
        assert_eq!(bytes[5..29], [0xee; 24]);
    }

    #[test]
    fn deterministic_with_fixed_inputs() {
        let b = branca(1_000);
        let t1 = b.encode_with_rng(b"x", FixedNonce(1)).unwrap();
        let t2 = b.encode_with_rng(b"x", FixedNonce(1)).unwrap();
        let t3 = b.encode_with_rng(b"x", FixedNonce(2)).unwrap();
        let t4 = b.encode_with_timestamp(b"x", 1_001, FixedNonce(1)).unwrap();
        assert_eq!(t1, t2);
        assert_ne!(t1, t3);
        assert_ne!(t1, t4);
    }

    #[test]
    fn minimum_length() {
        let b = branca(0);
        let long = "z".repeat(61);
        for text in ["", "$", long.as_str()] {
            assert!(matches!(b.decode(text), Err(BrancaError::InvalidToken)));
        }
        let bad = format!("{}$", "z".repeat(70));
        assert!(matches!(b.decode(&bad), Err(BrancaError::InvalidToken)));
    }

    #[test]
    fn empty_payload_is_too_short() {
        let b = branca(1_700_000_000);
        let token = b.encode_with_rng(b"", FixedNonce(9)).unwrap();
        assert_eq!(token.len(), 61);
        assert!(matches!(b.decode(&token), Err(BrancaError::InvalidToken)));
    }

    #[test]
    fn version_checked_before_key() {
        let b = branca(0);
        let token = b.encode_with_rng(b"payload", FixedNonce(3)).unwrap();

        let mut bytes = base62::decode(&token).unwrap();
        for version in [0x00, 0x01, 0xB9, 0xBB, 0xFF] {
            bytes[0] = version;
            let text = base62::encode(&bytes);

            let err = b.decode(&text).unwrap_err();
            assert!(matches!(
                err,
                BrancaError::InvalidTokenVersion { got, expected: 0xBA } if got == version
            ));

            let short_key = Branca::<XorAead>::new(&b"short"[..]);
            assert!(matches!(
                short_key.decode(&text),
                Err(BrancaError::InvalidTokenVersion { .. })
            ));
        }
    }

    #[test]
    fn bad_key_length() {
        let token = branca(0).encode_with_rng(b"payload", FixedNonce(3)).unwrap();
        for key in [&b""[..], &[1; 31], &[1; 33]] {
            let b = Branca::<XorAead>::new(key);
            assert!(matches!(
                b.encode(b"payload"),
                Err(BrancaError::BadKeyLength(n)) if n == key.len()
            ));
            assert!(matches!(
                b.decode(&token),
                Err(BrancaError::BadKeyLength(n)) if n == key.len()
            ));
        }
    }

    #[test]
    fn tampered_header() {
        let b = branca(500);
        let token = b.encode_with_rng(b"payload", FixedNonce(4)).unwrap();
        let mut bytes = base62::decode(&token).unwrap();
        bytes[4] ^= 1;
        let text = base62::encode(&bytes);
        assert!(matches!(b.decode(&text), Err(BrancaError::CryptoError)));
    }

    #[test]
    fn expiry_after_authentication() {
        let token = branca(1_000)
            .encode_with_rng(b"payload", FixedNonce(5))
            .unwrap();

        let fresh = branca(1_010).with_ttl(10);
        assert_eq!(fresh.decode(&token).unwrap(), b"payload");

        let stale = branca(1_011).with_ttl(10);
        let err = stale.decode(&token).unwrap_err();
        assert!(matches!(
            err,
            BrancaError::ExpiredToken {
                expiry: 1_010,
                now: 1_011
            }
        ));

        let mut no_ttl = branca(1_000_000);
        assert_eq!(no_ttl.ttl(), 0);
        no_ttl.decode(&token).unwrap();
        no_ttl.set_ttl(10);
        assert!(no_ttl.decode(&token).is_err());

        // a forged expired token is reported as forged
        let mut bytes = base62::decode(&token).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x80;
        let forged = base62::encode(&bytes);
        assert!(matches!(stale.decode(&forged), Err(BrancaError::CryptoError)));
    }

    #[test]
    fn debug_redacts_key() {
        let debug = format!("{:?}", branca(0));
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("redacted"));
    }
}
