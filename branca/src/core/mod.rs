mod seal;

/// IETF XChaCha20-Poly1305 from RustCrypto.
#[derive(Clone, Copy, Debug, Default)]
pub struct XChaCha20Poly1305;
