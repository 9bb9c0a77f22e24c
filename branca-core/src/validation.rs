//! Token freshness.

use crate::BrancaError;

/// Check a token created at `timestamp` against a TTL at time `now`.
///
/// A `ttl` of zero disables the check. Tokens are still valid in the second
/// they expire.
pub fn check_expiry(timestamp: u32, ttl: u32, now: i64) -> Result<(), BrancaError> {
    if ttl == 0 {
        return Ok(());
    }

    let expiry = i64::from(timestamp) + i64::from(ttl);
    if expiry < now {
        tracing::debug!(expiry, now, "token expired");
        return Err(BrancaError::ExpiredToken { expiry, now });
    }

    Ok(())
}
