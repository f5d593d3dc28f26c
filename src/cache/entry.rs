//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::CacheError;

// == Cache Entry ==
/// A serialized value plus the instant it stops being served.
///
/// Entries are immutable snapshots: a repopulate replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value (serialized JSON)
    pub value: String,
    /// When the entry expires
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl` from now.
    ///
    /// Fails with `InvalidTtl` if the expiry instant is not representable.
    pub fn new(value: String, ttl: Duration) -> Result<Self, CacheError> {
        let expires_at = expiry_from_now(ttl)?;
        Ok(Self { value, expires_at })
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration instant, so a TTL of `T` serves for strictly less than `T`.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

}

/// The instant `ttl` from now, or `InvalidTtl` if it overflows the clock.
pub(crate) fn expiry_from_now(ttl: Duration) -> Result<Instant, CacheError> {
    Instant::now()
        .checked_add(ttl)
        .ok_or_else(|| CacheError::InvalidTtl(format!("TTL of {:?} is out of range", ttl)))
}
