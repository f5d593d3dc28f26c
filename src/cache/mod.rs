//! Cache Module
//!
//! Read-through caching with time-based expiry and explicit invalidation.

mod aside;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use aside::{CacheAsideStore, Lookup};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::{FastStore, MemoryStore};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
