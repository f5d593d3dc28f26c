//! Response DTOs for the API
//!
//! Defines the structure of outgoing HTTP response bodies that are not plain
//! records.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub not_found: u64,
    pub invalidations: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            loads: stats.loads,
            not_found: stats.not_found,
            invalidations: stats.invalidations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// "connected" or an error description
    pub cache: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Builds the response from the outcome of the cache probe.
    pub fn from_probe(probe: Result<(), String>) -> Self {
        let (status, cache) = match probe {
            Ok(()) => ("healthy", "connected".to_string()),
            Err(err) => ("unhealthy", format!("error: {}", err)),
        };
        Self {
            status: status.to_string(),
            cache,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
