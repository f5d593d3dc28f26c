//! Configuration Module
//!
//! Handles loading server and cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Longest accepted cache TTL, in seconds (one year)
pub const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// How long a cached user profile stays fresh, in seconds
    pub user_profile_ttl: u64,
    /// How long a cached problem stays fresh, in seconds
    pub problem_ttl: u64,
    /// TTL of the key written by the health probe, in seconds
    pub health_check_ttl: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `USER_PROFILE_TTL` - Profile cache TTL in seconds (default: 300)
    /// - `PROBLEM_TTL` - Problem cache TTL in seconds (default: 600)
    /// - `HEALTH_CHECK_TTL` - Health probe TTL in seconds (default: 10)
    ///
    /// A TTL of zero or above [`MAX_TTL_SECS`] is rejected in favour of the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_parse("SERVER_PORT").unwrap_or(defaults.server_port),
            user_profile_ttl: env_ttl("USER_PROFILE_TTL").unwrap_or(defaults.user_profile_ttl),
            problem_ttl: env_ttl("PROBLEM_TTL").unwrap_or(defaults.problem_ttl),
            health_check_ttl: env_ttl("HEALTH_CHECK_TTL").unwrap_or(defaults.health_check_ttl),
        }
    }

    pub fn user_profile_ttl(&self) -> Duration {
        Duration::from_secs(self.user_profile_ttl)
    }

    pub fn problem_ttl(&self) -> Duration {
        Duration::from_secs(self.problem_ttl)
    }

    pub fn health_check_ttl(&self) -> Duration {
        Duration::from_secs(self.health_check_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8000,
            user_profile_ttl: 300,
            problem_ttl: 600,
            health_check_ttl: 10,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_ttl(name: &str) -> Option<u64> {
    env_parse::<u64>(name).filter(|ttl| (1..=MAX_TTL_SECS).contains(ttl))
}
