//! CodeMentor - backend for accounts, a problem catalog and submissions
//!
//! Profile and problem lookups are served through a read-through cache with
//! time-based expiry and explicit invalidation on writes.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use api::AppState;
pub use cache::{CacheAsideStore, Lookup};
pub use config::Config;
