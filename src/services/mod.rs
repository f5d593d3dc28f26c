//! Services Module
//!
//! Business logic between the HTTP handlers and the repositories.

mod problem_service;
mod user_service;

pub use problem_service::{problem_key, ProblemService};
pub use user_service::{profile_key, UserService};
