//! Repository Module
//!
//! Authoritative record stores. The cache only ever holds copies of what
//! these return; on any disagreement the repository wins.

mod problem;
mod user;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{
    NewProblem, NewSubmission, NewUser, Problem, ProblemFilter, ProblemId, ProblemUpdate,
    ProfileUpdate, Submission, User, UserId,
};

pub use problem::{InMemoryProblemRepository, InMemorySubmissionRepository};
pub use user::InMemoryUserRepository;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Account storage. Usernames and emails are unique.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> StorageResult<User>;

    async fn get(&self, id: UserId) -> StorageResult<Option<User>>;

    /// Applies `update` and returns the stored result, or None if absent.
    async fn update(&self, id: UserId, update: ProfileUpdate) -> StorageResult<Option<User>>;
}

/// Problem catalog storage. Slugs are unique.
#[async_trait]
pub trait ProblemRepository: Send + Sync {
    async fn create(&self, new_problem: NewProblem) -> StorageResult<Problem>;

    async fn get(&self, id: ProblemId) -> StorageResult<Option<Problem>>;

    async fn get_by_slug(&self, slug: &str) -> StorageResult<Option<Problem>>;

    /// Problems matching `filter`, newest first.
    async fn list(&self, filter: &ProblemFilter) -> StorageResult<Vec<Problem>>;

    async fn update_by_slug(&self, slug: &str, update: ProblemUpdate)
        -> StorageResult<Option<Problem>>;
}

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, new_submission: NewSubmission) -> StorageResult<Submission>;

    /// Submissions by `user_id`, newest first.
    async fn list_for_user(&self, user_id: UserId) -> StorageResult<Vec<Submission>>;
}
