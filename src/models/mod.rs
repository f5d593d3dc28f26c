//! Records and DTOs
//!
//! Domain records owned by the repositories, plus the request and response
//! bodies of the HTTP API.

pub mod problem;
pub mod requests;
pub mod responses;
pub mod user;

// Re-export commonly used types
pub use problem::{
    Difficulty, Example, NewProblem, NewSubmission, Problem, ProblemFilter, ProblemId,
    ProblemUpdate, Submission, SubmissionId, SubmissionStatus, DEFAULT_LANGUAGE,
};
pub use requests::{SubmitRequest, ValidSubmission};
pub use responses::{HealthResponse, StatsResponse};
pub use user::{NewUser, ProfileUpdate, User, UserId, UserProfile};
