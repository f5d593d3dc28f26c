//! Request DTOs for the API
//!
//! Defines the structure of incoming HTTP request bodies that do not map
//! one-to-one onto a record.

use serde::Deserialize;

use super::problem::{ProblemId, DEFAULT_LANGUAGE};
use super::user::UserId;

/// Request body for POST /submissions
///
/// `problem_id` and `code` are optional at the wire level so a missing field
/// becomes a 400 with a message rather than a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    pub user_id: UserId,
    #[serde(default)]
    pub problem_id: Option<ProblemId>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// A submit request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    pub user_id: UserId,
    pub problem_id: ProblemId,
    pub code: String,
    pub language: String,
}

impl SubmitRequest {
    /// Validates the request, filling in the default language.
    pub fn validate(self) -> Result<ValidSubmission, String> {
        let (problem_id, code) = match (self.problem_id, self.code) {
            (Some(problem_id), Some(code)) if problem_id != 0 && !code.is_empty() => {
                (problem_id, code)
            }
            _ => return Err("problem_id and code are required".to_string()),
        };
        let language = self
            .language
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Ok(ValidSubmission {
            user_id: self.user_id,
            problem_id,
            code,
            language,
        })
    }
}
