//! Problem catalog and submission records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

pub type ProblemId = u64;
pub type SubmissionId = u64;

/// Default language for submissions that do not name one
pub const DEFAULT_LANGUAGE: &str = "python";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A worked input/output pair shown with the problem statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub input: String,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A data-structures and algorithms problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: ProblemId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub examples: Vec<Example>,
    pub constraints: String,
    pub starter_code: String,
    pub solution: String,
    pub hints: Vec<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProblem {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub constraints: String,
    #[serde(default)]
    pub starter_code: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub hints: Vec<String>,
    pub created_by: UserId,
}

impl NewProblem {
    /// Validates the problem data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.title.trim().is_empty() {
            return Some("Title cannot be empty".to_string());
        }
        validate_slug(&self.slug)
    }
}

/// Partial problem update; the slug is the lookup key and is not updatable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProblemUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub tags: Option<Vec<String>>,
    pub examples: Option<Vec<Example>>,
    pub constraints: Option<String>,
    pub starter_code: Option<String>,
    pub solution: Option<String>,
    pub hints: Option<Vec<String>>,
}

impl ProblemUpdate {
    pub fn validate(&self) -> Option<String> {
        match &self.title {
            Some(title) if title.trim().is_empty() => Some("Title cannot be empty".to_string()),
            _ => None,
        }
    }

    pub fn apply(self, problem: &mut Problem) {
        if let Some(title) = self.title {
            problem.title = title;
        }
        if let Some(description) = self.description {
            problem.description = description;
        }
        if let Some(difficulty) = self.difficulty {
            problem.difficulty = difficulty;
        }
        if let Some(tags) = self.tags {
            problem.tags = tags;
        }
        if let Some(examples) = self.examples {
            problem.examples = examples;
        }
        if let Some(constraints) = self.constraints {
            problem.constraints = constraints;
        }
        if let Some(starter_code) = self.starter_code {
            problem.starter_code = starter_code;
        }
        if let Some(solution) = self.solution {
            problem.solution = solution;
        }
        if let Some(hints) = self.hints {
            problem.hints = hints;
        }
    }
}

/// Catalog filter; every present field must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProblemFilter {
    pub difficulty: Option<Difficulty>,
    #[serde(alias = "tags")]
    pub tag: Option<String>,
}

impl ProblemFilter {
    pub fn matches(&self, problem: &Problem) -> bool {
        let difficulty_ok = self.difficulty.map_or(true, |d| problem.difficulty == d);
        let tag_ok = self
            .tag
            .as_ref()
            .map_or(true, |tag| problem.tags.iter().any(|t| t == tag));
        difficulty_ok && tag_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Accepted,
    WrongAnswer,
    Error,
}

/// A user's attempt at a problem. Evaluation happens elsewhere; new
/// submissions are always `Pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub user_id: UserId,
    pub problem_id: ProblemId,
    pub problem_title: String,
    pub code: String,
    pub language: String,
    pub status: SubmissionStatus,
    pub runtime: Option<u32>,
    pub memory: Option<u32>,
    pub error_message: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user_id: UserId,
    pub problem_id: ProblemId,
    pub problem_title: String,
    pub code: String,
    pub language: String,
}

/// Longest accepted problem slug
pub const MAX_SLUG_LENGTH: usize = 50;

/// Returns an error message if `slug` cannot name a problem.
pub fn validate_slug(slug: &str) -> Option<String> {
    if slug.len() > MAX_SLUG_LENGTH {
        return Some(format!("Slug exceeds maximum length of {} characters", MAX_SLUG_LENGTH));
    }
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        None
    } else {
        Some(format!(
            "Invalid slug '{}': use lowercase letters, digits and '-'",
            slug
        ))
    }
}
