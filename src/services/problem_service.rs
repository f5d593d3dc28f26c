//! Problem Service
//!
//! Catalog listing, cached lookup by slug, catalog edits and submissions.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{CacheAsideStore, Lookup};
use crate::error::{AppError, Result};
use crate::models::problem::validate_slug;
use crate::models::{
    NewProblem, NewSubmission, Problem, ProblemFilter, ProblemUpdate, Submission, UserId,
    ValidSubmission,
};
use crate::repository::{ProblemRepository, SubmissionRepository};

/// Cache key of a problem looked up by slug.
pub fn problem_key(slug: &str) -> String {
    format!("problem:{}", slug)
}

#[derive(Clone)]
pub struct ProblemService {
    problems: Arc<dyn ProblemRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    cache: Arc<CacheAsideStore>,
    problem_ttl: Duration,
}

impl ProblemService {
    pub fn new(
        problems: Arc<dyn ProblemRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        cache: Arc<CacheAsideStore>,
        problem_ttl: Duration,
    ) -> Self {
        Self {
            problems,
            submissions,
            cache,
            problem_ttl,
        }
    }

    /// Lists problems matching `filter`. Not cached.
    pub async fn list_problems(&self, filter: &ProblemFilter) -> Result<Vec<Problem>> {
        Ok(self.problems.list(filter).await?)
    }

    // == Get By Slug ==
    /// Cached lookup. A slug no problem could have is reported as absent.
    pub async fn get_problem_by_slug(&self, slug: &str) -> Result<Option<Problem>> {
        if validate_slug(slug).is_some() {
            return Ok(None);
        }

        let problems = Arc::clone(&self.problems);
        let owned_slug = slug.to_string();
        let loader = || async move {
            let problem = problems.get_by_slug(&owned_slug).await?;
            Ok::<_, AppError>(Lookup::from(problem))
        };

        self.cache
            .get(&problem_key(slug), loader, self.problem_ttl)
            .await
    }

    pub async fn create_problem(&self, new_problem: NewProblem) -> Result<Problem> {
        if let Some(msg) = new_problem.validate() {
            return Err(AppError::Validation(msg));
        }

        let problem = self.problems.create(new_problem).await?;
        info!(problem_id = problem.id, slug = %problem.slug, "Problem created");
        Ok(problem)
    }

    // == Update ==
    /// Writes the update, then drops the cached copy.
    pub async fn update_problem(&self, slug: &str, update: ProblemUpdate) -> Result<Option<Problem>> {
        if let Some(msg) = update.validate() {
            return Err(AppError::Validation(msg));
        }

        let Some(problem) = self.problems.update_by_slug(slug, update).await? else {
            return Ok(None);
        };

        self.cache.invalidate(&problem_key(slug)).await?;
        info!(problem_id = problem.id, slug, "Problem updated");
        Ok(Some(problem))
    }

    // == Submit ==
    /// Records a pending submission. Returns None if the problem does not exist.
    pub async fn create_submission(&self, submission: ValidSubmission) -> Result<Option<Submission>> {
        let Some(problem) = self.problems.get(submission.problem_id).await? else {
            return Ok(None);
        };

        let created = self
            .submissions
            .create(NewSubmission {
                user_id: submission.user_id,
                problem_id: problem.id,
                problem_title: problem.title,
                code: submission.code,
                language: submission.language,
            })
            .await?;

        info!(
            submission_id = created.id,
            user_id = created.user_id,
            problem_id = created.problem_id,
            "Submission received"
        );
        Ok(Some(created))
    }

    pub async fn get_user_submissions(&self, user_id: UserId) -> Result<Vec<Submission>> {
        Ok(self.submissions.list_for_user(user_id).await?)
    }
}
