use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ProblemRepository, StorageResult, SubmissionRepository};
use crate::error::StorageError;
use crate::models::{
    NewProblem, NewSubmission, Problem, ProblemFilter, ProblemId, ProblemUpdate, Submission,
    SubmissionId, SubmissionStatus, UserId,
};

#[derive(Debug, Default)]
struct Problems {
    next_id: ProblemId,
    rows: HashMap<ProblemId, Problem>,
}

/// Problem catalog held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryProblemRepository {
    problems: RwLock<Problems>,
}

impl InMemoryProblemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProblemRepository for InMemoryProblemRepository {
    async fn create(&self, new_problem: NewProblem) -> StorageResult<Problem> {
        let mut problems = self.problems.write().await;
        if problems.rows.values().any(|p| p.slug == new_problem.slug) {
            return Err(StorageError::Conflict(format!(
                "Problem with slug '{}' already exists",
                new_problem.slug
            )));
        }

        problems.next_id += 1;
        let now = Utc::now();
        let problem = Problem {
            id: problems.next_id,
            title: new_problem.title,
            slug: new_problem.slug,
            description: new_problem.description,
            difficulty: new_problem.difficulty,
            tags: new_problem.tags,
            examples: new_problem.examples,
            constraints: new_problem.constraints,
            starter_code: new_problem.starter_code,
            solution: new_problem.solution,
            hints: new_problem.hints,
            created_by: new_problem.created_by,
            created_at: now,
            updated_at: now,
        };
        problems.rows.insert(problem.id, problem.clone());
        Ok(problem)
    }

    async fn get(&self, id: ProblemId) -> StorageResult<Option<Problem>> {
        Ok(self.problems.read().await.rows.get(&id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> StorageResult<Option<Problem>> {
        let problems = self.problems.read().await;
        Ok(problems.rows.values().find(|p| p.slug == slug).cloned())
    }

    async fn list(&self, filter: &ProblemFilter) -> StorageResult<Vec<Problem>> {
        let problems = self.problems.read().await;
        let mut matching: Vec<Problem> = problems
            .rows
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        // Ids are monotonic, so they break ties between equal timestamps
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matching)
    }

    async fn update_by_slug(
        &self,
        slug: &str,
        update: ProblemUpdate,
    ) -> StorageResult<Option<Problem>> {
        let mut problems = self.problems.write().await;
        let Some(problem) = problems.rows.values_mut().find(|p| p.slug == slug) else {
            return Ok(None);
        };

        update.apply(problem);
        problem.updated_at = Utc::now();
        Ok(Some(problem.clone()))
    }
}

#[derive(Debug, Default)]
struct Submissions {
    next_id: SubmissionId,
    rows: Vec<Submission>,
}

/// Submission log held in process memory.
#[derive(Debug, Default)]
pub struct InMemorySubmissionRepository {
    submissions: RwLock<Submissions>,
}

impl InMemorySubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn create(&self, new_submission: NewSubmission) -> StorageResult<Submission> {
        let mut submissions = self.submissions.write().await;
        submissions.next_id += 1;
        let submission = Submission {
            id: submissions.next_id,
            user_id: new_submission.user_id,
            problem_id: new_submission.problem_id,
            problem_title: new_submission.problem_title,
            code: new_submission.code,
            language: new_submission.language,
            status: SubmissionStatus::Pending,
            runtime: None,
            memory: None,
            error_message: String::new(),
            submitted_at: Utc::now(),
        };
        submissions.rows.push(submission.clone());
        Ok(submission)
    }

    async fn list_for_user(&self, user_id: UserId) -> StorageResult<Vec<Submission>> {
        let submissions = self.submissions.read().await;
        // Rows are appended in submission order
        Ok(submissions
            .rows
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }
}
