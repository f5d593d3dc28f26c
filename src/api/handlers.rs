//! API Handlers
//!
//! HTTP request handlers for each endpoint. Handlers only translate between
//! HTTP and the services; identity comes from the path or body since token
//! issuance lives outside this server.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use crate::cache::{CacheAsideStore, FastStore};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    HealthResponse, NewProblem, NewUser, Problem, ProblemFilter, ProblemUpdate, ProfileUpdate,
    StatsResponse, Submission, SubmitRequest, User, UserId, UserProfile,
};
use crate::repository::{
    InMemoryProblemRepository, InMemorySubmissionRepository, InMemoryUserRepository,
};
use crate::services::{ProblemService, UserService};

const HEALTH_CHECK_KEY: &str = "health_check";
const HEALTH_CHECK_VALUE: &str = "ok";

/// Application state shared across all handlers.
///
/// The cache is built once and handed to every service that needs it.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheAsideStore>,
    pub users: UserService,
    pub problems: ProblemService,
    pub health_check_ttl: Duration,
}

impl AppState {
    /// Wires in-memory repositories and the given cache into the services.
    pub fn new(cache: CacheAsideStore, config: &Config) -> Self {
        let cache = Arc::new(cache);
        let users = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            cache.clone(),
            config.user_profile_ttl(),
        );
        let problems = ProblemService::new(
            Arc::new(InMemoryProblemRepository::new()),
            Arc::new(InMemorySubmissionRepository::new()),
            cache.clone(),
            config.problem_ttl(),
        );

        Self {
            cache,
            users,
            problems,
            health_check_ttl: config.health_check_ttl(),
        }
    }

    /// Creates a new AppState with a fresh in-memory cache.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheAsideStore::in_memory(), config)
    }
}

// == Users ==

/// Handler for POST /users/register
pub async fn register_handler(
    State(state): State<AppState>,
    Json(req): Json<NewUser>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.users.register(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for GET /users/:id/profile
pub async fn get_profile_handler(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<UserProfile>> {
    state
        .users
        .get_user_profile(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

/// Handler for PATCH /users/:id/profile
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(req): Json<ProfileUpdate>,
) -> Result<Json<User>> {
    state
        .users
        .update_user_profile(user_id, req)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

/// Handler for GET /users/:id/submissions
pub async fn user_submissions_handler(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Submission>>> {
    Ok(Json(state.problems.get_user_submissions(user_id).await?))
}

// == Problems ==

/// Handler for GET /problems?difficulty=&tag=
pub async fn list_problems_handler(
    State(state): State<AppState>,
    Query(filter): Query<ProblemFilter>,
) -> Result<Json<Vec<Problem>>> {
    Ok(Json(state.problems.list_problems(&filter).await?))
}

/// Handler for POST /problems
pub async fn create_problem_handler(
    State(state): State<AppState>,
    Json(req): Json<NewProblem>,
) -> Result<(StatusCode, Json<Problem>)> {
    let problem = state.problems.create_problem(req).await?;
    Ok((StatusCode::CREATED, Json(problem)))
}

/// Handler for GET /problems/:slug
pub async fn get_problem_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Problem>> {
    state
        .problems
        .get_problem_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))
}

/// Handler for PUT /problems/:slug
pub async fn update_problem_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<ProblemUpdate>,
) -> Result<Json<Problem>> {
    state
        .problems
        .update_problem(&slug, req)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))
}

/// Handler for POST /submissions
pub async fn submit_handler(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<Submission>)> {
    let submission = req.validate().map_err(AppError::Validation)?;

    state
        .problems
        .create_submission(submission)
        .await?
        .map(|s| (StatusCode::CREATED, Json(s)))
        .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))
}

// == Operations ==

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
///
/// Writes a probe key to the fast store and reads it back.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let probe = probe_cache(state.cache.store(), state.health_check_ttl).await;
    if let Err(err) = &probe {
        warn!(error = %err, "Health check: cache probe failed");
    }
    Json(HealthResponse::from_probe(probe))
}

async fn probe_cache<S: FastStore>(store: &S, ttl: Duration) -> std::result::Result<(), String> {
    store
        .set(HEALTH_CHECK_KEY, HEALTH_CHECK_VALUE.to_string(), ttl)
        .await
        .map_err(|e| e.to_string())?;

    match store.get(HEALTH_CHECK_KEY).await.map_err(|e| e.to_string())? {
        Some(value) if value == HEALTH_CHECK_VALUE => Ok(()),
        _ => Err("probe value not read back".to_string()),
    }
}
