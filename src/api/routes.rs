//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_problem_handler, get_problem_handler, get_profile_handler, health_handler,
    list_problems_handler, register_handler, stats_handler, submit_handler,
    update_problem_handler, update_profile_handler, user_submissions_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /users/register` - Create an account
/// - `GET /users/:id/profile` - Cached profile lookup
/// - `PATCH /users/:id/profile` - Update profile, invalidating the cache
/// - `GET /users/:id/submissions` - A user's submissions
/// - `GET /problems` - List problems (`difficulty`, `tag` filters)
/// - `POST /problems` - Add a problem
/// - `GET /problems/:slug` - Cached problem lookup
/// - `PUT /problems/:slug` - Update problem, invalidating the cache
/// - `POST /submissions` - Submit a solution
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/users/register", post(register_handler))
        .route(
            "/users/:id/profile",
            get(get_profile_handler).patch(update_profile_handler),
        )
        .route("/users/:id/submissions", get(user_submissions_handler))
        .route(
            "/problems",
            get(list_problems_handler).post(create_problem_handler),
        )
        .route(
            "/problems/:slug",
            get(get_problem_handler).put(update_problem_handler),
        )
        .route("/submissions", post(submit_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
