use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::AccountError,
    state::AppState,
    users::{
        dto::{
            LoginRequest, LoginResponse, PatchUserRequest, PublicUser, RegisterRequest,
            ReplaceUserRequest,
        },
        extract::Json as JsonBody,
        repo_types::UserSummary,
        services,
    },
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", put(replace_user).patch(patch_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, &'static str), AccountError> {
    services::register(&state, payload).await?;
    Ok((StatusCode::CREATED, "User registered successfully."))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AccountError> {
    let user = services::authenticate(&state, payload).await?;
    Ok(Json(LoginResponse {
        message: "Login successful.",
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
    }))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, AccountError> {
    Ok(Json(services::list_users(&state).await?))
}

#[instrument(skip(state, payload))]
pub async fn replace_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<ReplaceUserRequest>,
) -> Result<&'static str, AccountError> {
    services::replace_user(&state, id, payload).await?;
    Ok("User fully updated.")
}

#[instrument(skip(state, payload))]
pub async fn patch_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<PatchUserRequest>,
) -> Result<&'static str, AccountError> {
    services::patch_user(&state, id, payload).await?;
    Ok("User partially updated.")
}
