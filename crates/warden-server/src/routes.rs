use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use warden_core::password::hash_password;
use warden_core::registry;
use warden_core::user::{safe_views, SafeUser, User};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the service router. CORS is permissive: the service fronts a
/// browser client on another origin.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/admins", get(list_admins).post(create_admin))
        .route("/admins/{username}", delete(delete_admin))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Missing body fields deserialize to empty strings so validation can
/// answer 400 "missing fields" instead of a framework rejection.
#[derive(Debug, Deserialize)]
struct CreateUserRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
struct SuccessResponse {
    success: bool,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    success: bool,
    name: String,
}

fn require_fields(fields: &[&str]) -> Result<(), ApiError> {
    if fields.iter().any(|f| f.is_empty()) {
        return Err(ApiError::missing_fields());
    }
    Ok(())
}

/// Shared by /register and POST /admins: both append to the same
/// collection; only the success status differs.
async fn insert_user(state: &AppState, req: CreateUserRequest) -> Result<(), ApiError> {
    require_fields(&[&req.username, &req.password, &req.name])?;

    // Write guard held across the whole load-transform-save.
    let _guard = state.guard.write().await;
    let users = state.store.load().await?;
    let user = User {
        username: req.username,
        password_hash: hash_password(&req.password)?,
        name: req.name,
    };
    let users = registry::insert(users, user)?;
    state.store.save(&users).await?;
    Ok(())
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    insert_user(&state, req).await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let users = {
        let _guard = state.guard.read().await;
        state.store.load().await?
    };

    match registry::verify_credentials(&users, &req.username, &req.password) {
        Some(user) => Ok(Json(LoginResponse {
            success: true,
            name: user.name.clone(),
        })),
        None => Err(ApiError::invalid_credentials()),
    }
}

async fn list_admins(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SafeUser>>, ApiError> {
    let users = {
        let _guard = state.guard.read().await;
        state.store.load().await?
    };
    Ok(Json(safe_views(&users)))
}

async fn create_admin(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<SuccessResponse>), ApiError> {
    insert_user(&state, req).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse { success: true })))
}

async fn delete_admin(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let _guard = state.guard.write().await;
    let users = state.store.load().await?;
    let users = registry::remove(users, &username)?;
    state.store.save(&users).await?;
    Ok(Json(SuccessResponse { success: true }))
}
