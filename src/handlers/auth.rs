use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{jwt, password, Role};
use crate::repositories;
use crate::repositories::users::NewUser;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    if repositories::users::find_by_username(&state.pool, &payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::Duplicate(format!(
            "Username '{}'",
            payload.username
        )));
    }
    if repositories::users::find_by_email(&state.pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Duplicate(format!("Email '{}'", payload.email)));
    }

    let password_hash = password::hash_password(&payload.password)?;

    let user = repositories::users::create(
        &state.pool,
        NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
        },
    )
    .await?;

    repositories::users::assign_role(&state.pool, user.id, Role::User.as_str()).await?;

    let roles = vec![Role::User];
    let token = jwt::issue_token(
        &state.config.jwt_secret,
        state.config.jwt_ttl_hours,
        user.id,
        &user.username,
        &roles,
    )?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(created(
        AuthResponse {
            token,
            username: user.username,
            email: user.email,
            roles,
        },
        "User registered",
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Same error for an unknown username and a bad password.
    let user = repositories::users::find_by_username(&state.pool, &payload.username)
        .await?
        .ok_or_else(|| AppError::Auth("Invalid username or password".to_string()))?;

    if !password::verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::Auth("Invalid username or password".to_string()));
    }

    let roles: Vec<Role> = repositories::users::role_names(&state.pool, user.id)
        .await?
        .iter()
        .filter_map(|name| Role::parse(name))
        .collect();

    let token = jwt::issue_token(
        &state.config.jwt_secret,
        state.config.jwt_ttl_hours,
        user.id,
        &user.username,
        &roles,
    )?;

    Ok(success(
        AuthResponse {
            token,
            username: user.username,
            email: user.email,
            roles,
        },
        "Login successful",
    ))
}
