use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Serialize;
use uuid::Uuid;

use crate::models::User;
use crate::repositories;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Serialize)]
pub struct UserWithRoles {
    #[serde(flatten)]
    pub user: User,
    pub roles: Vec<String>,
}

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = repositories::users::find_all(&state.pool).await?;
    Ok(success(users, "Users retrieved"))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = repositories::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id}")))?;
    let roles = repositories::users::role_names(&state.pool, id).await?;
    Ok(success(UserWithRoles { user, roles }, "User retrieved"))
}
