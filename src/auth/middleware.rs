use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::policy::{authorize, Access};
use crate::auth::{jwt, AuthContext};
use crate::state::AppState;
use crate::utils::error::AppError;

/// Validates the bearer token (when present) and enforces the route policy.
/// On success a verified [`AuthContext`] is attached for handlers that need
/// the caller's identity.
pub async fn require_authorization(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = bearer_token(&req)
        .and_then(|token| jwt::verify_token(&state.config.jwt_secret, token).ok());

    let roles = claims.as_ref().map(|c| c.roles.as_slice());
    match authorize(req.method(), req.uri().path(), roles) {
        Access::Granted => {}
        Access::Unauthorized => {
            return Err(AppError::Auth("Missing or invalid bearer token".to_string()))
        }
        Access::Forbidden => {
            return Err(AppError::Forbidden(
                "Insufficient role for this operation".to_string(),
            ))
        }
    }

    if let Some(claims) = claims {
        req.extensions_mut().insert(AuthContext {
            user_id: claims.sub,
            username: claims.username,
            roles: claims.roles,
        });
    }

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
