use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub roles: Vec<Role>,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue_token(
    secret: &str,
    ttl_hours: i64,
    user_id: Uuid,
    username: &str,
    roles: &[Role],
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        roles: roles.to_vec(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Auth(format!("Failed to issue token: {e}")))
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Auth("Invalid or expired token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trip_preserves_claims() {
        let user_id = Uuid::new_v4();
        let token =
            issue_token(SECRET, 1, user_id, "alice", &[Role::User, Role::Admin]).unwrap();

        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.roles, vec![Role::User, Role::Admin]);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token(SECRET, 1, Uuid::new_v4(), "alice", &[Role::User]).unwrap();
        assert!(verify_token("another-secret", &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative TTL puts exp in the past, beyond the default leeway.
        let token = issue_token(SECRET, -2, Uuid::new_v4(), "alice", &[Role::User]).unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }
}
