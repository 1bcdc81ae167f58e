use std::env;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

const DEFAULT_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:5173"];

const PREFLIGHT_MAX_AGE_SECS: u64 = 3600;

/// CORS policy for the API. Origins come from `CORS_ALLOWED_ORIGINS`
/// (comma separated). Credentials are only allowed against an explicit
/// origin list; with no usable configuration the layer falls back to
/// any-origin without credentials, which is acceptable in development only.
pub fn create_cors_layer() -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(PREFLIGHT_MAX_AGE_SECS));

    match allowed_origins() {
        Some(origins) => base
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true),
        None => {
            tracing::warn!("No valid CORS origins configured, allowing any origin");
            base.allow_origin(AllowOrigin::any())
        }
    }
}

fn allowed_origins() -> Option<Vec<HeaderValue>> {
    let configured = env::var("CORS_ALLOWED_ORIGINS").ok();
    let candidates: Vec<&str> = match &configured {
        Some(list) => list.split(',').map(str::trim).collect(),
        None => DEFAULT_ORIGINS.to_vec(),
    };

    let mut origins = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if candidate.is_empty() {
            continue;
        }
        match candidate.parse::<HeaderValue>() {
            Ok(value) => origins.push(value),
            Err(_) => tracing::warn!(origin = candidate, "Ignoring invalid CORS origin"),
        }
    }

    if origins.is_empty() {
        None
    } else {
        Some(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_origins_are_valid_header_values() {
        for origin in DEFAULT_ORIGINS {
            assert!(origin.parse::<HeaderValue>().is_ok());
        }
    }
}
