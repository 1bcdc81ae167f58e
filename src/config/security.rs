use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use std::env;

const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";
const CSP_API_VALUE: &str = "default-src 'none'; frame-ancestors 'none'";

static HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    ("content-security-policy", CSP_API_VALUE),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("permissions-policy", "geolocation=(), microphone=(), camera=()"),
];

/// Adds baseline security response headers. HSTS is only emitted in
/// production (HTTPS environments), keyed off `RUST_ENV`.
pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    if hsts_enabled() {
        headers.insert(
            HeaderName::from_static("strict-transport-security"),
            HeaderValue::from_static(HSTS_VALUE),
        );
    }

    response
}

fn hsts_enabled() -> bool {
    env::var("RUST_ENV")
        .map(|v| v.to_lowercase() == "production")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_header_values_parse() {
        for (name, value) in HEADERS {
            assert!(name.parse::<HeaderName>().is_ok());
            assert!(value.parse::<HeaderValue>().is_ok());
        }
        assert!(HSTS_VALUE.parse::<HeaderValue>().is_ok());
    }
}
