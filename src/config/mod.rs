use std::env;
use std::net::SocketAddr;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::security_headers;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_JWT_TTL_HOURS: i64 = 24;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/entrada".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .unwrap_or_else(|_| {
                tracing::warn!("Invalid BIND_ADDR, falling back to {}", DEFAULT_BIND_ADDR);
                DEFAULT_BIND_ADDR.parse().expect("default bind addr parses")
            });

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using insecure development secret");
            "entrada-dev-secret-do-not-use-in-production".to_string()
        });

        let jwt_ttl_hours = env::var("JWT_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_JWT_TTL_HOURS);

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Self {
            database_url,
            bind_addr,
            jwt_secret,
            jwt_ttl_hours,
            max_connections,
        }
    }
}
