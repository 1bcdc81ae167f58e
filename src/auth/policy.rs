use axum::http::Method;

use crate::auth::Role;

/// Outcome of an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// No (valid) credentials were presented but the route needs them.
    Unauthorized,
    /// Credentials are valid but lack the required role.
    Forbidden,
}

/// Route authorization matrix as a pure function of method, path and the
/// caller's verified roles (`None` = anonymous). Evaluated once per request
/// by the auth middleware; handlers never re-check roles.
pub fn authorize(method: &Method, path: &str, roles: Option<&[Role]>) -> Access {
    // Public surface
    if path == "/health" || under(path, "/api/auth") {
        return Access::Granted;
    }
    if *method == Method::GET
        && (under(path, "/api/events") || under(path, "/api/venues") || under(path, "/api/organizers"))
    {
        return Access::Granted;
    }

    // Admin-only surface
    if under(path, "/api/users") {
        return require_any(roles, &[Role::Admin]);
    }

    // Destructive and publishing operations
    if *method == Method::DELETE && under(path, "/api") {
        return require_any(roles, &[Role::Admin, Role::Organizer]);
    }
    if (*method == Method::POST || *method == Method::PUT)
        && (under(path, "/api/events") || under(path, "/api/organizers"))
    {
        return require_any(roles, &[Role::Admin, Role::Organizer]);
    }

    // Everything else (orders, tickets, payments, statistics, ...) just
    // needs an authenticated caller.
    match roles {
        Some(_) => Access::Granted,
        None => Access::Unauthorized,
    }
}

fn under(path: &str, prefix: &str) -> bool {
    path == prefix || path.starts_with(&format!("{prefix}/"))
}

fn require_any(roles: Option<&[Role]>, allowed: &[Role]) -> Access {
    match roles {
        None => Access::Unauthorized,
        Some(held) if held.iter().any(|r| allowed.contains(r)) => Access::Granted,
        Some(_) => Access::Forbidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANON: Option<&[Role]> = None;
    const USER: &[Role] = &[Role::User];
    const ORGANIZER: &[Role] = &[Role::Organizer];
    const ADMIN: &[Role] = &[Role::Admin];

    #[test]
    fn health_and_auth_are_public() {
        assert_eq!(authorize(&Method::GET, "/health", ANON), Access::Granted);
        assert_eq!(
            authorize(&Method::POST, "/api/auth/login", ANON),
            Access::Granted
        );
        assert_eq!(
            authorize(&Method::POST, "/api/auth/register", ANON),
            Access::Granted
        );
    }

    #[test]
    fn event_reads_are_public_but_writes_need_organizer() {
        assert_eq!(authorize(&Method::GET, "/api/events", ANON), Access::Granted);
        assert_eq!(
            authorize(&Method::GET, "/api/events/42/ticket-categories", ANON),
            Access::Granted
        );
        assert_eq!(
            authorize(&Method::POST, "/api/events", ANON),
            Access::Unauthorized
        );
        assert_eq!(
            authorize(&Method::POST, "/api/events", Some(USER)),
            Access::Forbidden
        );
        assert_eq!(
            authorize(&Method::POST, "/api/events", Some(ORGANIZER)),
            Access::Granted
        );
        assert_eq!(
            authorize(&Method::PUT, "/api/organizers/1", Some(ADMIN)),
            Access::Granted
        );
    }

    #[test]
    fn user_administration_is_admin_only() {
        assert_eq!(
            authorize(&Method::GET, "/api/users", Some(USER)),
            Access::Forbidden
        );
        assert_eq!(
            authorize(&Method::GET, "/api/users/7", Some(ADMIN)),
            Access::Granted
        );
        assert_eq!(
            authorize(&Method::GET, "/api/users", ANON),
            Access::Unauthorized
        );
    }

    #[test]
    fn deletes_anywhere_need_admin_or_organizer() {
        assert_eq!(
            authorize(&Method::DELETE, "/api/venues/9", Some(USER)),
            Access::Forbidden
        );
        assert_eq!(
            authorize(&Method::DELETE, "/api/venues/9", Some(ORGANIZER)),
            Access::Granted
        );
        assert_eq!(
            authorize(&Method::DELETE, "/api/promo-codes/3", Some(ADMIN)),
            Access::Granted
        );
    }

    #[test]
    fn order_mutation_requires_authentication_only() {
        assert_eq!(
            authorize(&Method::POST, "/api/orders", ANON),
            Access::Unauthorized
        );
        assert_eq!(
            authorize(&Method::POST, "/api/orders", Some(USER)),
            Access::Granted
        );
        assert_eq!(
            authorize(&Method::PATCH, "/api/orders/1/cancel", Some(USER)),
            Access::Granted
        );
        assert_eq!(
            authorize(&Method::GET, "/api/statistics/event-sales", Some(USER)),
            Access::Granted
        );
    }

    #[test]
    fn prefix_matching_does_not_leak_across_segments() {
        // "/api/eventside-channel" must not match the public /api/events rule.
        assert_eq!(
            authorize(&Method::GET, "/api/eventside-channel", ANON),
            Access::Unauthorized
        );
    }
}
