pub mod supabase;

use serde::Serialize;
use uuid::Uuid;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Routes reachable without a session.
pub const PUBLIC_ROUTES: &[&str] = &["/login", "/healthz"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Outcome of the authorization boundary for one request. `Allow(None)` is an
/// anonymous pass-through on a public route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow(Option<AuthenticatedUser>),
    RedirectTo(String),
}

/// External authorization boundary: binary allow/deny over a request path,
/// with deny expressed as a redirect target. Implementations verify the
/// bearer token against the identity provider; the routing decision itself
/// is `decide`.
#[async_trait::async_trait]
pub trait SessionGate: Send + Sync {
    async fn authorize(&self, path: &str, bearer_token: Option<&str>) -> anyhow::Result<Access>;
}

/// Pure routing decision over a verified session.
///
/// No session on a protected path redirects to the login entry point; a live
/// session landing on the login page bounces home.
pub fn decide(path: &str, session: Option<AuthenticatedUser>) -> Access {
    let is_public = PUBLIC_ROUTES.iter().any(|route| path.starts_with(route));

    match session {
        None if !is_public => Access::RedirectTo(LOGIN_PATH.to_string()),
        Some(_) if path == LOGIN_PATH => Access::RedirectTo(HOME_PATH.to_string()),
        session => Access::Allow(session),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::nil(),
            email: Some("ana@example.com".to_string()),
        }
    }

    #[test]
    fn anonymous_protected_path_redirects_to_login() {
        assert_eq!(
            decide("/dashboard", None),
            Access::RedirectTo(LOGIN_PATH.to_string())
        );
    }

    #[test]
    fn anonymous_public_paths_pass_through() {
        assert_eq!(decide("/login", None), Access::Allow(None));
        assert_eq!(decide("/healthz", None), Access::Allow(None));
    }

    #[test]
    fn session_on_login_bounces_home() {
        assert_eq!(
            decide("/login", Some(user())),
            Access::RedirectTo(HOME_PATH.to_string())
        );
    }

    #[test]
    fn session_on_protected_path_is_allowed() {
        assert_eq!(
            decide("/dashboard/notifications", Some(user())),
            Access::Allow(Some(user()))
        );
    }
}
