use std::collections::HashMap;

use axum::{
    extract::{Path, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{verify_jwt, Claims};
use crate::config;
use crate::error::ApiError;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// Attach an `AuthUser` when the request carries a valid bearer token.
///
/// Missing or bad tokens are not an error here; the `ensure_*` layers decide
/// what needs a login.
pub async fn authenticate_jwt(mut request: Request, next: Next) -> Response {
    if let Some(user) = user_from_headers(request.headers()) {
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

/// 401 unless a user is logged in
pub async fn ensure_logged_in(request: Request, next: Next) -> Result<Response, ApiError> {
    require_user(request.extensions().get::<AuthUser>())?;
    Ok(next.run(request).await)
}

/// 401 unless the logged-in user is an admin
pub async fn ensure_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require_admin(request.extensions().get::<AuthUser>())?;
    Ok(next.run(request).await)
}

/// 401 unless the user is an admin or is the `:username` in the path
pub async fn ensure_admin_or_user(
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let username = params.get("username").map(String::as_str).unwrap_or_default();
    require_admin_or_user(request.extensions().get::<AuthUser>(), username)?;
    Ok(next.run(request).await)
}

pub fn require_user(user: Option<&AuthUser>) -> Result<&AuthUser, ApiError> {
    user.ok_or_else(ApiError::unauthorized)
}

pub fn require_admin(user: Option<&AuthUser>) -> Result<&AuthUser, ApiError> {
    match require_user(user)? {
        user if user.is_admin => Ok(user),
        user => {
            tracing::warn!("Admin access refused for '{}'", user.username);
            Err(ApiError::unauthorized())
        }
    }
}

pub fn require_admin_or_user<'a>(user: Option<&'a AuthUser>, username: &str) -> Result<&'a AuthUser, ApiError> {
    match require_user(user)? {
        user if user.is_admin || (!username.is_empty() && user.username == username) => Ok(user),
        _ => Err(ApiError::unauthorized()),
    }
}

fn user_from_headers(headers: &HeaderMap) -> Option<AuthUser> {
    let token = extract_jwt_from_headers(headers)?;
    match verify_jwt(token, &config::config().security.jwt_secret) {
        Ok(claims) => Some(AuthUser::from(claims)),
        Err(e) => {
            tracing::debug!("Ignoring bearer token: {}", e);
            None
        }
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    use crate::auth::generate_jwt;

    fn user(username: &str, is_admin: bool) -> AuthUser {
        AuthUser { username: username.to_string(), is_admin }
    }

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn valid_header_yields_user() {
        let token = generate_jwt(&Claims::new("test", false), &config::config().security.jwt_secret).unwrap();
        let found = user_from_headers(&headers(&format!("Bearer {}", token)));
        assert_eq!(found, Some(user("test", false)));
    }

    #[test]
    fn missing_or_bad_header_yields_nothing() {
        assert_eq!(user_from_headers(&HeaderMap::new()), None);
        assert_eq!(user_from_headers(&headers("Token abc")), None);
        assert_eq!(user_from_headers(&headers("Bearer ")), None);

        let bad = generate_jwt(&Claims::new("test", false), "wrong").unwrap();
        assert_eq!(user_from_headers(&headers(&format!("Bearer {}", bad))), None);
    }

    #[test]
    fn logged_in_check() {
        assert!(require_user(Some(&user("test", false))).is_ok());
        assert!(matches!(require_user(None), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn admin_check() {
        assert!(require_admin(Some(&user("test", true))).is_ok());
        assert!(require_admin(None).is_err());
        assert!(require_admin(Some(&user("test", false))).is_err());
    }

    #[test]
    fn admin_or_same_user_check() {
        assert!(require_admin_or_user(Some(&user("test", true)), "test2").is_ok());
        assert!(require_admin_or_user(Some(&user("test2", false)), "test2").is_ok());
        assert!(require_admin_or_user(None, "test2").is_err());
        assert!(require_admin_or_user(Some(&user("test", false)), "test2").is_err());
        assert!(require_admin_or_user(Some(&user("test", false)), "").is_err());
    }
}
