use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{verify_token, Claims};
use crate::config;

/// Request-scoped authentication state. Created once per request by the
/// authentication middleware; `identity` is present iff a verifiable bearer
/// token accompanied the request.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    pub identity: Option<Identity>,
}

/// Caller identity decoded from a verified token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub is_admin: bool,
    pub issued_at: i64,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
            issued_at: claims.iat,
        }
    }
}

/// Authentication middleware. Attaches a `RequestContext` to every request and,
/// when the Authorization header carries a token signed with our secret, fills
/// in the caller identity.
///
/// A missing, malformed or wrongly signed token never fails the request here.
/// Anonymous-accessible routes must stay reachable with a garbage or stale
/// credential; whether the request is *allowed* is decided by the guards, not
/// by this stage.
pub async fn authenticate(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    let secret = &config::config().security.jwt_secret;
    let mut context = RequestContext::default();

    if let Some(token) = extract_bearer_token(&headers) {
        match verify_token(&token, secret) {
            Ok(claims) => context.identity = Some(Identity::from(claims)),
            Err(e) => {
                tracing::debug!("ignoring unverifiable bearer token: {}", e);
            }
        }
    }

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Extract the token from an `Authorization: Bearer <token>` header. The
/// scheme is matched case-insensitively; anything unusable yields `None`.
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extracts_bearer_token() {
        let headers = headers_with_auth("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let headers = headers_with_auth("bearer abc");
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc"));

        let headers = headers_with_auth("BEARER abc");
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_missing_or_unusable_header_yields_none() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
        assert_eq!(extract_bearer_token(&headers_with_auth("Basic abc")), None);
        assert_eq!(extract_bearer_token(&headers_with_auth("Bearer ")), None);
        assert_eq!(extract_bearer_token(&headers_with_auth("Bearer")), None);
    }
}
