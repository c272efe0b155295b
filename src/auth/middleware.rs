use crate::auth::identity::{self, Caller};
use crate::auth::jwt::{TokenService, TokenVerification};
use crate::types::AppError;
use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Rejects requests without a valid bearer token and attaches the resolved
/// [`Caller`] to the request extensions.
pub async fn auth_middleware(
    token_service: Arc<TokenService>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AppError::Unauthenticated)?;

    let claims = match token_service.verify(token) {
        TokenVerification::Valid(claims) => claims,
        TokenVerification::Expired => {
            tracing::debug!("rejected expired token");
            return Err(AppError::Unauthenticated);
        }
        TokenVerification::Invalid => return Err(AppError::Unauthenticated),
    };

    let caller = identity::resolve(&claims).ok_or_else(|| {
        tracing::debug!("token carries no usable subject claim");
        AppError::Unauthenticated
    })?;

    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}

/// Token from an `Authorization` value; the scheme name is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim_start().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Extractor for the authenticated caller on protected routes.
pub struct AuthUser(pub Caller);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .copied()
            .map(AuthUser)
            .ok_or(AppError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_scheme_ignores_case() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER  abc "), Some("abc"));
    }

    #[test]
    fn test_other_schemes_and_empty_tokens_are_rejected() {
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer    "), None);
        assert_eq!(bearer_token("Bearerabc"), None);
        assert_eq!(bearer_token(""), None);
    }
}
