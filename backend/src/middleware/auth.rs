//! Role-scoped authentication gate
//!
//! Each protected route group declares the role it serves when it registers
//! this middleware; the gate verifies the bearer token (header or
//! `access_token` cookie) against that role's signing secret and attaches
//! the decoded identity to the request. Route groups open to every role use
//! the any-role variant, which selects the secret from the token's own role
//! claim before fully verifying the signature.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;
use shared::types::Role;

/// Route-to-role declaration made at router registration time.
///
/// `role: None` admits any of the four roles (used by the chat proxy).
#[derive(Clone)]
pub struct RouteRole {
    pub state: AppState,
    pub role: Option<Role>,
}

impl RouteRole {
    pub fn only(state: AppState, role: Role) -> Self {
        Self {
            state,
            role: Some(role),
        }
    }

    pub fn any(state: AppState) -> Self {
        Self { state, role: None }
    }
}

/// Authenticated principal attached to the request after verification.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

/// Authentication middleware validating session tokens per route group.
pub async fn auth_middleware(
    State(gate): State<RouteRole>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_token(&request) {
        Some(token) => token,
        None => return AppError::MissingToken.into_response(),
    };

    let verified = match gate.role {
        Some(role) => gate.state.tokens.verify(role, &token),
        None => gate.state.tokens.verify_any(&token),
    };

    let claims = match verified {
        Ok(claims) => claims,
        Err(e) => return e.into_response(),
    };

    let role = match Role::from_tag(&claims.role) {
        Some(role) => role,
        None => return AppError::InvalidToken.into_response(),
    };

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        role,
    });

    next.run(request).await
}

/// Token from the Authorization header, falling back to the access cookie.
fn extract_token(request: &Request) -> Option<String> {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string());

    bearer.or_else(|| {
        CookieJar::from_headers(request.headers())
            .get("access_token")
            .map(|c| c.value().to_string())
    })
}

/// Extractor for the authenticated user; use in handlers behind the gate.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::MissingToken)
    }
}
