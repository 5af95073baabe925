//! Session authorization middleware
//!
//! Write routes are gated on an identity token carried in a session cookie.
//! Tokens are issued by the external identity provider; this layer only
//! verifies the signature and standard claims and decides allow or deny.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Settings;
use crate::error::{ErrorDetail, ErrorResponse};

// ============================================================================
// Session Info
// ============================================================================

/// Claims read from the identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: usize,
    #[serde(rename = "cognito:username", default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// The authorized caller, injected into request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub subject: String,
    pub username: Option<String>,
}

impl SessionInfo {
    /// Caller when authorization is disabled
    pub fn anonymous() -> Self {
        Self {
            subject: "anonymous".to_string(),
            username: None,
        }
    }
}

impl From<SessionClaims> for SessionInfo {
    fn from(claims: SessionClaims) -> Self {
        Self {
            subject: claims.sub,
            username: claims.username,
        }
    }
}

// ============================================================================
// Authorization Errors
// ============================================================================

#[derive(Debug)]
pub enum AuthError {
    /// No session cookie on the request
    MissingSession,
    /// Token failed signature or claim checks
    InvalidSession(String),
    /// Authorization is required but no verification key is configured
    Misconfigured,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            AuthError::MissingSession => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "Missing session cookie. Sign in and retry the request.".to_string(),
            ),
            AuthError::InvalidSession(reason) => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                format!("Invalid session: {}", reason),
            ),
            AuthError::Misconfigured => {
                tracing::error!("Session authorization enabled without a verification key");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "api_error",
                    "Session authorization is not configured.".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            type_: "error".to_string(),
            error: ErrorDetail {
                type_: error_type.to_string(),
                message,
            },
            schema: None,
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Authorization Middleware
// ============================================================================

/// State required by the session middleware
#[derive(Clone)]
pub struct AuthState {
    settings: Arc<Settings>,
    decoding_key: Option<Arc<DecodingKey>>,
    validation: Arc<Validation>,
}

impl AuthState {
    pub fn new(settings: Arc<Settings>) -> Self {
        let decoding_key = settings
            .auth
            .jwt_secret
            .as_ref()
            .map(|secret| Arc::new(DecodingKey::from_secret(secret.as_bytes())));

        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = settings.token_issuer() {
            validation.set_issuer(&[issuer]);
        }
        match settings.auth.user_pool_client_id {
            Some(ref client_id) => validation.set_audience(&[client_id]),
            None => validation.validate_aud = false,
        }

        Self {
            settings,
            decoding_key,
            validation: Arc::new(validation),
        }
    }

    /// Decide whether a request with these headers may proceed
    pub fn authorize(&self, headers: &HeaderMap) -> Result<SessionInfo, AuthError> {
        if !self.settings.auth.require_auth {
            return Ok(SessionInfo::anonymous());
        }

        let Some(ref key) = self.decoding_key else {
            return Err(AuthError::Misconfigured);
        };

        let token = session_cookie(headers, &self.settings.auth.cookie_name)
            .ok_or(AuthError::MissingSession)?;

        let data = decode::<SessionClaims>(token, key, &self.validation)
            .map_err(|e| AuthError::InvalidSession(e.to_string()))?;

        Ok(data.claims.into())
    }
}

/// Middleware gating a route on a verified session cookie.
///
/// On success `SessionInfo` is added to the request extensions. On failure
/// the handler is never invoked.
pub async fn require_session(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    match auth_state.authorize(request.headers()) {
        Ok(session) => {
            tracing::debug!(subject = %session.subject, "Session authorized");
            request.extensions_mut().insert(session);
            Ok(next.run(request).await)
        }
        Err(e) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                error = ?e,
                "Session authorization denied"
            );
            Err(e)
        }
    }
}

/// Value of the named cookie from the request's `Cookie` headers
pub fn session_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

// ============================================================================
// Tests
// ============================================================================
