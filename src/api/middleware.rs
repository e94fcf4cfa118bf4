//! Confirmation gate for destructive routes.
//!
//! Clearing the history log is irreversible, so it sits behind an optional
//! bearer token. When no token is configured (local mode) the gate is open.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

/// Gate configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct AdminGate {
    /// Token required for destructive routes (from JAPAMALA_ADMIN_TOKEN).
    pub token: Option<String>,
}

impl AdminGate {
    /// Load the gate configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            token: std::env::var("JAPAMALA_ADMIN_TOKEN").ok(),
        }
    }

    /// Open gate (for local development/testing).
    pub fn open() -> Self {
        Self { token: None }
    }

    /// Gate requiring a specific token (for testing).
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

impl Default for AdminGate {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Middleware that checks destructive requests for the configured token.
pub async fn admin_gate_middleware(
    State(gate): State<AdminGate>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let expected = match &gate.token {
        Some(token) => token,
        None => return Ok(next.run(request).await),
    };

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    match auth_header {
        Some(header) if header.starts_with("Bearer ") => {
            let token = &header[7..];
            if token == expected {
                Ok(next.run(request).await)
            } else {
                tracing::warn!("invalid admin token provided");
                Err(StatusCode::UNAUTHORIZED)
            }
        }
        Some(_) => {
            tracing::warn!("invalid Authorization header format");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            tracing::warn!("missing Authorization header on destructive route");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
