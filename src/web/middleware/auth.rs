//! JWT authentication middleware.

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::web::error::ApiError;
use crate::{Result, StaffmailError};

/// Token lifetime used when none is configured.
const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 3600;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (staff user ID).
    pub sub: i64,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
}

/// Shared-secret token verification.
#[derive(Clone)]
pub struct JwtState {
    /// Encoding key for issuing tokens.
    encoding_key: EncodingKey,
    /// Decoding key for JWT verification.
    pub decoding_key: DecodingKey,
    /// Validation settings.
    pub validation: Validation,
    /// Lifetime of issued tokens.
    token_expiry_secs: u64,
}

impl JwtState {
    /// Create a new JWT state from a secret key.
    pub fn new(secret: &str) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            encoding_key,
            decoding_key,
            validation,
            token_expiry_secs: DEFAULT_TOKEN_EXPIRY_SECS,
        }
    }

    /// Create a JWT state from the auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            token_expiry_secs: config.token_expiry_secs,
            ..Self::new(&config.jwt_secret)
        }
    }

    /// Issue a token for `user_id`.
    pub fn issue(&self, user_id: i64) -> Result<String> {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = JwtClaims {
            sub: user_id,
            iat: now,
            exp: now.saturating_add(self.token_expiry_secs),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| StaffmailError::Auth(format!("failed to issue token: {e}")))
    }

    /// Verify a raw token and return its claims.
    pub fn verify(&self, token: &str) -> Result<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("JWT validation failed: {}", e);
                StaffmailError::Auth("Invalid or expired token".to_string())
            })
    }

    /// Verify an `Authorization` header value of the form `Bearer <token>`.
    pub fn claims_from_header(&self, header: &str) -> Result<JwtClaims> {
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| StaffmailError::Auth("Missing authorization".to_string()))?;
        self.verify(token.trim())
    }

    /// Resolve the user id from an `Authorization` header value.
    pub fn user_id_from_header(&self, header: &str) -> Result<i64> {
        Ok(self.claims_from_header(header)?.sub)
    }
}

/// Extractor for authenticated users.
///
/// The handler receives the JWT claims if the bearer token is valid.
#[derive(Debug, Clone)]
pub struct AuthUser(pub JwtClaims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization"))?;

        // Set by the jwt_auth middleware
        let jwt_state = parts.extensions.get::<Arc<JwtState>>().ok_or_else(|| {
            tracing::error!("JWT state not configured");
            ApiError::unauthorized("Authentication unavailable")
        })?;

        let claims = jwt_state.claims_from_header(header)?;
        Ok(AuthUser(claims))
    }
}

/// Middleware function to inject JWT state into request extensions.
pub async fn jwt_auth(
    jwt_state: Arc<JwtState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(jwt_state);
    next.run(request).await
}
