// ABOUTME: JWT-based caller identification for the REST API
// ABOUTME: Validates HS256 bearer tokens and resolves the calling user id
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Authentication
//!
//! Token issuance belongs to the identity service; this module only verifies tokens and
//! tells handlers who is calling. Tokens travel in the `Authorization` header as either
//! `Bearer <jwt>` or `Token <jwt>`.

use chrono::{DateTime, Duration, Utc};
use http::header::AUTHORIZATION;
use http::HeaderMap;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::service_names;
use crate::errors::{AppError, AppResult};

/// `JWT` validation error with detailed information
#[derive(Debug, Clone, Error)]
pub enum JwtValidationError {
    /// Token has expired
    #[error("JWT token expired at {}", expired_at.format("%Y-%m-%d %H:%M:%S UTC"))]
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature or claims are invalid
    #[error("JWT token is invalid: {reason}")]
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    #[error("JWT token is malformed: {details}")]
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        Self::auth_invalid(error.to_string())
    }
}

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Audience (who the token is intended for)
    pub aud: String,
}

/// Identity of an authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthResult {
    /// Authenticated user id
    pub user_id: i64,
}

/// Authentication manager for `JWT` tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create a manager signing and verifying with `secret`
    #[must_use]
    pub fn new(secret: &[u8], token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry_hours,
        }
    }

    /// Issue a token for `user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user_id: i64) -> AppResult<String> {
        let now = Utc::now();
        self.encode_claims(&Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.token_expiry_hours)).timestamp(),
            aud: service_names::FOODGRAM_SERVER.to_owned(),
        })
    }

    /// Sign arbitrary claims
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn encode_claims(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] describing why the token was rejected
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[service_names::FOODGRAM_SERVER]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(token, &e))
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(token: &str, e: &JwtError) -> JwtValidationError {
        warn!("JWT token validation failed: {e}");

        match e.kind() {
            ErrorKind::ExpiredSignature => JwtValidationError::TokenExpired {
                expired_at: Self::expiry_of(token).unwrap_or_else(Utc::now),
            },
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
                JwtValidationError::TokenMalformed {
                    details: "Token format is invalid".into(),
                }
            }
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }

    /// Read `exp` without verifying anything, for error reporting only
    fn expiry_of(token: &str) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;

        let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
        DateTime::from_timestamp(data.claims.exp, 0)
    }

    /// Resolve the caller, requiring credentials
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when no token is present and `AuthInvalid` when it is rejected
    pub fn authenticate(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        self.authenticate_optional(headers)?
            .ok_or_else(AppError::auth_required)
    }

    /// Resolve the caller if credentials are present
    ///
    /// Anonymous callers yield `None`; a present but invalid token is still an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` when a token is present but rejected
    pub fn authenticate_optional(&self, headers: &HeaderMap) -> AppResult<Option<AuthResult>> {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return Ok(None);
        };

        let value = value
            .to_str()
            .map_err(|_| AppError::auth_invalid("Authorization header is not valid UTF-8"))?;
        let token = extract_token(value)
            .ok_or_else(|| AppError::auth_invalid("Unsupported authorization scheme"))?;

        let claims = self.validate_token(token)?;
        let user_id = claims
            .sub
            .parse()
            .map_err(|_| AppError::auth_invalid("Token subject is not a user id"))?;

        debug!(user.id = user_id, "Authenticated request");
        Ok(Some(AuthResult { user_id }))
    }
}

/// Token part of an `Authorization` header value
///
/// Accepts the `Bearer` and `Token` schemes, case-insensitively.
#[must_use]
pub fn extract_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    let known = scheme.eq_ignore_ascii_case("bearer") || scheme.eq_ignore_ascii_case("token");
    (known && !token.is_empty()).then_some(token)
}
