//! JWT Token Handler
//! Mission: Generate and validate JWT tokens securely

use crate::auth::models::{Claims, User};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("signing secret is not configured")]
    MissingSecret,
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("invalid or expired token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}

/// JWT Handler for token operations
pub struct JwtHandler {
    secret: String,
    expiration_hours: i64,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key and token lifetime
    pub fn new(secret: String, expiration_hours: i64) -> Self {
        Self {
            secret,
            expiration_hours,
        }
    }

    pub fn expiration_hours(&self) -> i64 {
        self.expiration_hours
    }

    /// Generate a JWT token for a user
    pub fn generate_token(&self, user: &User) -> Result<String, TokenError> {
        self.issue(&user.id.to_string(), &user.name, &user.email)
    }

    /// Sign a token carrying the given identity
    pub fn issue(&self, id: &str, name: &str, email: &str) -> Result<String, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            iat: now as usize,
            exp: (now + self.expiration_hours * 3600) as usize,
        };

        debug!(
            "Generating JWT for user {} ({}), expires in {}h",
            claims.email, claims.id, self.expiration_hours
        );

        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(TokenError::Signing)
    }

    /// Validate a JWT token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(TokenError::InvalidToken)?;

        debug!("Validated JWT for user {}", decoded.claims.id);

        Ok(decoded.claims)
    }
}
