use crate::config::ApplicationCredentials;
use crate::errors::AppError;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// Lifetime of an issued bearer token in seconds.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Claims carried by application bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationClaims {
    pub application_id: String,
    pub iat: i64,
    pub exp: i64,
    /// Random nonce, unique per token.
    pub jti: String,
}

/// Signs short-lived RS256 tokens on behalf of one application.
#[derive(Clone)]
pub struct TokenIssuer {
    application_id: String,
    key: EncodingKey,
}

impl TokenIssuer {
    /// Parses the PEM private key once so signing never fails on key format.
    pub fn new(credentials: &ApplicationCredentials) -> Result<Self, AppError> {
        let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes()).map_err(|e| {
            AppError::Configuration(format!("PRIVATE_KEY is not a valid RSA PEM key: {}", e))
        })?;

        Ok(Self {
            application_id: credentials.application_id.clone(),
            key,
        })
    }

    pub fn issue(&self) -> Result<String, AppError> {
        self.issue_at(chrono::Utc::now().timestamp())
    }

    /// Issues a token as if the current time were `now` (unix seconds).
    pub fn issue_at(&self, now: i64) -> Result<String, AppError> {
        let claims = ApplicationClaims {
            application_id: self.application_id.clone(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
            jti: uuid::Uuid::new_v4().simple().to_string(),
        };

        let token = encode(&Header::new(Algorithm::RS256), &claims, &self.key)?;
        tracing::debug!("Bearer token issued for application {}", self.application_id);
        Ok(token)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("application_id", &self.application_id)
            .finish_non_exhaustive()
    }
}
