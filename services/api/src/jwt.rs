//! JWT service for credential issuance and verification
//!
//! Credentials are HS256-signed and carry the user id plus the user's
//! authority list. Two expiry policies coexist: regular issuance lasts 30
//! days, while the GraphQL register/login path hands out 1-hour session
//! tokens. The split is inherited behavior and intentionally left as-is.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Regular token expiration time in seconds (default: 30 days)
    pub token_expiry: u64,
    /// Session token expiration time in seconds (default: 1 hour)
    pub session_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: shared signing secret (required)
    /// - `JWT_TOKEN_EXPIRY`: regular token expiry in seconds (default: 2592000)
    /// - `JWT_SESSION_TOKEN_EXPIRY`: session token expiry in seconds (default: 3600)
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let token_expiry = std::env::var("JWT_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "2592000".to_string()) // 30 days
            .parse()
            .unwrap_or(2_592_000);

        let session_token_expiry = std::env::var("JWT_SESSION_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "3600".to_string()) // 1 hour
            .parse()
            .unwrap_or(3600);

        Ok(JwtConfig {
            secret,
            token_expiry,
            session_token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Authorities granted to the user; absent on tokens minted elsewhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorities: Option<Vec<String>>,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Failures surfaced by the token codec
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("{0}")]
    Invalid(String),

    #[error("Token generation failed")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Issue a regular (30-day) credential for a user
    pub fn issue(&self, user_id: Uuid, authorities: &[String]) -> Result<String, TokenError> {
        self.sign(user_id, authorities, self.config.token_expiry)
    }

    /// Issue a short-lived session credential; used by the GraphQL
    /// register/login mutations
    pub fn issue_session(
        &self,
        user_id: Uuid,
        authorities: &[String],
    ) -> Result<String, TokenError> {
        self.sign(user_id, authorities, self.config.session_token_expiry)
    }

    fn sign(
        &self,
        user_id: Uuid,
        authorities: &[String],
        expiry: u64,
    ) -> Result<String, TokenError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TokenError::Invalid(format!("Failed to get current time: {}", e)))?
            .as_secs();

        let claims = Claims {
            sub: user_id,
            authorities: Some(authorities.to_vec()),
            iat: now,
            exp: now + expiry,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verify a credential and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Invalid(e.to_string())),
            },
        }
    }

    /// Regular token expiry in seconds
    pub fn token_expiry(&self) -> u64 {
        self.config.token_expiry
    }

    /// Session token expiry in seconds
    pub fn session_token_expiry(&self) -> u64 {
        self.config.session_token_expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "a-pretty-secret-key".to_string(),
            token_expiry: 2_592_000,
            session_token_expiry: 3600,
        })
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service
            .issue(user_id, &["admin".to_string()])
            .expect("token should be issued");
        let claims = service.verify(&token).expect("token should verify");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.authorities, Some(vec!["admin".to_string()]));
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 2_592_000);
    }

    #[test]
    fn test_session_token_uses_short_expiry() {
        let service = service();
        let token = service
            .issue_session(Uuid::new_v4(), &[])
            .expect("token should be issued");
        let claims = service.verify(&token).expect("token should verify");

        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = service();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        let claims = Claims {
            sub: Uuid::new_v4(),
            authorities: Some(vec![]),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"a-pretty-secret-key"),
        )
        .unwrap();

        match service.verify(&token) {
            Err(TokenError::Expired) => {}
            other => panic!("expected expired token error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = service();
        let token = service.issue(Uuid::new_v4(), &[]).unwrap();

        let other = JwtService::new(JwtConfig {
            secret: "a-different-secret".to_string(),
            token_expiry: 2_592_000,
            session_token_expiry: 3600,
        });

        match other.verify(&token) {
            Err(TokenError::Invalid(_)) => {}
            other => panic!("expected invalid token error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_token_without_authorities_verifies() {
        // Tokens minted by other issuers may omit the authority list; the
        // codec accepts them and the middleware decides what to do.
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        #[derive(Serialize)]
        struct BareClaims {
            sub: Uuid,
            iat: u64,
            exp: u64,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &BareClaims {
                sub: Uuid::new_v4(),
                iat: now,
                exp: now + 60,
            },
            &EncodingKey::from_secret(b"a-pretty-secret-key"),
        )
        .unwrap();

        let claims = service().verify(&token).expect("token should verify");
        assert_eq!(claims.authorities, None);
    }

    #[test]
    #[serial]
    fn test_jwt_config_from_env_requires_secret() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
        assert!(JwtConfig::from_env().is_err());

        unsafe {
            std::env::set_var("JWT_SECRET", "a-pretty-secret-key");
        }
        let config = JwtConfig::from_env().unwrap();
        assert_eq!(config.token_expiry, 2_592_000);
        assert_eq!(config.session_token_expiry, 3600);

        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
    }
}
