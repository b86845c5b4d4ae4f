//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the username, the issue time and the
//! expiration time. They are stateless: nothing is stored server side and
//! a token stays valid until `exp` even if the user record changes.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::db::UserPublic;
use crate::{Result, SharingError};

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the token holder.
    pub username: String,
    /// Issued at (epoch seconds).
    pub iat: i64,
    /// Expiration (epoch seconds).
    pub exp: i64,
}

/// Identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Username carried by the token.
    pub username: String,
}

/// Issues and verifies access tokens.
pub trait TokenService: Send + Sync {
    /// Issue a token for `user` at the given instant.
    fn issue_at(&self, user: &UserPublic, now: DateTime<Utc>) -> Result<String>;

    /// Verify a token at the given instant.
    ///
    /// The expiration instant itself is already expired.
    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity>;

    /// Issue a token for `user` now.
    fn issue(&self, user: &UserPublic) -> Result<String> {
        self.issue_at(user, Utc::now())
    }

    /// Verify a token now.
    fn verify(&self, token: &str) -> Result<Identity> {
        self.verify_at(token, Utc::now())
    }
}

/// HS256 implementation of [`TokenService`].
#[derive(Clone)]
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifespan: Duration,
}

impl JwtTokenService {
    /// Create a token service from a secret and a lifetime.
    pub fn new(secret: &str, lifespan: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller supplied clock in `verify_at`.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifespan,
        }
    }

    /// Create a token service from configuration.
    pub fn from_config(config: &JwtConfig) -> Result<Self> {
        let lifespan = Duration::try_days(config.days_lifespan).ok_or_else(|| {
            SharingError::Config(format!(
                "server.jwtConfig.daysLifespan {} is out of range",
                config.days_lifespan
            ))
        })?;
        Ok(Self::new(&config.secret, lifespan))
    }
}

impl TokenService for JwtTokenService {
    fn issue_at(&self, user: &UserPublic, now: DateTime<Utc>) -> Result<String> {
        let exp = now.checked_add_signed(self.lifespan).ok_or_else(|| {
            SharingError::TokenGeneration(format!(
                "token lifespan of {} days overflows the expiration date",
                self.lifespan.num_days()
            ))
        })?;
        let claims = Claims {
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            SharingError::TokenGeneration(e.to_string())
        })
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!("JWT validation failed: {}", e);
            SharingError::InvalidToken(e.to_string())
        })?;

        let claims = data.claims;
        if now.timestamp() >= claims.exp {
            let expiration = DateTime::<Utc>::from_timestamp(claims.exp, 0).unwrap_or(now);
            return Err(SharingError::TokenExpired { expiration });
        }

        Ok(Identity {
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service() -> JwtTokenService {
        JwtTokenService::new("test-secret", Duration::days(3))
    }

    fn john() -> UserPublic {
        UserPublic {
            username: "john_doe".to_string(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let svc = service();
        let token = svc.issue(&john()).unwrap();
        let identity = svc.verify(&token).unwrap();
        assert_eq!(identity.username, "john_doe");
    }

    #[test]
    fn test_expiry_boundary() {
        let svc = service();
        let issued = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let token = svc.issue_at(&john(), issued).unwrap();

        let just_before = issued + Duration::days(3) - Duration::seconds(1);
        assert!(svc.verify_at(&token, just_before).is_ok());

        let at_expiry = issued + Duration::days(3);
        match svc.verify_at(&token, at_expiry) {
            Err(SharingError::TokenExpired { expiration }) => assert_eq!(expiration, at_expiry),
            other => panic!("expected TokenExpired, got {other:?}"),
        }
    }

    #[test]
    fn test_issue_with_overflowing_lifespan() {
        let svc = JwtTokenService::new("test-secret", Duration::days(100_000_000));
        assert!(matches!(
            svc.issue(&john()),
            Err(SharingError::TokenGeneration(_))
        ));
    }

    #[test]
    fn test_from_config_out_of_range_lifespan() {
        let config = JwtConfig {
            secret: "test-secret".to_string(),
            days_lifespan: i64::MAX,
        };
        assert!(matches!(
            JwtTokenService::from_config(&config),
            Err(SharingError::Config(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = service().issue(&john()).unwrap();
        let other = JwtTokenService::new("other-secret", Duration::days(3));
        assert!(matches!(
            other.verify(&token),
            Err(SharingError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let svc = service();
        assert!(matches!(
            svc.verify("not.a.token"),
            Err(SharingError::InvalidToken(_))
        ));
        assert!(matches!(svc.verify(""), Err(SharingError::InvalidToken(_))));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let svc = service();
        let token = svc.issue(&john()).unwrap();
        let jane = UserPublic {
            username: "jane_doe".to_string(),
        };
        let other = svc.issue(&jane).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);
        assert!(matches!(
            svc.verify(&tampered),
            Err(SharingError::InvalidToken(_))
        ));
    }
}
