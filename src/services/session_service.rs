use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::error::AppError;
use crate::models::Role;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // username
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub aud: String,
    pub iss: String,
}

/// Every session that verified on a request, in the order its roles were
/// tried. A browser can hold a `user_jwt` and a `donor_jwt` at once.
#[derive(Debug, Clone)]
pub struct Sessions(pub Vec<Claims>);

/// Signs and verifies session tokens. Built once from config.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            encoding: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.secret.as_bytes()),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            ttl: Duration::hours(settings.ttl_hours),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, username: &str, role: Role) -> Result<String, AppError> {
        let now = Utc::now();

        let claims = Claims {
            sub: username.to_string(),
            role,
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            aud: self.audience.clone(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Checks signature, expiry, issuer and audience, then that the token
    /// was issued for `role`.
    pub fn verify(&self, token: &str, role: Role) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Rejected {} token: {}", role, e);
                AppError::Unauthorized
            })?;

        if claims.role != role {
            log::warn!("Token for role {} presented as {}", claims.role, role);
            return Err(AppError::Unauthorized);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(secret: &str, ttl_hours: i64) -> JwtSettings {
        JwtSettings {
            secret: secret.to_string(),
            issuer: "food-donation-service".to_string(),
            audience: "food-donation-web".to_string(),
            ttl_hours,
        }
    }

    #[test]
    fn issued_token_verifies_for_same_role() {
        let keys = SessionKeys::new(&settings("secret", 1));
        let token = keys.issue("meera", Role::User).unwrap();

        let claims = keys.verify(&token, Role::User).unwrap();
        assert_eq!(claims.sub, "meera");
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn rejects_token_for_other_role() {
        let keys = SessionKeys::new(&settings("secret", 1));
        let token = keys.issue("greenbakery", Role::Donor).unwrap();

        assert!(matches!(
            keys.verify(&token, Role::User),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = SessionKeys::new(&settings("one", 1))
            .issue("meera", Role::User)
            .unwrap();

        let other = SessionKeys::new(&settings("two", 1));
        assert!(other.verify(&token, Role::User).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        // Expired well beyond the default 60 s leeway.
        let keys = SessionKeys::new(&settings("secret", -2));
        let token = keys.issue("meera", Role::User).unwrap();

        assert!(keys.verify(&token, Role::User).is_err());
    }

    #[test]
    fn rejects_garbage() {
        let keys = SessionKeys::new(&settings("secret", 1));
        assert!(keys.verify("not.a.jwt", Role::User).is_err());
    }
}
