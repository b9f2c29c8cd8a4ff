use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{Identity, IdentityProvider, VerifyError};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

/// HS256 tokens signed with a shared secret. Stands in for the external
/// provider in development and tests, and can mint tokens for either.
#[derive(Clone)]
pub struct SharedSecretVerifier {
    secret: String,
    expiry_hours: u64,
}

impl SharedSecretVerifier {
    pub fn new(secret: impl Into<String>, expiry_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiry_hours,
        }
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let exp = (now + Duration::hours(self.expiry_hours as i64)).timestamp();
        let claims = Claims {
            sub: identity.uid.clone(),
            email: identity.email.clone(),
            email_verified: identity.email_verified,
            name: identity.display_name.clone(),
            exp,
            iat: now.timestamp(),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims, e.g. an already-expired token
    pub fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        let key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::new(Algorithm::HS256), claims, &key)
    }
}

#[async_trait]
impl IdentityProvider for SharedSecretVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);

        let claims = decode::<Claims>(token, &key, &validation)
            .map_err(|e| VerifyError::InvalidToken(e.to_string()))?
            .claims;

        if claims.sub.is_empty() {
            return Err(VerifyError::InvalidToken("empty subject".to_string()));
        }

        Ok(Identity {
            uid: claims.sub,
            email: claims.email,
            email_verified: claims.email_verified,
            display_name: claims.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn issued_tokens_round_trip_identity() {
        let verifier = SharedSecretVerifier::new("secret", 1);
        let identity = Identity::new("alice")
            .with_email("alice@example.com", true)
            .with_display_name("Alice");
        let token = verifier.issue(&identity).unwrap();
        assert_eq!(verifier.verify(&token).await.unwrap(), identity);
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let token = SharedSecretVerifier::new("one", 1).issue(&Identity::new("alice")).unwrap();
        let err = SharedSecretVerifier::new("two", 1).verify(&token).await.unwrap_err();
        assert!(matches!(err, VerifyError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn expired_token_is_invalid() {
        let verifier = SharedSecretVerifier::new("secret", 1);
        let past = Utc::now() - Duration::hours(2);
        let token = verifier
            .sign(&Claims {
                sub: "alice".into(),
                email: None,
                email_verified: false,
                name: None,
                exp: past.timestamp(),
                iat: past.timestamp(),
            })
            .unwrap();
        assert!(verifier.verify(&token).await.is_err());
    }

    #[tokio::test]
    async fn empty_subject_is_invalid() {
        let verifier = SharedSecretVerifier::new("secret", 1);
        let token = verifier.issue(&Identity::new("")).unwrap();
        assert!(verifier.verify(&token).await.is_err());
    }
}
