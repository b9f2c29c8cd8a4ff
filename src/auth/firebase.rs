use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;

use super::jwks::JwksCache;
use super::{Identity, IdentityProvider, VerifyError};

/// Signing keys for Firebase Auth ID tokens
pub const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
}

/// Verifies Firebase ID tokens issued for one project
pub struct FirebaseVerifier {
    project_id: String,
    keys: JwksCache,
}

impl FirebaseVerifier {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::with_jwks_url(project_id, FIREBASE_JWKS_URL)
    }

    pub fn with_jwks_url(project_id: impl Into<String>, jwks_url: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            keys: JwksCache::new(jwks_url),
        }
    }

    fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let header = decode_header(token).map_err(|e| VerifyError::InvalidToken(format!("bad header: {}", e)))?;
        if header.alg != Algorithm::RS256 {
            return Err(VerifyError::InvalidToken(format!("unexpected algorithm {:?}", header.alg)));
        }
        let kid = header
            .kid
            .ok_or_else(|| VerifyError::InvalidToken("missing key id".to_string()))?;

        let key = self.keys.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[self.issuer()]);

        let claims = decode::<FirebaseClaims>(token, &key, &validation)
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
    use crate::auth::SharedSecretVerifier;

    fn offline_verifier() -> FirebaseVerifier {
        let port = portpicker::pick_unused_port().expect("free port");
        FirebaseVerifier::with_jwks_url("demo-project", format!("http://127.0.0.1:{}/keys", port))
    }

    #[tokio::test]
    async fn garbage_is_rejected_before_any_key_lookup() {
        let err = offline_verifier().verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, VerifyError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn hs256_tokens_are_rejected() {
        let token = SharedSecretVerifier::new("secret", 1)
            .issue(&Identity::new("alice"))
            .unwrap();
        let err = offline_verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, VerifyError::InvalidToken(_)), "got {:?}", err);
    }

    #[test]
    fn issuer_is_scoped_to_project() {
        assert_eq!(
            offline_verifier().issuer(),
            "https://securetoken.google.com/demo-project"
        );
    }
}
