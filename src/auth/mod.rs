//! Identity-provider capability.
//!
//! Handlers never talk to a provider directly. The auth gate holds an
//! `Arc<dyn IdentityProvider>` taken from application state, so tests swap
//! in a [`SharedSecretVerifier`] while deployments use [`FirebaseVerifier`].

pub mod firebase;
pub mod jwks;
pub mod secret;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

pub use firebase::FirebaseVerifier;
pub use secret::SharedSecretVerifier;

/// Who the bearer token says the caller is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            email_verified: false,
            display_name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>, verified: bool) -> Self {
        self.email = Some(email.into());
        self.email_verified = verified;
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum VerifyError {
    /// Expired, malformed, revoked or mis-signed token
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The provider could not be reached or returned unusable keys
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a bearer token, single attempt
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError>;
}

/// Pick the identity provider the configuration enables, if any
pub fn provider_from_config(config: &SecurityConfig) -> Option<Arc<dyn IdentityProvider>> {
    if let Some(project_id) = &config.firebase_project_id {
        tracing::info!("Verifying Firebase ID tokens for project '{}'", project_id);
        return Some(Arc::new(FirebaseVerifier::new(project_id.clone())));
    }

    if let Some(secret) = &config.jwt_secret {
        tracing::info!("Verifying HS256 tokens signed with AUTH_JWT_SECRET");
        return Some(Arc::new(SharedSecretVerifier::new(secret.clone(), config.jwt_expiry_hours)));
    }

    tracing::warn!("No identity provider configured; protected routes will answer 503");
    None
}
