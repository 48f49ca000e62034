//! Shared application state used to assemble the router.
//!
//! Holds the runtime configuration and the credential verifier behind
//! `Arc`s so cloning per layer is cheap. Nothing here is mutated after
//! startup; requests never share state with each other.

use std::sync::Arc;

use crate::config::Config;
use crate::middleware::{CredentialVerifier, StaticCredentials};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Decides which Basic-auth credentials are accepted
    pub verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
    /// Create state that accepts the username/password pair from `config`.
    pub fn new(config: Config) -> Self {
        let verifier = StaticCredentials::new(
            config.auth_username.clone(),
            config.auth_password.clone(),
        );
        Self::with_verifier(config, Arc::new(verifier))
    }

    /// Create state with a custom credential verifier.
    pub fn with_verifier(config: Config, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            config: Arc::new(config),
            verifier,
        }
    }
}
