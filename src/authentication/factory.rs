//! Service factory for creating configured sign-in services
//!
//! This module wires a [`NativeAuthService`] from settings: the Apple scopes
//! come from configuration and the identity backend is either the Identity
//! Toolkit REST client or a caller-supplied implementation.

use crate::authentication::service::NativeAuthService;
use crate::authentication::traits::{IdentityBackend, NativeBridge};
use crate::backend::{IdentityToolkitBackend, IdentityToolkitError};
use crate::providers::{AppleCredentials, PROVIDER_REGISTRY};
use crate::settings::AuthBridgeSettings;
use std::sync::Arc;

/// Configuration for creating sign-in services
#[derive(Debug, Clone)]
pub struct AuthenticationConfig {
    /// Apple scopes requested after the required `email` and `name`
    pub apple_extra_scopes: Vec<String>,
}

impl AuthenticationConfig {
    /// Create authentication configuration from settings
    #[must_use]
    pub fn from_settings(settings: &AuthBridgeSettings) -> Self {
        Self {
            apple_extra_scopes: settings.apple.extra_scopes.clone(),
        }
    }
}

/// Factory for creating sign-in services with dependency injection
pub struct AuthenticationServiceFactory;

impl AuthenticationServiceFactory {
    /// Create a service that exchanges credentials with the Identity Toolkit REST API
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No API key is configured
    /// - The configured base URL is invalid
    pub fn create_service(
        settings: &AuthBridgeSettings,
        bridge: Arc<dyn NativeBridge>,
    ) -> Result<NativeAuthService, IdentityToolkitError> {
        log::info!("🏭 Starting authentication service factory...");

        let backend = IdentityToolkitBackend::from_settings(&settings.identity_toolkit)?;
        log::info!(
            "✅ Identity Toolkit backend configured ({})",
            settings.identity_toolkit.base_url
        );

        let service = Self::create_service_with_backend(settings, bridge, Arc::new(backend));
        log::info!("🏭 Authentication service factory completed successfully");
        Ok(service)
    }

    /// Create a service around a caller-supplied identity backend
    #[must_use]
    pub fn create_service_with_backend(
        settings: &AuthBridgeSettings,
        bridge: Arc<dyn NativeBridge>,
        backend: Arc<dyn IdentityBackend>,
    ) -> NativeAuthService {
        let config = AuthenticationConfig::from_settings(settings);
        let apple = AppleCredentials::new(&config.apple_extra_scopes);

        for entry in &PROVIDER_REGISTRY {
            log::info!("   └─ {} ({})", entry.display_name, entry.provider_id);
        }
        log::info!(
            "   └─ Apple scopes: {}",
            apple.oauth_provider().scopes().join(", ")
        );

        NativeAuthService::new(bridge, backend).with_apple_credentials(apple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock::{MockIdentityBackend, MockNativeBridge};

    #[test]
    fn test_configured_apple_scopes_cannot_drop_required_ones() {
        let mut settings = AuthBridgeSettings::default();
        settings.apple.extra_scopes = vec!["openid".to_string()];

        let service = AuthenticationServiceFactory::create_service_with_backend(
            &settings,
            Arc::new(MockNativeBridge::new()),
            Arc::new(MockIdentityBackend::new()),
        );

        let provider = service.apple_credentials().oauth_provider();
        assert_eq!(provider.provider_id(), "apple.com");
        assert_eq!(provider.scopes(), ["email", "name", "openid"]);
    }

    #[test]
    fn test_default_settings_request_only_required_apple_scopes() {
        let service = AuthenticationServiceFactory::create_service_with_backend(
            &AuthBridgeSettings::default(),
            Arc::new(MockNativeBridge::new()),
            Arc::new(MockIdentityBackend::new()),
        );
        assert_eq!(service.apple_credentials(), &AppleCredentials::default());
    }

    #[test]
    fn test_create_service_requires_api_key() {
        let mut settings = AuthBridgeSettings::default();
        settings.identity_toolkit.api_key = None;
        settings.identity_toolkit.api_key_env = None;

        let result = AuthenticationServiceFactory::create_service(
            &settings,
            Arc::new(MockNativeBridge::new()),
        );
        assert!(matches!(result, Err(IdentityToolkitError::MissingApiKey)));
    }
}
