//! Provider registry and credential construction
//!
//! This module holds the fixed provider table used by the dispatcher and the
//! per-provider rules that turn a native sign-in result into a credential.

pub mod credentials;
pub mod registry;

pub use credentials::{
    AppleCredentials, AuthCredential, CredentialBuilder, FacebookCredentials, GoogleCredentials,
    OAuthCredential, OAuthProvider, PhoneCredentials, TwitterCredentials, REQUIRED_APPLE_SCOPES,
};
pub use registry::{NativeData, ProviderEntry, ProviderId, PROVIDER_REGISTRY};
