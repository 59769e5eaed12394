#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the authbridge library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod authentication;
pub mod backend;
pub mod models;
pub mod providers;
pub mod settings;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use authentication::{
    AuthenticationServiceFactory, DispatchResult, IdentityBackend, NativeAuthService, NativeBridge,
};
pub use backend::IdentityToolkitBackend;
pub use models::{
    AuthError, CapabilityError, CombinedResult, PhoneCodeReceived, PhoneVerificationEvent,
    ProviderResult, SessionResult, SignInOptions, UserInfo,
};
pub use providers::{AuthCredential, ProviderId};
pub use settings::AuthBridgeSettings;
