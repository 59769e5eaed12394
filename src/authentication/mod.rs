//! Sign-in service, capability traits and service factory
//!
//! This module provides the dispatcher and per-provider flows, the traits for
//! the native bridge and identity backend they drive, and a factory that wires
//! everything from settings.

pub mod facade;
pub mod factory;
pub mod service;
pub mod traits;

pub use factory::{AuthenticationConfig, AuthenticationServiceFactory};
pub use service::{DispatchResult, NativeAuthService};
pub use traits::{IdentityBackend, NativeBridge};
