//! Identity backend implementations
//!
//! The sign-in flows only see the `IdentityBackend` trait; this module ships
//! the Identity Toolkit REST implementation of it.

pub mod identity_toolkit;

pub use identity_toolkit::{IdentityToolkitBackend, IdentityToolkitError};
