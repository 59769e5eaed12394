//! Provider registry
//!
//! Fixed table mapping each wire provider identifier to its [`ProviderId`]
//! and the shape of the data its native sign-in call takes. All identifiers
//! are crate constants, including Apple's.

use crate::models::AuthError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const GOOGLE_PROVIDER_ID: &str = "google.com";
pub const FACEBOOK_PROVIDER_ID: &str = "facebook.com";
pub const TWITTER_PROVIDER_ID: &str = "twitter.com";
pub const APPLE_PROVIDER_ID: &str = "apple.com";
pub const PHONE_PROVIDER_ID: &str = "phone";

/// The closed set of providers the dispatcher can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "google.com")]
    Google,
    #[serde(rename = "facebook.com")]
    Facebook,
    #[serde(rename = "twitter.com")]
    Twitter,
    #[serde(rename = "apple.com")]
    Apple,
    #[serde(rename = "phone")]
    Phone,
}

/// Data the native bridge expects alongside the provider identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeData {
    /// `{ providerId }` only
    None,
    /// `{ providerId, data: { phone, verificationCode? } }`
    PhoneOptions,
}

/// One row of the provider registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderEntry {
    pub provider: ProviderId,
    pub provider_id: &'static str,
    pub display_name: &'static str,
    pub native_data: NativeData,
}

pub static PROVIDER_REGISTRY: [ProviderEntry; 5] = [
    ProviderEntry {
        provider: ProviderId::Google,
        provider_id: GOOGLE_PROVIDER_ID,
        display_name: "Google",
        native_data: NativeData::None,
    },
    ProviderEntry {
        provider: ProviderId::Facebook,
        provider_id: FACEBOOK_PROVIDER_ID,
        display_name: "Facebook",
        native_data: NativeData::None,
    },
    ProviderEntry {
        provider: ProviderId::Twitter,
        provider_id: TWITTER_PROVIDER_ID,
        display_name: "Twitter",
        native_data: NativeData::None,
    },
    ProviderEntry {
        provider: ProviderId::Apple,
        provider_id: APPLE_PROVIDER_ID,
        display_name: "Apple",
        native_data: NativeData::None,
    },
    ProviderEntry {
        provider: ProviderId::Phone,
        provider_id: PHONE_PROVIDER_ID,
        display_name: "Phone",
        native_data: NativeData::PhoneOptions,
    },
];

impl ProviderId {
    pub const ALL: [ProviderId; 5] = [
        ProviderId::Google,
        ProviderId::Facebook,
        ProviderId::Twitter,
        ProviderId::Apple,
        ProviderId::Phone,
    ];

    /// Wire identifier sent to the native bridge
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProviderId::Google => GOOGLE_PROVIDER_ID,
            ProviderId::Facebook => FACEBOOK_PROVIDER_ID,
            ProviderId::Twitter => TWITTER_PROVIDER_ID,
            ProviderId::Apple => APPLE_PROVIDER_ID,
            ProviderId::Phone => PHONE_PROVIDER_ID,
        }
    }

    /// Registry row for this provider
    #[must_use]
    pub fn entry(self) -> &'static ProviderEntry {
        match self {
            ProviderId::Google => &PROVIDER_REGISTRY[0],
            ProviderId::Facebook => &PROVIDER_REGISTRY[1],
            ProviderId::Twitter => &PROVIDER_REGISTRY[2],
            ProviderId::Apple => &PROVIDER_REGISTRY[3],
            ProviderId::Phone => &PROVIDER_REGISTRY[4],
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        self.entry().display_name
    }

    /// Look up a wire identifier (exact, case-sensitive match)
    #[must_use]
    pub fn resolve(provider_id: &str) -> Option<Self> {
        PROVIDER_REGISTRY
            .iter()
            .find(|entry| entry.provider_id == provider_id)
            .map(|entry| entry.provider)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s).ok_or_else(|| AuthError::UnsupportedProvider(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_rows_match_their_provider() {
        for provider in ProviderId::ALL {
            assert_eq!(provider.entry().provider, provider);
            assert_eq!(ProviderId::resolve(provider.as_str()), Some(provider));
        }
    }

    #[test]
    fn test_wire_identifiers() {
        assert_eq!(ProviderId::Google.as_str(), "google.com");
        assert_eq!(ProviderId::Facebook.as_str(), "facebook.com");
        assert_eq!(ProviderId::Twitter.as_str(), "twitter.com");
        assert_eq!(ProviderId::Apple.as_str(), "apple.com");
        assert_eq!(ProviderId::Phone.as_str(), "phone");
    }

    #[test]
    fn test_only_phone_takes_native_data() {
        for entry in &PROVIDER_REGISTRY {
            let expected = if entry.provider == ProviderId::Phone {
                NativeData::PhoneOptions
            } else {
                NativeData::None
            };
            assert_eq!(entry.native_data, expected, "{}", entry.display_name);
        }
    }

    #[test]
    fn test_resolve_is_exact() {
        assert_eq!(ProviderId::resolve("Google.com"), None);
        assert_eq!(ProviderId::resolve("google.com "), None);
        assert_eq!(ProviderId::resolve("github.com"), None);
        assert_eq!(ProviderId::resolve(""), None);
    }

    #[test]
    fn test_from_str_unsupported() {
        let err = "github.com".parse::<ProviderId>().unwrap_err();
        assert!(matches!(err, AuthError::UnsupportedProvider(ref id) if id == "github.com"));
        assert_eq!("apple.com".parse::<ProviderId>().unwrap(), ProviderId::Apple);
    }

    #[test]
    fn test_serde_uses_wire_identifiers() {
        let value = serde_json::to_value(ProviderId::Twitter).unwrap();
        assert_eq!(value, serde_json::json!("twitter.com"));
        let parsed: ProviderId = serde_json::from_value(serde_json::json!("phone")).unwrap();
        assert_eq!(parsed, ProviderId::Phone);
    }
}
