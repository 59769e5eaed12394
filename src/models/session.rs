//! Web session types returned by the identity backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User record attached to an authenticated web session
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub uid: String,
    pub provider_id: String,
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

/// Result of a successful credential exchange
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub user: Option<SessionUser>,
    pub provider_id: Option<String>,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_new_user: bool,
}

/// Plain user info record projected from a [`SessionUser`]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub uid: String,
    pub provider_id: String,
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl From<&SessionUser> for UserInfo {
    fn from(user: &SessionUser) -> Self {
        Self {
            uid: user.uid.clone(),
            provider_id: user.provider_id.clone(),
            display_name: user.display_name.clone(),
            photo_url: user.photo_url.clone(),
            phone_number: user.phone_number.clone(),
            email: user.email.clone(),
        }
    }
}

impl SessionResult {
    /// Project the session user into a plain info record
    #[must_use]
    pub fn user_info(&self) -> Option<UserInfo> {
        self.user.as_ref().map(UserInfo::from)
    }
}

/// Native sign-in result paired with the web session it was exchanged for
///
/// Both halves are kept so callers can read provider-specific fields that the
/// session does not carry (for example the Twitter secret).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CombinedResult<R> {
    pub session: SessionResult,
    pub result: R,
}

impl<R> CombinedResult<R> {
    /// Project the session user into a plain info record
    #[must_use]
    pub fn user_info(&self) -> Option<UserInfo> {
        self.session.user_info()
    }

    /// Convert the native half of the result, keeping the session
    pub fn map_result<T>(self, f: impl FnOnce(R) -> T) -> CombinedResult<T> {
        CombinedResult {
            session: self.session,
            result: f(self.result),
        }
    }
}
