//! secrets::login_info
//!
//! The stored login record.
//!
//! # Design
//!
//! A successful `npmctl login` produces one [`LoginInfo`], serialized as a
//! JSON object and written under a single secret key. Writing the whole
//! record at once means a re-login never leaves a token from one server
//! paired with the base URL of another.
//!
//! # Security
//!
//! The token must never appear in logs or debug output. This module
//! implements a custom `Debug` that redacts it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Login details persisted after `npmctl login`.
///
/// Every field defaults to empty when absent so records written by older
/// releases still load.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInfo {
    /// API base URL the token was issued by.
    #[serde(default)]
    pub base_url: String,

    /// Bearer token.
    #[serde(default)]
    pub token: String,

    /// Opaque expiry label as returned by the server.
    #[serde(default)]
    pub expires: Option<String>,

    /// Identity (email) used to log in.
    #[serde(default)]
    pub identity: String,
}

impl LoginInfo {
    /// Build a login record.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        expires: Option<String>,
        identity: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            expires,
            identity: identity.into(),
        }
    }

    /// Serialize to the stored JSON form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a stored record.
    ///
    /// Returns `None` for malformed JSON or a non-object value; a damaged
    /// record is treated as "not logged in" rather than an error.
    pub fn from_json(raw: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(raw).ok()?;
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

impl fmt::Debug for LoginInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInfo")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .field("expires", &self.expires)
            .field("identity", &self.identity)
            .finish()
    }
}
