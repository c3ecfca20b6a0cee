//! secrets::store
//!
//! Namespaced secret store with legacy fallback.
//!
//! # Namespaces
//!
//! Secrets are written to the current namespace (`npmctl`). Releases that
//! shipped under the old name wrote to `npm-cli`; those entries are still
//! read as a fallback and removed on delete, but never written.
//!
//! # Errors
//!
//! Backend failures become [`SecretError::OperationFailed`]. When the
//! backend's message looks like "no usable keyring", the error carries a
//! platform-specific remediation hint.

use super::login_info::LoginInfo;
use super::traits::{SecretError, Vault, VaultAction, VaultError};

/// Current vault namespace.
pub const SERVICE_NAME: &str = "npmctl";

/// Namespace used by earlier releases; read and delete only.
pub const LEGACY_SERVICE_NAME: &str = "npm-cli";

/// Key of the stored login record.
pub const LOGIN_INFO_KEY: &str = "login_info";

/// Key of the stored Cloudflare API token.
pub const CF_TOKEN_KEY: &str = "cloudflare_api_token";

/// Phrases in backend errors that mean no keyring backend is usable.
const BACKEND_MISSING_PHRASES: &[&str] = &[
    "no recommended backend",
    "couldn't access platform secure storage",
    "secret service",
    "dbus",
    "keychain not available",
];

#[cfg(target_os = "macos")]
const BACKEND_HINT: &str = "unlock the login keychain (Keychain Access), \
    or set NPMCTL_SECRET_PROVIDER=file to use the file store.";

#[cfg(target_os = "windows")]
const BACKEND_HINT: &str = "make sure Windows Credential Manager is available for this user, \
    or set NPMCTL_SECRET_PROVIDER=file to use the file store.";

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const BACKEND_HINT: &str = "install and run an OS keyring backend (Secret Service/KWallet), \
    or set NPMCTL_SECRET_PROVIDER=file to use the file store \
    (~/.config/npmctl/secrets.toml).";

/// Pick a remediation hint for a backend error message.
pub fn backend_hint(message: &str) -> Option<&'static str> {
    let message = message.to_lowercase();
    BACKEND_MISSING_PHRASES
        .iter()
        .any(|phrase| message.contains(phrase))
        .then_some(BACKEND_HINT)
}

/// Secret store over a [`Vault`], with current/legacy namespaces.
pub struct SecretStore {
    vault: Box<dyn Vault>,
    namespace: String,
    legacy_namespace: String,
}

impl std::fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretStore")
            .field("backend", &self.vault.name())
            .field("namespace", &self.namespace)
            .field("legacy_namespace", &self.legacy_namespace)
            .finish()
    }
}

impl SecretStore {
    /// Wrap a vault using the standard namespaces.
    pub fn new(vault: Box<dyn Vault>) -> Self {
        Self {
            vault,
            namespace: SERVICE_NAME.to_string(),
            legacy_namespace: LEGACY_SERVICE_NAME.to_string(),
        }
    }

    /// Name of the underlying backend.
    pub fn backend(&self) -> &'static str {
        self.vault.name()
    }

    /// Get a secret, preferring the current namespace.
    ///
    /// An empty value counts as absent, so an empty current entry does not
    /// hide a legacy one.
    pub fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        for namespace in [&self.namespace, &self.legacy_namespace] {
            let value = self
                .vault
                .get(namespace, key)
                .map_err(|e| self.failure(VaultAction::Read, e))?;
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                return Ok(Some(v));
            }
        }
        Ok(None)
    }

    /// Store a secret in the current namespace.
    pub fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        self.vault
            .set(&self.namespace, key, value)
            .map_err(|e| self.failure(VaultAction::Store, e))
    }

    /// Delete a secret from both namespaces.
    ///
    /// A namespace without the key is skipped. Both namespaces are
    /// attempted; the first real failure is returned.
    pub fn delete(&self, key: &str) -> Result<(), SecretError> {
        let mut first_error = None;
        for namespace in [&self.namespace, &self.legacy_namespace] {
            match self.vault.delete(namespace, key) {
                Ok(()) | Err(VaultError::NotFound) => {}
                Err(e) => {
                    first_error.get_or_insert(self.failure(VaultAction::Delete, e));
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Check if a non-empty secret exists in either namespace.
    pub fn exists(&self, key: &str) -> Result<bool, SecretError> {
        Ok(self.get(key)?.is_some())
    }

    /// Load the stored login record, if any.
    ///
    /// A damaged record is reported as `None`.
    pub fn login_info(&self) -> Result<Option<LoginInfo>, SecretError> {
        Ok(self
            .get(LOGIN_INFO_KEY)?
            .and_then(|raw| LoginInfo::from_json(&raw)))
    }

    /// Persist a login record, replacing any previous one.
    pub fn save_login_info(&self, info: &LoginInfo) -> Result<(), SecretError> {
        let raw = info.to_json().map_err(|e| SecretError::OperationFailed {
            action: VaultAction::Store,
            backend: self.vault.name(),
            message: format!("cannot serialize login record: {}", e),
            hint: None,
        })?;
        self.set(LOGIN_INFO_KEY, &raw)
    }

    /// Remove the stored login record.
    pub fn clear_login_info(&self) -> Result<(), SecretError> {
        self.delete(LOGIN_INFO_KEY)
    }

    fn failure(&self, action: VaultAction, err: VaultError) -> SecretError {
        let message = err.to_string();
        SecretError::OperationFailed {
            action,
            backend: self.vault.name(),
            hint: backend_hint(&message),
            message,
        }
    }
}
