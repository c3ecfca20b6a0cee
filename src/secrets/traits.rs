//! secrets::traits
//!
//! Vault trait and secret-store error types.
//!
//! # Design
//!
//! A [`Vault`] is the raw platform backend: it stores string values
//! addressed by `(namespace, key)` and knows nothing about legacy
//! fallback or login records. [`crate::secrets::SecretStore`] layers those
//! rules on top of any vault.
//!
//! # Security
//!
//! Implementations MUST:
//! - Never log, print, or include secret values in error messages
//! - Report a missing entry as [`VaultError::NotFound`], never as a backend failure
//! - Be thread-safe (Send + Sync)

use std::fmt;

use thiserror::Error;

/// Errors reported by a vault backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    /// No entry exists for the namespace/key pair.
    #[error("no matching entry found")]
    NotFound,

    /// The backend failed; carries the backend's own description.
    #[error("{0}")]
    Backend(String),
}

/// The vault operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultAction {
    Read,
    Store,
    Delete,
}

impl fmt::Display for VaultAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultAction::Read => write!(f, "read secret from"),
            VaultAction::Store => write!(f, "store secret in"),
            VaultAction::Delete => write!(f, "delete secret from"),
        }
    }
}

/// Errors from secret storage operations.
///
/// Note: Error messages intentionally do not include secret values.
#[derive(Debug, Clone, Error)]
pub enum SecretError {
    /// The vault integration cannot be loaded at all.
    #[error("secure storage backend unavailable: {0}")]
    Unavailable(String),

    /// A vault operation failed after the backend was loaded.
    #[error("failed to {action} {backend}: {message}{}", hint_suffix(.hint))]
    OperationFailed {
        /// Which operation failed
        action: VaultAction,
        /// Backend name (keychain, file, memory)
        backend: &'static str,
        /// The backend's error text
        message: String,
        /// Remediation hint when the backend looks missing
        hint: Option<&'static str>,
    },
}

impl SecretError {
    /// Whether this error means no usable backend exists.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SecretError::Unavailable(_))
    }
}

fn hint_suffix(hint: &Option<&'static str>) -> String {
    match hint {
        Some(h) => format!(" Hint: {}", h),
        None => String::new(),
    }
}

/// A platform secret backend addressed by namespace and key.
///
/// # Example
///
/// ```
/// use npmctl::secrets::{MemoryVault, Vault, VaultError};
///
/// let vault = MemoryVault::new();
/// vault.set("npmctl", "cloudflare_api_token", "cf-123").unwrap();
/// assert_eq!(
///     vault.get("npmctl", "cloudflare_api_token").unwrap(),
///     Some("cf-123".to_string())
/// );
/// assert_eq!(vault.delete("npm-cli", "cloudflare_api_token"), Err(VaultError::NotFound));
/// ```
pub trait Vault: Send + Sync {
    /// Short backend name used in error messages.
    fn name(&self) -> &'static str;

    /// Get a value. `Ok(None)` when the entry does not exist.
    ///
    /// The returned value is the raw secret. Do not log or print it.
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, VaultError>;

    /// Store a value, overwriting any existing one.
    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), VaultError>;

    /// Delete a value. `Err(VaultError::NotFound)` when the entry does not exist.
    fn delete(&self, namespace: &str, key: &str) -> Result<(), VaultError>;
}
