//! secrets::keychain_store
//!
//! Vault backed by the OS keychain.
//!
//! # Platform Support
//!
//! This module uses the `keyring` crate which supports:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet), fronted by a kernel
//!   keyutils cache
//!
//! Namespaces map to keyring *services* and keys to keyring *users*, so
//! the current and legacy namespaces are separate keychain entries.
//!
//! # Feature Flag
//!
//! Real keychain access requires the `keychain` feature (on by default).
//! Without it, [`KeychainVault::new`] fails with
//! [`SecretError::Unavailable`].

#[cfg(feature = "keychain")]
use keyring::Entry;

use super::traits::{SecretError, Vault, VaultError};

/// Vault using the OS keychain via the `keyring` crate.
#[cfg(feature = "keychain")]
#[derive(Debug, Default)]
pub struct KeychainVault {
    _private: (),
}

#[cfg(feature = "keychain")]
impl KeychainVault {
    /// Create a keychain vault.
    pub fn new() -> Result<Self, SecretError> {
        Ok(Self { _private: () })
    }

    fn entry(namespace: &str, key: &str) -> Result<Entry, VaultError> {
        Entry::new(namespace, key)
            .map_err(|e| VaultError::Backend(format!("cannot create keyring entry: {}", e)))
    }
}

#[cfg(feature = "keychain")]
impl Vault for KeychainVault {
    fn name(&self) -> &'static str {
        "keychain"
    }

    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, VaultError> {
        let entry = Self::entry(namespace, key)?;

        match entry.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(keyring::Error::Ambiguous(_)) => {
                Err(VaultError::Backend("ambiguous keychain entry".to_string()))
            }
            Err(e) => Err(VaultError::Backend(e.to_string())),
        }
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), VaultError> {
        Self::entry(namespace, key)?
            .set_password(value)
            .map_err(|e| VaultError::Backend(e.to_string()))
    }

    fn delete(&self, namespace: &str, key: &str) -> Result<(), VaultError> {
        match Self::entry(namespace, key)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Err(VaultError::NotFound),
            Err(e) => Err(VaultError::Backend(e.to_string())),
        }
    }
}

// Stub implementation when keychain feature is disabled
#[cfg(not(feature = "keychain"))]
#[derive(Debug)]
pub struct KeychainVault {
    _private: (),
}

#[cfg(not(feature = "keychain"))]
impl KeychainVault {
    /// Create a keychain vault.
    ///
    /// Always fails when compiled without the `keychain` feature.
    pub fn new() -> Result<Self, SecretError> {
        Err(SecretError::Unavailable(
            "keychain support not enabled (rebuild with --features keychain, \
             or set NPMCTL_SECRET_PROVIDER=file)"
                .into(),
        ))
    }
}

#[cfg(not(feature = "keychain"))]
impl Vault for KeychainVault {
    fn name(&self) -> &'static str {
        "keychain"
    }

    fn get(&self, _namespace: &str, _key: &str) -> Result<Option<String>, VaultError> {
        Err(VaultError::Backend("keychain not available".into()))
    }

    fn set(&self, _namespace: &str, _key: &str, _value: &str) -> Result<(), VaultError> {
        Err(VaultError::Backend("keychain not available".into()))
    }

    fn delete(&self, _namespace: &str, _key: &str) -> Result<(), VaultError> {
        Err(VaultError::Backend("keychain not available".into()))
    }
}
