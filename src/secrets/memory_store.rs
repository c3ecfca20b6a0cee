//! secrets::memory_store
//!
//! In-memory vault for deterministic testing.
//!
//! # Design
//!
//! Entries live in a map shared across clones, so a test can hand one
//! clone to a [`crate::secrets::SecretStore`] and inspect another. A
//! failure can be injected per operation to exercise error paths.
//!
//! # Example
//!
//! ```
//! use npmctl::secrets::{FailOn, MemoryVault, Vault};
//!
//! let vault = MemoryVault::new().with_entry("npm-cli", "login_info", "{}");
//! assert!(vault.get("npm-cli", "login_info").unwrap().is_some());
//!
//! let broken = MemoryVault::new().fail_on(FailOn::Get("no recommended backend".into()));
//! assert!(broken.get("npmctl", "login_info").is_err());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{Vault, VaultError};

/// Which operation should fail, and with what backend message.
#[derive(Debug, Clone)]
pub enum FailOn {
    Get(String),
    Set(String),
    Delete(String),
}

#[derive(Debug, Default)]
struct MemoryVaultInner {
    entries: HashMap<(String, String), String>,
    fail_on: Option<FailOn>,
}

/// In-memory vault. Thread-safe via internal `Arc<Mutex<...>>`.
#[derive(Debug, Clone, Default)]
pub struct MemoryVault {
    inner: Arc<Mutex<MemoryVaultInner>>,
}

impl MemoryVault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry.
    pub fn with_entry(self, namespace: &str, key: &str, value: &str) -> Self {
        self.lock()
            .entries
            .insert((namespace.to_string(), key.to_string()), value.to_string());
        self
    }

    /// Configure an operation to fail.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on = Some(fail_on);
        self
    }

    /// Whether an entry exists, bypassing failure injection.
    pub fn contains(&self, namespace: &str, key: &str) -> bool {
        self.lock()
            .entries
            .contains_key(&(namespace.to_string(), key.to_string()))
    }

    fn lock(&self) -> MutexGuard<'_, MemoryVaultInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Vault for MemoryVault {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, VaultError> {
        let inner = self.lock();
        if let Some(FailOn::Get(msg)) = &inner.fail_on {
            return Err(VaultError::Backend(msg.clone()));
        }
        Ok(inner
            .entries
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), VaultError> {
        let mut inner = self.lock();
        if let Some(FailOn::Set(msg)) = &inner.fail_on {
            return Err(VaultError::Backend(msg.clone()));
        }
        inner
            .entries
            .insert((namespace.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    fn delete(&self, namespace: &str, key: &str) -> Result<(), VaultError> {
        let mut inner = self.lock();
        if let Some(FailOn::Delete(msg)) = &inner.fail_on {
            return Err(VaultError::Backend(msg.clone()));
        }
        inner
            .entries
            .remove(&(namespace.to_string(), key.to_string()))
            .map(|_| ())
            .ok_or(VaultError::NotFound)
    }
}
