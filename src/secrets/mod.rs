//! secrets
//!
//! Secure storage for the login record and API secrets.
//!
//! # Architecture
//!
//! Storage is split in two layers:
//!
//! - A [`Vault`] is the raw backend addressed by `(namespace, key)`:
//!   - [`KeychainVault`]: OS keychain (default, feature-gated)
//!   - [`FileVault`]: `~/.config/npmctl/secrets.toml` fallback
//!   - [`MemoryVault`]: in-process, for tests
//! - [`SecretStore`] wraps a vault and adds the current/legacy namespace
//!   rules, remediation hints, and the [`LoginInfo`] record helpers.
//!
//! # Security
//!
//! - Secrets are **never** logged or included in error messages
//! - File vault uses 0600 permissions on Unix (owner read/write only)
//! - The legacy namespace is never written
//!
//! # Provider Selection
//!
//! ```ignore
//! use npmctl::secrets::{open_store_in, DEFAULT_PROVIDER};
//!
//! let store = open_store_in(DEFAULT_PROVIDER, dirs::home_dir().as_deref())?;
//! if let Some(login) = store.login_info()? {
//!     // Use login.token (never print it!)
//! }
//! ```

mod file_store;
mod keychain_store;
mod login_info;
mod memory_store;
mod store;
mod traits;

pub use file_store::FileVault;
pub use keychain_store::KeychainVault;
pub use login_info::LoginInfo;
pub use memory_store::{FailOn, MemoryVault};
pub use store::{
    backend_hint, SecretStore, CF_TOKEN_KEY, LEGACY_SERVICE_NAME, LOGIN_INFO_KEY, SERVICE_NAME,
};
pub use traits::{SecretError, Vault, VaultAction, VaultError};

use std::path::Path;

/// The default secret provider name.
pub const DEFAULT_PROVIDER: &str = "keychain";

/// Create a vault backend by provider name.
///
/// # Providers
///
/// - `"keychain"` (default): [`KeychainVault`] using the OS keychain
/// - `"file"`: [`FileVault`] storing in `<home>/.config/npmctl/secrets.toml`
///
/// # Errors
///
/// [`SecretError::Unavailable`] for an unknown provider, a keychain build
/// without the `keychain` feature, or a `"file"` provider without `home`.
pub fn create_vault_in(provider: &str, home: Option<&Path>) -> Result<Box<dyn Vault>, SecretError> {
    match provider {
        "keychain" => Ok(Box::new(KeychainVault::new()?)),
        "file" => Ok(Box::new(FileVault::in_home(home)?)),
        other => Err(SecretError::Unavailable(format!(
            "unknown secret provider: '{}' (valid: keychain, file)",
            other
        ))),
    }
}

/// Open a [`SecretStore`], with the file vault placed under `home`.
pub fn open_store_in(provider: &str, home: Option<&Path>) -> Result<SecretStore, SecretError> {
    Ok(SecretStore::new(create_vault_in(provider, home)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_file_vault() {
        let home = tempfile::TempDir::new().expect("temp home");
        let vault = create_vault_in("file", Some(home.path())).expect("create file vault");
        assert_eq!(vault.name(), "file");
    }

    #[test]
    fn create_unknown_provider() {
        match create_vault_in("unknown", None) {
            Err(SecretError::Unavailable(msg)) => {
                assert!(msg.contains("unknown"));
                assert!(msg.contains("keychain, file"));
            }
            Err(e) => panic!("unexpected error type: {:?}", e),
            Ok(_) => panic!("expected error"),
        }
    }

    #[cfg(not(feature = "keychain"))]
    #[test]
    fn create_keychain_without_feature() {
        match create_vault_in("keychain", None) {
            Err(e) => {
                assert!(e.is_unavailable());
                assert!(e.to_string().contains("not enabled"));
            }
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn default_provider_constant() {
        assert_eq!(DEFAULT_PROVIDER, "keychain");
    }

    #[test]
    fn file_vault_under_given_home() {
        let home = tempfile::TempDir::new().expect("temp home");
        let store = open_store_in("file", Some(home.path())).expect("open file store");
        store.set(CF_TOKEN_KEY, "cf-value").expect("set");
        assert!(home.path().join(".config/npmctl/secrets.toml").exists());

        assert!(matches!(
            create_vault_in("file", None),
            Err(SecretError::Unavailable(_))
        ));
    }

    #[test]
    fn open_store_reports_backend() {
        let home = tempfile::TempDir::new().expect("temp home");
        let store = open_store_in("file", Some(home.path())).expect("open file store");
        assert_eq!(store.backend(), "file");
    }
}
