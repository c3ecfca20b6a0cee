//! secrets::file_store
//!
//! File-based vault, the fallback when no OS keychain is usable.
//!
//! # Security
//!
//! - Secrets are stored in `~/.config/npmctl/secrets.toml`
//! - File permissions are set to 0600 on Unix (owner read/write only)
//! - All writes are atomic (write to temp file, then rename)
//! - Secrets are NEVER logged, printed, or included in error messages
//!
//! # Layout
//!
//! Each namespace is a TOML table:
//!
//! ```toml
//! [npmctl]
//! cloudflare_api_token = "..."
//!
//! [npm-cli]
//! login_info = "{...}"
//! ```

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use super::traits::{SecretError, Vault, VaultError};

type Namespaces = BTreeMap<String, BTreeMap<String, String>>;

/// File-based vault.
///
/// Stores namespaced secrets in a TOML file at
/// `~/.config/npmctl/secrets.toml`.
#[derive(Debug)]
pub struct FileVault {
    /// Path to the secrets file
    path: PathBuf,
}

impl FileVault {
    /// Create a file vault under the given home directory.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::Unavailable`] if no home directory is known.
    pub fn in_home(home: Option<&Path>) -> Result<Self, SecretError> {
        let home =
            home.ok_or_else(|| SecretError::Unavailable("cannot determine home directory".into()))?;
        let path = home.join(".config").join("npmctl").join("secrets.toml");
        Ok(Self { path })
    }

    /// Create a file vault at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the path to the secrets file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_all(&self) -> Result<Namespaces, VaultError> {
        if !self.path.exists() {
            return Ok(Namespaces::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| VaultError::Backend(format!("cannot read secrets file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| VaultError::Backend(format!("cannot parse secrets file: {}", e)))
    }

    /// Write secrets to the file with atomic write and proper permissions.
    fn write_all(&self, secrets: &Namespaces) -> Result<(), VaultError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| VaultError::Backend(format!("cannot create directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(secrets)
            .map_err(|e| VaultError::Backend(format!("cannot serialize secrets: {}", e)))?;

        let temp_path = self.path.with_extension("tmp");

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| VaultError::Backend(format!("cannot create temp file: {}", e)))?;

            // Restrict before any content is written
            #[cfg(unix)]
            {
                let permissions = fs::Permissions::from_mode(0o600);
                file.set_permissions(permissions).map_err(|e| {
                    VaultError::Backend(format!("cannot set permissions: {}", e))
                })?;
            }

            file.write_all(content.as_bytes())
                .map_err(|e| VaultError::Backend(format!("cannot write secrets: {}", e)))?;

            file.sync_all()
                .map_err(|e| VaultError::Backend(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| VaultError::Backend(format!("cannot rename temp file: {}", e)))
    }
}

impl Vault for FileVault {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, VaultError> {
        let secrets = self.read_all()?;
        Ok(secrets.get(namespace).and_then(|ns| ns.get(key)).cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), VaultError> {
        let mut secrets = self.read_all()?;
        secrets
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.write_all(&secrets)
    }

    fn delete(&self, namespace: &str, key: &str) -> Result<(), VaultError> {
        let mut secrets = self.read_all()?;
        let removed = secrets
            .get_mut(namespace)
            .and_then(|ns| ns.remove(key))
            .is_some();
        if !removed {
            return Err(VaultError::NotFound);
        }
        secrets.retain(|_, ns| !ns.is_empty());
        self.write_all(&secrets)
    }
}
