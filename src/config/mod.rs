//! config
//!
//! Environment-derived configuration.
//!
//! # Overview
//!
//! npmctl has no config file of its own. Settings come from CLI flags and
//! from these environment variables:
//!
//! | Variable                 | Meaning                                   |
//! |--------------------------|-------------------------------------------|
//! | `NPM_BASE_URL`           | API base URL                              |
//! | `NPM_TOKEN`              | API bearer token                          |
//! | `CLOUDFLARE_API_TOKEN`   | Cloudflare token for DNS challenges       |
//! | `NPM_CLI_CONFIG`         | Path of the legacy JSON config            |
//! | `NPM_CLI_DEBUG`          | Enable request/response tracing           |
//! | `NPMCTL_SECRET_PROVIDER` | `keychain` (default) or `file`            |
//!
//! The environment is read once into an [`Environment`] snapshot that is
//! passed explicitly to whatever needs it. Empty variables count as unset.
//!
//! # Legacy Config Locations
//!
//! Searched in order by [`Environment::legacy_config_paths`]:
//! 1. `$NPM_CLI_CONFIG`, or `~/.config/npmctl/config.json` when unset
//! 2. `~/.config/npm-cli/config.json`

pub mod legacy;

pub use legacy::LegacyConfig;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::secrets::DEFAULT_PROVIDER;

pub const ENV_BASE_URL: &str = "NPM_BASE_URL";
pub const ENV_TOKEN: &str = "NPM_TOKEN";
pub const ENV_CLOUDFLARE_TOKEN: &str = "CLOUDFLARE_API_TOKEN";
pub const ENV_CONFIG_PATH: &str = "NPM_CLI_CONFIG";
pub const ENV_DEBUG: &str = "NPM_CLI_DEBUG";
pub const ENV_SECRET_PROVIDER: &str = "NPMCTL_SECRET_PROVIDER";

/// Default legacy config path, relative to the home directory.
const LEGACY_NPMCTL_CONFIG: &str = ".config/npmctl/config.json";

/// Config path used by releases published as `npm-cli`.
const LEGACY_NPM_CLI_CONFIG: &str = ".config/npm-cli/config.json";

/// Snapshot of the environment variables npmctl consumes.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub cloudflare_api_token: Option<String>,
    pub config_path: Option<String>,
    pub debug: bool,
    pub secret_provider: Option<String>,
    pub home_dir: Option<PathBuf>,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("base_url", &self.base_url)
            .field("has_token", &self.token.is_some())
            .field("has_cloudflare_api_token", &self.cloudflare_api_token.is_some())
            .field("config_path", &self.config_path)
            .field("debug", &self.debug)
            .field("secret_provider", &self.secret_provider)
            .field("home_dir", &self.home_dir)
            .finish()
    }
}

impl Environment {
    /// Read the process environment.
    pub fn from_process() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok(), dirs::home_dir())
    }

    /// Build a snapshot from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F, home_dir: Option<PathBuf>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            base_url: var(ENV_BASE_URL),
            token: var(ENV_TOKEN),
            cloudflare_api_token: var(ENV_CLOUDFLARE_TOKEN),
            config_path: var(ENV_CONFIG_PATH),
            debug: var(ENV_DEBUG).is_some_and(|v| parse_flag(&v)),
            secret_provider: var(ENV_SECRET_PROVIDER),
            home_dir,
        }
    }

    /// The secret provider to open.
    pub fn secret_provider(&self) -> &str {
        self.secret_provider.as_deref().unwrap_or(DEFAULT_PROVIDER)
    }

    /// Legacy JSON config locations, highest priority first.
    pub fn legacy_config_paths(&self) -> Vec<PathBuf> {
        let home = self.home_dir.as_deref();
        let mut paths = Vec::with_capacity(2);

        match &self.config_path {
            Some(path) => paths.push(expand_home(path, home)),
            None => {
                if let Some(home) = home {
                    paths.push(home.join(LEGACY_NPMCTL_CONFIG));
                }
            }
        }
        if let Some(home) = home {
            paths.push(home.join(LEGACY_NPM_CLI_CONFIG));
        }
        paths
    }
}

/// Interpret a boolean-ish environment value.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}
